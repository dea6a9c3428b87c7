//! Concrete pass: the truth value of a sentence under one valuation.

use std::collections::HashMap;

use log::debug;
use tap::TapFallible;

use crate::derivation::expression;
use crate::derivation_log::{DerivationLog, Rule};
use crate::error::Result;
use crate::node::{Node, NodeData, NodeId, Sentence, VerbPhrase, NEGATION_TABLE};
use crate::prose;
use crate::tree::Tree;
use crate::valuation::{format_individuals, format_pairs, Extension, Valuation};

fn bit(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

/// Evaluates one valuation against one tree, appending the evaluation rows to the log.
///
/// Every node is evaluated (and logged) at most once; repeated occurrences are served
/// from the evaluator's own cache, which lives as long as the evaluator.
pub struct Evaluator<'a> {
    tree: &'a Tree,
    valuation: &'a Valuation,
    log: &'a mut DerivationLog,
    label: String,
    individuals: HashMap<NodeId, (Vec<String>, usize)>,
    pairs: HashMap<NodeId, (Vec<(String, String)>, usize)>,
    truths: HashMap<NodeId, (bool, usize)>,
}

impl<'a> Evaluator<'a> {
    pub fn new(tree: &'a Tree, valuation: &'a Valuation, log: &'a mut DerivationLog) -> Self {
        Evaluator {
            tree,
            valuation,
            log,
            label: valuation.label(),
            individuals: HashMap::new(),
            pairs: HashMap::new(),
            truths: HashMap::new(),
        }
    }

    /// Truth value of the sentence `root`.
    ///
    /// On failure, every row appended during this call is removed again.
    pub fn evaluate(mut self, root: NodeId) -> Result<bool> {
        let mark = self.log.len();
        let evaluated = self
            .sentence(root)
            .tap_ok(|(value, line)| debug!("{} = {} at L{}", self.label, value, line));
        match evaluated {
            Ok((value, _)) => Ok(value),
            Err(e) => {
                debug!("Rolling back {} rows of {}", self.log.len() - mark, self.label);
                self.log.truncate(mark);
                Err(e)
            }
        }
    }

    fn emit(&mut self, node: &NodeData, text: &str, rule: Rule) -> usize {
        self.log.push(expression(&node.name(), &self.label, text), rule)
    }

    /// Extension of an intransitive verb or verb phrase.
    fn individuals(&mut self, id: NodeId) -> Result<(Vec<String>, usize)> {
        if let Some(hit) = self.individuals.get(&id) {
            return Ok(hit.clone());
        }

        let tree = self.tree;
        let node = tree.node(id);
        let (value, line) = match *node.kind() {
            Node::IntransitiveVerb => {
                let value = match self.valuation.extension(node.category(), node.text())? {
                    Extension::Individuals(individuals) => individuals.clone(),
                    Extension::Pairs(_) => unreachable!(),
                };
                let rule = Rule::tag(self.label.clone());
                let line = self.emit(node, &format_individuals(&value), rule);
                (value, line)
            }
            Node::VerbPhrase(VerbPhrase::Intransitive { verb }) => {
                let (value, verb_line) = self.individuals(verb)?;
                let line = self.emit(node, &format_individuals(&value), Rule::tag("R1").cite(verb_line));
                (value, line)
            }
            Node::VerbPhrase(VerbPhrase::Transitive { verb, object }) => {
                let (pairs, verb_line) = self.pairs(verb)?;
                let object = tree.node(object);
                // Cites the substituted form `{x: <x,N> ∈ [[Vt]]}` of the symbolic pass.
                let rule = Rule::cites([node.lines()[1], verb_line, object.line()]);
                let text = format!("{{x: <x,{}> ∈ {}}}", object.text(), format_pairs(&pairs));
                let l1 = self.emit(node, &text, rule);
                let value = pairs
                    .into_iter()
                    .filter(|(_, second)| second.eq_ignore_ascii_case(object.text()))
                    .map(|(first, _)| first)
                    .collect::<Vec<_>>();
                let line = self.emit(node, &format_individuals(&value), Rule::tag("C").cite(l1));
                (value, line)
            }
            ref other => unreachable!("{:?} has no set of individuals", other),
        };

        self.individuals.insert(id, (value.clone(), line));
        Ok((value, line))
    }

    /// Extension of a transitive verb.
    fn pairs(&mut self, id: NodeId) -> Result<(Vec<(String, String)>, usize)> {
        if let Some(hit) = self.pairs.get(&id) {
            return Ok(hit.clone());
        }

        let tree = self.tree;
        let node = tree.node(id);
        let value = match self.valuation.extension(node.category(), node.text())? {
            Extension::Pairs(pairs) => pairs.clone(),
            Extension::Individuals(_) => unreachable!(),
        };
        let rule = Rule::tag(self.label.clone());
        let line = self.emit(node, &format_pairs(&value), rule);

        self.pairs.insert(id, (value.clone(), line));
        Ok((value, line))
    }

    fn sentence(&mut self, id: NodeId) -> Result<(bool, usize)> {
        if let Some(&hit) = self.truths.get(&id) {
            return Ok(hit);
        }

        let tree = self.tree;
        let node = tree.node(id);
        let sentence = match node.kind() {
            Node::Sentence(sentence) => *sentence,
            other => unreachable!("{:?} is not a sentence", other),
        };

        let (value, l1) = match sentence {
            Sentence::Predication { subject, predicate } => {
                let (set, predicate_line) = self.individuals(predicate)?;
                let subject = tree.node(subject);
                let text = prose::membership(subject.text(), &format_individuals(&set));
                let l1 = self.emit(node, &text, Rule::cites([node.line(), predicate_line]));
                let value = set.iter().any(|x| x.eq_ignore_ascii_case(subject.text()));
                (value, l1)
            }
            Sentence::Negated { inner, .. } => {
                let (inner_value, inner_line) = self.sentence(inner)?;
                let text = format!("{}({})", NEGATION_TABLE, bit(inner_value));
                let l1 = self.emit(node, &text, Rule::cites([node.first_line(), inner_line]));
                (!inner_value, l1)
            }
            Sentence::Connected {
                lhs, connective, rhs, ..
            } => {
                let (lhs_value, lhs_line) = self.sentence(lhs)?;
                let (rhs_value, rhs_line) = self.sentence(rhs)?;
                let text = format!(
                    "{}(<{},{}>)",
                    connective.truth_table(),
                    bit(lhs_value),
                    bit(rhs_value)
                );
                let l1 = self.emit(node, &text, Rule::cites([node.first_line(), lhs_line, rhs_line]));
                (connective.apply(lhs_value, rhs_value), l1)
            }
        };
        let line = self.emit(node, bit(value), Rule::tag("C").cite(l1));

        self.truths.insert(id, (value, line));
        Ok((value, line))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use test_log::test;

    use f1_parser::parse_sentence;

    use super::*;
    use crate::error::Error;

    fn setup(input: &str) -> (Tree, NodeId, DerivationLog) {
        let token = parse_sentence(input).unwrap();
        let mut tree = Tree::new();
        let mut log = DerivationLog::new();
        let root = tree.build(&token, &mut log).unwrap();
        (tree, root, log)
    }

    fn new_rows(log: &DerivationLog, from: usize) -> Vec<(String, String)> {
        log.rows()[from..]
            .iter()
            .map(|row| (row.expression.clone(), row.rule.to_string()))
            .collect_vec()
    }

    #[test]
    fn test_intransitive() {
        let (tree, root, mut log) = setup("[S[N Ann][VP[Vi sleeps]]]");
        let v = Valuation::new("1").with_individuals("sleeps", ["ann", "bob"]);
        let value = Evaluator::new(&tree, &v, &mut log).evaluate(root).unwrap();
        assert!(value);
        assert_eq!(
            new_rows(&log, 5),
            vec![
                ("[[Vi2]]v1 = {ann, bob}".to_string(), "v1".to_string()),
                ("[[VP3]]v1 = {ann, bob}".to_string(), "R1,L6".to_string()),
                ("[[S4]]v1 = 1 iff Ann ∈ {ann, bob}; 0 o.w".to_string(), "L5,L7".to_string()),
                ("[[S4]]v1 = 1".to_string(), "C,L8".to_string()),
            ]
        );
    }

    #[test]
    fn test_transitive() {
        let (tree, root, mut log) = setup("[S[N Ann][VP[Vt likes][N Bob]]]");
        let v = Valuation::new("1").with_pairs("likes", [("ann", "bob")]);
        let value = Evaluator::new(&tree, &v, &mut log).evaluate(root).unwrap();
        assert!(value);
        assert_eq!(
            new_rows(&log, 8),
            vec![
                ("[[Vt2]]v1 = {<ann, bob>}".to_string(), "v1".to_string()),
                ("[[VP4]]v1 = {x: <x,Bob> ∈ {<ann, bob>}}".to_string(), "L5,L9,L3".to_string()),
                ("[[VP4]]v1 = {ann}".to_string(), "C,L10".to_string()),
                ("[[S5]]v1 = 1 iff Ann ∈ {ann}; 0 o.w".to_string(), "L8,L11".to_string()),
                ("[[S5]]v1 = 1".to_string(), "C,L12".to_string()),
            ]
        );
    }

    #[test]
    fn test_transitive_reversed_pair() {
        let (tree, root, mut log) = setup("[S[N Ann][VP[Vt likes][N Bob]]]");
        let v = Valuation::new("2").with_pairs("likes", [("bob", "ann")]);
        let value = Evaluator::new(&tree, &v, &mut log).evaluate(root).unwrap();
        assert!(!value);
        assert_eq!(log.last().map(|r| r.expression.as_str()), Some("[[S5]]v2 = 0"));
    }

    #[test]
    fn test_negation() {
        let (tree, root, mut log) = setup("[S[Neg not][S[N Ann][VP[Vi sleeps]]]]");
        let v = Valuation::new("1").with_individuals("sleeps", ["bob"]);
        let value = Evaluator::new(&tree, &v, &mut log).evaluate(root).unwrap();
        assert!(value);
        assert_eq!(
            new_rows(&log, 11),
            vec![
                ("[[S5]]v1 = 0".to_string(), "C,L11".to_string()),
                ("[[S6]]v1 = [0 -> 1; 1 -> 0](0)".to_string(), "L7,L12".to_string()),
                ("[[S6]]v1 = 1".to_string(), "C,L13".to_string()),
            ]
        );
    }

    #[test]
    fn test_shared_nodes_are_logged_once() {
        let (tree, root, mut log) = setup("[S[S[N Ann][VP[Vi sleeps]]][Conj or][S[N Bob][VP[Vi sleeps]]]]");
        let v = Valuation::new("1").with_individuals("sleeps", ["bob"]);
        let value = Evaluator::new(&tree, &v, &mut log).evaluate(root).unwrap();
        assert!(value);
        assert_eq!(log.len(), 19);
        let rows = new_rows(&log, 11);
        assert_eq!(rows.iter().filter(|(e, _)| e.starts_with("[[VP3]]")).count(), 1);
        assert_eq!(rows[4], ("[[S7]]v1 = 1 iff Bob ∈ {bob}; 0 o.w".to_string(), "L9,L13".to_string()));
        assert_eq!(
            rows[6],
            (
                "[[S8]]v1 = [<0,0> -> 0; <0,1> -> 1; <1,0> -> 1; <1,1> -> 1](<0,1>)".to_string(),
                "L10,L15,L17".to_string()
            )
        );
        assert_eq!(rows[7], ("[[S8]]v1 = 1".to_string(), "C,L18".to_string()));
    }

    #[test]
    fn test_membership_ignores_case() {
        let (tree, root, mut log) = setup("[S[N ANN][VP[Vi sleeps]]]");
        let v = Valuation::new("1").with_individuals("sleeps", ["Ann"]);
        assert_eq!(Evaluator::new(&tree, &v, &mut log).evaluate(root).ok(), Some(true));
    }

    #[test]
    fn test_missing_entry_rolls_back() {
        let (tree, root, mut log) = setup("[S[S[N Ann][VP[Vi sleeps]]][Conj and][S[N Ann][VP[Vi runs]]]]");
        let before = log.rows().to_vec();
        let v = Valuation::new("1").with_individuals("sleeps", ["ann"]);
        let result = Evaluator::new(&tree, &v, &mut log).evaluate(root);
        assert!(matches!(result, Err(Error::MissingValuationEntry { ref verb, .. }) if verb == "runs"));
        assert_eq!(log.rows(), &before[..]);
    }

    #[test]
    fn test_wrong_shape_rolls_back() {
        let (tree, root, mut log) = setup("[S[N Ann][VP[Vt likes][N Bob]]]");
        let len = log.len();
        let v = Valuation::new("1").with_individuals("likes", ["ann"]);
        let result = Evaluator::new(&tree, &v, &mut log).evaluate(root);
        assert!(matches!(result, Err(Error::ExtensionMismatch { .. })));
        assert_eq!(log.len(), len);
    }
}
