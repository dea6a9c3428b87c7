use std::collections::HashMap;

use itertools::Itertools;
use log::debug;

use f1_parser::{Category, Token};

use crate::derivation;
use crate::derivation_log::DerivationLog;
use crate::error::{Result, ShapeSnafu};
use crate::node::{Node, NodeData, NodeId, Sentence, VerbPhrase};

/// Arena of the nodes of one sentence, deduplicated by `(category, text)`.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<NodeData>,
    index: HashMap<(Category, String), NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// All nodes in identity order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter()
    }

    pub fn lookup(&self, category: Category, text: &str) -> Option<NodeId> {
        self.index.get(&(category, text.to_string())).copied()
    }

    /// Distinct verbs of the tree in identity order.
    pub fn verbs(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter().filter(|node| node.category().is_verb())
    }

    pub(crate) fn record(&mut self, id: NodeId, denotation: String, lines: Vec<usize>) {
        self.nodes[id.index()].record(denotation, lines);
    }
}

// Building
impl Tree {
    /// Builds the subtree of `token` depth-first, emitting the symbolic rows of every new node.
    ///
    /// A node whose `(category, text)` was already built is returned as is, without a
    /// new identity and without new rows.
    pub fn build(&mut self, token: &Token, log: &mut DerivationLog) -> Result<NodeId> {
        let (kind, text) = match token {
            Token::Leaf { category, text } => (leaf(*category, text)?, text.clone()),
            Token::Group { category, children } => {
                let mut built = Vec::with_capacity(children.len());
                for child in children {
                    let id = self.build(child, log)?;
                    built.push((self.node(id).category(), id));
                }
                let kind = self.composite(*category, &built)?;
                let text = built.iter().map(|&(_, id)| self.node(id).text()).join(" ");
                (kind, text)
            }
        };

        let key = (kind.category(), text);
        if let Some(&id) = self.index.get(&key) {
            debug!("Reusing {}{} for {:?}", key.0, id, key.1);
            return Ok(id);
        }

        let id = NodeId(self.nodes.len() as u32 + 1);
        debug!("Building {}{} for {:?}", key.0, id, key.1);
        self.nodes.push(NodeData::new(id, kind, key.1.clone()));
        self.index.insert(key, id);
        derivation::write_node(self, id, log);
        Ok(id)
    }

    fn composite(&self, category: Category, children: &[(Category, NodeId)]) -> Result<Node> {
        let kind = match (category, children) {
            (Category::VerbPhrase, &[(Category::IntransitiveVerb, verb)]) => {
                Node::VerbPhrase(VerbPhrase::Intransitive { verb })
            }
            (Category::VerbPhrase, &[(Category::TransitiveVerb, verb), (Category::Noun, object)]) => {
                Node::VerbPhrase(VerbPhrase::Transitive { verb, object })
            }
            (Category::Sentence, &[(Category::Noun, subject), (Category::VerbPhrase, predicate)]) => {
                Node::Sentence(Sentence::Predication { subject, predicate })
            }
            (Category::Sentence, &[(Category::Negation, negation), (Category::Sentence, inner)]) => {
                Node::Sentence(Sentence::Negated { negation, inner })
            }
            (
                Category::Sentence,
                &[(Category::Sentence, lhs), (Category::Conjunction, conjunction), (Category::Sentence, rhs)],
            ) => {
                let connective = match self.node(conjunction).kind() {
                    Node::Conjunction(connective) => *connective,
                    _ => unreachable!(),
                };
                Node::Sentence(Sentence::Connected {
                    lhs,
                    conjunction,
                    connective,
                    rhs,
                })
            }
            _ => {
                return ShapeSnafu {
                    category,
                    found: children.iter().map(|(c, _)| c).join(", "),
                }
                .fail()
            }
        };
        Ok(kind)
    }
}

fn leaf(category: Category, text: &str) -> Result<Node> {
    let kind = match category {
        Category::Noun => Node::Noun,
        Category::IntransitiveVerb => Node::IntransitiveVerb,
        Category::TransitiveVerb => Node::TransitiveVerb,
        Category::Negation => Node::Negation,
        Category::Conjunction => Node::Conjunction(text.parse()?),
        Category::VerbPhrase | Category::Sentence => {
            return ShapeSnafu { category, found: "" }.fail();
        }
    };
    Ok(kind)
}

// Views
impl Tree {
    /// Token structure of the subtree rooted at `id`.
    pub fn token(&self, id: NodeId) -> Token {
        let node = self.node(id);
        let children = node.kind().children();
        if children.is_empty() {
            Token::leaf(node.category(), node.text())
        } else {
            Token::group(node.category(), children.into_iter().map(|child| self.token(child)))
        }
    }

    /// The subtree rooted at `id`, written back in the bracketed grammar.
    pub fn bracketed(&self, id: NodeId) -> String {
        self.token(id).to_string()
    }

    /// Depth-first indentation listing of the subtree rooted at `id`.
    ///
    /// Every node contributes a `"<name>:"` cell, leaves also their text. The first
    /// child continues its parent's row; further rows are shifted one cell right.
    pub fn hierarchy(&self, id: NodeId) -> Vec<Vec<String>> {
        let node = self.node(id);
        let mut head = vec![format!("{}:", node.name())];
        let children = node.kind().children();
        if children.is_empty() {
            head.push(node.text().to_string());
            return vec![head];
        }

        let mut rows = Vec::new();
        for (i, child) in children.into_iter().enumerate() {
            for (j, row) in self.hierarchy(child).into_iter().enumerate() {
                if i == 0 && j == 0 {
                    head.extend(row);
                    rows.push(std::mem::take(&mut head));
                } else {
                    rows.push(std::iter::once(String::new()).chain(row).collect());
                }
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use f1_parser::parse_sentence;

    use super::*;
    use crate::error::Error;

    fn build(input: &str) -> Result<(Tree, NodeId, DerivationLog)> {
        let token = parse_sentence(input).unwrap();
        let mut tree = Tree::new();
        let mut log = DerivationLog::new();
        let root = tree.build(&token, &mut log)?;
        Ok((tree, root, log))
    }

    #[test]
    fn test_identities_in_construction_order() {
        let (tree, root, _) = build("[S[N Ann][VP[Vi sleeps]]]").unwrap();
        let names = tree.nodes().map(|n| n.name()).collect_vec();
        assert_eq!(names, vec!["N1", "Vi2", "VP3", "S4"]);
        assert_eq!(root, NodeId(4));
        assert_eq!(tree.node(root).text(), "Ann sleeps");
    }

    #[test]
    fn test_repeated_noun_is_shared() {
        let (tree, root, log) = build("[S[N Ann][VP[Vt likes][N Ann]]]").unwrap();
        let names = tree.nodes().map(|n| n.name()).collect_vec();
        assert_eq!(names, vec!["N1", "Vt2", "VP3", "S4"]);
        let noun_rows = log.rows().iter().filter(|r| r.expression.starts_with("[[N")).count();
        assert_eq!(noun_rows, 1);
        match tree.node(root).kind() {
            Node::Sentence(Sentence::Predication { subject, predicate }) => {
                assert_eq!(tree.node(*predicate).kind().children()[1], *subject);
            }
            _ => panic!("expected a predication"),
        }
    }

    #[test]
    fn test_repeated_sentence_is_shared() {
        let (tree, root, _) =
            build("[S[S[N Ann][VP[Vi sleeps]]][Conj and][S[N Ann][VP[Vi sleeps]]]]").unwrap();
        assert_eq!(tree.len(), 6);
        let children = tree.node(root).kind().children();
        assert_eq!(children[0], children[2]);
    }

    #[test]
    fn test_lookup() {
        let (tree, _, _) = build("[S[N Ann][VP[Vi sleeps]]]").unwrap();
        assert_eq!(tree.lookup(Category::IntransitiveVerb, "sleeps"), Some(NodeId(2)));
        assert_eq!(tree.lookup(Category::VerbPhrase, "sleeps"), Some(NodeId(3)));
        assert_eq!(tree.lookup(Category::Noun, "sleeps"), None);
    }

    #[test]
    fn test_bad_verb_phrase_shape() {
        let result = build("[S[N Ann][VP[N Bob]]]");
        assert!(matches!(
            result,
            Err(Error::Shape {
                category: Category::VerbPhrase,
                ..
            })
        ));
    }

    #[test]
    fn test_bad_sentence_shape() {
        for input in [
            "[S[VP[Vi sleeps]][N Ann]]",
            "[S[N Ann][VP[Vi sleeps]][N Bob]]",
            "[S[Neg not][N Ann]]",
            "[S[S[N Ann][VP[Vi sleeps]]][Conj or]]",
        ] {
            let result = build(input);
            assert!(
                matches!(result, Err(Error::Shape { category: Category::Sentence, .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_connective() {
        let token = Token::leaf(Category::Conjunction, "but");
        let result = Tree::new().build(&token, &mut DerivationLog::new());
        assert!(matches!(result, Err(Error::InvalidConnective { .. })));
    }

    #[test]
    fn test_bracketed_roundtrip() {
        let input = "[S[Neg it is not the case that][S[S[N Ann][VP[Vi sleeps]]][Conj or][S[N Bob][VP[Vt likes][N Ann]]]]]";
        let (tree, root, _) = build(input).unwrap();
        assert_eq!(tree.bracketed(root), input);
    }

    #[test]
    fn test_hierarchy() {
        let (tree, root, _) = build("[S[N Ann][VP[Vt likes][N Bob]]]").unwrap();
        let rows = tree.hierarchy(root);
        assert_eq!(
            rows,
            vec![
                vec!["S5:", "N1:", "Ann"],
                vec!["", "VP4:", "Vt2:", "likes"],
                vec!["", "", "N3:", "Bob"],
            ]
        );
    }

    #[test]
    fn test_verbs() {
        let (tree, _, _) = build("[S[S[N Ann][VP[Vi sleeps]]][Conj or][S[N Bob][VP[Vt likes][N Ann]]]]").unwrap();
        let verbs = tree.verbs().map(|v| v.name()).collect_vec();
        assert_eq!(verbs, vec!["Vi2", "Vt7"]);
    }
}
