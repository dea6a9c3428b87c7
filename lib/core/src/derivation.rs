//! Symbolic pass: the derivation rows of each node, independent of any valuation.

use crate::derivation_log::{DerivationLog, Rule};
use crate::node::{Node, NodeId, Sentence, VerbPhrase, NEGATION_TABLE};
use crate::prose;
use crate::tree::Tree;

/// Label of the symbolic pass in `[[X]]v` expressions.
pub const SYMBOLIC_LABEL: &str = "v";

/// Emits the rows of a freshly built node and records its denotation.
///
/// All children of `id` must have been written already.
pub(crate) fn write_node(tree: &mut Tree, id: NodeId, log: &mut DerivationLog) {
    let (denotation, lines) = derive(tree, id, log);
    tree.record(id, denotation, lines);
}

pub fn expression(name: &str, label: &str, text: &str) -> String {
    format!("[[{name}]]{label} = {text}")
}

fn derive(tree: &Tree, id: NodeId, log: &mut DerivationLog) -> (String, Vec<usize>) {
    let node = tree.node(id);
    let name = node.name();
    let mut emit = |text: &str, rule: Rule| log.push(expression(&name, SYMBOLIC_LABEL, text), rule);

    let leaf = || Rule::tags(["VL", "R1"]);

    match *node.kind() {
        Node::Noun => {
            let denotation = node.text().to_string();
            let line = emit(&denotation, leaf());
            (denotation, vec![line])
        }
        Node::IntransitiveVerb => {
            let denotation = format!("{{x: x {} in v}}", node.text());
            let line = emit(&denotation, leaf());
            (denotation, vec![line])
        }
        Node::TransitiveVerb => {
            let denotation = format!("{{<x,y>: x {} y in v}}", node.text());
            let line = emit(&denotation, leaf());
            (denotation, vec![line])
        }
        Node::Negation => {
            let denotation = NEGATION_TABLE.to_string();
            let line = emit(&denotation, leaf());
            (denotation, vec![line])
        }
        Node::Conjunction(connective) => {
            let denotation = connective.truth_table().to_string();
            let line = emit(&denotation, leaf());
            (denotation, vec![line])
        }

        Node::VerbPhrase(VerbPhrase::Intransitive { verb }) => {
            let verb = tree.node(verb);
            let denotation = verb.denotation().to_string();
            let line = emit(&denotation, Rule::tag("R1").cite(verb.line()));
            (denotation, vec![line])
        }
        Node::VerbPhrase(VerbPhrase::Transitive { verb, object }) => {
            let (verb, object) = (tree.node(verb), tree.node(object));
            let l1 = emit(&format!("{{x: <x,[[{}]]> ∈ [[{}]]}}", object.name(), verb.name()), Rule::tag("R3"));
            let l2 = emit(
                &format!("{{x: <x,{}> ∈ {}}}", object.text(), verb.denotation()),
                Rule::cites([l1, verb.line(), object.line()]),
            );
            let denotation = format!("{{x: x {} {} in v}}", verb.text(), object.text());
            let l3 = emit(&denotation, Rule::tag("S").cite(l2));
            (denotation, vec![l1, l2, l3])
        }

        Node::Sentence(Sentence::Predication { subject, predicate }) => {
            let (subject, predicate) = (tree.node(subject), tree.node(predicate));
            let l1 = emit(
                &prose::membership(&format!("[[{}]]", subject.name()), &format!("[[{}]]", predicate.name())),
                Rule::tag("R2"),
            );
            let denotation = prose::membership(subject.text(), predicate.denotation());
            let l2 = emit(&denotation, Rule::cites([l1, subject.line(), predicate.line()]));
            (denotation, vec![l1, l2])
        }
        Node::Sentence(Sentence::Negated { negation, inner }) => {
            let (negation_node, inner_node) = (tree.node(negation), tree.node(inner));
            let l1 = emit(
                &format!("[[{}]]([[{}]])", negation_node.name(), inner_node.name()),
                Rule::tag("R4").cite(negation_node.line()).cite(inner_node.line()),
            );
            let denotation = prose::negate(tree, inner);
            let l2 = emit(&denotation, Rule::tag("C").cite(l1));
            (denotation, vec![l1, l2])
        }
        Node::Sentence(Sentence::Connected {
            lhs, conjunction, rhs, ..
        }) => {
            let (lhs, conjunction, rhs) = (tree.node(lhs), tree.node(conjunction), tree.node(rhs));
            let l1 = emit(
                &format!("[[{}]](<[[{}]],[[{}]]>)", conjunction.name(), lhs.name(), rhs.name()),
                Rule::tag("R5").cite(lhs.line()).cite(conjunction.line()).cite(rhs.line()),
            );
            let denotation = prose::connect(tree, id);
            let l2 = emit(&denotation, Rule::tag("C").cite(l1));
            (denotation, vec![l1, l2])
        }
    }
}
