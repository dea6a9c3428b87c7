//! Truth-condition prose for negated and connected sentences.
//!
//! Prose has the form `1 iff <condition>; 0 o.w`. A multi-line condition starts with a
//! connective header and lists one operand per line, each nesting level indented by
//! [INDENT].

use itertools::Itertools;

use crate::node::{Node, NodeId, Sentence};
use crate::tree::Tree;

pub const INDENT: &str = "....";

const PREFIX: &str = "1 iff ";
const SUFFIX: &str = "; 0 o.w";

pub fn membership(element: &str, set: &str) -> String {
    format!("{PREFIX}{element} ∈ {set}{SUFFIX}")
}

/// Strips the `1 iff ... ; 0 o.w` wrapper and splits the condition into lines.
pub fn condition_lines(prose: &str) -> Vec<String> {
    let body = prose.strip_prefix(PREFIX).unwrap_or(prose);
    let body = body.strip_suffix(SUFFIX).unwrap_or(body);
    body.trim().lines().filter(|line| !line.is_empty()).map(String::from).collect()
}

fn block(header: &str, body: &[String]) -> String {
    format!("{PREFIX}{header}\n{}\n{SUFFIX}", body.iter().join("\n"))
}

fn sentence(tree: &Tree, id: NodeId) -> Sentence {
    match tree.node(id).kind() {
        Node::Sentence(sentence) => *sentence,
        other => unreachable!("{:?} is not a sentence", other),
    }
}

/// Truth condition of "it is not the case that `id`".
///
/// Membership flips to non-membership, a double negation cancels out and a
/// connected sentence is negated by De Morgan's law.
pub fn negate(tree: &Tree, id: NodeId) -> String {
    match sentence(tree, id) {
        Sentence::Predication { .. } => tree.node(id).denotation().replace('∈', "∉"),
        Sentence::Negated { inner, .. } => tree.node(inner).denotation().to_string(),
        Sentence::Connected {
            lhs, connective, rhs, ..
        } => {
            let body = [lhs, rhs]
                .into_iter()
                .flat_map(|operand| condition_lines(&negate(tree, operand)))
                .map(|line| format!("{INDENT}{line}"))
                .collect_vec();
            block(connective.dual().condition_header(), &body)
        }
    }
}

/// Truth condition of the connected sentence `id`, nesting connected operands.
pub fn connect(tree: &Tree, id: NodeId) -> String {
    let mut lines = connection_lines(tree, id, 0);
    let header = lines.remove(0);
    block(&header, &lines)
}

fn connection_lines(tree: &Tree, id: NodeId, depth: usize) -> Vec<String> {
    let (lhs, connective, rhs) = match sentence(tree, id) {
        Sentence::Connected {
            lhs, connective, rhs, ..
        } => (lhs, connective, rhs),
        other => unreachable!("{:?} is not connected", other),
    };

    let mut lines = vec![format!("{}{}", INDENT.repeat(depth), connective.condition_header())];
    for operand in [lhs, rhs] {
        if let Sentence::Connected { .. } = sentence(tree, operand) {
            lines.extend(connection_lines(tree, operand, depth + 1));
        } else {
            let indent = INDENT.repeat(depth + 1);
            lines.extend(
                condition_lines(tree.node(operand).denotation())
                    .into_iter()
                    .map(|line| format!("{indent}{line}")),
            );
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use f1_parser::parse_sentence;

    use super::*;
    use crate::derivation_log::DerivationLog;

    fn denotation(input: &str) -> String {
        let token = parse_sentence(input).unwrap();
        let mut tree = Tree::new();
        let root = tree.build(&token, &mut DerivationLog::new()).unwrap();
        tree.node(root).denotation().to_string()
    }

    const ANN: &str = "[S[N Ann][VP[Vi sleeps]]]";
    const BOB: &str = "[S[N Bob][VP[Vt likes][N Ann]]]";

    #[test]
    fn test_condition_lines() {
        assert_eq!(condition_lines("1 iff Ann ∈ X; 0 o.w"), vec!["Ann ∈ X"]);
        assert_eq!(
            condition_lines("1 iff both hold:\n....a\n....b\n; 0 o.w"),
            vec!["both hold:", "....a", "....b"]
        );
    }

    #[test]
    fn test_negated_membership() {
        assert_eq!(
            denotation(&format!("[S[Neg not]{ANN}]")),
            "1 iff Ann ∉ {x: x sleeps in v}; 0 o.w"
        );
    }

    #[test]
    fn test_double_negation_cancels() {
        let twice = denotation(&format!("[S[Neg not][S[Neg not]{ANN}]]"));
        assert_eq!(twice, denotation(ANN));
    }

    #[test]
    fn test_de_morgan_or() {
        assert_eq!(
            denotation(&format!("[S[Neg not][S{ANN}[Conj or]{BOB}]]")),
            "1 iff both hold:\n....Ann ∉ {x: x sleeps in v}\n....Bob ∉ {x: x likes Ann in v}\n; 0 o.w"
        );
    }

    #[test]
    fn test_de_morgan_and() {
        assert_eq!(
            denotation(&format!("[S[Neg not][S{ANN}[Conj and]{BOB}]]")),
            "1 iff either holds:\n....Ann ∉ {x: x sleeps in v}\n....Bob ∉ {x: x likes Ann in v}\n; 0 o.w"
        );
    }

    #[test]
    fn test_de_morgan_nested() {
        let inner = format!("[S{ANN}[Conj and]{BOB}]");
        let carl = "[S[N Carl][VP[Vi runs]]]";
        assert_eq!(
            denotation(&format!("[S[Neg not][S{inner}[Conj or]{carl}]]")),
            "1 iff both hold:\n\
             ....either holds:\n\
             ........Ann ∉ {x: x sleeps in v}\n\
             ........Bob ∉ {x: x likes Ann in v}\n\
             ....Carl ∉ {x: x runs in v}\n\
             ; 0 o.w"
        );
    }

    #[test]
    fn test_negated_operand_of_negation() {
        // not (not A or B) == both: A, not B
        let inner = format!("[S[S[Neg not]{ANN}][Conj or]{BOB}]");
        assert_eq!(
            denotation(&format!("[S[Neg not]{inner}]")),
            "1 iff both hold:\n....Ann ∈ {x: x sleeps in v}\n....Bob ∉ {x: x likes Ann in v}\n; 0 o.w"
        );
    }

    #[test]
    fn test_connection() {
        assert_eq!(
            denotation(&format!("[S{ANN}[Conj and]{BOB}]")),
            "1 iff both hold:\n....Ann ∈ {x: x sleeps in v}\n....Bob ∈ {x: x likes Ann in v}\n; 0 o.w"
        );
    }

    #[test]
    fn test_nested_connection_recurses() {
        let carl = "[S[N Carl][VP[Vi runs]]]";
        let rhs = format!("[S{BOB}[Conj or]{carl}]");
        assert_eq!(
            denotation(&format!("[S{ANN}[Conj and]{rhs}]")),
            "1 iff both hold:\n\
             ....Ann ∈ {x: x sleeps in v}\n\
             ....either holds:\n\
             ........Bob ∈ {x: x likes Ann in v}\n\
             ........Carl ∈ {x: x runs in v}\n\
             ; 0 o.w"
        );
    }

    #[test]
    fn test_negated_connection_as_operand() {
        let negated = format!("[S[Neg not][S{ANN}[Conj and]{BOB}]]");
        let carl = "[S[N Carl][VP[Vi runs]]]";
        assert_eq!(
            denotation(&format!("[S{negated}[Conj and]{carl}]")),
            "1 iff both hold:\n\
             ....either holds:\n\
             ........Ann ∉ {x: x sleeps in v}\n\
             ........Bob ∉ {x: x likes Ann in v}\n\
             ....Carl ∈ {x: x runs in v}\n\
             ; 0 o.w"
        );
    }
}
