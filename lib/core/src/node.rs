use std::fmt::{Display, Formatter};
use std::str::FromStr;

use f1_parser::Category;

use crate::error::{Error, InvalidConnectiveSnafu};

/// Session-scoped identity of a node. Identities are dense and start at 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        debug_assert!(self.0 > 0);
        (self.0 - 1) as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Boolean complement, as written in derivation rows.
pub const NEGATION_TABLE: &str = "[0 -> 1; 1 -> 0]";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            Connective::And => lhs && rhs,
            Connective::Or => lhs || rhs,
        }
    }

    /// The connective obtained by De Morgan's law.
    pub fn dual(self) -> Self {
        match self {
            Connective::And => Connective::Or,
            Connective::Or => Connective::And,
        }
    }

    pub fn truth_table(self) -> &'static str {
        match self {
            Connective::And => "[<0,0> -> 0; <0,1> -> 0; <1,0> -> 0; <1,1> -> 1]",
            Connective::Or => "[<0,0> -> 0; <0,1> -> 1; <1,0> -> 1; <1,1> -> 1]",
        }
    }

    /// Header line of the truth-condition listing.
    pub fn condition_header(self) -> &'static str {
        match self {
            Connective::And => "both hold:",
            Connective::Or => "either holds:",
        }
    }
}

impl FromStr for Connective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Connective::And),
            "or" => Ok(Connective::Or),
            _ => InvalidConnectiveSnafu { text: s }.fail(),
        }
    }
}

impl Display for Connective {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Connective::And => write!(f, "and"),
            Connective::Or => write!(f, "or"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VerbPhrase {
    /// `[VP Vi]`
    Intransitive { verb: NodeId },
    /// `[VP Vt N]`
    Transitive { verb: NodeId, object: NodeId },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sentence {
    /// `[S N VP]`
    Predication { subject: NodeId, predicate: NodeId },
    /// `[S Neg S]`
    Negated { negation: NodeId, inner: NodeId },
    /// `[S S Conj S]`
    Connected {
        lhs: NodeId,
        conjunction: NodeId,
        connective: Connective,
        rhs: NodeId,
    },
}

/// Expression node, one variant per grammar category.
///
/// Composite variants can only hold the child shapes the grammar allows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Node {
    Noun,
    IntransitiveVerb,
    TransitiveVerb,
    Negation,
    Conjunction(Connective),
    VerbPhrase(VerbPhrase),
    Sentence(Sentence),
}

impl Node {
    pub fn category(&self) -> Category {
        match self {
            Node::Noun => Category::Noun,
            Node::IntransitiveVerb => Category::IntransitiveVerb,
            Node::TransitiveVerb => Category::TransitiveVerb,
            Node::Negation => Category::Negation,
            Node::Conjunction(_) => Category::Conjunction,
            Node::VerbPhrase(_) => Category::VerbPhrase,
            Node::Sentence(_) => Category::Sentence,
        }
    }

    /// Children in source order; empty for leaves.
    pub fn children(&self) -> Vec<NodeId> {
        match *self {
            Node::VerbPhrase(VerbPhrase::Intransitive { verb }) => vec![verb],
            Node::VerbPhrase(VerbPhrase::Transitive { verb, object }) => vec![verb, object],
            Node::Sentence(Sentence::Predication { subject, predicate }) => vec![subject, predicate],
            Node::Sentence(Sentence::Negated { negation, inner }) => vec![negation, inner],
            Node::Sentence(Sentence::Connected {
                lhs, conjunction, rhs, ..
            }) => vec![lhs, conjunction, rhs],
            _ => Vec::new(),
        }
    }
}

/// A node of a sentence tree together with its symbolic derivation results.
#[derive(Debug, Clone)]
pub struct NodeData {
    id: NodeId,
    kind: Node,
    text: String,
    denotation: String,
    lines: Vec<usize>,
}

impl NodeData {
    pub(crate) fn new(id: NodeId, kind: Node, text: String) -> Self {
        NodeData {
            id,
            kind,
            text,
            denotation: String::new(),
            lines: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &Node {
        &self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Display name, e.g. `VP3`.
    pub fn name(&self) -> String {
        format!("{}{}", self.category(), self.id)
    }

    /// Raw source text; for composites, the children's texts joined by a space.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Final symbolic denotation, as written in the node's last derivation row.
    pub fn denotation(&self) -> &str {
        &self.denotation
    }

    /// Lines of all symbolic rows emitted for this node, in order.
    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    /// Line of the node's last symbolic row.
    pub fn line(&self) -> usize {
        self.lines.last().copied().unwrap_or_default()
    }

    pub fn first_line(&self) -> usize {
        self.lines.first().copied().unwrap_or_default()
    }

    pub(crate) fn record(&mut self, denotation: String, lines: Vec<usize>) {
        self.denotation = denotation;
        self.lines = lines;
    }
}

impl Display for NodeData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}]", self.name(), self.text)
    }
}
