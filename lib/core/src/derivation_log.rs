use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Serialize, Serializer};

/// Justification of a derivation row: grammar-rule tags followed by cited lines.
///
/// Displayed as e.g. `R1,L3` or `L5,L2,L4`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    tags: Vec<String>,
    refs: Vec<usize>,
}

impl Rule {
    pub fn tag(tag: impl Into<String>) -> Self {
        Rule {
            tags: vec![tag.into()],
            refs: Vec::new(),
        }
    }

    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule {
            tags: tags.into_iter().map_into().collect(),
            refs: Vec::new(),
        }
    }

    pub fn cites<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Rule {
            tags: Vec::new(),
            refs: lines.into_iter().collect(),
        }
    }

    pub fn cite(mut self, line: usize) -> Self {
        self.refs.push(line);
        self
    }

    /// Line numbers cited by this rule.
    pub fn references(&self) -> &[usize] {
        &self.refs
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let refs = self.refs.iter().map(|line| format!("L{line}"));
        write!(f, "{}", self.tags.iter().cloned().chain(refs).join(","))
    }
}

/// One row of the derivation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRow {
    pub line: usize,
    pub expression: String,
    #[serde(serialize_with = "serialize_display")]
    pub rule: Rule,
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

/// Append-only sequence of derivation rows, numbered from 1 in emission order.
#[derive(Debug, Clone, Default)]
pub struct DerivationLog {
    rows: Vec<LogRow>,
}

impl DerivationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row and returns its line number.
    pub fn push(&mut self, expression: String, rule: Rule) -> usize {
        let line = self.rows.len() + 1;
        debug_assert!(rule.references().iter().all(|&r| r < line));
        log::trace!("L{} {} [{}]", line, expression, rule);
        self.rows.push(LogRow { line, expression, rule });
        line
    }

    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&LogRow> {
        self.rows.last()
    }

    /// Drops every row after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }
}

impl<'a> IntoIterator for &'a DerivationLog {
    type Item = &'a LogRow;
    type IntoIter = std::slice::Iter<'a, LogRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
