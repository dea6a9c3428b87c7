use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use snafu::ResultExt;

use f1_parser::{parse_individuals, parse_pairs, Category};

use crate::error::{ExtensionMismatchSnafu, GroupSnafu, MissingValuationEntrySnafu, Result};

/// Concrete extension of a verb under a valuation.
///
/// Individuals are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
    /// Extension of an intransitive verb.
    Individuals(Vec<String>),
    /// Extension of a transitive verb.
    Pairs(Vec<(String, String)>),
}

impl Extension {
    pub fn individuals<I, S>(individuals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Extension::Individuals(individuals.into_iter().map(|x| x.as_ref().to_lowercase()).collect())
    }

    pub fn pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        Extension::Pairs(
            pairs
                .into_iter()
                .map(|(x, y)| (x.as_ref().to_lowercase(), y.as_ref().to_lowercase()))
                .collect(),
        )
    }

    /// Parses free-text group input for a verb of the given category.
    pub fn parse(category: Category, verb: &str, input: &str) -> Result<Self> {
        let input = input.to_lowercase();
        match category {
            Category::TransitiveVerb => {
                let pairs = parse_pairs(&input).context(GroupSnafu { verb })?;
                Ok(Extension::Pairs(pairs))
            }
            _ => Ok(Extension::Individuals(parse_individuals(&input))),
        }
    }

    /// Category of the verbs this extension fits.
    pub fn category(&self) -> Category {
        match self {
            Extension::Individuals(_) => Category::IntransitiveVerb,
            Extension::Pairs(_) => Category::TransitiveVerb,
        }
    }
}

/// Renders individuals as `{a, b}`.
pub fn format_individuals(individuals: &[String]) -> String {
    format!("{{{}}}", individuals.iter().join(", "))
}

/// Renders pairs as `{<a, b>, <c, d>}`.
pub fn format_pairs(pairs: &[(String, String)]) -> String {
    format!("{{{}}}", pairs.iter().map(|(x, y)| format!("<{x}, {y}>")).join(", "))
}

impl Display for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Extension::Individuals(individuals) => write!(f, "{}", format_individuals(individuals)),
            Extension::Pairs(pairs) => write!(f, "{}", format_pairs(pairs)),
        }
    }
}

/// A named assignment of extensions to verbs, keyed by the verb's text.
#[derive(Debug, Clone, Default)]
pub struct Valuation {
    name: String,
    extensions: HashMap<(Category, String), Extension>,
}

impl Valuation {
    pub fn new(name: impl Into<String>) -> Self {
        Valuation {
            name: name.into(),
            extensions: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label used in derivation rows, e.g. `v1` for a valuation named `1`.
    pub fn label(&self) -> String {
        format!("v{}", self.name)
    }

    pub fn insert(&mut self, verb: impl Into<String>, extension: Extension) -> Option<Extension> {
        self.extensions.insert((extension.category(), verb.into()), extension)
    }

    pub fn with(mut self, verb: impl Into<String>, extension: Extension) -> Self {
        self.insert(verb, extension);
        self
    }

    pub fn with_individuals<I, S>(self, verb: impl Into<String>, individuals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with(verb, Extension::individuals(individuals))
    }

    pub fn with_pairs<I, A, B>(self, verb: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        self.with(verb, Extension::pairs(pairs))
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Extension of the verb `(category, verb)`.
    pub fn extension(&self, category: Category, verb: &str) -> Result<&Extension> {
        if let Some(extension) = self.extensions.get(&(category, verb.to_string())) {
            return Ok(extension);
        }
        let has_other_shape = self.extensions.keys().any(|(c, v)| *c != category && v == verb);
        if has_other_shape {
            ExtensionMismatchSnafu {
                valuation: &self.name,
                verb,
                expected: category,
            }
            .fail()
        } else {
            MissingValuationEntrySnafu {
                valuation: &self.name,
                verb,
            }
            .fail()
        }
    }
}
