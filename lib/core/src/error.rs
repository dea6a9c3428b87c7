use snafu::Snafu;

use f1_parser::{Category, Rule};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Sentence does not follow F1 rules: {}", source))]
    Syntax {
        #[snafu(source(from(pest::error::Error<Rule>, Box::new)))]
        source: Box<pest::error::Error<Rule>>,
    },

    #[snafu(display("Expected a sentence at the root, found {}", found))]
    NotSentence { found: Category },

    #[snafu(display("Malformed {}: children [{}] match no known shape", category, found))]
    Shape { category: Category, found: String },

    #[snafu(display("Invalid Conj value {:?}: can only accept 'and' or 'or'", text))]
    InvalidConnective { text: String },

    #[snafu(display("Valuation v{} has no extension for verb {:?}", valuation, verb))]
    MissingValuationEntry { valuation: String, verb: String },

    #[snafu(display("Valuation v{} gives {:?} an extension of the wrong shape for {}", valuation, verb, expected))]
    ExtensionMismatch {
        valuation: String,
        verb: String,
        expected: Category,
    },

    #[snafu(display("Valuation v{} already exists in this session", name))]
    DuplicateValuationName { name: String },

    #[snafu(display("Valuation name must not be empty"))]
    EmptyValuationName,

    #[snafu(display("Verb {:?} does not occur in the sentence", verb))]
    UnknownVerb { verb: String },

    #[snafu(display("Verb {:?} occurs both as Vi and as Vt, qualify it as '{}/Vi' or '{}/Vt'", verb, verb, verb))]
    AmbiguousVerb { verb: String },

    #[snafu(display("Group of {:?} does not match format <x,y>,<z,w>...: {}", verb, source))]
    Group {
        verb: String,
        #[snafu(source(from(pest::error::Error<Rule>, Box::new)))]
        source: Box<pest::error::Error<Rule>>,
    },
}

impl Error {
    /// Whether the error rejects the sentence itself (as opposed to a valuation).
    pub fn is_malformed_sentence(&self) -> bool {
        matches!(
            self,
            Error::Syntax { .. } | Error::NotSentence { .. } | Error::Shape { .. } | Error::InvalidConnective { .. }
        )
    }
}
