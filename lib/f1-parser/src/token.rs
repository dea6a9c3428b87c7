use std::fmt::{Display, Formatter};

use itertools::Itertools;

/// Syntactic category of a bracketed F1 group.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum Category {
    #[display(fmt = "N")]
    Noun,
    #[display(fmt = "Vi")]
    IntransitiveVerb,
    #[display(fmt = "Vt")]
    TransitiveVerb,
    #[display(fmt = "Neg")]
    Negation,
    #[display(fmt = "Conj")]
    Conjunction,
    #[display(fmt = "VP")]
    VerbPhrase,
    #[display(fmt = "S")]
    Sentence,
}

impl Category {
    /// Leaf categories wrap words, the others wrap nested groups.
    pub fn is_leaf(self) -> bool {
        !matches!(self, Category::VerbPhrase | Category::Sentence)
    }

    pub fn is_verb(self) -> bool {
        matches!(self, Category::IntransitiveVerb | Category::TransitiveVerb)
    }
}

/// Nested token structure of a well-formed bracketed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Leaf { category: Category, text: String },
    Group { category: Category, children: Vec<Token> },
}

// Constructors
impl Token {
    pub fn leaf(category: Category, text: impl Into<String>) -> Self {
        Token::Leaf {
            category,
            text: text.into(),
        }
    }

    pub fn group<I>(category: Category, children: I) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        Token::Group {
            category,
            children: children.into_iter().collect(),
        }
    }
}

impl Token {
    pub fn category(&self) -> Category {
        match self {
            Token::Leaf { category, .. } => *category,
            Token::Group { category, .. } => *category,
        }
    }

    /// Raw text: the words of a leaf, or the children's texts joined by a space.
    pub fn text(&self) -> String {
        match self {
            Token::Leaf { text, .. } => text.clone(),
            Token::Group { children, .. } => children.iter().map(Token::text).join(" "),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            match self {
                Token::Leaf { category, text } => {
                    write!(f, "{category}({text:?})")
                }
                Token::Group { category, children } => {
                    write!(f, "{category}({:#})", children.iter().format(", "))
                }
            }
        } else {
            match self {
                Token::Leaf { category, text } => {
                    write!(f, "[{category} {text}]")
                }
                Token::Group { category, children } => {
                    write!(f, "[{category}{}]", children.iter().format(""))
                }
            }
        }
    }
}
