//! Grammar of bracketed F1 sentences and of valuation group input.

pub mod parser;
pub mod token;

pub use parser::{parse_individuals, parse_pairs, parse_sentence, parse_tokens, Rule};
pub use token::{Category, Token};
