//! Toy calculator for the F1 fragment of predicate logic.
//!
//! A bracketed sentence such as `[S[N Ann][VP[Vi sleeps]]]` is parsed into a
//! deduplicated tree, its truth conditions are derived step by step, and the
//! sentence can then be evaluated under any number of named valuations.

pub use f1_core as core;
pub use f1_parser as parser;
