//! Session: analysis of one sentence and its evaluations.

use itertools::Itertools;
use log::info;
use snafu::{ensure, ResultExt};

use f1_parser::{parse_sentence, Category, Token};

use crate::derivation_log::DerivationLog;
use crate::error::{
    AmbiguousVerbSnafu, DuplicateValuationNameSnafu, EmptyValuationNameSnafu, NotSentenceSnafu, Result, SyntaxSnafu,
    UnknownVerbSnafu,
};
use crate::evaluate::Evaluator;
use crate::node::{NodeData, NodeId};
use crate::tree::Tree;
use crate::valuation::{Extension, Valuation};

/// Outcome of one evaluation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuationResult {
    pub name: String,
    pub value: bool,
}

/// One analyzed sentence: its tree, its derivation log and the valuations evaluated so far.
///
/// Identities and line numbers start afresh in every session.
#[derive(Debug)]
pub struct Session {
    tree: Tree,
    root: NodeId,
    log: DerivationLog,
    results: Vec<ValuationResult>,
}

impl Session {
    /// Parses `input` and derives its symbolic truth conditions.
    ///
    /// A malformed sentence is rejected as a whole.
    pub fn analyze(input: &str) -> Result<Self> {
        info!("Analyzing {:?}", input);
        let token = parse_sentence(input).context(SyntaxSnafu)?;
        Self::from_token(&token)
    }

    pub fn from_token(token: &Token) -> Result<Self> {
        ensure!(
            token.category() == Category::Sentence,
            NotSentenceSnafu {
                found: token.category()
            }
        );
        let mut tree = Tree::new();
        let mut log = DerivationLog::new();
        let root = tree.build(token, &mut log)?;
        info!("Built {} nodes, {} derivation rows", tree.len(), log.len());
        Ok(Session {
            tree,
            root,
            log,
            results: Vec::new(),
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Raw text of the sentence.
    pub fn text(&self) -> &str {
        self.tree.node(self.root).text()
    }

    pub fn log(&self) -> &DerivationLog {
        &self.log
    }

    pub fn results(&self) -> &[ValuationResult] {
        &self.results
    }

    /// Distinct verbs of the sentence, each needing one extension per valuation.
    pub fn verbs(&self) -> Vec<&NodeData> {
        self.tree.verbs().collect()
    }

    /// Builds a valuation from free-text group input, one `(verb, group)` entry per verb.
    ///
    /// A verb is named by its text, or as `text/Vi` or `text/Vt` when the sentence uses
    /// the same text for both kinds. Each group is read as individuals or as pairs
    /// depending on the verb's kind.
    pub fn valuation_from_input<'s, I>(&self, name: &str, entries: I) -> Result<Valuation>
    where
        I: IntoIterator<Item = (&'s str, &'s str)>,
    {
        let mut valuation = Valuation::new(name);
        for (key, group) in entries {
            let node = self.resolve_verb(key.trim())?;
            let extension = Extension::parse(node.category(), node.text(), group)?;
            valuation.insert(node.text(), extension);
        }
        Ok(valuation)
    }

    fn resolve_verb(&self, key: &str) -> Result<&NodeData> {
        let (verb, kind) = match key.rsplit_once('/') {
            Some((verb, "Vi")) => (verb.trim(), Some(Category::IntransitiveVerb)),
            Some((verb, "Vt")) => (verb.trim(), Some(Category::TransitiveVerb)),
            Some(_) => return UnknownVerbSnafu { verb: key }.fail(),
            None => (key, None),
        };
        let matching = self
            .tree
            .verbs()
            .filter(|v| v.text() == verb && kind.map_or(true, |k| v.category() == k))
            .collect_vec();
        match matching.as_slice() {
            [node] => Ok(*node),
            [] => UnknownVerbSnafu { verb: key }.fail(),
            _ => AmbiguousVerbSnafu { verb }.fail(),
        }
    }

    /// Evaluates the sentence under `valuation`, appending the evaluation rows to the log.
    ///
    /// Nothing is appended when the request is rejected.
    pub fn evaluate(&mut self, valuation: &Valuation) -> Result<bool> {
        let name = valuation.name();
        ensure!(!name.is_empty(), EmptyValuationNameSnafu);
        ensure!(
            self.results.iter().all(|r| r.name != name),
            DuplicateValuationNameSnafu { name }
        );

        let value = Evaluator::new(&self.tree, valuation, &mut self.log).evaluate(self.root)?;
        info!("Sentence {:?} is {} in {}", self.text(), value, valuation.label());
        self.results.push(ValuationResult {
            name: name.to_string(),
            value,
        });
        Ok(value)
    }

    /// Hierarchy listing of the whole sentence.
    pub fn hierarchy(&self) -> Vec<Vec<String>> {
        self.tree.hierarchy(self.root)
    }
}
