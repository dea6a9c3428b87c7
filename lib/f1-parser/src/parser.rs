use itertools::Itertools;
use log::debug;
use pest::error::{Error, ErrorVariant};
use pest::iterators::Pair;
use pest::{Parser, Position};
use pest_derive::Parser;

use crate::token::{Category, Token};

#[derive(Parser)]
#[grammar = "grammar/f1.pest"] // relative to project `src`
struct F1Parser;

/// Parses any bracketed group (leaf or composite) into its nested token structure.
///
/// Composite groups are not checked against the VP/S shapes here, only their
/// bracket structure is.
pub fn parse_tokens(input: &str) -> Result<Token, Error<Rule>> {
    let main = F1Parser::parse(Rule::main, input)?.next().unwrap();
    let node = main.into_inner().next().unwrap();

    fn parse_node(node: Pair<Rule>) -> Token {
        debug!("node = {:?} = {}", node.as_str(), node);
        match node.as_rule() {
            Rule::leaf => parse_leaf(node),
            Rule::group => parse_group(node),
            _ => unreachable!(),
        }
    }

    fn parse_leaf(leaf: Pair<Rule>) -> Token {
        let mut inner = leaf.into_inner();
        let category = parse_keyword(inner.next().unwrap());
        let body = inner.next().unwrap();
        debug!("leaf body = {:?} = {}", body.as_str(), body);
        let text = match body.as_rule() {
            Rule::words => join_words(body),
            // Conj keeps the normalized connective.
            Rule::connective => body.as_str().to_lowercase(),
            _ => unreachable!(),
        };
        Token::Leaf { category, text }
    }

    fn parse_group(group: Pair<Rule>) -> Token {
        let mut inner = group.into_inner();
        let category = parse_keyword(inner.next().unwrap());
        let children = inner.map(parse_node).collect_vec();
        Token::Group { category, children }
    }

    fn parse_keyword(keyword: Pair<Rule>) -> Category {
        match keyword.as_rule() {
            Rule::kw_noun => Category::Noun,
            Rule::kw_verb_i => Category::IntransitiveVerb,
            Rule::kw_verb_t => Category::TransitiveVerb,
            Rule::kw_neg => Category::Negation,
            Rule::kw_conj => Category::Conjunction,
            Rule::kw_vp => Category::VerbPhrase,
            Rule::kw_s => Category::Sentence,
            _ => unreachable!(),
        }
    }

    Ok(parse_node(node))
}

/// Parses a whole F1 sentence: like [parse_tokens], but the outermost group must be `S`.
pub fn parse_sentence(input: &str) -> Result<Token, Error<Rule>> {
    let token = parse_tokens(input)?;
    if token.category() != Category::Sentence {
        let message = format!("expected a sentence, found `{}`", token.category());
        let position = Position::from_start(input);
        return Err(Error::new_from_pos(ErrorVariant::CustomError { message }, position));
    }
    Ok(token)
}

/// Parses a list of ordered pairs `<x,y>,<z,w>,...`. Blank input is an empty list.
pub fn parse_pairs(input: &str) -> Result<Vec<(String, String)>, Error<Rule>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let pairs = F1Parser::parse(Rule::pairs, input)?.next().unwrap();
    let result = pairs
        .into_inner()
        .filter(|p| p.as_rule() == Rule::pair)
        .map(|pair| {
            debug!("pair = {:?} = {}", pair.as_str(), pair);
            let mut inner = pair.into_inner();
            let first = join_words(inner.next().unwrap());
            let second = join_words(inner.next().unwrap());
            (first, second)
        })
        .collect_vec();
    Ok(result)
}

/// Splits a comma-separated list of individuals, trimming each entry and skipping blanks.
pub fn parse_individuals(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn join_words(words: Pair<Rule>) -> String {
    words.into_inner().map(|w| w.as_str()).join(" ")
}
