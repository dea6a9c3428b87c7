use itertools::Itertools;
use quickcheck::{Arbitrary, Gen};

use f1_calc::core::{Extension, Valuation};
use f1_calc::parser::{Category, Token};

const SUBJECTS: &[&str] = &["Ann", "Bob", "Carl", "Dora", "Eve"];
const OBJECTS: &[&str] = &["Fred", "Gina", "Hugo"];
const INTRANSITIVE: &[&str] = &["sleeps", "runs", "smiles"];
const TRANSITIVE: &[&str] = &["likes", "sees", "knows"];

const MAX_DEPTH: usize = 3;

/// A well-formed sentence whose atomic sentences all have distinct subjects.
///
/// Distinct subjects keep the texts of structurally different sub-sentences
/// apart, so deduplication only ever merges identical subtrees.
#[derive(Debug, Clone)]
pub struct ArbSentence(pub Token);

impl ArbSentence {
    pub fn token(&self) -> &Token {
        &self.0
    }

    pub fn input(&self) -> String {
        self.0.to_string()
    }
}

impl Arbitrary for ArbSentence {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut subjects = 0;
        ArbSentence(sentence(g, 0, &mut subjects))
    }
}

fn pick(g: &mut Gen, words: &[&str]) -> String {
    g.choose(words).unwrap().to_string()
}

fn subject(index: usize) -> String {
    let base = SUBJECTS[index % SUBJECTS.len()];
    format!("{}{}", base, "x".repeat(index / SUBJECTS.len()))
}

fn sentence(g: &mut Gen, depth: usize, subjects: &mut usize) -> Token {
    let choice = if depth >= MAX_DEPTH { 0 } else { u8::arbitrary(g) % 4 };
    match choice {
        1 => Token::group(
            Category::Sentence,
            [Token::leaf(Category::Negation, "not"), sentence(g, depth + 1, subjects)],
        ),
        2 | 3 => {
            let lhs = sentence(g, depth + 1, subjects);
            let connective = pick(g, &["and", "or"]);
            let rhs = sentence(g, depth + 1, subjects);
            Token::group(
                Category::Sentence,
                [lhs, Token::leaf(Category::Conjunction, connective), rhs],
            )
        }
        _ => {
            let noun = Token::leaf(Category::Noun, subject(*subjects));
            *subjects += 1;
            Token::group(Category::Sentence, [noun, verb_phrase(g)])
        }
    }
}

fn verb_phrase(g: &mut Gen) -> Token {
    if bool::arbitrary(g) {
        Token::group(
            Category::VerbPhrase,
            [Token::leaf(Category::IntransitiveVerb, pick(g, INTRANSITIVE))],
        )
    } else {
        Token::group(
            Category::VerbPhrase,
            [
                Token::leaf(Category::TransitiveVerb, pick(g, TRANSITIVE)),
                Token::leaf(Category::Noun, pick(g, OBJECTS)),
            ],
        )
    }
}

/// All `(category, text)` verbs of `token`, in first-occurrence order.
pub fn verbs(token: &Token) -> Vec<(Category, String)> {
    fn visit(token: &Token, out: &mut Vec<(Category, String)>) {
        match token {
            Token::Leaf { category, text } if category.is_verb() => out.push((*category, text.clone())),
            Token::Leaf { .. } => {}
            Token::Group { children, .. } => children.iter().for_each(|child| visit(child, out)),
        }
    }

    let mut out = Vec::new();
    visit(token, &mut out);
    out.into_iter().unique().collect()
}

/// A random valuation named `name` covering every verb of `token`.
///
/// Individuals are drawn from the nouns the generator uses.
pub fn arbitrary_valuation(g: &mut Gen, name: &str, token: &Token) -> Valuation {
    let universe = (0..SUBJECTS.len() * 2)
        .map(subject)
        .chain(OBJECTS.iter().map(|s| s.to_string()))
        .collect_vec();
    let mut valuation = Valuation::new(name);
    for (category, verb) in verbs(token) {
        let extension = if category == Category::TransitiveVerb {
            let pairs = universe
                .iter()
                .cartesian_product(OBJECTS)
                .filter(|_| u8::arbitrary(g) % 3 == 0)
                .map(|(x, y)| (x.clone(), y.to_string()))
                .collect_vec();
            Extension::pairs(pairs)
        } else {
            Extension::individuals(universe.iter().filter(|_| bool::arbitrary(g)))
        };
        valuation.insert(verb, extension);
    }
    valuation
}

/// Truth value of `token` under `valuation`, computed straight from the tokens.
pub fn truth(token: &Token, valuation: &Valuation) -> bool {
    let children = match token {
        Token::Group { children, .. } => children,
        Token::Leaf { .. } => panic!("{} is not a sentence", token),
    };
    match children.as_slice() {
        [neg, inner] if neg.category() == Category::Negation => !truth(inner, valuation),
        [noun, vp] => {
            let noun = noun.text().to_lowercase();
            members(vp, valuation).contains(&noun)
        }
        [lhs, conj, rhs] => match conj.text().as_str() {
            "and" => truth(lhs, valuation) && truth(rhs, valuation),
            _ => truth(lhs, valuation) || truth(rhs, valuation),
        },
        _ => panic!("{} has no sentence shape", token),
    }
}

fn members(vp: &Token, valuation: &Valuation) -> Vec<String> {
    let children = match vp {
        Token::Group { children, .. } => children,
        Token::Leaf { .. } => panic!("{} is not a verb phrase", vp),
    };
    match children.as_slice() {
        [verb] => match valuation.extension(Category::IntransitiveVerb, &verb.text()) {
            Ok(Extension::Individuals(individuals)) => individuals.clone(),
            other => panic!("bad extension for {}: {:?}", verb, other),
        },
        [verb, object] => match valuation.extension(Category::TransitiveVerb, &verb.text()) {
            Ok(Extension::Pairs(pairs)) => {
                let object = object.text().to_lowercase();
                pairs.iter().filter(|(_, y)| *y == object).map(|(x, _)| x.clone()).collect()
            }
            other => panic!("bad extension for {}: {:?}", verb, other),
        },
        _ => panic!("{} has no verb phrase shape", vp),
    }
}
