use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use itertools::Itertools;

/// One `--valuation` argument: the valuation name and its `(verb, group)` entries.
#[derive(Debug, PartialEq, Eq)]
pub struct ValuationArg {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl ValuationArg {
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(verb, group)| (verb.as_str(), group.as_str()))
    }
}

/// Parses `NAME:VERB=GROUP;VERB=GROUP...`.
///
/// A verb may be written `VERB/Vi` or `VERB/Vt` to pick one kind. Groups are kept
/// verbatim; reading them is up to the verb they belong to.
pub fn parse_valuation_arg(s: &str) -> Result<ValuationArg> {
    let (name, rest) = s
        .split_once(':')
        .ok_or_else(|| eyre!("Valuation '{}' must look like NAME:VERB=GROUP;...", s))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("Valuation '{}' has no name", s);
    }

    let entries = rest
        .split(';')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            let (verb, group) = part
                .split_once('=')
                .ok_or_else(|| eyre!("Entry '{}' of valuation '{}' must look like VERB=GROUP", part, name))?;
            Ok((verb.trim().to_string(), group.trim().to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(verb) = entries.iter().map(|(verb, _)| verb).duplicates().next() {
        bail!("Verb '{}' is given twice in valuation '{}'", verb, name);
    }

    Ok(ValuationArg {
        name: name.to_string(),
        entries,
    })
}
