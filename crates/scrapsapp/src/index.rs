//! # Scrap Identifiers: UUID vs Display Index
//!
//! Scraps are identified by a UUID, which nobody wants to type. The CLI instead shows a short
//! display index per scrap, derived from the catalog listing:
//!
//! - `g1`, `g2`, ... for global (key/value) scraps
//! - `w1`, `w2`, ... for workspace scraps
//!
//! Positions are 1-based within each kind and follow the catalog order (most recently updated
//! first). The index is a view concern: it is recomputed from every listing and never stored.
//!
//! ## Selectors
//!
//! User input is turned into a [`ScrapSelector`] by [`parse_selector`]:
//!
//! - `g3` / `w1`: one display index
//! - `g1-g3`: an inclusive range, both ends of the same kind
//! - anything else: a case-insensitive title search
//!
//! [`resolve_selectors`] maps selectors back onto [`DisplayScrap`]s.

use crate::error::{Result, ScrapsError};
use crate::model::{BackendKind, ScrapItem};
use crate::store::registry::Listing;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayIndex {
    pub kind: BackendKind,
    pub position: usize,
}

impl DisplayIndex {
    pub fn new(kind: BackendKind, position: usize) -> Self {
        Self { kind, position }
    }
}

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.position)
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = match chars.next() {
            Some(c) if c == BackendKind::KeyValueStore.prefix() => BackendKind::KeyValueStore,
            Some(c) if c == BackendKind::WorkspaceFile.prefix() => BackendKind::WorkspaceFile,
            _ => return Err(format!("Invalid index format: {}", s)),
        };
        let position: usize = chars
            .as_str()
            .parse()
            .map_err(|_| format!("Invalid index format: {}", s))?;
        if position == 0 {
            return Err(format!("Invalid index format: {}", s));
        }
        Ok(DisplayIndex::new(kind, position))
    }
}

/// A scrap paired with its display index.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayScrap {
    pub item: ScrapItem,
    pub index: DisplayIndex,
}

/// Assigns display indexes to every record in a listing.
///
/// The listing is expected in catalog order; kinds come out in [`BackendKind`] order.
pub fn index_listing(listing: &Listing) -> Vec<DisplayScrap> {
    listing
        .iter()
        .flat_map(|(kind, records)| {
            records.iter().enumerate().map(move |(i, record)| DisplayScrap {
                item: ScrapItem::new(*kind, record.clone()),
                index: DisplayIndex::new(*kind, i + 1),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapSelector {
    Index(DisplayIndex),
    Range(DisplayIndex, DisplayIndex),
    Title(String),
}

impl fmt::Display for ScrapSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapSelector::Index(index) => write!(f, "{}", index),
            ScrapSelector::Range(start, end) => write!(f, "{}-{}", start, end),
            ScrapSelector::Title(term) => write!(f, "\"{}\"", term),
        }
    }
}

/// Parses a single input. Malformed ranges are errors; other non-index input is a title search.
pub fn parse_selector(input: &str) -> Result<ScrapSelector> {
    let input = input.trim();
    if let Some((start, end)) = input.split_once('-') {
        if let (Ok(start), Ok(end)) = (start.parse::<DisplayIndex>(), end.parse::<DisplayIndex>())
        {
            if start.kind != end.kind {
                return Err(ScrapsError::Api(format!(
                    "Invalid range {}: cannot mix {} and {} scraps",
                    input, start.kind, end.kind
                )));
            }
            if start.position > end.position {
                return Err(ScrapsError::Api(format!(
                    "Invalid range {}: start is after end",
                    input
                )));
            }
            return Ok(ScrapSelector::Range(start, end));
        }
    }
    match input.parse::<DisplayIndex>() {
        Ok(index) => Ok(ScrapSelector::Index(index)),
        Err(_) => Ok(ScrapSelector::Title(input.to_string())),
    }
}

/// Parses all inputs as indexes, or joins them into one title search if any is not an index.
pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<ScrapSelector>> {
    let mut selectors = Vec::new();
    for input in inputs {
        match parse_selector(input.as_ref())? {
            ScrapSelector::Title(_) => {
                let term = inputs
                    .iter()
                    .map(|s| s.as_ref().trim())
                    .collect::<Vec<&str>>()
                    .join(" ");
                return Ok(vec![ScrapSelector::Title(term)]);
            }
            selector => selectors.push(selector),
        }
    }
    if selectors.is_empty() {
        return Err(ScrapsError::Api("No scrap selected".to_string()));
    }
    Ok(selectors)
}

/// Resolves selectors against an indexed listing, deduplicating while preserving order.
pub fn resolve_selectors(
    indexed: &[DisplayScrap],
    selectors: &[ScrapSelector],
) -> Result<Vec<DisplayScrap>> {
    let mut results = Vec::new();
    for selector in selectors {
        match selector {
            ScrapSelector::Index(index) => {
                results.push(find_index(indexed, index)?.clone());
            }
            ScrapSelector::Range(start, end) => {
                find_index(indexed, end)?;
                results.extend(
                    indexed
                        .iter()
                        .filter(|ds| {
                            ds.index.kind == start.kind
                                && ds.index.position >= start.position
                                && ds.index.position <= end.position
                        })
                        .cloned(),
                );
            }
            ScrapSelector::Title(term) => results.push(find_title(indexed, term)?.clone()),
        }
    }

    let mut seen = HashSet::new();
    results.retain(|ds| seen.insert(ds.index));
    Ok(results)
}

/// Case-insensitive label search. A label equal to `term` wins over labels merely containing it.
fn find_title<'a>(indexed: &'a [DisplayScrap], term: &str) -> Result<&'a DisplayScrap> {
    let term_lower = term.to_lowercase();
    let matches: Vec<&DisplayScrap> = indexed
        .iter()
        .filter(|ds| ds.item.record.label.to_lowercase().contains(&term_lower))
        .collect();

    match matches.as_slice() {
        [] => Err(ScrapsError::Api(format!(
            "No scrap found matching \"{}\"",
            term
        ))),
        [only] => Ok(*only),
        _ => {
            let exact: Vec<&DisplayScrap> = matches
                .iter()
                .copied()
                .filter(|ds| ds.item.record.label.to_lowercase() == term_lower)
                .collect();
            match exact.as_slice() {
                [only] => Ok(*only),
                _ => Err(ScrapsError::Api(format!(
                    "\"{}\" matches {} scraps, please be more specific",
                    term,
                    matches.len()
                ))),
            }
        }
    }
}

fn find_index<'a>(indexed: &'a [DisplayScrap], index: &DisplayIndex) -> Result<&'a DisplayScrap> {
    indexed
        .iter()
        .find(|ds| ds.index == *index)
        .ok_or_else(|| ScrapsError::Api(format!("Index {} not found", index)))
}
