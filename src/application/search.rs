//! Search term compilation.
//!
//! A raw term is split on `"`. Quoted segments become exact phrases that must appear
//! verbatim (case-sensitive) in a record's name or description. Every segment, quoted or
//! not, also contributes lowercase tokens to a single pattern that requires the tokens in
//! order, each anywhere after the previous one. Tokens fold ASCII case only, so `k` never
//! matches the Kelvin sign.

use std::cmp::Reverse;

use regex::Regex;
use thiserror::Error;

use crate::domain::entities::FeedRecord;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search pattern could not be compiled: {0}")]
    Pattern(#[from] regex::Error),
}

/// Compiled predicate for one search term.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    pattern: Option<Regex>,
    phrases: Vec<String>,
}

impl SearchMatcher {
    pub fn compile(term: &str) -> Result<Self, SearchError> {
        let segments: Vec<&str> = term.split('"').collect();

        // Odd segments sit between a pair of quotes.
        let mut phrases: Vec<String> = segments
            .iter()
            .skip(1)
            .step_by(2)
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.to_string())
            .collect();
        phrases.sort_by_key(|phrase| Reverse(phrase.len()));

        let tokens: Vec<String> = segments.iter().flat_map(|segment| tokenize(segment)).collect();
        let pattern = if tokens.is_empty() {
            None
        } else {
            let source = tokens
                .iter()
                .map(|token| format!("(?i-u:{})", regex::escape(token)))
                .collect::<Vec<_>>()
                .join(".*");
            Some(Regex::new(&source)?)
        };

        Ok(Self { pattern, phrases })
    }

    /// Required phrases, longest first.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// True when the matcher accepts every record.
    pub fn is_unrestricted(&self) -> bool {
        self.pattern.is_none() && self.phrases.is_empty()
    }

    pub fn matches(&self, feed: &FeedRecord) -> bool {
        let phrases_present = self.phrases.iter().all(|phrase| {
            feed.name.contains(phrase.as_str()) || feed.description.contains(phrase.as_str())
        });

        phrases_present
            && self.pattern.as_ref().is_none_or(|pattern| {
                pattern.is_match(&feed.name) || pattern.is_match(&feed.description)
            })
    }
}

fn tokenize(segment: &str) -> Vec<String> {
    let cleaned: String = segment
        .to_lowercase()
        .chars()
        .map(|c| if is_searchable(c) { c } else { ' ' })
        .collect();

    cleaned
        .split(|c: char| c == '.' || c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

fn is_searchable(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == ',' || c == '$' || c.is_whitespace()
}
