//! Locale-aware text ordering used for sorting feed columns.
//!
//! Wraps the ICU collator for `en` at tertiary strength: base letters decide first, then
//! accents, then case with lowercase ahead of uppercase. Punctuation is non-ignorable and
//! sorts ahead of digits and letters.

use std::cmp::Ordering;

use icu_collator::{CaseFirst, Collator, CollatorOptions, Strength};
use icu_locid::locale;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("text collator is unavailable: {0}")]
pub struct CollationError(String);

pub struct TextCollator {
    inner: Collator,
}

impl TextCollator {
    pub fn new() -> Result<Self, CollationError> {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);
        options.case_first = Some(CaseFirst::LowerFirst);

        let inner = Collator::try_new(&locale!("en").into(), options)
            .map_err(|err| CollationError(format!("{err:?}")))?;
        Ok(Self { inner })
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        self.inner.compare(left, right)
    }
}
