//! Domain entities loaded from the record source.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::domain::types::SortColumn;

/// A single feed entry. Records are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    pub name: String,
    pub image: String,
    pub description: String,
    /// ISO-8601 text exactly as supplied by the source.
    pub date_last_edited: String,
}

impl FeedRecord {
    /// Text value of a sortable column.
    pub fn column(&self, column: SortColumn) -> &str {
        match column {
            SortColumn::Name => &self.name,
            SortColumn::Image => &self.image,
            SortColumn::Description => &self.description,
            SortColumn::DateLastEdited => &self.date_last_edited,
        }
    }

    /// Sorting compares `date_last_edited` as text, which is only chronological for
    /// fixed-width RFC 3339 values.
    pub fn has_rfc3339_timestamp(&self) -> bool {
        OffsetDateTime::parse(&self.date_last_edited, &Rfc3339).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date_last_edited: &str) -> FeedRecord {
        FeedRecord {
            name: "Lord of the Rings".to_string(),
            image: "Image - 1".to_string(),
            description: "Test Image 1".to_string(),
            date_last_edited: date_last_edited.to_string(),
        }
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let json = r#"{
            "name": "Lord of the Rings",
            "image": "Image - 1",
            "description": "Test Image 1",
            "dateLastEdited": "2018-07-27T05:58:52.006Z"
        }"#;
        let parsed: FeedRecord = serde_json::from_str(json).expect("valid record");
        assert_eq!(parsed, record("2018-07-27T05:58:52.006Z"));
    }

    #[test]
    fn column_returns_matching_field() {
        let feed = record("2018-07-27T05:58:52.006Z");
        assert_eq!(feed.column(SortColumn::Name), "Lord of the Rings");
        assert_eq!(feed.column(SortColumn::Image), "Image - 1");
        assert_eq!(feed.column(SortColumn::Description), "Test Image 1");
        assert_eq!(feed.column(SortColumn::DateLastEdited), "2018-07-27T05:58:52.006Z");
    }

    #[test]
    fn detects_non_rfc3339_timestamps() {
        assert!(record("2018-07-27T05:58:52.006Z").has_rfc3339_timestamp());
        assert!(!record("27/07/2018").has_rfc3339_timestamp());
        assert!(!record("2018-7-27").has_rfc3339_timestamp());
    }
}
