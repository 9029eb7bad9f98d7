//! Shared domain enumerations used by queries.

use std::str::FromStr;

/// Columns a feed listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    Image,
    Description,
    DateLastEdited,
}

impl SortColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Image => "image",
            SortColumn::Description => "description",
            SortColumn::DateLastEdited => "dateLastEdited",
        }
    }
}

impl FromStr for SortColumn {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(SortColumn::Name),
            "image" => Ok(SortColumn::Image),
            "description" => Ok(SortColumn::Description),
            "dateLastEdited" => Ok(SortColumn::DateLastEdited),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}
