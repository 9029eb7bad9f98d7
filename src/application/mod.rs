//! Application services: search compilation, collation, paging and the feed query engine.

pub mod collation;
pub mod error;
pub mod feed;
pub mod pagination;
pub mod repos;
pub mod search;
