//! Substring search over loaded collections.
//!
//! # Responsibility
//! - Match records against a case-insensitive query and optional tag filter.
//! - Keep search result ordering identical to collection order.

pub mod query;
