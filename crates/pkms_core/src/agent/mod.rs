//! Heuristic note summarizer and task suggester.
//!
//! # Responsibility
//! - Derive summaries and task suggestions from raw note text.
//! - Turn agent output into draft records for the store.
//!
//! # Invariants
//! - Everything here is pure; no function touches the filesystem.

pub mod heuristics;
pub mod report;
