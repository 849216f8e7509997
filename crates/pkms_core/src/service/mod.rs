//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls and agent helpers into use-case level APIs.
//! - Keep the CLI layer decoupled from storage details.

pub mod summarize_service;
