//! Sentence splitting, summarization and task suggestion rules.
//!
//! Sentences end at `.`, `!` or `?` followed by whitespace. No semantic
//! understanding is involved.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SENTENCE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence break regex"));

const TRIGGER_PHRASES: [&str; 4] = ["should", "need to", "todo", "please"];
const ACTION_VERBS: [&str; 9] = [
    "write",
    "review",
    "call",
    "email",
    "schedule",
    "create",
    "update",
    "fix",
    "implement",
];
const MAX_SHORT_SENTENCE_WORDS: usize = 12;
const MAX_TITLE_CHARS: usize = 80;
const FALLBACK_MIN_CHARS: usize = 120;
const FALLBACK_TITLE: &str = "Review note";

/// Candidate task derived from note text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSuggestion {
    /// Sentence text truncated to 80 characters.
    pub title: String,
    /// Source sentence (or opening text for the fallback).
    pub excerpt: String,
}

/// Splits trimmed text into sentences, keeping terminal punctuation.
///
/// Empty input yields one empty sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    for found in SENTENCE_BREAK_RE.find_iter(text) {
        // Terminators are single-byte ASCII.
        sentences.push(&text[start..found.start() + 1]);
        start = found.end();
    }
    sentences.push(&text[start..]);
    sentences
}

/// Returns the first `max_sentences` sentences joined by one space.
pub fn summarize_text(text: &str, max_sentences: usize) -> String {
    split_sentences(text)
        .into_iter()
        .take(max_sentences)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scans sentences in order for action-like content.
///
/// A sentence qualifies when it contains a trigger phrase, or when it is
/// short and starts with a known action verb. If nothing qualifies and the
/// text is long, a single generic review suggestion is returned.
pub fn suggest_tasks(text: &str, max_suggestions: usize) -> Vec<TaskSuggestion> {
    let mut suggestions = Vec::new();
    if max_suggestions == 0 {
        return suggestions;
    }

    for sentence in split_sentences(text) {
        let sentence = sentence.trim();
        if is_triggered(sentence) || is_short_action(sentence) {
            suggestions.push(TaskSuggestion {
                title: truncate_chars(sentence, MAX_TITLE_CHARS),
                excerpt: sentence.to_string(),
            });
        }
        if suggestions.len() >= max_suggestions {
            break;
        }
    }

    let trimmed = text.trim();
    if suggestions.is_empty() && trimmed.chars().count() > FALLBACK_MIN_CHARS {
        suggestions.push(TaskSuggestion {
            title: FALLBACK_TITLE.to_string(),
            excerpt: fallback_excerpt(trimmed),
        });
    }
    suggestions
}

fn is_triggered(sentence: &str) -> bool {
    let lowered = sentence.to_lowercase();
    TRIGGER_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

fn is_short_action(sentence: &str) -> bool {
    let mut words = sentence.split_whitespace();
    let Some(first) = words.next() else {
        return false;
    };
    if words.count() + 1 > MAX_SHORT_SENTENCE_WORDS {
        return false;
    }
    let first = first.to_lowercase();
    ACTION_VERBS.contains(&first.as_str())
}

fn fallback_excerpt(text: &str) -> String {
    let head = truncate_chars(text, FALLBACK_MIN_CHARS);
    match head.rsplit_once(' ') {
        Some((before_last_word, _)) => before_last_word.to_string(),
        None => head,
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
