//! Plain-text output formatting.

use pkms_core::{Note, Task, TaskSuggestion};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn note_detail(note: &Note) -> String {
    format!(
        "ID: {}\nTitle: {}\nTags: {}\nCreated: {}  Updated: {}\n---\n{}\n",
        note.id,
        note.title,
        note.tags.join(", "),
        note.created_at.format(TIMESTAMP_FORMAT),
        note.updated_at.format(TIMESTAMP_FORMAT),
        note.body
    )
}

pub fn note_line(note: &Note) -> String {
    format!(
        "- {} | {} | tags={} | updated={}",
        note.id,
        note.title,
        note.tags.join(","),
        note.updated_at.format(TIMESTAMP_FORMAT)
    )
}

pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "ID: {} | {} | status={} | due={}",
        task.id,
        task.title,
        task.status,
        task.due_date.as_deref().unwrap_or("-")
    );
    if !task.description.is_empty() {
        line.push_str("\n  ");
        line.push_str(&task.description);
    }
    line
}

pub fn suggestion_list(suggestions: &[TaskSuggestion]) -> String {
    suggestions
        .iter()
        .enumerate()
        .map(|(index, suggestion)| format!("{}. {}", index + 1, suggestion.title))
        .collect::<Vec<_>>()
        .join("\n")
}
