//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use pkms_core::TaskStatus;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pkms",
    version,
    about = "Simple PKMS CLI (notes + tasks + agent)"
)]
pub struct Cli {
    /// Path to data directory (overrides PKMS_DATA_DIR and the default).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    AddNote(AddNoteArgs),
    ListNotes,
    ViewNote(IdArgs),
    SearchNotes(SearchNotesArgs),
    UpdateNote(UpdateNoteArgs),
    DeleteNote(ConfirmedIdArgs),
    AddTask(AddTaskArgs),
    ListTasks(ListTasksArgs),
    ViewTask(IdArgs),
    SearchTasks(SearchTasksArgs),
    UpdateTask(UpdateTaskArgs),
    CompleteTask(IdArgs),
    DeleteTask(ConfirmedIdArgs),
    SummarizeNote(SummarizeNoteArgs),
    Export(ExportArgs),
    Import(ImportArgs),
    Repair(RepairArgs),
}

#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct ConfirmedIdArgs {
    pub id: String,
    /// Auto-confirm destructive action.
    #[arg(long, default_value_t = false)]
    pub yes: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddNoteArgs {
    pub title: String,
    pub body: String,
    /// Comma-separated tags.
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchNotesArgs {
    pub query: String,
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateNoteArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub body: Option<String>,
    /// Comma-separated tags (an empty string clears them).
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AddTaskArgs {
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ListTasksArgs {
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchTasksArgs {
    pub query: String,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateTaskArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Due date text (an empty string clears it).
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,
}

#[derive(Args, Debug, Clone)]
pub struct SummarizeNoteArgs {
    pub id: String,
    #[arg(long, default_value_t = 2)]
    pub sentences: usize,
    #[arg(long, default_value_t = 3)]
    pub max_suggestions: usize,
    /// Auto-accept first suggestion and create a task.
    #[arg(long, default_value_t = false)]
    pub accept: bool,
    /// Save the generated summary as a new note (source=agent).
    #[arg(long, default_value_t = false)]
    pub save: bool,
    /// Notebook to tag the saved summary into (adds tag notebook:<name>).
    #[arg(long)]
    pub notebook: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Path to write exported JSON.
    pub path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Path to read exported JSON.
    pub path: PathBuf,
    /// Replace existing data instead of merge.
    #[arg(long, default_value_t = false)]
    pub replace: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RepairArgs {
    /// Backup file to restore from.
    pub path: PathBuf,
    /// Auto-confirm destructive action.
    #[arg(long, default_value_t = false)]
    pub yes: bool,
}

fn parse_status(value: &str) -> Result<TaskStatus, String> {
    value.parse()
}

/// Splits comma-separated tag input, dropping blank entries.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
