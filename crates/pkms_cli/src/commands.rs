//! Subcommand handlers.
//!
//! # Responsibility
//! - Translate parsed arguments into `RecordStore` calls and print results.
//! - Own interactive confirmation for destructive commands.
//!
//! # Invariants
//! - Store calls never block on user input; prompts happen before them.

use crate::cli::{
    split_tags, AddNoteArgs, AddTaskArgs, Command, ConfirmedIdArgs, ExportArgs, IdArgs,
    ImportArgs, ListTasksArgs, RepairArgs, SearchNotesArgs, SearchTasksArgs, SummarizeNoteArgs,
    UpdateNoteArgs, UpdateTaskArgs,
};
use crate::render::{note_detail, note_line, suggestion_list, task_line};
use pkms_core::{
    AnalyzeOptions, ImportMode, Note, NotePatch, RecordId, RecordSource, RecordStore,
    SearchQuery, StoreError, SummarizeRequest, SummarizeService, Task, TaskPatch,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

/// Failure of one CLI invocation.
#[derive(Debug)]
pub enum CliError {
    Store(StoreError),
    /// Terminal read/write failure (prompts).
    Io(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

pub type CliResult = Result<(), CliError>;

pub fn run(command: Command, store: &RecordStore) -> CliResult {
    match command {
        Command::AddNote(args) => add_note(store, args),
        Command::ListNotes => list_notes(store),
        Command::ViewNote(args) => view_note(store, args),
        Command::SearchNotes(args) => search_notes(store, args),
        Command::UpdateNote(args) => update_note(store, args),
        Command::DeleteNote(args) => delete_note(store, args),
        Command::AddTask(args) => add_task(store, args),
        Command::ListTasks(args) => list_tasks(store, args),
        Command::ViewTask(args) => view_task(store, args),
        Command::SearchTasks(args) => search_tasks(store, args),
        Command::UpdateTask(args) => update_task(store, args),
        Command::CompleteTask(args) => complete_task(store, args),
        Command::DeleteTask(args) => delete_task(store, args),
        Command::SummarizeNote(args) => summarize_note(store, args),
        Command::Export(args) => export(store, args),
        Command::Import(args) => import(store, args),
        Command::Repair(args) => repair(store, args),
    }
}

fn add_note(store: &RecordStore, args: AddNoteArgs) -> CliResult {
    let tags = args.tags.as_deref().map(split_tags).unwrap_or_default();
    let note = store.create(Note::new(args.title, args.body, tags, RecordSource::Manual))?;
    println!("Note added:");
    println!("{}", note_detail(&note));
    Ok(())
}

fn list_notes(store: &RecordStore) -> CliResult {
    for note in store.list::<Note>()? {
        println!("{}", note_line(&note));
    }
    Ok(())
}

fn view_note(store: &RecordStore, args: IdArgs) -> CliResult {
    let note = store.get::<Note>(&RecordId::from(args.id))?;
    println!("{}", note_detail(&note));
    Ok(())
}

fn search_notes(store: &RecordStore, args: SearchNotesArgs) -> CliResult {
    let mut query = SearchQuery::new(args.query);
    query.tag = args.tag;
    for note in store.search::<Note>(&query)? {
        println!("{}", note_line(&note));
    }
    Ok(())
}

fn update_note(store: &RecordStore, args: UpdateNoteArgs) -> CliResult {
    let patch = NotePatch {
        title: non_empty(args.title),
        body: non_empty(args.body),
        tags: args.tags.as_deref().map(split_tags),
    };
    let note = store.update::<Note>(&RecordId::from(args.id), patch)?;
    println!("Updated note:");
    println!("{}", note_detail(&note));
    Ok(())
}

fn delete_note(store: &RecordStore, args: ConfirmedIdArgs) -> CliResult {
    let prompt = format!(
        "Delete note {}? This action cannot be undone. (y/N): ",
        args.id
    );
    if !args.yes && !confirm(&prompt)? {
        println!("Aborted");
        return Ok(());
    }
    store.delete::<Note>(&RecordId::from(args.id))?;
    println!("Note deleted");
    Ok(())
}

fn add_task(store: &RecordStore, args: AddTaskArgs) -> CliResult {
    let task = store.create(Task::new(
        args.title,
        args.description,
        non_empty(args.due),
        RecordSource::Manual,
    ))?;
    println!("Task added:");
    println!("{}", task_line(&task));
    Ok(())
}

fn list_tasks(store: &RecordStore, args: ListTasksArgs) -> CliResult {
    let tasks = match args.status {
        Some(status) => store.tasks_with_status(status)?,
        None => store.list::<Task>()?,
    };
    for task in tasks {
        println!("{}", task_line(&task));
    }
    Ok(())
}

fn view_task(store: &RecordStore, args: IdArgs) -> CliResult {
    let task = store.get::<Task>(&RecordId::from(args.id))?;
    println!("{}", task_line(&task));
    Ok(())
}

fn search_tasks(store: &RecordStore, args: SearchTasksArgs) -> CliResult {
    for task in store.search::<Task>(&SearchQuery::new(args.query))? {
        println!("{}", task_line(&task));
    }
    Ok(())
}

fn update_task(store: &RecordStore, args: UpdateTaskArgs) -> CliResult {
    let patch = TaskPatch {
        title: non_empty(args.title),
        description: args.description,
        due_date: args.due.map(|due| non_empty(Some(due))),
        status: args.status,
    };
    let task = store.update::<Task>(&RecordId::from(args.id), patch)?;
    println!("Updated task:");
    println!("{}", task_line(&task));
    Ok(())
}

fn complete_task(store: &RecordStore, args: IdArgs) -> CliResult {
    let task = store.complete_task(&RecordId::from(args.id))?;
    println!("Marked complete:");
    println!("{}", task_line(&task));
    Ok(())
}

fn delete_task(store: &RecordStore, args: ConfirmedIdArgs) -> CliResult {
    let prompt = format!(
        "Delete task {}? This action cannot be undone. (y/N): ",
        args.id
    );
    if !args.yes && !confirm(&prompt)? {
        println!("Aborted");
        return Ok(());
    }
    store.delete::<Task>(&RecordId::from(args.id))?;
    println!("Task deleted");
    Ok(())
}

fn summarize_note(store: &RecordStore, args: SummarizeNoteArgs) -> CliResult {
    let request = SummarizeRequest {
        note_id: RecordId::from(args.id),
        options: AnalyzeOptions {
            max_sentences: args.sentences,
            max_suggestions: args.max_suggestions,
        },
        save: args.save,
        notebook: args.notebook,
        accept: args.accept,
    };
    let outcome = SummarizeService::new(store).summarize(&request)?;

    println!("Summary:\n {}", outcome.report.summary);
    if let Some(saved) = &outcome.saved_note {
        println!("Saved summary as note:");
        println!("{}", note_detail(saved));
    }
    if !outcome.report.suggestions.is_empty() {
        println!("\nSuggested tasks:");
        println!("{}", suggestion_list(&outcome.report.suggestions));
    }
    if let Some(task) = &outcome.accepted_task {
        println!("Accepted suggestion -> task created:");
        println!("{}", task_line(task));
    }
    Ok(())
}

fn export(store: &RecordStore, args: ExportArgs) -> CliResult {
    store.export(&args.path)?;
    println!("Exported data to {}", args.path.display());
    Ok(())
}

fn import(store: &RecordStore, args: ImportArgs) -> CliResult {
    let mode = if args.replace {
        ImportMode::Replace
    } else {
        ImportMode::Merge
    };
    let summary = store.import(&args.path, mode)?;
    println!(
        "Imported data from {} (notes added={}, tasks added={})",
        args.path.display(),
        summary.notes_added,
        summary.tasks_added
    );
    Ok(())
}

fn repair(store: &RecordStore, args: RepairArgs) -> CliResult {
    let prompt = format!(
        "Repair current data from backup {}? This will overwrite current data. (y/N): ",
        args.path.display()
    );
    if !args.yes && !confirm(&prompt)? {
        println!("Aborted");
        return Ok(());
    }
    store.repair(&args.path)?;
    println!("Repaired data from backup {}", args.path.display());
    Ok(())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}
