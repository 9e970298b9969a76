use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::config::{get_config, init_config};
use crate::error::Error;
use crate::models::course::CourseDraft;
use crate::models::lesson_item::ItemType;
use crate::services::quiz_session::QuizAttempt;
use crate::telemetry::init_tracing;
use crate::AppState;

/// Exit code for a draft that review blocks from submission.
pub const EXIT_BLOCKED: i32 = 2;

#[derive(Parser)]
#[command(name = "course-authoring")]
#[command(about = "Inspect, review and submit course curriculum drafts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an empty draft
    Create { course_id: String, title: String },
    /// Commit a curriculum tree read from a JSON file
    Import { file: PathBuf },
    /// Print a draft with its ordering repaired
    Show { draft_id: String },
    /// Print the review summary; exits with 2 when submission is blocked
    Review { draft_id: String },
    /// Print word-count reading estimates beside authored durations
    Hints { draft_id: String },
    /// Send a draft to review
    Submit { draft_id: String },
    /// Print the answer-key result of a quiz item
    QuizKey { draft_id: String, item_id: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs one command and returns the process exit code.
pub async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing();
    init_config()?;
    let state = AppState::from_config(get_config()).await?;
    let drafts = &state.drafts;

    match cli.command {
        Command::Create { course_id, title } => {
            let session = drafts.create(&course_id, &title).await?;
            print_json(session.snapshot())?;
        }
        Command::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let tree: CourseDraft = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", file.display()))?;
            let (tree, repaired) = state.curriculum.normalize(&tree);
            let outcome = drafts.commit(&tree.course_id, &tree).await?;
            info!(course_id = %tree.course_id, repaired, ?outcome, "draft imported");
            print_json(&outcome)?;
        }
        Command::Show { draft_id } => {
            print_json(&drafts.load(&draft_id).await?)?;
        }
        Command::Review { draft_id } => {
            let tree = drafts.load(&draft_id).await?;
            let summary = state.review.summarize(&tree);
            print_json(&summary)?;
            if !summary.can_submit() {
                return Ok(EXIT_BLOCKED);
            }
        }
        Command::Hints { draft_id } => {
            let tree = drafts.load(&draft_id).await?;
            let hints = state
                .review
                .reading_hints(&tree, state.config.reading_words_per_minute);
            print_json(&hints)?;
        }
        Command::Submit { draft_id } => match drafts.submit(&draft_id).await {
            Ok(summary) => print_json(&summary)?,
            Err(Error::ValidationFailed(issues)) => {
                print_json(&issues)?;
                return Ok(EXIT_BLOCKED);
            }
            Err(e) => return Err(e.into()),
        },
        Command::QuizKey { draft_id, item_id } => {
            let tree = drafts.load(&draft_id).await?;
            let item = tree
                .find_item(&item_id)
                .ok_or_else(|| Error::NotFound(format!("Item {}", item_id)))?;
            let quiz = item.content.as_quiz().ok_or_else(|| Error::TypeMismatch {
                expected: ItemType::Quiz,
                actual: item.item_type(),
            })?;
            let attempt = QuizAttempt::preview(quiz.clone())?;
            print_json(&attempt.result())?;
        }
    }
    Ok(0)
}
