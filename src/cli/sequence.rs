//! Sequential code commands (`seq`, `project`)
//!
//! Both scan the working directory; the next code is one past the highest
//! existing entry with the same prefix.

use anyhow::{Context, Result};
use clap::Args;

use super::app::Runtime;
use crate::domain::{CodeSequence, SequentialSpec};
use crate::storage::DirectorySequence;

#[derive(Args)]
pub struct SeqArgs {
    /// Title appended after the code
    pub title: Vec<String>,

    /// Prefix for generated code (case-insensitive match)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Number of digits for zero padding
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<i64>,

    /// Starting number when no entries at or above it exist
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// Check next number without the title
    #[arg(long)]
    pub check: bool,

    /// Show highest existing number for the prefix
    #[arg(long, conflicts_with = "check")]
    pub counter: bool,
}

#[derive(Args)]
pub struct ProjectArgs {
    /// Project title appended after the number
    pub title: Vec<String>,

    /// Check next number without the title
    #[arg(long)]
    pub check: bool,

    /// Show highest existing project number
    #[arg(long, conflicts_with = "check")]
    pub counter: bool,
}

pub fn run_seq(args: SeqArgs, runtime: &Runtime) -> Result<()> {
    let defaults = &runtime.config.sequence;
    let spec = SequentialSpec::new(
        args.prefix.unwrap_or_else(|| defaults.prefix.clone()),
        args.width.unwrap_or(defaults.width),
        args.start.unwrap_or(defaults.start),
    );

    run_sequence(runtime, spec, None, args.check, args.counter, &args.title)
}

pub fn run_project(args: ProjectArgs, runtime: &Runtime) -> Result<()> {
    run_sequence(
        runtime,
        SequentialSpec::project(),
        Some("project"),
        args.check,
        args.counter,
        &args.title,
    )
}

fn run_sequence(
    runtime: &Runtime,
    spec: SequentialSpec,
    label: Option<&str>,
    check: bool,
    counter: bool,
    title: &[String],
) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let label = match label {
        Some(label) => format!("{} counter", label),
        None => format!(
            "counter for prefix {}",
            spec.normalized().prefix.to_uppercase()
        ),
    };
    let sequence = DirectorySequence::new(cwd, spec);

    if counter {
        let highest = sequence.highest()?;
        if runtime.output.is_json() {
            runtime.output.data(&serde_json::json!({
                "label": label,
                "highest": (highest > 0).then_some(highest),
            }));
        } else if highest == 0 {
            println!("Current {}: none", label);
        } else {
            println!("Current {}: {}", label, highest);
        }
        return Ok(());
    }

    emit(runtime, &sequence, check, title)
}

/// Prints the next code of `sequence`, followed by the title unless checking
pub(super) fn emit(
    runtime: &Runtime,
    sequence: &dyn CodeSequence,
    check: bool,
    title: &[String],
) -> Result<()> {
    let issued = if check {
        sequence.peek()?
    } else {
        sequence.issue()?
    };

    let mut name = issued.code.clone();
    let title = title.join(" ");
    if !check && !title.is_empty() {
        name.push(' ');
        name.push_str(&title);
    }

    runtime.output.result(&name, Some(&issued))
}
