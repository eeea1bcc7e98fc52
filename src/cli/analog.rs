//! Analog note commands
//!
//! Analog (slipbox) notes are numbered per day: `2025-11-12-A1`,
//! `2025-11-12-A2`, ... The count lives in the counter file, not in the
//! directory.

use anyhow::Result;
use clap::Args;

use super::app::Runtime;
use super::sequence::emit;
use crate::storage::{AnalogSequence, CounterManager};

#[derive(Args)]
#[group(id = "mode", multiple = false)]
pub struct AnalogArgs {
    /// Check next number without incrementing
    #[arg(long)]
    pub check: bool,

    /// Reset today's counter
    #[arg(long)]
    pub reset: bool,

    /// Show current counter value
    #[arg(long)]
    pub counter: bool,

    /// Set today's counter; the next note gets N + 1
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub set: Option<i64>,

    /// Reset the counters of every day
    #[arg(long)]
    pub reset_all: bool,
}

pub fn run(args: AnalogArgs, runtime: &Runtime, counters: &CounterManager) -> Result<()> {
    let date = runtime.timestamps.current_date();
    tracing::debug!(%date, counter_file = %counters.path().display(), "analog command");

    if args.counter {
        let count = counters.get(&date);
        if runtime.output.is_json() {
            runtime.output.data(&serde_json::json!({
                "date": date,
                "count": count,
            }));
        } else {
            println!("Current analog counter for {}: {}", date, count);
        }
        return Ok(());
    }

    if args.reset {
        counters.reset(&date)?;
        runtime.output.success("Counter reset for analog notes");
        return Ok(());
    }

    if let Some(value) = args.set {
        counters.set(&date, value)?;
        runtime
            .output
            .success(&format!("Analog counter for {} set to {}", date, value));
        return Ok(());
    }

    if args.reset_all {
        counters.reset_all()?;
        runtime.output.success("All analog counters reset");
        return Ok(());
    }

    emit(runtime, &AnalogSequence::new(counters, date), args.check, &[])
}
