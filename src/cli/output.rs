//! Output formatting for CLI commands

use anyhow::Result;
use serde::Serialize;

use super::clipboard;
use crate::domain::IssuedCode;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    quiet: bool,
    extension: bool,
    copy: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self {
            format,
            quiet,
            extension: false,
            copy: false,
        }
    }

    /// Sets how generated names are finished: `.md` suffix and clipboard copy
    pub fn with_result_options(mut self, extension: bool, copy: bool) -> Self {
        self.extension = extension;
        self.copy = copy;
        self
    }

    /// Prints a success message (suppressed by --quiet)
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a generated name, applying --ext and --copy.
    ///
    /// If copying fails the name is still printed before the error is
    /// returned.
    pub fn result(&self, name: &str, issued: Option<&IssuedCode>) -> Result<()> {
        let mut result = name.to_string();
        if self.extension {
            result.push_str(".md");
        }

        if !self.copy {
            self.print_result(&result, issued, false);
            return Ok(());
        }

        if let Err(e) = clipboard::copy(&result) {
            self.print_result(&result, issued, false);
            return Err(e.context("clipboard error"));
        }

        if !self.quiet {
            self.print_result(&result, issued, true);
            if !self.is_json() {
                println!("Copied to clipboard!");
            }
        }
        Ok(())
    }

    fn print_result(&self, result: &str, issued: Option<&IssuedCode>, copied: bool) {
        match self.format {
            OutputFormat::Text => println!("{}", result),
            OutputFormat::Json => {
                let mut payload = serde_json::json!({
                    "result": result,
                    "copied": copied,
                });
                if let Some(issued) = issued {
                    payload["code"] = serde_json::json!(issued.code);
                    payload["value"] = serde_json::json!(issued.value);
                }
                println!("{}", payload);
            }
        }
    }
}
