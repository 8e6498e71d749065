//! Console output formatter for panel runs

use colored::Colorize;
use panel_application::WorkflowOutput;
use panel_domain::{ErrorCategory, PanelError, QueryStatus};
use serde_json::json;

/// Formats run summaries and errors for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the end-of-run summary
    pub fn format(output: &WorkflowOutput) -> String {
        let result = &output.result;
        let mut out = String::new();

        out.push_str(&Self::header("LLM Panel Results"));
        out.push('\n');

        out.push_str(&format!("{} {}\n", "Run:".cyan().bold(), output.run_name));
        out.push_str(&format!(
            "{} {}\n",
            "Models:".cyan().bold(),
            output.selection.selected_keys().join(", ")
        ));
        out.push_str(&format!(
            "{} {} succeeded, {} failed ({}ms)\n",
            "Result:".cyan().bold(),
            result.success_count().to_string().green(),
            result.failure_count().to_string().red(),
            result.timing.duration_ms
        ));

        if !output.selection.warnings.is_empty() {
            out.push_str(&Self::section_header("Warnings"));
            for warning in &output.selection.warnings {
                out.push_str(&format!("  {} {}\n", "!".yellow(), warning));
            }
        }

        if result.failure_count() > 0 {
            out.push_str(&Self::section_header("Failures"));
            for (key, status) in result.statuses.iter() {
                if status.status != QueryStatus::Error {
                    continue;
                }
                let category = status
                    .cause
                    .as_ref()
                    .map(|e| e.category)
                    .unwrap_or(ErrorCategory::Unknown);
                out.push_str(&format!(
                    "\n{} {}\n",
                    format!("── {} ──", key).red().bold(),
                    format!("[{}]", category).dimmed()
                ));
                if let Some(cause) = &status.cause {
                    out.push_str(&Self::indent(&cause.format(), "  "));
                    out.push('\n');
                } else if let Some(message) = &status.message {
                    out.push_str(&format!("  {}\n", message));
                }
            }
        }

        out.push_str(&Self::section_header("Output"));
        match &output.run_dir {
            Some(dir) => {
                out.push_str(&format!("  {}\n", dir.display()));
                for file in &output.written_files {
                    out.push_str(&format!("    {} {}\n", "v".green(), file.display()));
                }
            }
            None => out.push_str(&format!("  {}\n", "No responses to write".dimmed())),
        }

        out.push_str(&Self::footer());
        out
    }

    /// Format a terminal error the way [`PanelError::format`] lays it out,
    /// with a colored header
    pub fn format_error(error: &PanelError) -> String {
        let plain = error.format();
        let mut lines = plain.lines();
        let mut out = String::new();
        if let Some(header) = lines.next() {
            out.push_str(&format!("{}\n", header.red().bold()));
        }
        for line in lines {
            if line == "Suggestions:" || line == "Examples:" {
                out.push_str(&format!("{}\n", line.yellow()));
            } else {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    /// Format as JSON
    pub fn format_json(output: &WorkflowOutput) -> String {
        let value = json!({
            "runName": output.run_name,
            "runDir": output.run_dir,
            "selected": output.selection.selected_keys(),
            "warnings": output.selection.warnings,
            "writtenFiles": output.written_files,
            "result": output.result,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
