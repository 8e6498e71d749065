//! Per-model status display for a panel run

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use panel_application::StatusObserver;
use panel_domain::{QueryStatus, StatusEvent};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Shows one spinner per queried model
pub struct StatusReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_for(&self, bars: &mut HashMap<String, ProgressBar>, key: &str) -> ProgressBar {
        bars.entry(key.to_string())
            .or_insert_with(|| {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.set_prefix(key.to_string());
                pb
            })
            .clone()
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusObserver for StatusReporter {
    fn on_status(&self, event: &StatusEvent) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        let pb = self.bar_for(&mut bars, &event.model_key);

        match event.status.status {
            QueryStatus::Pending => pb.set_message("waiting".dimmed().to_string()),
            QueryStatus::Running => {
                pb.set_message("querying...");
                pb.enable_steady_tick(Duration::from_millis(100));
            }
            QueryStatus::Success => {
                pb.finish_with_message(format!(
                    "{} {}",
                    "v".green(),
                    elapsed(event.status.duration_ms)
                ));
            }
            QueryStatus::Error => {
                pb.finish_with_message(format!(
                    "{} {}",
                    "x".red(),
                    event.status.message.as_deref().unwrap_or("failed")
                ));
            }
        }
    }
}

/// Line-per-transition output for non-interactive terminals
pub struct SimpleStatusPrinter;

impl StatusObserver for SimpleStatusPrinter {
    fn on_status(&self, event: &StatusEvent) {
        match event.status.status {
            QueryStatus::Pending => {}
            QueryStatus::Running => {
                println!("{} {}", "->".cyan(), event.model_key.bold());
            }
            QueryStatus::Success => {
                println!(
                    "  {} {} ({})",
                    "v".green(),
                    event.model_key,
                    elapsed(event.status.duration_ms)
                );
            }
            QueryStatus::Error => {
                println!(
                    "  {} {} (failed: {})",
                    "x".red(),
                    event.model_key,
                    event.status.message.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
}

fn elapsed(duration_ms: Option<u64>) -> String {
    match duration_ms {
        Some(ms) if ms >= 1000 => format!("{:.1}s", ms as f64 / 1000.0),
        Some(ms) => format!("{}ms", ms),
        None => "done".to_string(),
    }
}
