// ABOUTME: Progress sink for CLI feedback, invoked at stage checkpoints.
// ABOUTME: Purely observational; supports normal, quiet (CI), and JSON line modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with stage messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Reports pipeline progress at well-defined checkpoints. Never influences
/// control flow.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing the invocation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Report a stage checkpoint (suppressed in quiet mode).
    pub fn stage(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("  → {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit_json("stage", message, None),
        }
    }

    /// Print the final success line with timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("✓ {message} ({elapsed:.1}s)");
                } else {
                    println!("✓ {message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => {
                self.emit_json("success", message, self.start_time.map(|_| self.elapsed_secs()));
            }
        }
    }

    /// Print the final error line.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                self.emit_json("error", message, self.start_time.map(|_| self.elapsed_secs()));
            }
        }
    }

    fn emit_json(&self, event: &str, message: &str, duration_secs: Option<f64>) {
        let line = JsonEvent {
            event,
            message,
            duration_secs,
        };
        if let Ok(json) = serde_json::to_string(&line) {
            if event == "error" {
                eprintln!("{json}");
            } else {
                println!("{json}");
            }
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
