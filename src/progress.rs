// src/progress.rs

//! Progress reporting for long-running command-line work
//!
//! The `ProgressTracker` trait is implemented by:
//! - `CliProgress`: a terminal progress bar using indicatif
//! - `SilentProgress`: counts without output (tests, `--quiet`)

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Core trait for progress tracking
pub trait ProgressTracker: Send + Sync {
    /// Start a new stage of `length` steps
    fn start_stage(&self, message: &str, length: u64);

    /// Advance the current stage
    fn increment(&self, amount: u64);

    /// Current position within the stage
    fn position(&self) -> u64;

    fn finish_with_message(&self, message: &str);

    fn is_finished(&self) -> bool;
}

/// No-op tracker that still counts
#[derive(Debug, Default)]
pub struct SilentProgress {
    position: AtomicU64,
    finished: AtomicBool,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressTracker for SilentProgress {
    fn start_stage(&self, _message: &str, _length: u64) {
        self.position.store(0, Ordering::Relaxed);
    }

    fn increment(&self, amount: u64) {
        self.position.fetch_add(amount, Ordering::Relaxed);
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn finish_with_message(&self, _message: &str) {
        self.finished.store(true, Ordering::Relaxed);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}

/// Terminal progress bar
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} ({pos}/{len}) [{bar:40.green/dim}] {percent}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        Self { bar }
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker for CliProgress {
    fn start_stage(&self, message: &str, length: u64) {
        self.bar.reset();
        self.bar.set_length(length);
        self.bar.set_message(message.to_string());
    }

    fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    fn position(&self) -> u64 {
        self.bar.position()
    }

    fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_progress() {
        let progress = SilentProgress::new();
        progress.start_stage("Seeding users", 10);
        progress.increment(3);
        progress.increment(2);
        assert_eq!(progress.position(), 5);

        progress.start_stage("Seeding recipes", 4);
        assert_eq!(progress.position(), 0);
        assert!(!progress.is_finished());

        progress.finish_with_message("done");
        assert!(progress.is_finished());
    }

    #[test]
    fn test_cli_progress_counts() {
        let progress = CliProgress::new();
        progress.start_stage("Seeding", 3);
        progress.increment(2);
        assert_eq!(progress.position(), 2);
        progress.finish_with_message("done");
        assert!(progress.is_finished());
    }
}
