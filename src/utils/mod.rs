//! Shared utilities
//!
//! Progress reporting and logging helpers for long-running pipeline stages,
//! using the indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Default style for a pipeline progress bar
pub const DEFAULT_PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// Create a progress bar with the standardized pipeline style
///
/// # Arguments
/// * `length` - Total length for the progress bar
/// * `description` - Description to display as the bar message
///
/// # Returns
/// A configured `ProgressBar`
#[must_use]
pub fn create_progress_bar(length: u64, description: &str) -> ProgressBar {
    let pb = ProgressBar::new(length);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(DEFAULT_PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(description.to_string());
    pb
}

/// Log an operation completion with consistent format
pub fn log_stage_complete(stage: &str, items: usize, elapsed: std::time::Duration) {
    log::info!("{stage}: processed {items} items in {elapsed:?}");
}

/// Initialize env_logger with an `info` default filter.
///
/// A convenience for binaries and tests embedding the pipeline; safe to
/// call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .try_init();
}
