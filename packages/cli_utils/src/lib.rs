#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the ward map tools.
//!
//! Provides [`init_logger`], which sets up `indicatif-log-bridge` so that
//! `log::info!` and friends are suspended while spinners redraw, a
//! spinner-wrapped [`load_dataset`], and small `dialoguer` prompts used by
//! the interactive browser.

use std::sync::Arc;
use std::time::Duration;

use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use ward_map_boundary::{BoundaryError, Dataset};
use ward_map_viewer::ViewerConfig;

pub use indicatif::MultiProgress;

/// Label of the extra entry [`select_optional`] shows before the options.
pub const NONE_LABEL: &str = "(none)";

/// Creates a spinner showing `message`.
#[must_use]
pub fn spinner(multi: &MultiProgress, message: &str) -> ProgressBar {
    let bar = multi.add(ProgressBar::new_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar
}

/// Loads the configured dataset behind a spinner.
///
/// The configured aggregation is applied to the loaded dataset.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the dataset cannot be read, fetched or
/// parsed.
pub async fn load_dataset(
    multi: &MultiProgress,
    config: &ViewerConfig,
) -> Result<Arc<Dataset>, BoundaryError> {
    let source = config.dataset.source();
    let bar = spinner(multi, &format!("Loading map data from {source}..."));

    match Dataset::load(&source).await {
        Ok(dataset) => {
            bar.finish_with_message(format!("Loaded {} wards", dataset.len()));
            Ok(Arc::new(dataset.with_aggregation(config.map.aggregation)))
        }
        Err(e) => {
            bar.finish_and_clear();
            Err(e)
        }
    }
}

/// Prompts for one of `options`, with a leading "(none)" entry.
///
/// `current` preselects a value. Returns `None` when "(none)" is chosen.
///
/// # Errors
///
/// Returns a [`dialoguer::Error`] if the terminal interaction fails.
pub fn select_optional(
    prompt: &str,
    options: &[String],
    current: Option<&str>,
) -> Result<Option<String>, dialoguer::Error> {
    let mut labels: Vec<&str> = Vec::with_capacity(options.len() + 1);
    labels.push(NONE_LABEL);
    labels.extend(options.iter().map(String::as_str));

    let default = current
        .and_then(|c| options.iter().position(|o| o == c))
        .map_or(0, |i| i + 1);

    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .max_length(20)
        .interact()?;

    Ok(idx.checked_sub(1).map(|i| options[i].clone()))
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while spinners redraw.
///
/// Returns the [`MultiProgress`] that all spinners must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Ignore error if logger was already set (e.g., in tests)

    log::set_max_level(level);

    multi
}
