#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward boundary dataset loading, hierarchy extraction, filtering and
//! aggregation.
//!
//! Loads a single `GeoJSON` `FeatureCollection` of Nigerian ward polygons,
//! derives the state and LGA levels from the denormalized ward
//! properties, answers filter and free-text queries over the wards, and
//! merges ward polygons into state and LGA outlines for display.

pub mod aggregate;
pub mod dataset;
pub mod filter;
pub mod hierarchy;
pub mod search;

pub use dataset::{Dataset, DatasetSource};

use thiserror::Error;

/// Errors that can occur while loading or querying the boundary dataset.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// Reading the dataset file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a usable ward collection.
    #[error("Invalid dataset: {message}")]
    InvalidDataset {
        /// Description of what went wrong.
        message: String,
    },

    /// A filter referenced a field that does not exist.
    #[error("Unknown filter field: {0}")]
    UnknownField(#[from] strum::ParseError),
}
