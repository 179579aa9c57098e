#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Drill-down and search view controller for the ward map.
//!
//! [`controller::MapController`] owns the current selection and keeps the
//! cascading state/LGA/ward options, the search text and the highlighted
//! map layers consistent. Rendering goes through the [`surface::MapSurface`]
//! trait and user-facing messages through [`notify::Notifier`], so the
//! same controller drives the HTTP API, the terminal browser and tests.

pub mod config;
pub mod controller;
pub mod notify;
pub mod surface;

pub use config::ViewerConfig;
pub use controller::MapController;

use thiserror::Error;

/// Errors that can occur in the viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Reading the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`ViewerConfig`].
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The state is not one of the available options.
    #[error("Unknown state: {name}")]
    UnknownState {
        /// Requested state name.
        name: String,
    },

    /// The LGA is not one of the selected state's LGAs.
    #[error("Unknown LGA {name} in {state}")]
    UnknownLga {
        /// Requested LGA name.
        name: String,
        /// Currently selected state.
        state: String,
    },

    /// The ward is not one of the selected LGA's wards.
    #[error("Unknown ward {name} in {lga}")]
    UnknownWard {
        /// Requested ward name.
        name: String,
        /// Currently selected LGA.
        lga: String,
    },

    /// An LGA was selected before a state.
    #[error("Select a state before selecting an LGA")]
    NoStateSelected,

    /// A ward was selected before an LGA.
    #[error("Select an LGA before selecting a ward")]
    NoLgaSelected,
}
