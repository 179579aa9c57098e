#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the ward map viewer.
//!
//! Reads `ward_map.toml` (or the file named by `WARD_MAP_CONFIG`), applies
//! the `DATASET`, `BIND_ADDR` and `PORT` overrides and serves the API.

use ward_map_viewer::ViewerConfig;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ViewerConfig::load(None)?;

    if let Err(e) = ward_map_server::run_server(config).await {
        log::error!("{e}");
        return Err(e.into());
    }

    Ok(())
}
