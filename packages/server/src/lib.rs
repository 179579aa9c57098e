#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the ward map viewer.
//!
//! Serves the REST API for browsing the state, LGA and ward hierarchy,
//! free-text search, aggregate boundaries and fully rendered views, plus
//! the static front-end files. The ward dataset is loaded once at startup
//! and shared read-only across workers.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use thiserror::Error;
use ward_map_boundary::{BoundaryError, Dataset};
use ward_map_viewer::ViewerConfig;

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The ward dataset could not be loaded.
    #[error("Error loading map data: {0}")]
    Dataset(#[from] BoundaryError),

    /// Binding or running the HTTP server failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// The loaded ward dataset.
    pub dataset: Arc<Dataset>,
    /// Viewer configuration (initial view, search threshold).
    pub config: Arc<ViewerConfig>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/config", web::get().to(handlers::map_config))
            .route("/states", web::get().to(handlers::states))
            .route("/lgas", web::get().to(handlers::lgas))
            .route("/wards", web::get().to(handlers::wards))
            .route("/search", web::get().to(handlers::search))
            .route("/boundary", web::get().to(handlers::boundary))
            .route("/view", web::get().to(handlers::view)),
    );
}

/// Starts the ward map API server.
///
/// Loads the dataset named by `config`, precomputes the state outlines and
/// starts the Actix-Web HTTP server. The caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError::Dataset`] if the dataset cannot be loaded, or
/// [`ServerError::Io`] if the HTTP server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ViewerConfig) -> Result<(), ServerError> {
    let dataset = Dataset::load(&config.dataset.source())
        .await?
        .with_aggregation(config.map.aggregation);

    log::info!("Building state outlines ({})...", dataset.aggregation());
    let outlines = dataset.state_boundaries().len();
    log::info!("Built {outlines} state outlines");

    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;
    let static_dir = config.server.static_dir.clone();
    if !static_dir.is_dir() {
        log::warn!(
            "Static directory {} does not exist; only the API will be served",
            static_dir.display()
        );
    }

    let state = web::Data::new(AppState {
        dataset: Arc::new(dataset),
        config: Arc::new(config),
    });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure);

        // Serve frontend static files (production)
        if static_dir.is_dir() {
            app.service(Files::new("/", &static_dir).index_file("index.html"))
        } else {
            app
        }
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
