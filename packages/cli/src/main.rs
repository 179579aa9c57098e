#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line browser and tools for the ward map.
//!
//! With no subcommand it starts the interactive browser, which walks the
//! state, LGA and ward hierarchy with cascading prompts. The subcommands
//! list and filter the hierarchy, run free-text searches, write aggregate
//! outlines as `GeoJSON` and start the API server.
//!
//! Uses `indicatif-log-bridge` (via [`ward_map_cli_utils::init_logger`])
//! so that log lines and the loading spinner never fight for the terminal.

mod interactive;
mod terminal;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ward_map_boundary::filter::{
    Filterable, filter_lgas, filter_states, lgas_by_state, wards_by_lga, wards_by_state,
};
use ward_map_boundary::hierarchy::sort_by_name;
use ward_map_boundary::{BoundaryError, Dataset};
use ward_map_boundary_models::{Aggregation, Criteria, LgaField, StateField, WardFeature, WardField};
use ward_map_cli_utils::MultiProgress;
use ward_map_viewer::ViewerConfig;

#[derive(Parser)]
#[command(name = "ward_map_cli", about = "Nigeria ward map browser")]
struct Cli {
    /// Config file (defaults to `WARD_MAP_CONFIG`, then `ward_map.toml`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Dataset path or URL (overrides the config file and `DATASET`)
    #[arg(long, global = true)]
    dataset: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List states, sorted by name
    States {
        /// Substring filter as `field=value` (fields: name, code)
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// List LGAs, sorted by name
    Lgas {
        /// Only LGAs of this state (exact name)
        #[arg(long)]
        state: Option<String>,
        /// Substring filter as `field=value` (fields: name, code, statename)
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// List wards in dataset order
    Wards {
        /// Only wards of this state (exact name)
        #[arg(long)]
        state: Option<String>,
        /// Only wards of this LGA (exact name, requires `--state`)
        #[arg(long, requires = "state")]
        lga: Option<String>,
        /// Substring filter as `field=value` (fields: wardname, wardcode,
        /// lganame, lgacode, statename, statecode)
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Search state, LGA and ward names at once
    Search {
        /// Search text
        query: String,
    },
    /// Write the aggregate outline of a state or LGA as `GeoJSON`
    Merge {
        /// State name
        #[arg(long)]
        state: String,
        /// LGA name within the state
        #[arg(long)]
        lga: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Dissolve shared ward edges instead of stacking polygons
        #[arg(long)]
        dissolve: bool,
    },
    /// Start the API server
    Serve {
        /// Address to bind (overrides config and `BIND_ADDR`)
        #[arg(long)]
        bind_addr: Option<String>,
        /// Port to bind (overrides config and `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Browse the map interactively
    Interactive,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = ward_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = ViewerConfig::load(cli.config.as_deref())?;
    if let Some(dataset) = cli.dataset {
        config.dataset.source = dataset;
    }

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::States { filters } => {
            let criteria = parse_filters::<StateField>(&filters)?;
            let dataset = load_or_exit(&multi, &config).await;
            let mut states = filter_states(dataset.features(), &criteria);
            sort_by_name(&mut states, |s| s.name.as_str());

            println!("{:<8} NAME", "CODE");
            println!("{}", "-".repeat(40));
            for state in &states {
                println!("{:<8} {}", state.code, state.name);
            }
        }
        Commands::Lgas { state, filters } => {
            let criteria = parse_filters::<LgaField>(&filters)?;
            let dataset = load_or_exit(&multi, &config).await;
            let mut lgas = match state {
                Some(state) => lgas_by_state(dataset.features(), &state)
                    .into_iter()
                    .filter(|lga| lga.matches(&criteria))
                    .collect(),
                None => filter_lgas(dataset.features(), &criteria),
            };
            sort_by_name(&mut lgas, |l| l.name.as_str());

            println!("{:<10} {:<30} STATE", "CODE", "NAME");
            println!("{}", "-".repeat(60));
            for lga in &lgas {
                println!(
                    "{:<10} {:<30} {}",
                    lga.code,
                    lga.name,
                    lga.state_name.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Wards {
            state,
            lga,
            filters,
        } => {
            let criteria = parse_filters::<WardField>(&filters)?;
            let dataset = load_or_exit(&multi, &config).await;
            let features = dataset.features();
            let scoped: Vec<&WardFeature> = match (state.as_deref(), lga.as_deref()) {
                (Some(state), Some(lga)) => wards_by_lga(features, lga, state),
                (Some(state), None) => wards_by_state(features, state),
                (None, _) => features.iter().collect(),
            };

            println!("{:<30} {:<25} STATE", "WARD", "LGA");
            println!("{}", "-".repeat(75));
            let mut count = 0;
            for ward in scoped.into_iter().filter(|w| w.matches(&criteria)) {
                let props = &ward.properties;
                println!(
                    "{:<30} {:<25} {}",
                    props.wardname.as_deref().unwrap_or("-"),
                    props.lganame.as_deref().unwrap_or("-"),
                    props.statename.as_deref().unwrap_or("-")
                );
                count += 1;
            }
            println!();
            println!("{count} wards");
        }
        Commands::Search { query } => {
            let dataset = load_or_exit(&multi, &config).await;
            let results = ward_map_boundary::search::search(dataset.features(), &query);
            if results.is_empty() {
                println!("No matching results");
                return Ok(());
            }

            for state in &results.states {
                println!("State  {}", state.name);
            }
            for lga in &results.lgas {
                println!(
                    "LGA    {} ({})",
                    lga.name,
                    lga.state_name.as_deref().unwrap_or("-")
                );
            }
            for ward in &results.wards {
                println!(
                    "Ward   {} ({}, {})",
                    ward.properties.wardname.as_deref().unwrap_or("-"),
                    ward.properties.lganame.as_deref().unwrap_or("-"),
                    ward.properties.statename.as_deref().unwrap_or("-")
                );
            }
            println!();
            println!("{} wards highlighted", results.features.len());
        }
        Commands::Merge {
            state,
            lga,
            output,
            dissolve,
        } => {
            if dissolve {
                config.map.aggregation = Aggregation::Dissolve;
            }
            let dataset = load_or_exit(&multi, &config).await;
            let boundary = match &lga {
                Some(lga) => dataset.lga_boundary(lga, &state),
                None => dataset.state_boundary(&state),
            };
            let Some(boundary) = boundary else {
                let name = lga.map_or_else(|| state.clone(), |lga| format!("{lga}, {state}"));
                return Err(format!("No wards found for {name}").into());
            };

            let json = serde_json::to_string_pretty(&boundary.to_feature())?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    log::info!(
                        "Wrote {} outline of {} to {}",
                        dataset.aggregation(),
                        boundary.name,
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }
        Commands::Serve { bind_addr, port } => {
            if let Some(bind_addr) = bind_addr {
                config.server.bind_addr = bind_addr;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, false).await?;
        }
        Commands::Interactive => interactive::run(&multi, config).await?,
    }

    Ok(())
}

/// Runs the server on its own actix system.
///
/// The server uses actix-web's runtime, so it runs in a blocking task to
/// avoid nesting tokio runtimes.
async fn serve(config: ViewerConfig, prompt: bool) -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if prompt {
                ward_map_server::interactive::run(config).await
            } else {
                ward_map_server::run_server(config).await
            }
        })
    })
    .await??;
    Ok(())
}

/// Loads the dataset or exits the process with a reload hint.
async fn load_or_exit(multi: &MultiProgress, config: &ViewerConfig) -> Arc<Dataset> {
    match ward_map_cli_utils::load_dataset(multi, config).await {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Error loading map data: {e}");
            eprintln!(
                "Check the dataset path or URL ({}) and run the command again.",
                config.dataset.source
            );
            std::process::exit(1);
        }
    }
}

/// Parses `field=value` arguments into criteria.
fn parse_filters<F>(filters: &[String]) -> Result<Criteria<F>, Box<dyn std::error::Error>>
where
    F: FromStr<Err = strum::ParseError>,
{
    let pairs = filters
        .iter()
        .map(|filter| {
            filter
                .split_once('=')
                .ok_or_else(|| format!("Filter must be field=value: {filter}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let criteria = Criteria::parse(pairs).map_err(BoundaryError::from)?;
    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_into_criteria() {
        let criteria =
            parse_filters::<WardField>(&["name=ik".to_string(), "statename=lag".to_string()])
                .unwrap();
        assert_eq!(
            criteria,
            Criteria::new()
                .with(WardField::WardName, "ik")
                .with(WardField::StateName, "lag")
        );
    }

    #[test]
    fn malformed_and_unknown_filters_fail() {
        assert!(parse_filters::<StateField>(&["name".to_string()]).is_err());

        let err = parse_filters::<StateField>(&["population=5".to_string()]).unwrap_err();
        assert!(err.to_string().starts_with("Unknown filter field"));
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["ward_map_cli", "--dataset", "wards.geojson"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.dataset.as_deref(), Some("wards.geojson"));

        let cli = Cli::try_parse_from([
            "ward_map_cli",
            "merge",
            "--state",
            "Lagos",
            "--lga",
            "Ikeja",
            "--dissolve",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Merge { dissolve: true, .. })
        ));
    }

    #[test]
    fn lga_filter_requires_state() {
        assert!(Cli::try_parse_from(["ward_map_cli", "wards", "--lga", "Ikeja"]).is_err());
    }
}
