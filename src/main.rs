//! JSCM command line runner
//!
//! Reads a TOML configuration, runs the model over the configured emissions and
//! writes the results as plain text.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug jscm scenario.toml
//! ```

use clap::Parser;
use jscm::model::ModelBuilder;
use jscm::output::{
    write_concentrations, write_forcing, write_sea_level, write_temperature, write_to_path,
};
use jscm_core::config::ConfigFile;
use jscm_core::emissions::{Emissions, Species};
use jscm_core::errors::JSCMResult;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Simple climate model driven by annual emissions
#[derive(Parser, Debug)]
#[command(name = "jscm")]
#[command(about = "Run the simple climate model from a TOML configuration")]
struct Args {
    /// Path to the run configuration
    config: PathBuf,
}

fn run(args: &Args) -> JSCMResult<()> {
    let config = ConfigFile::from_path(&args.config)?;
    let emissions = Emissions::from_path(
        &config.emissions_file,
        config.run.start_year,
        config.run.end_year,
    )?;
    info!(
        "Loaded {} years of emissions from {}",
        emissions.len(),
        config.emissions_file.display()
    );

    let model = ModelBuilder::new()
        .with_config(config.run.clone())
        .with_emissions(emissions)
        .build()?;
    let output = model.run()?;

    write_to_path(&config.temperature_file, |w| write_temperature(w, &output))?;
    write_to_path(&config.sea_level_file, |w| write_sea_level(w, &output))?;
    if let Some(path) = &config.forcing_file {
        write_to_path(path, |w| write_forcing(w, &output))?;
    }
    for (species, path) in [
        (Species::Co2, &config.co2_concentrations_file),
        (Species::Ch4, &config.ch4_concentrations_file),
        (Species::N2o, &config.n2o_concentrations_file),
    ] {
        if let Some(path) = path {
            write_to_path(path, |w| write_concentrations(w, species, &output))?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
