//! Run configuration
//!
//! [`RunConfig`] holds the scalars needed by the model itself. [`ConfigFile`]
//! extends it with the paths used by the command line runner and is read from TOML.

use crate::emissions::Emissions;
use crate::errors::{JSCMError, JSCMResult};
use crate::timeseries::{FloatValue, Year};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scalars which define a model run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// First simulated year
    pub start_year: Year,
    /// Last simulated year (inclusive)
    pub end_year: Year,
    /// Number of years over which the response functions are evaluated
    ///
    /// Must be at least the number of simulated years.
    pub sim_years: usize,
    /// Depth of the ocean mixed layer
    /// unit: m
    pub ocean_mixed_layer_depth: FloatValue,
}

impl RunConfig {
    /// Number of simulated years
    ///
    /// Only meaningful once the configuration has been validated.
    pub fn n_years(&self) -> usize {
        (self.end_year - self.start_year + 1).max(0) as usize
    }

    /// Check the configuration before any computation starts
    pub fn validate(&self) -> JSCMResult<()> {
        if self.end_year < self.start_year {
            return Err(JSCMError::Config(format!(
                "end_year ({}) must not be before start_year ({})",
                self.end_year, self.start_year
            )));
        }
        validate_depth(self.ocean_mixed_layer_depth)?;
        let n_years = self.n_years();
        if self.sim_years < n_years {
            return Err(JSCMError::Config(format!(
                "sim_years ({}) must cover all {} simulated years",
                self.sim_years, n_years
            )));
        }
        if self.sim_years > n_years {
            warn!(
                "Response functions evaluated over {} years but only {} years are simulated",
                self.sim_years, n_years
            );
        }
        Ok(())
    }

    /// Check that a set of emissions lines up with the simulated years
    pub fn validate_emissions(&self, emissions: &Emissions) -> JSCMResult<()> {
        if emissions.len() != self.n_years() {
            return Err(JSCMError::InputShape {
                expected: self.n_years(),
                found: emissions.len(),
            });
        }
        if emissions.start_year() != self.start_year {
            return Err(JSCMError::Config(format!(
                "emissions start in {} but the run starts in {}",
                emissions.start_year(),
                self.start_year
            )));
        }
        Ok(())
    }
}

/// Reject mixed-layer depths which would make the ocean response undefined
pub fn validate_depth(depth: FloatValue) -> JSCMResult<()> {
    if !(depth.is_finite() && depth > 0.0) {
        return Err(JSCMError::Config(format!(
            "ocean mixed layer depth must be positive, got {}",
            depth
        )));
    }
    Ok(())
}

/// Configuration file for the command line runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub run: RunConfig,
    /// Emissions table, see [`Emissions::from_table`]
    pub emissions_file: PathBuf,
    pub temperature_file: PathBuf,
    pub sea_level_file: PathBuf,
    #[serde(default)]
    pub forcing_file: Option<PathBuf>,
    #[serde(default)]
    pub co2_concentrations_file: Option<PathBuf>,
    #[serde(default)]
    pub ch4_concentrations_file: Option<PathBuf>,
    #[serde(default)]
    pub n2o_concentrations_file: Option<PathBuf>,
}

impl ConfigFile {
    /// Parse and validate a TOML configuration
    ///
    /// Relative paths are kept as written.
    pub fn from_toml(text: &str) -> JSCMResult<Self> {
        let config: ConfigFile = toml::from_str(text)?;
        config.run.validate()?;
        Ok(config)
    }

    /// Read a TOML configuration from disk
    ///
    /// Relative paths inside the file are resolved against the directory
    /// containing the configuration.
    pub fn from_path(path: impl AsRef<Path>) -> JSCMResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.emissions_file);
        resolve(&mut self.temperature_file);
        resolve(&mut self.sea_level_file);
        for p in [
            &mut self.forcing_file,
            &mut self.co2_concentrations_file,
            &mut self.ch4_concentrations_file,
            &mut self.n2o_concentrations_file,
        ]
        .into_iter()
        .flatten()
        {
            resolve(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emissions::Emissions;

    fn config() -> RunConfig {
        RunConfig {
            start_year: 1750,
            end_year: 1752,
            sim_years: 3,
            ocean_mixed_layer_depth: 75.0,
        }
    }

    #[test]
    fn valid_config() {
        config().validate().unwrap();
        assert_eq!(config().n_years(), 3);
    }

    #[test]
    fn rejects_inverted_years() {
        let mut c = config();
        c.end_year = 1749;
        assert!(matches!(c.validate(), Err(JSCMError::Config(_))));
    }

    #[test]
    fn rejects_bad_depth() {
        for depth in [0.0, -10.0, FloatValue::NAN] {
            let mut c = config();
            c.ocean_mixed_layer_depth = depth;
            assert!(matches!(c.validate(), Err(JSCMError::Config(_))));
        }
    }

    #[test]
    fn rejects_short_response_horizon() {
        let mut c = config();
        c.sim_years = 2;
        assert!(matches!(c.validate(), Err(JSCMError::Config(_))));

        c.sim_years = 10;
        c.validate().unwrap();
    }

    #[test]
    fn emissions_must_match_years() {
        let c = config();
        c.validate_emissions(&Emissions::zeros(1750, 1752)).unwrap();

        match c.validate_emissions(&Emissions::zeros(1750, 1753)) {
            Err(JSCMError::InputShape { expected, found }) => {
                assert_eq!(expected, 3);
                assert_eq!(found, 4);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn emissions_must_start_with_the_run() {
        // Same length, shifted by a year
        match config().validate_emissions(&Emissions::zeros(1751, 1753)) {
            Err(JSCMError::Config(message)) => assert!(message.contains("1751")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn parse_config_file() {
        let text = r#"
start_year = 1750
end_year = 2100
sim_years = 351
ocean_mixed_layer_depth = 75.0
emissions_file = "emissions.dat"
temperature_file = "out/temperature.txt"
sea_level_file = "out/sea_level.txt"
co2_concentrations_file = "out/co2.txt"
"#;
        let config = ConfigFile::from_toml(text).unwrap();
        assert_eq!(config.run.start_year, 1750);
        assert_eq!(config.run.n_years(), 351);
        assert_eq!(config.emissions_file, PathBuf::from("emissions.dat"));
        assert_eq!(
            config.co2_concentrations_file,
            Some(PathBuf::from("out/co2.txt"))
        );
        assert_eq!(config.ch4_concentrations_file, None);
    }

    #[test]
    fn invalid_config_file() {
        assert!(matches!(
            ConfigFile::from_toml("start_year = 1750"),
            Err(JSCMError::Toml(_))
        ));

        let text = r#"
start_year = 1750
end_year = 1760
sim_years = 11
ocean_mixed_layer_depth = 0.0
emissions_file = "e"
temperature_file = "t"
sea_level_file = "s"
"#;
        assert!(matches!(
            ConfigFile::from_toml(text),
            Err(JSCMError::Config(_))
        ));
    }

    #[test]
    fn relative_paths_are_resolved() {
        let mut config = ConfigFile::from_toml(
            r#"
start_year = 1750
end_year = 1760
sim_years = 11
ocean_mixed_layer_depth = 75.0
emissions_file = "e.dat"
temperature_file = "/abs/t.txt"
sea_level_file = "s.txt"
forcing_file = "rf.txt"
"#,
        )
        .unwrap();
        config.resolve_paths(Path::new("/data/run"));

        assert_eq!(config.emissions_file, PathBuf::from("/data/run/e.dat"));
        assert_eq!(config.temperature_file, PathBuf::from("/abs/t.txt"));
        assert_eq!(config.forcing_file, Some(PathBuf::from("/data/run/rf.txt")));
    }

    #[test]
    fn run_config_serialisation() {
        let json = serde_json::to_string(&config()).unwrap();
        let parsed: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config());
    }
}
