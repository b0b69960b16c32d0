//! A model couples the components into the full emissions to sea-level chain.
//!
//! The components are solved in a fixed order, each one over the whole run before
//! the next begins:
//!
//! 1. carbon cycle (CO2), CH4 and N2O chemistry
//! 2. radiative forcing from the three concentrations and SOx emissions
//! 3. temperature response to forcing
//! 4. sea-level response to temperature
//!
//! All inputs are validated when the model is built so a run either completes or
//! fails with a single error.

use jscm_components::components::{
    CarbonCycle, CarbonCycleOutput, CarbonCycleParameters, ForcingBreakdown, GasChemistry,
    GasChemistryParameters, RadiativeForcing, RadiativeForcingParameters, SeaLevelResponse,
    TemperatureResponse, TemperatureResponseParameters,
};
use jscm_components::constants::{CH4_PI, CO2_PI, N2O_PI};
use jscm_core::config::RunConfig;
use jscm_core::emissions::{Emissions, Species};
use jscm_core::errors::{JSCMError, JSCMResult};
use jscm_core::response::{sea_level_response, temperature_response};
use jscm_core::timeseries::{FloatValue, Timeseries};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Build a new model from a run configuration and emissions.
///
/// Component parameters default to the published values and can be overridden.
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    config: Option<RunConfig>,
    emissions: Option<Emissions>,
    carbon_cycle: CarbonCycleParameters,
    ch4: Option<GasChemistryParameters>,
    n2o: Option<GasChemistryParameters>,
    forcing: RadiativeForcingParameters,
    temperature: TemperatureResponseParameters,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the years, response horizon and mixed-layer depth of the run.
    pub fn with_config(&mut self, config: RunConfig) -> &mut Self {
        self.config = Some(config);
        self
    }

    /// Supply the emissions driving the run.
    ///
    /// The emissions must cover exactly the configured years.
    pub fn with_emissions(&mut self, emissions: Emissions) -> &mut Self {
        self.emissions = Some(emissions);
        self
    }

    pub fn with_carbon_cycle_parameters(&mut self, parameters: CarbonCycleParameters) -> &mut Self {
        self.carbon_cycle = parameters;
        self
    }

    pub fn with_ch4_parameters(&mut self, parameters: GasChemistryParameters) -> &mut Self {
        self.ch4 = Some(parameters);
        self
    }

    pub fn with_n2o_parameters(&mut self, parameters: GasChemistryParameters) -> &mut Self {
        self.n2o = Some(parameters);
        self
    }

    pub fn with_forcing_parameters(&mut self, parameters: RadiativeForcingParameters) -> &mut Self {
        self.forcing = parameters;
        self
    }

    pub fn with_temperature_parameters(
        &mut self,
        parameters: TemperatureResponseParameters,
    ) -> &mut Self {
        self.temperature = parameters;
        self
    }

    /// Validate the inputs and build the model.
    pub fn build(&self) -> JSCMResult<Model> {
        let config = self
            .config
            .clone()
            .ok_or_else(|| JSCMError::Config("no run configuration provided".to_string()))?;
        config.validate()?;

        let emissions = self
            .emissions
            .clone()
            .ok_or_else(|| JSCMError::Config("no emissions provided".to_string()))?;
        config.validate_emissions(&emissions)?;

        let ch4 = match &self.ch4 {
            Some(parameters) => GasChemistry::from_parameters(Species::Ch4, parameters.clone())?,
            None => GasChemistry::ch4(),
        };
        let n2o = match &self.n2o {
            Some(parameters) => GasChemistry::from_parameters(Species::N2o, parameters.clone())?,
            None => GasChemistry::n2o(),
        };

        Ok(Model {
            config,
            emissions,
            carbon_cycle: CarbonCycle::from_parameters(self.carbon_cycle.clone()),
            ch4,
            n2o,
            forcing: RadiativeForcing::from_parameters(self.forcing.clone()),
            temperature: TemperatureResponse::from_parameters(self.temperature.clone()),
            sea_level: SeaLevelResponse,
        })
    }
}

/// Concentrations of the three greenhouse gases as anomalies from pre-industrial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concentrations {
    /// unit: ppm
    pub co2: Timeseries,
    /// unit: ppb
    pub ch4: Timeseries,
    /// unit: ppb
    pub n2o: Timeseries,
}

/// Results of a model run
///
/// Every series covers `[start_year, end_year]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub concentrations: Concentrations,
    /// Total radiative forcing
    /// unit: W / m^2
    pub forcing: Timeseries,
    /// Forcing from each driver
    pub forcing_breakdown: ForcingBreakdown,
    /// Global mean surface temperature change
    /// unit: K
    pub temperature: Timeseries,
    /// Sea-level change from thermal expansion
    /// unit: cm
    pub sea_level: Timeseries,
    /// Carbon cycle fluxes and reservoir changes
    pub carbon_cycle: CarbonCycleOutput,
}

impl ModelOutput {
    /// Concentration anomaly of a greenhouse gas
    ///
    /// SOx is emitted but has no concentration in the model.
    pub fn concentration(&self, species: Species) -> Option<&Timeseries> {
        match species {
            Species::Co2 => Some(&self.concentrations.co2),
            Species::Ch4 => Some(&self.concentrations.ch4),
            Species::N2o => Some(&self.concentrations.n2o),
            Species::Sox => None,
        }
    }

    /// Concentration including the pre-industrial baseline
    pub fn absolute_concentration(&self, species: Species) -> Option<Timeseries> {
        self.concentration(species)
            .zip(baseline_concentration(species))
            .map(|(anomaly, baseline)| anomaly.offset(baseline))
    }
}

/// Pre-industrial concentration of a greenhouse gas (ppm for CO2, ppb otherwise)
pub fn baseline_concentration(species: Species) -> Option<FloatValue> {
    match species {
        Species::Co2 => Some(CO2_PI),
        Species::Ch4 => Some(CH4_PI),
        Species::N2o => Some(N2O_PI),
        Species::Sox => None,
    }
}

/// Unit of the concentration of a greenhouse gas
pub fn concentration_unit(species: Species) -> Option<&'static str> {
    match species {
        Species::Co2 => Some("ppm"),
        Species::Ch4 | Species::N2o => Some("ppb"),
        Species::Sox => None,
    }
}

/// A validated set of components and inputs ready to run
///
/// Only [`ModelBuilder::build`] creates a model, so it is serialisable but not
/// deserialisable.
#[derive(Debug, Clone, Serialize)]
pub struct Model {
    config: RunConfig,
    emissions: Emissions,
    carbon_cycle: CarbonCycle,
    ch4: GasChemistry,
    n2o: GasChemistry,
    forcing: RadiativeForcing,
    temperature: TemperatureResponse,
    sea_level: SeaLevelResponse,
}

impl Model {
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn emissions(&self) -> &Emissions {
        &self.emissions
    }

    fn series(&self, values: ndarray::Array1<FloatValue>) -> Timeseries {
        Timeseries::new(self.config.start_year, values)
    }

    fn solve_forcing(&self) -> JSCMResult<(Concentrations, CarbonCycleOutput, ForcingBreakdown)> {
        let sim_years = self.config.sim_years;

        let carbon_cycle = self.carbon_cycle.solve(
            &self.emissions.species(Species::Co2),
            sim_years,
            self.config.ocean_mixed_layer_depth,
        )?;
        let ch4 = self.ch4.solve(&self.emissions.species(Species::Ch4));
        let n2o = self.n2o.solve(&self.emissions.species(Species::N2o));
        debug!("Solved concentrations");

        let concentrations = Concentrations {
            co2: self.series(carbon_cycle.concentration.clone()),
            ch4: self.series(ch4),
            n2o: self.series(n2o),
        };
        let breakdown = self.forcing.solve(
            &self.emissions.species(Species::Sox),
            concentrations.co2.as_slice(),
            concentrations.ch4.as_slice(),
            concentrations.n2o.as_slice(),
        )?;
        debug!("Solved radiative forcing");

        Ok((concentrations, carbon_cycle, breakdown))
    }

    /// Run the model and return only the total radiative forcing
    pub fn run_forcing_only(&self) -> JSCMResult<Timeseries> {
        let (_, _, breakdown) = self.solve_forcing()?;
        Ok(self.series(breakdown.total))
    }

    /// Run the full model
    pub fn run(&self) -> JSCMResult<ModelOutput> {
        info!(
            "Running model for {}-{} ({} year response horizon, {} m mixed layer)",
            self.config.start_year,
            self.config.end_year,
            self.config.sim_years,
            self.config.ocean_mixed_layer_depth
        );
        let (concentrations, carbon_cycle, breakdown) = self.solve_forcing()?;

        let sim_years = self.config.sim_years;
        let forcing = self.series(breakdown.total.clone());
        let temperature = self.series(
            self.temperature
                .solve_with_kernel(forcing.as_slice(), &temperature_response(sim_years))?,
        );
        let sea_level = self.series(
            self.sea_level
                .solve_with_kernel(temperature.as_slice(), &sea_level_response(sim_years))?,
        );
        debug!("Solved climate response");

        info!(
            "Finished: temperature change {:?} K, sea-level change {:?} in {}",
            temperature.at_year(self.config.end_year),
            sea_level.at_year(self.config.end_year),
            self.config.end_year
        );

        Ok(ModelOutput {
            concentrations,
            forcing,
            forcing_breakdown: breakdown,
            temperature,
            sea_level,
            carbon_cycle,
        })
    }
}
