//! Climate response components
//!
//! Global mean surface temperature and sea-level change are both computed by
//! convolving a driver with an impulse response function. Temperature responds to
//! radiative forcing, sea level (thermal expansion only) responds to temperature.

use jscm_core::errors::{JSCMError, JSCMResult};
use jscm_core::response::{convolve, sea_level_response, temperature_response, ResponseKernel};
use jscm_core::timeseries::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

fn check_horizon(sim_years: usize, n_years: usize) -> JSCMResult<()> {
    if sim_years < n_years {
        return Err(JSCMError::Config(format!(
            "response functions evaluated over {} years cannot cover {} years",
            sim_years, n_years
        )));
    }
    Ok(())
}

/// Parameters for the temperature response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureResponseParameters {
    /// Scaling applied to the convolved forcing
    ///
    /// The equilibrium warming for a doubling of CO2 relative to the HadCM3 fit
    /// (4.114 / 3.74).
    /// unit: K
    /// default: 1.1
    pub climate_sensitivity: FloatValue,
}

impl Default for TemperatureResponseParameters {
    fn default() -> Self {
        Self {
            climate_sensitivity: 1.1,
        }
    }
}

/// Temperature change from radiative forcing
///
/// $$ \Delta T_j = S \sum_{i \le j} RF_i R_T(j - i) $$
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureResponse {
    parameters: TemperatureResponseParameters,
}

impl TemperatureResponse {
    pub fn from_parameters(parameters: TemperatureResponseParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &TemperatureResponseParameters {
        &self.parameters
    }

    /// Temperature change (K) from annual forcing (W / m^2)
    pub fn solve(&self, forcing: &[FloatValue], sim_years: usize) -> JSCMResult<Array1<FloatValue>> {
        check_horizon(sim_years, forcing.len())?;
        self.solve_with_kernel(forcing, &temperature_response(sim_years))
    }

    /// Temperature change using a precomputed kernel
    ///
    /// Fails when the kernel is shorter than `forcing`.
    pub fn solve_with_kernel(
        &self,
        forcing: &[FloatValue],
        kernel: &ResponseKernel,
    ) -> JSCMResult<Array1<FloatValue>> {
        Ok(convolve(forcing, kernel)? * self.parameters.climate_sensitivity)
    }
}

/// Sea-level change from temperature change
///
/// $$ \Delta SL_j = \sum_{i \le j} \Delta T_i R_{SL}(j - i) $$
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeaLevelResponse;

impl SeaLevelResponse {
    /// Sea-level change (cm) from annual temperature change (K)
    pub fn solve(
        &self,
        temperature: &[FloatValue],
        sim_years: usize,
    ) -> JSCMResult<Array1<FloatValue>> {
        check_horizon(sim_years, temperature.len())?;
        self.solve_with_kernel(temperature, &sea_level_response(sim_years))
    }

    pub fn solve_with_kernel(
        &self,
        temperature: &[FloatValue],
        kernel: &ResponseKernel,
    ) -> JSCMResult<Array1<FloatValue>> {
        convolve(temperature, kernel)
    }
}
