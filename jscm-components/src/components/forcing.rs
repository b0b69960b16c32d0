//! Radiative forcing component
//!
//! Total radiative forcing from changes in CO2, CH4 and N2O concentrations and
//! sulphate aerosol emissions, using the simplified expressions of IPCC TAR
//! chapter 6 (table 6.2).
//!
//! CH4 and N2O absorb in overlapping bands, so an increase in one gas reduces the
//! effective absorption of the other. The overlap term $f(M, N)$ is evaluated at the
//! perturbed and at the pre-industrial concentrations and the difference removed
//! from each gas's forcing.

use crate::constants::{CH4_PI, CO2_PI, N2O_PI};
use jscm_core::errors::{JSCMError, JSCMResult};
use jscm_core::timeseries::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Parameters for the radiative forcing calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiativeForcingParameters {
    /// Pre-industrial CO2 concentration
    /// unit: ppm
    pub co2_pi: FloatValue,
    /// Pre-industrial CH4 concentration
    /// unit: ppb
    pub ch4_pi: FloatValue,
    /// Pre-industrial N2O concentration
    /// unit: ppb
    pub n2o_pi: FloatValue,
    /// CO2 forcing scale
    /// unit: W / m^2
    /// default: 5.35
    pub co2_scale: FloatValue,
    /// CH4 forcing scale
    /// unit: W / m^2 / ppb^0.5
    /// default: 0.036
    pub ch4_scale: FloatValue,
    /// N2O forcing scale
    /// unit: W / m^2 / ppb^0.5
    /// default: 0.12
    pub n2o_scale: FloatValue,
    /// Direct aerosol forcing per unit of SOx emissions
    /// unit: W / m^2 / (Tg S / yr)
    /// default: -0.002265226
    pub aerosol_direct_factor: FloatValue,
    /// Indirect (cloud albedo) aerosol forcing per unit of SOx emissions
    /// unit: W / m^2 / (Tg S / yr)
    /// default: -0.013558119
    pub aerosol_indirect_factor: FloatValue,
}

impl Default for RadiativeForcingParameters {
    fn default() -> Self {
        Self {
            co2_pi: CO2_PI,
            ch4_pi: CH4_PI,
            n2o_pi: N2O_PI,
            co2_scale: 5.35,
            ch4_scale: 0.036,
            n2o_scale: 0.12,
            aerosol_direct_factor: -0.002265226,
            aerosol_indirect_factor: -0.013558119,
        }
    }
}

/// Radiative forcing for each driver along with the total
///
/// unit: W / m^2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcingBreakdown {
    pub co2: Array1<FloatValue>,
    pub ch4: Array1<FloatValue>,
    pub n2o: Array1<FloatValue>,
    pub sox: Array1<FloatValue>,
    pub total: Array1<FloatValue>,
}

/// CH4/N2O absorption band overlap
///
/// $$ f(M, N) = 0.47 \ln\left(1 + 2.01 \times 10^{-5} (MN)^{0.75} + 5.31 \times 10^{-15} M (MN)^{1.52}\right) $$
///
/// `m` is the CH4 concentration and `n` the N2O concentration, both in ppb.
pub fn overlap(m: FloatValue, n: FloatValue) -> FloatValue {
    let mn = m * n;
    0.47 * (1.0 + 2.01e-5 * mn.powf(0.75) + 5.31e-15 * m * mn.powf(1.52)).ln()
}

/// Radiative forcing from greenhouse gas concentrations and SOx emissions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadiativeForcing {
    parameters: RadiativeForcingParameters,
}

impl RadiativeForcing {
    pub fn from_parameters(parameters: RadiativeForcingParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &RadiativeForcingParameters {
        &self.parameters
    }

    /// CO2 forcing from a concentration anomaly (ppm)
    ///
    /// $$ RF = 5.35 \ln(1 + \Delta C / C_0) $$
    pub fn co2_forcing(&self, delta_co2: FloatValue, index: usize) -> JSCMResult<FloatValue> {
        let ratio = 1.0 + delta_co2 / self.parameters.co2_pi;
        if !(ratio > 0.0) {
            return Err(JSCMError::domain("CO2 forcing", index, delta_co2));
        }
        Ok(self.parameters.co2_scale * ratio.ln())
    }

    /// CH4 forcing from a concentration anomaly (ppb), including the N2O overlap
    pub fn ch4_forcing(&self, delta_ch4: FloatValue, index: usize) -> JSCMResult<FloatValue> {
        let p = &self.parameters;
        let ch4 = p.ch4_pi + delta_ch4;
        if !(ch4 >= 0.0) {
            return Err(JSCMError::domain("CH4 forcing", index, delta_ch4));
        }
        let f_now = overlap(ch4, p.n2o_pi);
        let f_then = overlap(p.ch4_pi, p.n2o_pi);
        check_finite(
            p.ch4_scale * (ch4.sqrt() - p.ch4_pi.sqrt()) - (f_now - f_then),
            "CH4 forcing",
            index,
        )
    }

    /// N2O forcing from a concentration anomaly (ppb), including the CH4 overlap
    pub fn n2o_forcing(&self, delta_n2o: FloatValue, index: usize) -> JSCMResult<FloatValue> {
        let p = &self.parameters;
        let n2o = p.n2o_pi + delta_n2o;
        if !(n2o >= 0.0) {
            return Err(JSCMError::domain("N2O forcing", index, delta_n2o));
        }
        let f_now = overlap(p.ch4_pi, n2o);
        let f_then = overlap(p.ch4_pi, p.n2o_pi);
        check_finite(
            p.n2o_scale * (n2o.sqrt() - p.n2o_pi.sqrt()) - (f_now - f_then),
            "N2O forcing",
            index,
        )
    }

    /// Combined direct and indirect aerosol forcing from SOx emissions (Tg S / yr)
    pub fn sox_forcing(&self, sox_emissions: FloatValue) -> FloatValue {
        (self.parameters.aerosol_direct_factor + self.parameters.aerosol_indirect_factor)
            * sox_emissions
    }

    /// Forcing from each driver for every year
    ///
    /// All inputs must have the same length.
    pub fn solve(
        &self,
        sox_emissions: &[FloatValue],
        co2: &[FloatValue],
        ch4: &[FloatValue],
        n2o: &[FloatValue],
    ) -> JSCMResult<ForcingBreakdown> {
        let n_years = sox_emissions.len();
        for series in [co2, ch4, n2o] {
            if series.len() != n_years {
                return Err(JSCMError::InputShape {
                    expected: n_years,
                    found: series.len(),
                });
            }
        }

        let mut breakdown = ForcingBreakdown {
            co2: Array1::zeros(n_years),
            ch4: Array1::zeros(n_years),
            n2o: Array1::zeros(n_years),
            sox: Array1::zeros(n_years),
            total: Array1::zeros(n_years),
        };
        for i in 0..n_years {
            breakdown.co2[i] = self.co2_forcing(co2[i], i)?;
            breakdown.ch4[i] = self.ch4_forcing(ch4[i], i)?;
            breakdown.n2o[i] = self.n2o_forcing(n2o[i], i)?;
            breakdown.sox[i] = self.sox_forcing(sox_emissions[i]);
            breakdown.total[i] =
                breakdown.co2[i] + breakdown.ch4[i] + breakdown.n2o[i] + breakdown.sox[i];
        }
        Ok(breakdown)
    }
}

fn check_finite(value: FloatValue, quantity: &str, index: usize) -> JSCMResult<FloatValue> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(JSCMError::domain(quantity, index, value))
    }
}
