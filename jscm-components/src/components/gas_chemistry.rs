//! Single gas chemistry
//!
//! CH4 and N2O concentrations are modelled as a single box with a fixed
//! atmospheric lifetime (IPCC TAR, chapter 4). Emissions in year $i-1$ raise the
//! concentration seen in year $i$:
//!
//! $$ C_i = C_{i-1} e^{-\lambda} + E_{i-1} \frac{1 - e^{-\lambda}}{\lambda s} $$
//!
//! where $\lambda = 1 / \tau$ and $s$ converts from Tg to ppb.

use jscm_core::emissions::Species;
use jscm_core::errors::{JSCMError, JSCMResult};
use jscm_core::timeseries::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Parameters for a single gas with a fixed lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasChemistryParameters {
    /// Atmospheric lifetime
    /// unit: yr
    pub lifetime: FloatValue,
    /// Mass of the gas per unit of concentration
    /// unit: Tg / ppb
    pub tg_per_ppb: FloatValue,
}

impl GasChemistryParameters {
    /// Methane: 10 year lifetime, 2.78 Tg CH4 / ppb
    pub fn ch4() -> Self {
        Self {
            lifetime: 10.0,
            tg_per_ppb: 2.78,
        }
    }

    /// Nitrous oxide: 114 year lifetime, 4.8 Tg N2O / ppb
    pub fn n2o() -> Self {
        Self {
            lifetime: 114.0,
            tg_per_ppb: 4.8,
        }
    }

    /// Fraction of the concentration remaining after one year
    pub fn decay(&self) -> FloatValue {
        (-1.0 / self.lifetime).exp()
    }

    /// Concentration (ppb) added in the following year per Tg of emissions
    pub fn accumulation(&self) -> FloatValue {
        let lambda = 1.0 / self.lifetime;
        (1.0 - self.decay()) / (lambda * self.tg_per_ppb)
    }

    fn validate(&self) -> JSCMResult<()> {
        if !(self.lifetime > 0.0 && self.lifetime.is_finite()) {
            return Err(JSCMError::Config(format!(
                "gas lifetime must be positive, got {}",
                self.lifetime
            )));
        }
        if !(self.tg_per_ppb > 0.0 && self.tg_per_ppb.is_finite()) {
            return Err(JSCMError::Config(format!(
                "Tg per ppb conversion must be positive, got {}",
                self.tg_per_ppb
            )));
        }
        Ok(())
    }
}

/// Emissions to concentration conversion for a gas with a fixed lifetime
///
/// Built through [`GasChemistry::from_parameters`] so the parameters are always
/// validated.
#[derive(Debug, Clone, Serialize)]
pub struct GasChemistry {
    species: Species,
    parameters: GasChemistryParameters,
}

impl GasChemistry {
    pub fn from_parameters(
        species: Species,
        parameters: GasChemistryParameters,
    ) -> JSCMResult<Self> {
        parameters.validate()?;
        Ok(Self {
            species,
            parameters,
        })
    }

    /// Methane with the default parameters
    pub fn ch4() -> Self {
        Self {
            species: Species::Ch4,
            parameters: GasChemistryParameters::ch4(),
        }
    }

    /// Nitrous oxide with the default parameters
    pub fn n2o() -> Self {
        Self {
            species: Species::N2o,
            parameters: GasChemistryParameters::n2o(),
        }
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn parameters(&self) -> &GasChemistryParameters {
        &self.parameters
    }

    /// Change in concentration (ppb) from annual emissions (Tg / yr)
    ///
    /// The first value is always zero.
    pub fn solve(&self, emissions: &[FloatValue]) -> Array1<FloatValue> {
        let decay = self.parameters.decay();
        let accumulation = self.parameters.accumulation();

        let mut result = Array1::zeros(emissions.len());
        for i in 1..emissions.len() {
            result[i] = result[i - 1] * decay + emissions[i - 1] * accumulation;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_emissions() {
        let result = GasChemistry::ch4().solve(&[0.0; 4]);
        assert_eq!(result.to_vec(), vec![0.0; 4]);
    }

    #[test]
    fn constant_ch4_matches_closed_form() {
        let result = GasChemistry::ch4().solve(&[2.78; 3]);

        let lambda: FloatValue = 0.1;
        let decay = (-lambda).exp();
        let step = 2.78 * (1.0 - decay) / (lambda * 2.78);

        assert_eq!(result[0], 0.0);
        assert_relative_eq!(result[1], step, epsilon = 1e-12);
        assert_relative_eq!(result[2], step * (1.0 + decay), epsilon = 1e-12);
        assert_relative_eq!(result[1], 0.9516258196404049, epsilon = 1e-12);
        assert_relative_eq!(result[2], 1.8126924692201827, epsilon = 1e-12);
    }

    #[test]
    fn n2o_decays_slowly() {
        let mut emissions = vec![0.0; 20];
        emissions[0] = 4.8;
        let result = GasChemistry::n2o().solve(&emissions);

        let decay = (-1.0 / 114.0 as FloatValue).exp();
        assert!(result[1] > 0.0);
        for i in 2..20 {
            assert_relative_eq!(result[i], result[i - 1] * decay, max_relative = 1e-12);
        }
    }

    #[test]
    fn last_year_emissions_are_unused() {
        let a = GasChemistry::ch4().solve(&[1.0, 2.0, 3.0]);
        let b = GasChemistry::ch4().solve(&[1.0, 2.0, 300.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input() {
        assert!(GasChemistry::n2o().solve(&[]).is_empty());
    }

    #[test]
    fn invalid_parameters() {
        let params = GasChemistryParameters {
            lifetime: 0.0,
            tg_per_ppb: 1.0,
        };
        assert!(GasChemistry::from_parameters(Species::Ch4, params).is_err());

        let params = GasChemistryParameters {
            lifetime: 10.0,
            tg_per_ppb: -1.0,
        };
        assert!(GasChemistry::from_parameters(Species::Ch4, params).is_err());
    }

    #[test]
    fn parameters_serialisation() {
        let params = GasChemistryParameters::n2o();
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"lifetime":114.0,"tg_per_ppb":4.8}"#);

        let parsed: GasChemistryParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, params);
    }
}
