//! Carbon cycle component
//!
//! Converts CO2 emissions into atmospheric CO2 concentrations following
//! Joos et al. (1996). The atmosphere exchanges carbon with two reservoirs:
//!
//! - the ocean mixed layer, through an air-sea flux driven by the difference between
//!   atmospheric and sea-water pCO2
//! - the terrestrial biosphere, through CO2 fertilisation of plant growth which is
//!   returned to the atmosphere as the extra biomass decays
//!
//! Both reservoirs respond to past fluxes through impulse response functions. Each
//! year's flux commits a contribution to every later year, which is tracked in two
//! ledgers indexed by absolute year.

use crate::constants::{CO2_PI, PGC_PER_PPM};
use jscm_core::errors::{JSCMError, JSCMResult};
use jscm_core::response::{biosphere_response, ocean_response, ResponseKernel};
use jscm_core::timeseries::FloatValue;
use log::debug;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Parameters for the carbon cycle component
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonCycleParameters {
    /// Air-sea gas exchange coefficient
    /// unit: 1 / yr
    /// default: 0.1042
    pub gas_exchange_coefficient: FloatValue,

    /// Pre-industrial net primary production
    /// unit: PgC / yr
    /// default: 60.0
    pub npp_pi: FloatValue,

    /// CO2 fertilisation factor (beta)
    ///
    /// 0.287 balances land-use emissions of 1.1 PgC/yr in the 1980s (Joos et al. 1996),
    /// 0.380 balances 1.6 PgC/yr (IPCC 1994).
    /// default: 0.287
    pub co2_fertilisation_factor: FloatValue,

    /// Pre-industrial atmospheric CO2 concentration
    /// unit: ppm
    /// default: 278.305
    pub co2_pi: FloatValue,

    /// Effective ocean temperature for carbonate chemistry
    /// unit: degC
    /// default: 18.1716
    pub ocean_temperature: FloatValue,
}

impl Default for CarbonCycleParameters {
    fn default() -> Self {
        Self {
            gas_exchange_coefficient: 0.1042,
            npp_pi: 60.0,
            co2_fertilisation_factor: 0.287,
            co2_pi: CO2_PI,
            ocean_temperature: 18.1716,
        }
    }
}

impl CarbonCycleParameters {
    /// Coefficients A1..A5 of the DIC polynomial (Joos et al. 1996, pg. 402)
    pub fn carbonate_coefficients(&self) -> [FloatValue; 5] {
        let tc = self.ocean_temperature;
        [
            1.5568 - 1.3993e-2 * tc,
            (7.4706 - 0.20207 * tc) * 1e-3,
            -(1.2748 - 0.12015 * tc) * 1e-5,
            (2.4491 - 0.12639 * tc) * 1e-7,
            -(1.5468 - 0.15326 * tc) * 1e-10,
        ]
    }

    /// Change in sea-water pCO2 from a change in surface DIC
    ///
    /// $$ \Delta pCO_2 = \Delta DIC (A_1 + \Delta DIC (A_2 + \Delta DIC (A_3 + \Delta DIC (A_4 + \Delta DIC A_5)))) $$
    ///
    /// `delta_dic` in micromol / kg, result in ppm.
    pub fn delta_pco2_from_dic(&self, delta_dic: FloatValue) -> FloatValue {
        let [a1, a2, a3, a4, a5] = self.carbonate_coefficients();
        delta_dic * (a1 + delta_dic * (a2 + delta_dic * (a3 + delta_dic * (a4 + delta_dic * a5))))
    }
}

/// Running state of a carbon cycle integration
///
/// `surface_ocean_dic` and `atmos_bio_flux` are commitment ledgers: entry `j`
/// accumulates the contributions of every earlier year to year `j`.
#[derive(Debug, Clone)]
struct CarbonCycleState {
    /// Cumulative CO2 fertilisation offset
    /// unit: ppm
    x_atmos_bio: FloatValue,
    atmos_co2: Array1<FloatValue>,
    atmos_bio_flux: Array1<FloatValue>,
    surface_ocean_dic: Array1<FloatValue>,
    sea_water_pco2: Array1<FloatValue>,
    air_sea_flux: Array1<FloatValue>,
}

impl CarbonCycleState {
    fn new(n_years: usize) -> Self {
        Self {
            x_atmos_bio: 0.0,
            atmos_co2: Array1::zeros(n_years),
            atmos_bio_flux: Array1::zeros(n_years),
            surface_ocean_dic: Array1::zeros(n_years),
            sea_water_pco2: Array1::zeros(n_years),
            air_sea_flux: Array1::zeros(n_years),
        }
    }
}

/// Results of a carbon cycle integration
///
/// All series have one value per simulated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonCycleOutput {
    /// Change in atmospheric CO2 from pre-industrial
    /// unit: ppm
    pub concentration: Array1<FloatValue>,
    /// Flux from the atmosphere into the ocean mixed layer
    /// unit: ppm / yr
    pub air_sea_flux: Array1<FloatValue>,
    /// Net flux from the atmosphere into the biosphere
    /// unit: ppm / yr
    pub atmos_bio_flux: Array1<FloatValue>,
    /// Change in surface ocean dissolved inorganic carbon
    /// unit: micromol / kg
    pub surface_ocean_dic: Array1<FloatValue>,
    /// Change in sea-water pCO2
    /// unit: ppm
    pub sea_water_pco2: Array1<FloatValue>,
}

impl From<CarbonCycleState> for CarbonCycleOutput {
    fn from(state: CarbonCycleState) -> Self {
        Self {
            concentration: state.atmos_co2,
            air_sea_flux: state.air_sea_flux,
            atmos_bio_flux: state.atmos_bio_flux,
            surface_ocean_dic: state.surface_ocean_dic,
            sea_water_pco2: state.sea_water_pco2,
        }
    }
}

/// Emissions-driven CO2 carbon cycle
///
/// For each year $i$:
///
/// 1. $\Delta pCO_2^{ocn}$ from the committed surface DIC (skipped in the first year)
/// 2. $F_{as} = k (\Delta C - \Delta pCO_2^{ocn})$
/// 3. $X_{bio} = NPP_0 \beta \ln(1 + \Delta C / C_0) / 2.123$
/// 4. commit $F_{as} R_{ocn}$ to future DIC and $-X_{bio} R_{bio}$ to future biosphere fluxes
/// 5. $\Delta C_{i+1} = \Delta C_i + E_i / 2.123 - F_{as} - F_{bio}$
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarbonCycle {
    parameters: CarbonCycleParameters,
}

impl CarbonCycle {
    pub fn from_parameters(parameters: CarbonCycleParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &CarbonCycleParameters {
        &self.parameters
    }

    /// Air-sea flux (ppm / yr, positive into the ocean)
    pub fn calculate_air_sea_flux(
        &self,
        atmos_co2: FloatValue,
        sea_water_pco2: FloatValue,
    ) -> FloatValue {
        self.parameters.gas_exchange_coefficient * (atmos_co2 - sea_water_pco2)
    }

    /// Carbon held by CO2-fertilised plant growth (ppm)
    ///
    /// Fails when the concentration anomaly is at or below minus the pre-industrial
    /// concentration, where the logarithm is undefined.
    pub fn calculate_fertilisation(
        &self,
        atmos_co2: FloatValue,
        index: usize,
    ) -> JSCMResult<FloatValue> {
        let ratio = 1.0 + atmos_co2 / self.parameters.co2_pi;
        if !(ratio > 0.0) {
            return Err(JSCMError::domain(
                "CO2 fertilisation (atmospheric CO2 anomaly)",
                index,
                atmos_co2,
            ));
        }
        Ok(self.parameters.npp_pi * self.parameters.co2_fertilisation_factor * ratio.ln()
            / PGC_PER_PPM)
    }

    /// Integrate the carbon cycle over a series of annual CO2 emissions (PgC / yr)
    ///
    /// `sim_years` is the horizon over which the response functions are evaluated and
    /// must cover every simulated year.
    pub fn solve(
        &self,
        emissions_co2: &[FloatValue],
        sim_years: usize,
        ocean_mixed_layer_depth: FloatValue,
    ) -> JSCMResult<CarbonCycleOutput> {
        let n_years = emissions_co2.len();
        if sim_years < n_years {
            return Err(JSCMError::Config(format!(
                "response functions evaluated over {} years cannot cover {} years of emissions",
                sim_years, n_years
            )));
        }
        let ocean = ocean_response(sim_years, ocean_mixed_layer_depth)?;
        let biosphere = biosphere_response(sim_years);

        let mut state = CarbonCycleState::new(n_years);
        for (i, &emissions) in emissions_co2
            .iter()
            .enumerate()
            .take(n_years.saturating_sub(1))
        {
            self.step(&mut state, i, emissions, &ocean, &biosphere)?;
        }
        debug!(
            "Carbon cycle solved for {} years, final anomaly {:?} ppm",
            n_years,
            state.atmos_co2.last()
        );

        Ok(state.into())
    }

    fn step(
        &self,
        state: &mut CarbonCycleState,
        i: usize,
        emissions: FloatValue,
        ocean: &ResponseKernel,
        biosphere: &ResponseKernel,
    ) -> JSCMResult<()> {
        let n_years = state.atmos_co2.len();

        // Nothing has been committed to the first year's DIC
        if i > 0 {
            state.sea_water_pco2[i] = self
                .parameters
                .delta_pco2_from_dic(state.surface_ocean_dic[i]);
        }

        let atmos_co2 = state.atmos_co2[i];
        let air_sea_flux = self.calculate_air_sea_flux(atmos_co2, state.sea_water_pco2[i]);
        state.air_sea_flux[i] = air_sea_flux;

        let delta = self.calculate_fertilisation(atmos_co2, i)? - state.x_atmos_bio;
        state.x_atmos_bio += delta;
        state.atmos_bio_flux[i] += state.x_atmos_bio;

        let x_atmos_bio = state.x_atmos_bio;
        for j in (i + 1)..n_years {
            state.surface_ocean_dic[j] += air_sea_flux * ocean[j - i];
            state.atmos_bio_flux[j] -= x_atmos_bio * biosphere[j - i];
        }

        let next = atmos_co2 + emissions / PGC_PER_PPM - air_sea_flux - state.atmos_bio_flux[i];
        if !next.is_finite() {
            return Err(JSCMError::domain("atmospheric CO2 anomaly", i + 1, next));
        }
        state.atmos_co2[i + 1] = next;
        Ok(())
    }
}
