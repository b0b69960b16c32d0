//! Components of the JSCM simple climate model
//!
//! - `CarbonCycle`: CO2 emissions to concentrations with ocean and biosphere uptake
//! - `GasChemistry`: CH4 and N2O emissions to concentrations with a fixed lifetime
//! - `RadiativeForcing`: forcing from CO2, CH4, N2O and SOx
//! - `TemperatureResponse` and `SeaLevelResponse`: climate response to forcing

pub mod components;
pub mod constants;
