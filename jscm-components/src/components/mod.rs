mod carbon_cycle;
mod climate_response;
mod forcing;
mod gas_chemistry;

pub use carbon_cycle::{CarbonCycle, CarbonCycleOutput, CarbonCycleParameters};
pub use climate_response::{SeaLevelResponse, TemperatureResponse, TemperatureResponseParameters};
pub use forcing::{overlap, ForcingBreakdown, RadiativeForcing, RadiativeForcingParameters};
pub use gas_chemistry::{GasChemistry, GasChemistryParameters};
