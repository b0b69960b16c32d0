use jscm_core::timeseries::FloatValue;

pub use jscm_core::response::PGC_PER_PPM;

/// Pre-industrial (1750) atmospheric CO2 concentration
/// unit: ppm
pub const CO2_PI: FloatValue = 278.305;

/// Pre-industrial (1750) atmospheric CH4 concentration
/// unit: ppb
pub const CH4_PI: FloatValue = 700.0;

/// Pre-industrial (1750) atmospheric N2O concentration
/// unit: ppb
pub const N2O_PI: FloatValue = 270.0;
