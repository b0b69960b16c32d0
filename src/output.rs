//! Plain text output
//!
//! Every file has a single header line followed by one `year    value` line per
//! simulated year.

use crate::model::{baseline_concentration, concentration_unit, ModelOutput};
use jscm_core::emissions::Species;
use jscm_core::errors::{JSCMError, JSCMResult};
use jscm_core::timeseries::Timeseries;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const TEMPERATURE_HEADER: &str =
    "This files contains change in temperature [degC] for the years the model has been run for.";
pub const SEA_LEVEL_HEADER: &str =
    "This files contains change in sea level [cm] for the years the model has been run for.";
pub const FORCING_HEADER: &str =
    "This files contains total radiative forcing [W/m^2] for the years the model has been run for.";

/// Write a header line followed by the series
pub fn write_series<W: Write>(writer: &mut W, header: &str, series: &Timeseries) -> JSCMResult<()> {
    writeln!(writer, "{}", header)?;
    for (year, value) in series.iter_pairs() {
        writeln!(writer, "{}    {}", year, value)?;
    }
    Ok(())
}

/// Write the absolute concentration of a greenhouse gas
///
/// The pre-industrial baseline is added back to the modelled anomaly.
pub fn write_concentrations<W: Write>(
    writer: &mut W,
    species: Species,
    output: &ModelOutput,
) -> JSCMResult<()> {
    let (Some(series), Some(unit)) = (
        output.absolute_concentration(species),
        concentration_unit(species),
    ) else {
        return Err(JSCMError::Config(format!(
            "{} has no modelled concentration",
            species
        )));
    };
    let header = format!(
        "This files contains {} concentrations [{}] for the years the model has been run for (pre-industrial {} {}).",
        species,
        unit,
        baseline_concentration(species).unwrap_or_default(),
        unit
    );
    write_series(writer, &header, &series)
}

pub fn write_temperature<W: Write>(writer: &mut W, output: &ModelOutput) -> JSCMResult<()> {
    write_series(writer, TEMPERATURE_HEADER, &output.temperature)
}

pub fn write_sea_level<W: Write>(writer: &mut W, output: &ModelOutput) -> JSCMResult<()> {
    write_series(writer, SEA_LEVEL_HEADER, &output.sea_level)
}

pub fn write_forcing<W: Write>(writer: &mut W, output: &ModelOutput) -> JSCMResult<()> {
    write_series(writer, FORCING_HEADER, &output.forcing)
}

/// Create `path` (and any missing parent directories) and hand a buffered writer to `f`
pub fn write_to_path<F>(path: &Path, f: F) -> JSCMResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> JSCMResult<()>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    f(&mut writer)?;
    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}
