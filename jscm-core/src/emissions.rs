//! Annual emissions driving the model
//!
//! Emissions are supplied as one [`EmissionRecord`] per simulated year. The
//! records are validated once when the [`Emissions`] collection is built and are
//! read-only afterwards.

use crate::errors::{JSCMError, JSCMResult};
use crate::interpolate::fill_linear;
use crate::timeseries::{FloatValue, Year};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Number of header lines at the top of an emissions table
const TABLE_HEADER_LINES: usize = 3;

/// The emitted species tracked by the model
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Co2,
    Ch4,
    N2o,
    Sox,
}

impl Species {
    /// All species in the column order used by emissions tables
    pub const ALL: [Species; 4] = [Species::Co2, Species::Ch4, Species::N2o, Species::Sox];

    pub fn name(&self) -> &'static str {
        match self {
            Species::Co2 => "CO2",
            Species::Ch4 => "CH4",
            Species::N2o => "N2O",
            Species::Sox => "SOx",
        }
    }

    /// Unit of the emissions of this species
    pub fn emissions_unit(&self) -> &'static str {
        match self {
            Species::Co2 => "PgC / yr",
            Species::Ch4 => "Tg CH4 / yr",
            Species::N2o => "Tg N2O / yr",
            Species::Sox => "Tg S / yr",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Emissions for a single year
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    /// unit: PgC / yr
    pub co2: FloatValue,
    /// unit: Tg CH4 / yr
    pub ch4: FloatValue,
    /// unit: Tg N2O / yr
    pub n2o: FloatValue,
    /// unit: Tg S / yr
    pub sox: FloatValue,
}

impl EmissionRecord {
    pub fn new(co2: FloatValue, ch4: FloatValue, n2o: FloatValue, sox: FloatValue) -> Self {
        Self { co2, ch4, n2o, sox }
    }

    pub fn get(&self, species: Species) -> FloatValue {
        match species {
            Species::Co2 => self.co2,
            Species::Ch4 => self.ch4,
            Species::N2o => self.n2o,
            Species::Sox => self.sox,
        }
    }

    fn set(&mut self, species: Species, value: FloatValue) {
        match species {
            Species::Co2 => self.co2 = value,
            Species::Ch4 => self.ch4 = value,
            Species::N2o => self.n2o = value,
            Species::Sox => self.sox = value,
        }
    }
}

/// A gap-free, chronologically ordered set of annual emissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emissions {
    start_year: Year,
    records: Vec<EmissionRecord>,
}

impl Emissions {
    /// Build a set of emissions starting at `start_year`
    ///
    /// Fails if any value is NaN or infinite.
    pub fn new(start_year: Year, records: Vec<EmissionRecord>) -> JSCMResult<Self> {
        for (i, record) in records.iter().enumerate() {
            for species in Species::ALL {
                if !record.get(species).is_finite() {
                    return Err(JSCMError::InvalidEmissions {
                        year: start_year + i as Year,
                        species: species.to_string(),
                    });
                }
            }
        }
        Ok(Self {
            start_year,
            records,
        })
    }

    /// Emissions which are zero for every species between two years (inclusive)
    pub fn zeros(start_year: Year, end_year: Year) -> Self {
        let len = (end_year - start_year + 1).max(0) as usize;
        Self {
            start_year,
            records: vec![EmissionRecord::default(); len],
        }
    }

    /// Parse a whitespace separated emissions table
    ///
    /// The first three lines are headers. Each following line holds
    /// `year CO2 CH4 N2O SOx`. Years without a row are linearly interpolated per
    /// species, starting from zero emissions when neither `start_year` nor any
    /// earlier year has a row. Rows outside of `[start_year, end_year]` still anchor
    /// the interpolation but are not part of the result. Non-finite cells (`nan`,
    /// `inf`) are treated as missing.
    pub fn from_table(text: &str, start_year: Year, end_year: Year) -> JSCMResult<Self> {
        if end_year < start_year {
            return Err(JSCMError::Config(format!(
                "end year {} is before start year {}",
                end_year, start_year
            )));
        }

        let mut rows: Vec<(Year, Vec<FloatValue>)> = Vec::new();
        for (line_index, line) in text.lines().enumerate().skip(TABLE_HEADER_LINES) {
            let line_number = line_index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != Species::ALL.len() + 1 {
                return Err(JSCMError::Parse {
                    line: line_number,
                    message: format!(
                        "expected {} columns, found {}",
                        Species::ALL.len() + 1,
                        fields.len()
                    ),
                });
            }
            let numbers = fields
                .iter()
                .map(|field| {
                    field.parse::<FloatValue>().map_err(|e| JSCMError::Parse {
                        line: line_number,
                        message: format!("{:?}: {}", field, e),
                    })
                })
                .collect::<JSCMResult<Vec<_>>>()?;
            if !numbers[0].is_finite() {
                return Err(JSCMError::Parse {
                    line: line_number,
                    message: format!("invalid year {}", fields[0]),
                });
            }
            rows.push((numbers[0].round() as Year, numbers[1..].to_vec()));
        }

        // Interpolate over the span covering both the window and every row
        let first_year = rows
            .iter()
            .map(|(year, _)| *year)
            .min()
            .map_or(start_year, |year| year.min(start_year));
        let last_year = rows
            .iter()
            .map(|(year, _)| *year)
            .max()
            .map_or(end_year, |year| year.max(end_year));
        let span = (last_year - first_year + 1) as usize;
        let offset = (start_year - first_year) as usize;
        let len = (end_year - start_year + 1) as usize;

        let outside = rows
            .iter()
            .filter(|(year, _)| *year < start_year || *year > end_year)
            .count();
        if outside > 0 {
            warn!(
                "{} emissions rows lie outside of the simulated years {}-{} and only anchor the interpolation",
                outside, start_year, end_year
            );
        }

        let mut known: Vec<Vec<(usize, FloatValue)>> = vec![Vec::new(); Species::ALL.len()];
        for (year, values) in &rows {
            let index = (year - first_year) as usize;
            for (column, value) in values.iter().enumerate() {
                if value.is_finite() {
                    known[column].retain(|(i, _)| *i != index);
                    known[column].push((index, *value));
                }
            }
        }

        let mut records = vec![EmissionRecord::default(); len];
        for (column, species) in Species::ALL.iter().enumerate() {
            let points = &mut known[column];
            points.sort_by_key(|(i, _)| *i);
            debug!(
                "{} emissions: {} rows over {}-{}",
                species,
                points.len(),
                first_year,
                last_year
            );
            let filled = fill_linear(span, points);
            for (record, value) in records.iter_mut().zip(&filled[offset..offset + len]) {
                record.set(*species, *value);
            }
        }

        Self::new(start_year, records)
    }

    /// Read an emissions table from disk
    ///
    /// See [`Emissions::from_table`] for the expected format.
    pub fn from_path(path: impl AsRef<Path>, start_year: Year, end_year: Year) -> JSCMResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_table(&text, start_year, end_year)
    }

    pub fn start_year(&self) -> Year {
        self.start_year
    }

    pub fn end_year(&self) -> Year {
        self.start_year + self.records.len() as Year - 1
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EmissionRecord] {
        &self.records
    }

    /// The emissions of a single species for every year
    pub fn species(&self, species: Species) -> Vec<FloatValue> {
        self.records.iter().map(|r| r.get(species)).collect()
    }
}
