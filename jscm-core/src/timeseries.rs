//! Annual timeseries
//!
//! Every series produced by the model shares the same convention: one value per
//! calendar year, with index 0 corresponding to the first simulated year.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub type FloatValue = f64;
pub type Year = i32;

/// A series of annual values starting at `start_year`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    start_year: Year,
    values: Array1<FloatValue>,
}

impl Timeseries {
    pub fn new(start_year: Year, values: Array1<FloatValue>) -> Self {
        Self { start_year, values }
    }

    /// A series of `len` zeros
    pub fn zeros(start_year: Year, len: usize) -> Self {
        Self::new(start_year, Array1::zeros(len))
    }

    pub fn from_vec(start_year: Year, values: Vec<FloatValue>) -> Self {
        Self::new(start_year, Array1::from_vec(values))
    }

    pub fn start_year(&self) -> Year {
        self.start_year
    }

    /// The last year covered by the series (inclusive)
    ///
    /// For an empty series this is one year before `start_year`.
    pub fn end_year(&self) -> Year {
        self.start_year + self.values.len() as Year - 1
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &Array1<FloatValue> {
        &self.values
    }

    pub fn as_slice(&self) -> &[FloatValue] {
        self.values
            .as_slice()
            .expect("Timeseries values are always stored contiguously")
    }

    pub fn into_values(self) -> Array1<FloatValue> {
        self.values
    }

    /// Get the value for a given index
    pub fn at(&self, index: usize) -> Option<FloatValue> {
        self.values.get(index).copied()
    }

    /// Get the value for a calendar year
    pub fn at_year(&self, year: Year) -> Option<FloatValue> {
        if year < self.start_year {
            return None;
        }
        self.at((year - self.start_year) as usize)
    }

    /// The calendar years covered by the series
    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        (0..self.values.len()).map(move |i| self.start_year + i as Year)
    }

    /// Iterate over `(year, value)` pairs
    pub fn iter_pairs(&self) -> impl Iterator<Item = (Year, FloatValue)> + '_ {
        self.years().zip(self.values.iter().copied())
    }

    pub fn to_pairs(&self) -> Vec<(Year, FloatValue)> {
        self.iter_pairs().collect()
    }

    /// A new series with `offset` added to every value
    pub fn offset(&self, offset: FloatValue) -> Self {
        Self::new(self.start_year, &self.values + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn pairs_cover_the_full_range() {
        let ts = Timeseries::new(1750, array![0.0, 1.5, 3.0]);

        assert_eq!(ts.end_year(), 1752);
        assert_eq!(ts.to_pairs(), vec![(1750, 0.0), (1751, 1.5), (1752, 3.0)]);
    }

    #[test]
    fn lookup_by_year() {
        let ts = Timeseries::from_vec(2000, vec![1.0, 2.0]);

        assert_eq!(ts.at_year(1999), None);
        assert_eq!(ts.at_year(2000), Some(1.0));
        assert_eq!(ts.at_year(2001), Some(2.0));
        assert_eq!(ts.at_year(2002), None);
    }

    #[test]
    fn offset_adds_baseline() {
        let ts = Timeseries::from_vec(2000, vec![0.0, 2.0]).offset(278.0);
        assert_eq!(ts.as_slice(), &[278.0, 280.0]);
    }

    #[test]
    fn zeros_has_requested_length() {
        let ts = Timeseries::zeros(1900, 4);
        assert_eq!(ts.len(), 4);
        assert!(ts.values().iter().all(|v| *v == 0.0));
    }
}
