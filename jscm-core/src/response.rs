//! Impulse response functions
//!
//! Each response function describes how a unit pulse at lag 0 decays over the
//! following years. They are evaluated once per run at integer lags and then
//! convolved against a driver series with [`convolve`].
//!
//! The biosphere and ocean mixed-layer responses follow Joos et al. (1996). The
//! temperature and sea-level responses are double exponential fits to a HadCM3
//! 4xCO2 experiment.

use crate::config::validate_depth;
use crate::errors::{JSCMError, JSCMResult};
use crate::timeseries::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Conversion from PgC to ppm of atmospheric CO2
pub const PGC_PER_PPM: FloatValue = 2.123;

/// Ocean surface area
/// unit: m^2
pub const OCEAN_AREA: FloatValue = 3.62e14;

/// Molar mass of carbon
/// unit: g / mol
pub const MOLAR_MASS_CARBON: FloatValue = 12.0113;

/// Density of sea water
/// unit: kg / m^3
pub const SEA_WATER_DENSITY: FloatValue = 1.0265e3;

/// Lag (in years) at which the mixed-layer response switches formula
pub const OCEAN_RESPONSE_SWITCH_LAG: FloatValue = 2.0;

/// A response function evaluated at integer lags
///
/// Index 0 is the response in the year of the pulse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseKernel(Array1<FloatValue>);

impl ResponseKernel {
    /// Evaluate `f` at lags `0..n_years`
    pub fn from_fn(n_years: usize, f: impl Fn(FloatValue) -> FloatValue) -> Self {
        Self(Array1::from_shape_fn(n_years, |lag| f(lag as FloatValue)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &Array1<FloatValue> {
        &self.0
    }

    pub fn get(&self, lag: usize) -> Option<FloatValue> {
        self.0.get(lag).copied()
    }
}

impl Index<usize> for ResponseKernel {
    type Output = FloatValue;

    fn index(&self, lag: usize) -> &Self::Output {
        &self.0[lag]
    }
}

/// Decay of a unit carbon pulse taken up by enhanced plant growth
///
/// $$ R(t) = 0.7021 e^{-0.35t} + 0.01341 e^{-t/20} - 0.7185 e^{-0.4583t} + 0.002932 e^{-0.01t} $$
///
/// From Joos et al. 1996, pg. 416.
pub fn biosphere_response(n_years: usize) -> ResponseKernel {
    ResponseKernel::from_fn(n_years, |t| {
        0.7021 * (-0.35 * t).exp() + 0.01341 * (-t / 20.0).exp() - 0.7185 * (-0.4583 * t).exp()
            + 0.002932 * (-0.01 * t).exp()
    })
}

/// Fraction of a carbon pulse remaining in the ocean mixed layer (HILDA model)
///
/// Dimensionless, before conversion to DIC units.
/// The fit switches formula at a lag of two years, so the function is
/// discontinuous there.
pub fn ocean_mixed_layer_fraction(t: FloatValue) -> FloatValue {
    if t < OCEAN_RESPONSE_SWITCH_LAG {
        0.12935
            + 0.21898 * (-t / 0.034569).exp()
            + 0.17003 * (-t / 0.26936).exp()
            + 0.24071 * (-t / 0.96083).exp()
            + 0.24093 * (-t / 4.9792).exp()
    } else {
        0.022936
            + 0.24278 * (-t / 1.2679).exp()
            + 0.13963 * (-t / 5.2528).exp()
            + 0.089318 * (-t / 18.601).exp()
            + 0.037820 * (-t / 68.736).exp()
            + 0.035549 * (-t / 232.30).exp()
    }
}

/// Surface DIC response to a 1 ppm air-sea flux for a mixed layer of `depth` metres
///
/// unit: micromol / kg
pub fn dic_per_ppm(depth: FloatValue) -> FloatValue {
    (1e21 * PGC_PER_PPM / MOLAR_MASS_CARBON) / (SEA_WATER_DENSITY * depth * OCEAN_AREA)
}

/// Ocean mixed-layer response scaled to micromol / kg
///
/// Constants from Joos et al. 1996, pg. 400. Fails for a non-positive or
/// non-finite `depth`.
pub fn ocean_response(n_years: usize, depth: FloatValue) -> JSCMResult<ResponseKernel> {
    validate_depth(depth)?;
    let scale = dic_per_ppm(depth);
    Ok(ResponseKernel::from_fn(n_years, |t| {
        ocean_mixed_layer_fraction(t) * scale
    }))
}

/// Global mean surface temperature response to a unit forcing pulse
///
/// $$ R(t) = \frac{0.59557}{8.4007} e^{-t/8.4007} + \frac{0.40443}{409.54} e^{-t/409.54} $$
pub fn temperature_response(n_years: usize) -> ResponseKernel {
    ResponseKernel::from_fn(n_years, |t| {
        (0.59557 / 8.4007) * (-t / 8.4007).exp() + (0.40443 / 409.54) * (-t / 409.54).exp()
    })
}

/// Sea-level response to a unit temperature pulse
///
/// unit: cm / K
///
/// Thermal expansion only, glaciers and ice sheets are not represented.
///
/// $$ R(t) = \frac{0.96677}{1700.2} e^{-t/1700.2} + \frac{0.03323}{33.788} e^{-t/33.788} $$
pub fn sea_level_response(n_years: usize) -> ResponseKernel {
    ResponseKernel::from_fn(n_years, |t| {
        (0.96677 / 1700.2) * (-t / 1700.2).exp() + (0.03323 / 33.788) * (-t / 33.788).exp()
    })
}

/// Causal convolution of a driver series with a response kernel
///
/// $$ y_j = \sum_{i \le j} x_i R_{j - i} $$
///
/// The output has the same length as `driver`. Fails with [`JSCMError::Config`]
/// when the kernel is shorter than the driver.
pub fn convolve(driver: &[FloatValue], kernel: &ResponseKernel) -> JSCMResult<Array1<FloatValue>> {
    let n = driver.len();
    if kernel.len() < n {
        return Err(JSCMError::Config(format!(
            "response kernel ({} years) is shorter than the driver ({} years)",
            kernel.len(),
            n
        )));
    }

    let mut result = Array1::zeros(n);
    for (i, &x) in driver.iter().enumerate() {
        for j in i..n {
            result[j] += x * kernel[j - i];
        }
    }
    Ok(result)
}
