//! Simple climate model driven by annual emissions of CO2, CH4, N2O and SOx.
//!
//! Emissions are converted to concentrations, concentrations to radiative forcing,
//! forcing to global mean temperature change and temperature to sea-level change.
//! See [`model::ModelBuilder`] for the entry point.

pub mod model;
pub mod output;

pub use jscm_components;
pub use jscm_core;
