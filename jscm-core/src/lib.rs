//! Core types for the JSCM simple climate model
//!
//! This crate holds the pieces shared by every component: annual timeseries,
//! emissions, run configuration, impulse response functions and the causal
//! convolution used to apply them.

pub mod config;
pub mod emissions;
pub mod errors;
pub mod interpolate;
pub mod response;
pub mod timeseries;
