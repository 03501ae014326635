//! Module for reading simulation configurations and writing simulation results
pub mod json;

pub use json::{config_fingerprint, JsonError};
