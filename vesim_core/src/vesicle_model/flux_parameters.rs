//! This module provides the per step snapshot handed to every channel

/// Shared physical quantities needed to compute channel fluxes during one step
///
/// Built fresh by the simulation at the start of each step and only read afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FluxCalculationParameters {
    /// Membrane voltage, V
    pub voltage: f64,
    /// Lumen pH
    pub ph: f64,
    /// Elapsed simulation time, s
    pub time: f64,
    /// Membrane area, m^2
    pub area: f64,
    /// R*T/F, V
    pub nernst_constant: f64,
    /// Free hydrogen concentration inside the vesicle
    pub vesicle_hydrogen_free: f64,
    /// Free hydrogen concentration in the exterior
    pub exterior_hydrogen_free: f64,
    /// Display name of the species whose free concentrations are given above
    pub hydrogen_species: String,
}
