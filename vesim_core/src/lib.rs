//! Core rust implementation of vesim, a simulator for the electrochemistry of a single vesicle
//! exchanging ions with its surroundings through membrane channels.
//!
//! A [`Simulation`](vesicle_model::simulation::Simulation) owns the vesicle, the exterior,
//! the ion species and the ion channels, and advances their state with a fixed time step.
//! Every entity is recorded into a [`HistoriesStorage`](histories::HistoriesStorage) after
//! each step.

pub mod configuration;
pub mod histories;
pub mod io;
mod utils;
pub mod vesicle_model;

pub use vesicle_model::simulation::{Simulation, SimulationError, SimulationParameters};
