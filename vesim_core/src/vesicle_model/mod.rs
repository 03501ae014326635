//! Module containing the entities of the vesicle model and the simulation driving them
use std::cell::RefCell;
use std::rc::Rc;

pub mod defaults;
pub mod exterior;
pub mod flux_parameters;
pub mod ion_channel;
pub mod ion_species;
pub mod links;
pub mod simulation;
pub mod vesicle;

/// Shared handle to an ion species
pub type SpeciesRef = Rc<RefCell<ion_species::IonSpecies>>;
/// Shared handle to an ion channel
pub type ChannelRef = Rc<RefCell<ion_channel::IonChannel>>;
