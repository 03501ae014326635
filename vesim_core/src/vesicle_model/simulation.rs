//! This module provides the Simulation struct, which owns the vesicle model and advances it
//! through time with a fixed step explicit integrator
use std::cell::{Ref, RefCell};
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::configuration::{configuration, Configuration};
use crate::histories::{history_key, EntityKind, HistoriesError, HistoriesStorage};
use crate::vesicle_model::defaults::{default_channels, default_links, default_species};
use crate::vesicle_model::exterior::Exterior;
use crate::vesicle_model::flux_parameters::FluxCalculationParameters;
use crate::vesicle_model::ion_channel::{ChannelError, IonChannel};
use crate::vesicle_model::ion_species::{IonSpecies, SpeciesError};
use crate::vesicle_model::links::IonChannelLinks;
use crate::vesicle_model::vesicle::Vesicle;
use crate::vesicle_model::{ChannelRef, SpeciesRef};

// region Parameters
/// Scalar parameters of a simulation, defaults are taken from the global configuration
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Integration time step, s
    #[builder(default = "configuration().time_step")]
    pub time_step: f64,
    /// Simulated time, s
    #[builder(default = "configuration().total_time")]
    pub total_time: f64,
    /// Temperature, K
    #[builder(default = "configuration().temperature")]
    pub temperature: f64,
    #[builder(default = "configuration().init_buffer_capacity")]
    pub init_buffer_capacity: f64,
    #[builder(setter(into), default = "\"Simulation\".to_string()")]
    pub display_name: String,
}

impl SimulationParameters {
    /// Check that the parameters describe a runnable simulation
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.time_step <= 0.0 || self.time_step.is_nan() {
            return Err(ConfigurationError::NonPositiveTimeStep(self.time_step));
        }
        if self.total_time <= 0.0 || self.total_time.is_nan() {
            return Err(ConfigurationError::NonPositiveTotalTime(self.total_time));
        }
        if self.temperature <= 0.0 || self.temperature.is_nan() {
            return Err(ConfigurationError::NonPositiveTemperature(self.temperature));
        }
        if self.init_buffer_capacity < 0.0 || self.init_buffer_capacity.is_nan() {
            return Err(ConfigurationError::NegativeBufferCapacity(
                self.init_buffer_capacity,
            ));
        }
        Ok(())
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        let config = configuration();
        SimulationParameters {
            time_step: config.time_step,
            total_time: config.total_time,
            temperature: config.temperature,
            init_buffer_capacity: config.init_buffer_capacity,
            display_name: "Simulation".to_string(),
        }
    }
}
// endregion Parameters

/// Lifecycle of a simulation, transitions only move forward
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SimulationStatus {
    /// Entities can still be added
    #[default]
    Unconfigured,
    /// Entities are wired and the initial state is recorded
    Configured,
    Running,
    Completed,
}

impl Display for SimulationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationStatus::Unconfigured => write!(f, "unconfigured"),
            SimulationStatus::Configured => write!(f, "configured"),
            SimulationStatus::Running => write!(f, "running"),
            SimulationStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Stages of the state recompute, in the order they run within a step
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UpdateStage {
    Volume,
    Concentrations,
    Buffer,
    Area,
    Capacitance,
    Charge,
    Voltage,
    Ph,
}

/// Emitted to the stage observer after every stage of the state recompute
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StageEvent {
    pub stage: UpdateStage,
    /// Simulation time at the start of the step, s
    pub time: f64,
    /// Quantity computed by the stage (the total vesicle amount for concentrations)
    pub value: f64,
}

/// Orchestrates the vesicle model
///
/// Owns the vesicle, the exterior, the ion species and the ion channels. Channels and
/// species only hold weak references to each other.
pub struct Simulation {
    display_name: String,
    time_step: f64,
    total_time: f64,
    temperature: f64,
    init_buffer_capacity: f64,
    buffer_capacity: f64,
    /// Elapsed simulated time, s
    time: f64,
    /// Ion amount (mol) needed to reconcile the initial charge with the initial concentrations
    unaccounted_ion_amount: f64,
    /// Physical constants captured when the simulation was created
    constants: Configuration,
    vesicle: Rc<RefCell<Vesicle>>,
    exterior: Rc<RefCell<Exterior>>,
    species: IndexMap<String, SpeciesRef>,
    channels: IndexMap<String, ChannelRef>,
    links: IonChannelLinks,
    histories: HistoriesStorage,
    status: SimulationStatus,
    observer: Option<Box<dyn FnMut(&StageEvent)>>,
}

impl Debug for Simulation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("display_name", &self.display_name)
            .field("status", &self.status)
            .field("time", &self.time)
            .field("time_step", &self.time_step)
            .field("total_time", &self.total_time)
            .field("buffer_capacity", &self.buffer_capacity)
            .field("species", &self.species.keys().collect::<Vec<_>>())
            .field("channels", &self.channels.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Create an unconfigured simulation with a default vesicle and exterior
    pub fn new(params: SimulationParameters) -> Result<Simulation, SimulationError> {
        params.validate()?;
        Ok(Simulation {
            display_name: params.display_name,
            time_step: params.time_step,
            total_time: params.total_time,
            temperature: params.temperature,
            init_buffer_capacity: params.init_buffer_capacity,
            buffer_capacity: params.init_buffer_capacity,
            time: 0.0,
            unaccounted_ion_amount: 0.0,
            constants: configuration().clone(),
            vesicle: Vesicle::default().wrap(),
            exterior: Exterior::default().wrap(),
            species: IndexMap::new(),
            channels: IndexMap::new(),
            links: IonChannelLinks::new(),
            histories: HistoriesStorage::new(),
            status: SimulationStatus::Unconfigured,
            observer: None,
        })
    }

    /// Create an unconfigured simulation populated with the reference lysosome model
    ///
    /// The vesicle and exterior can still be replaced before calling [`Simulation::configure`].
    pub fn with_default_model(params: SimulationParameters) -> Result<Simulation, SimulationError> {
        let mut simulation = Simulation::new(params)?;
        for species in default_species() {
            simulation.add_species(species)?;
        }
        let channels = default_channels()
            .map_err(|err| ConfigurationError::InvalidParameter(err.to_string()))?;
        for config in channels {
            simulation.add_channel(IonChannel::new(config))?;
        }
        for (species, links) in &default_links() {
            for link in links {
                simulation.add_link(species, &link.channel, link.secondary.as_deref())?;
            }
        }
        Ok(simulation)
    }

    // region Model Setup
    fn ensure_status(
        &self,
        allowed: &[SimulationStatus],
        operation: &'static str,
    ) -> Result<(), SimulationError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(SimulationError::InvalidState {
                operation,
                status: self.status,
            })
        }
    }

    pub fn set_vesicle(&mut self, vesicle: Vesicle) -> Result<(), SimulationError> {
        self.ensure_status(&[SimulationStatus::Unconfigured], "replace the vesicle")?;
        self.vesicle = vesicle.wrap();
        Ok(())
    }

    pub fn set_exterior(&mut self, exterior: Exterior) -> Result<(), SimulationError> {
        self.ensure_status(&[SimulationStatus::Unconfigured], "replace the exterior")?;
        self.exterior = exterior.wrap();
        Ok(())
    }

    /// Add an ion species, returning the shared handle to it
    pub fn add_species(&mut self, species: IonSpecies) -> Result<SpeciesRef, SimulationError> {
        self.ensure_status(&[SimulationStatus::Unconfigured], "add an ion species")?;
        let name = crate::histories::Trackable::display_name(&species).to_string();
        if self.species.contains_key(&name) {
            return Err(SimulationError::DuplicateSpecies(name));
        }
        let species = species.wrap();
        self.species.insert(name, species.clone());
        Ok(species)
    }

    /// Add an ion channel, returning the shared handle to it
    pub fn add_channel(&mut self, channel: IonChannel) -> Result<ChannelRef, SimulationError> {
        self.ensure_status(&[SimulationStatus::Unconfigured], "add an ion channel")?;
        let name = channel.config().display_name.clone();
        if self.channels.contains_key(&name) {
            return Err(SimulationError::DuplicateChannel(name));
        }
        let channel = channel.wrap();
        self.channels.insert(name, channel.clone());
        Ok(channel)
    }

    /// Link a channel to a species, the names are resolved by [`Simulation::configure`]
    pub fn add_link(
        &mut self,
        species: &str,
        channel: &str,
        secondary: Option<&str>,
    ) -> Result<(), SimulationError> {
        self.ensure_status(&[SimulationStatus::Unconfigured], "add a channel link")?;
        self.links.add_link(species, channel, secondary);
        Ok(())
    }

    /// Install a callback invoked after every stage of the state recompute
    pub fn set_stage_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&StageEvent) + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Wire the model together and record the initial state
    ///
    /// Connects the linked species and channels, registers every entity for tracking,
    /// derives the ion amounts and the unaccounted ion amount from the initial
    /// concentrations, runs one pass of the state recompute and records it as the
    /// first history entry.
    pub fn configure(&mut self) -> Result<(), SimulationError> {
        self.ensure_status(&[SimulationStatus::Unconfigured], "configure")?;
        self.wire_links()?;
        self.check_hydrogen_species()?;
        for (name, channel) in &self.channels {
            if !channel.borrow().is_connected() {
                log::warn!("Channel '{}' is not linked to any ion species", name);
            }
        }

        self.histories.register(self.vesicle.clone())?;
        self.histories.register(self.exterior.clone())?;
        for species in self.species.values() {
            self.histories.register(species.clone())?;
        }
        for channel in self.channels.values() {
            self.histories.register(channel.clone())?;
        }
        if let Some(existing) = self.histories.kind_of(&self.display_name) {
            return Err(HistoriesError::NameConflict {
                name: self.display_name.clone(),
                existing,
                new: EntityKind::Simulation,
            }
            .into());
        }

        self.set_ion_amounts();
        self.unaccounted_ion_amount = self.compute_unaccounted_ion_amount();
        self.update_simulation_state();
        self.record_state()?;
        self.status = SimulationStatus::Configured;
        log::info!(
            "Configured simulation '{}': {} species, {} channels, unaccounted ion amount {:e} mol",
            self.display_name,
            self.species.len(),
            self.channels.len(),
            self.unaccounted_ion_amount
        );
        Ok(())
    }

    fn lookup_species(&self, name: &str) -> Result<&SpeciesRef, SimulationError> {
        self.species
            .get(name)
            .ok_or_else(|| SimulationError::UnknownSpecies(name.to_string()))
    }

    fn wire_links(&self) -> Result<(), SimulationError> {
        for (species_name, links) in &self.links {
            let species = self.lookup_species(species_name)?;
            for link in links {
                let channel = self
                    .channels
                    .get(&link.channel)
                    .ok_or_else(|| SimulationError::UnknownChannel(link.channel.clone()))?;
                let secondary = link
                    .secondary
                    .as_deref()
                    .map(|name| self.lookup_species(name))
                    .transpose()?;
                IonSpecies::connect_channel(species, channel, secondary)?;
            }
        }
        Ok(())
    }

    /// Channels reading free hydrogen need the hydrogen species for the buffer model
    fn check_hydrogen_species(&self) -> Result<(), ConfigurationError> {
        let hydrogen = &self.constants.hydrogen_species;
        if self.species.contains_key(hydrogen) {
            return Ok(());
        }
        match self
            .channels
            .iter()
            .find(|(_, channel)| channel.borrow().config().use_free_hydrogen)
        {
            Some((name, _)) => Err(ConfigurationError::MissingHydrogenSpecies {
                channel: name.clone(),
                hydrogen: hydrogen.clone(),
            }),
            None => {
                log::warn!("No '{}' species, the vesicle pH will be held constant", hydrogen);
                Ok(())
            }
        }
    }
    // endregion Model Setup

    // region State Updates
    /// Set every species amount from its current concentration and the current volume
    pub fn set_ion_amounts(&mut self) {
        let liters = self.constants.liters_per_cubic_meter * self.vesicle.borrow().volume();
        for species in self.species.values() {
            let mut species = species.borrow_mut();
            let amount = species.vesicle_conc() * liters;
            species.set_vesicle_amount(amount);
        }
    }

    /// Ion amount (mol) not explained by the initial concentrations
    ///
    /// # Note:
    /// initial charge / F - sum(z * c0) * 1000 * V0
    pub fn compute_unaccounted_ion_amount(&self) -> f64 {
        let vesicle = self.vesicle.borrow();
        let liters = self.constants.liters_per_cubic_meter * vesicle.init_volume();
        let initial_ionic: f64 = self
            .species
            .values()
            .map(|species| {
                let species = species.borrow();
                species.elementary_charge() * species.init_vesicle_conc()
            })
            .sum();
        vesicle.init_charge() / self.constants.faraday_constant - initial_ionic * liters
    }

    /// R*T/F, V
    pub fn nernst_constant(&self) -> f64 {
        self.constants.ideal_gas_constant * self.temperature / self.constants.faraday_constant
    }

    /// Snapshot of the quantities the channels need for this step
    pub fn flux_parameters(&self) -> FluxCalculationParameters {
        let vesicle = self.vesicle.borrow();
        let (vesicle_hydrogen_free, exterior_hydrogen_free) =
            match self.species.get(&self.constants.hydrogen_species) {
                Some(hydrogen) => {
                    let hydrogen = hydrogen.borrow();
                    (
                        hydrogen.vesicle_conc() * self.buffer_capacity,
                        hydrogen.exterior_conc() * self.init_buffer_capacity,
                    )
                }
                None => (0.0, 0.0),
            };
        FluxCalculationParameters {
            voltage: vesicle.voltage(),
            ph: vesicle.ph(),
            time: self.time,
            area: vesicle.area(),
            nernst_constant: self.nernst_constant(),
            vesicle_hydrogen_free,
            exterior_hydrogen_free,
            hydrogen_species: self.constants.hydrogen_species.clone(),
        }
    }

    /// Recompute the physical state from the current ion amounts
    ///
    /// Stages run in a fixed order, each reading only what earlier stages produced:
    /// volume, concentrations, buffer capacity, area, capacitance, charge, voltage, pH.
    pub fn update_simulation_state(&mut self) {
        let volume = self.update_volume();
        self.notify(UpdateStage::Volume, volume);
        let total_amount = self.update_vesicle_concentrations();
        self.notify(UpdateStage::Concentrations, total_amount);
        let buffer_capacity = self.update_buffer();
        self.notify(UpdateStage::Buffer, buffer_capacity);
        let area = {
            let mut vesicle = self.vesicle.borrow_mut();
            vesicle.update_area();
            vesicle.area()
        };
        self.notify(UpdateStage::Area, area);
        let capacitance = {
            let mut vesicle = self.vesicle.borrow_mut();
            vesicle.update_capacitance();
            vesicle.capacitance()
        };
        self.notify(UpdateStage::Capacitance, capacitance);
        let charge = self.update_charge();
        self.notify(UpdateStage::Charge, charge);
        let voltage = {
            let mut vesicle = self.vesicle.borrow_mut();
            vesicle.update_voltage();
            vesicle.voltage()
        };
        self.notify(UpdateStage::Voltage, voltage);
        let ph = self.update_ph();
        self.notify(UpdateStage::Ph, ph);
    }

    fn notify(&mut self, stage: UpdateStage, value: f64) {
        log::trace!("t={} {:?} -> {}", self.time, stage, value);
        if let Some(observer) = self.observer.as_mut() {
            observer(&StageEvent {
                stage,
                time: self.time,
                value,
            });
        }
    }

    /// Scale the initial volume by the osmotic ratio of the non-hydrogen species
    fn update_volume(&mut self) -> f64 {
        let unaccounted = self.unaccounted_ion_amount.abs();
        let mut current = 0.0;
        let mut initial = 0.0;
        for (name, species) in &self.species {
            if *name == self.constants.hydrogen_species {
                continue;
            }
            let species = species.borrow();
            current += species.vesicle_conc();
            initial += species.init_vesicle_conc();
        }
        current += unaccounted;
        initial += unaccounted;

        let mut vesicle = self.vesicle.borrow_mut();
        if initial <= 0.0 {
            log::warn!("Osmotic reference is not positive, keeping the vesicle volume");
            return vesicle.volume();
        }
        let volume = vesicle.init_volume() * (current / initial);
        vesicle.set_volume(volume);
        volume
    }

    /// Returns the total amount inside the vesicle, mol
    fn update_vesicle_concentrations(&mut self) -> f64 {
        let liters = self.constants.liters_per_cubic_meter * self.vesicle.borrow().volume();
        let mut total_amount = 0.0;
        for species in self.species.values() {
            let mut species = species.borrow_mut();
            let amount = species.vesicle_amount();
            species.set_vesicle_conc(amount / liters);
            total_amount += amount;
        }
        total_amount
    }

    fn update_buffer(&mut self) -> f64 {
        let ratio = {
            let vesicle = self.vesicle.borrow();
            vesicle.volume() / vesicle.init_volume()
        };
        self.buffer_capacity = self.init_buffer_capacity * ratio;
        self.buffer_capacity
    }

    fn update_charge(&mut self) -> f64 {
        let ionic: f64 = self
            .species
            .values()
            .map(|species| {
                let species = species.borrow();
                species.elementary_charge() * species.vesicle_amount()
            })
            .sum();
        let charge = (ionic + self.unaccounted_ion_amount) * self.constants.faraday_constant;
        self.vesicle.borrow_mut().set_charge(charge);
        charge
    }

    /// Without a hydrogen species the pH is left unchanged
    fn update_ph(&mut self) -> f64 {
        let mut vesicle = self.vesicle.borrow_mut();
        let Some(hydrogen) = self.species.get(&self.constants.hydrogen_species) else {
            return vesicle.ph();
        };
        let free_hydrogen = hydrogen.borrow().vesicle_conc() * self.buffer_capacity;
        let ph = if free_hydrogen > 0.0 {
            -free_hydrogen.log10()
        } else {
            log::warn!(
                "Free hydrogen concentration {} is not positive, setting pH to {}",
                free_hydrogen,
                self.constants.fallback_ph
            );
            self.constants.fallback_ph
        };
        vesicle.set_ph(ph);
        ph
    }
    // endregion State Updates

    // region Running
    /// Number of steps taken by [`Simulation::run`]
    pub fn iteration_count(&self) -> usize {
        (self.total_time / self.time_step).floor() as usize
    }

    /// Advance the simulation by a single time step
    pub fn run_one_iteration(&mut self) -> Result<(), SimulationError> {
        self.ensure_status(
            &[SimulationStatus::Configured, SimulationStatus::Running],
            "run an iteration",
        )?;
        self.status = SimulationStatus::Running;
        self.step()
    }

    fn step(&mut self) -> Result<(), SimulationError> {
        let params = self.flux_parameters();
        log::trace!("t={} flux parameters {:?}", self.time, params);

        let mut fluxes = Vec::with_capacity(self.species.len());
        for species in self.species.values() {
            fluxes.push(species.borrow().compute_total_flux(&params)?);
        }
        for (species, flux) in self.species.values().zip(fluxes) {
            let mut species = species.borrow_mut();
            let amount = species.vesicle_amount() + flux * self.time_step;
            species.set_vesicle_amount(amount);
        }

        self.update_simulation_state();
        self.time += self.time_step;
        self.record_state()
    }

    /// Record every registered entity together with the buffer capacity and the time
    fn record_state(&mut self) -> Result<(), SimulationError> {
        self.histories.record_step()?;
        self.histories.append(
            &history_key(&self.display_name, "buffer_capacity"),
            self.buffer_capacity,
        );
        self.histories
            .append(&history_key(&self.display_name, "time"), self.time);
        Ok(())
    }

    /// Run every step of the simulation
    pub fn run(&mut self) -> Result<(), SimulationError> {
        self.run_with_progress(|_| {})
    }

    /// Run every step of the simulation, reporting progress in percent
    ///
    /// Progress is reported every `progress_interval` iterations of the configuration and
    /// after the last one.
    pub fn run_with_progress<F>(&mut self, mut progress: F) -> Result<(), SimulationError>
    where
        F: FnMut(u32),
    {
        self.ensure_status(
            &[SimulationStatus::Configured, SimulationStatus::Running],
            "run",
        )?;
        let iter_num = self.iteration_count();
        self.set_ion_amounts();
        self.unaccounted_ion_amount = self.compute_unaccounted_ion_amount();
        self.status = SimulationStatus::Running;
        log::info!(
            "Running simulation '{}' for {} iterations",
            self.display_name,
            iter_num
        );

        let interval = self.constants.progress_interval.max(1);
        for i in 0..iter_num {
            self.step()?;
            if i % interval == 0 || i + 1 == iter_num {
                progress(((i + 1) as f64 / iter_num as f64 * 100.0) as u32);
            }
        }

        self.status = SimulationStatus::Completed;
        log::info!(
            "Simulation '{}' completed at t={}",
            self.display_name,
            self.time
        );
        Ok(())
    }

    /// Every recorded series plus `simulation_time`, the time of each entry
    pub fn export_histories(&self) -> IndexMap<String, Vec<f64>> {
        let mut histories = self.histories.export();
        let simulation_time = (0..self.histories.recorded_steps())
            .map(|i| i as f64 * self.time_step)
            .collect();
        histories.insert("simulation_time".to_string(), simulation_time);
        histories
    }
    // endregion Running

    // region Getters
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn init_buffer_capacity(&self) -> f64 {
        self.init_buffer_capacity
    }

    pub fn buffer_capacity(&self) -> f64 {
        self.buffer_capacity
    }

    pub fn unaccounted_ion_amount(&self) -> f64 {
        self.unaccounted_ion_amount
    }

    pub fn vesicle(&self) -> Ref<'_, Vesicle> {
        self.vesicle.borrow()
    }

    pub fn exterior(&self) -> Ref<'_, Exterior> {
        self.exterior.borrow()
    }

    pub fn species(&self, name: &str) -> Option<&SpeciesRef> {
        self.species.get(name)
    }

    pub fn channel(&self, name: &str) -> Option<&ChannelRef> {
        self.channels.get(name)
    }

    pub fn species_names(&self) -> impl Iterator<Item = &String> {
        self.species.keys()
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &String> {
        self.channels.keys()
    }

    pub fn links(&self) -> &IonChannelLinks {
        &self.links
    }

    pub fn histories(&self) -> &HistoriesStorage {
        &self.histories
    }
    // endregion Getters
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("time_step must be positive, got {0}")]
    NonPositiveTimeStep(f64),
    #[error("total_time must be positive, got {0}")]
    NonPositiveTotalTime(f64),
    #[error("temperature must be positive, got {0}")]
    NonPositiveTemperature(f64),
    #[error("init_buffer_capacity cannot be negative, got {0}")]
    NegativeBufferCapacity(f64),
    #[error("Channel '{channel}' uses free hydrogen but there is no '{hydrogen}' species")]
    MissingHydrogenSpecies { channel: String, hydrogen: String },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Unable to wire ion species: {0}")]
    Species(#[from] SpeciesError),
    #[error("Ion channel error: {0}")]
    Channel(#[from] ChannelError),
    #[error("Unable to record histories: {0}")]
    Histories(#[from] HistoriesError),
    #[error("Unknown ion species '{0}'")]
    UnknownSpecies(String),
    #[error("Unknown ion channel '{0}'")]
    UnknownChannel(String),
    #[error("An ion species named '{0}' already exists")]
    DuplicateSpecies(String),
    #[error("An ion channel named '{0}' already exists")]
    DuplicateChannel(String),
    #[error("Cannot {operation} while the simulation is {status}")]
    InvalidState {
        operation: &'static str,
        status: SimulationStatus,
    },
}
