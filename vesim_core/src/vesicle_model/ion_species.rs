//! This module provides the IonSpecies struct, tracking the amount of one ion inside the vesicle
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use thiserror::Error;

use crate::histories::{EntityKind, Trackable};
use crate::vesicle_model::flux_parameters::FluxCalculationParameters;
use crate::vesicle_model::ion_channel::{ChannelError, IonChannel};
use crate::vesicle_model::{ChannelRef, SpeciesRef};

/// Smallest vesicle concentration a species may hold, mol/L
pub const MIN_CONCENTRATION: f64 = 1e-9;

/// An ion species with a dynamic concentration in the vesicle and a fixed one in the exterior
#[derive(Debug)]
pub struct IonSpecies {
    /// Used to identify the species (must be unique)
    display_name: String,
    /// Vesicle concentration at the start, mol/L
    init_vesicle_conc: f64,
    /// Exterior concentration, mol/L
    exterior_conc: f64,
    /// Charge number (e.g. -1 for chloride)
    elementary_charge: f64,
    vesicle_conc: f64,
    /// Amount inside the vesicle, mol
    vesicle_amount: f64,
    /// Channels moving this species, in connection order
    channels: Vec<Weak<RefCell<IonChannel>>>,
}

impl IonSpecies {
    pub fn new(
        display_name: &str,
        init_vesicle_conc: f64,
        exterior_conc: f64,
        elementary_charge: f64,
    ) -> IonSpecies {
        let mut species = IonSpecies {
            display_name: display_name.to_string(),
            init_vesicle_conc,
            exterior_conc,
            elementary_charge,
            vesicle_conc: init_vesicle_conc,
            vesicle_amount: 0.0,
            channels: Vec::new(),
        };
        species.set_vesicle_conc(init_vesicle_conc);
        species
    }

    /// Wrap the species for sharing between the simulation, its channels and the histories
    pub fn wrap(self) -> SpeciesRef {
        Rc::new(RefCell::new(self))
    }

    /// Connect a channel to this species
    ///
    /// For a two ion channel the pair (species, secondary) may be given in either order,
    /// the roles are assigned from the allowed primary and secondary ions of the channel.
    ///
    /// # Errors
    /// - [`SpeciesError::MissingSecondary`] if the channel is two ion and no secondary is given
    /// - [`SpeciesError::IncompatiblePair`] if the pair does not match the channel in any order
    /// - [`SpeciesError::UnexpectedSecondary`] if the channel is single ion and a secondary is given
    /// - [`SpeciesError::Unsupported`] if the species is not the primary of a single ion channel
    pub fn connect_channel(
        species: &SpeciesRef,
        channel: &ChannelRef,
        secondary: Option<&SpeciesRef>,
    ) -> Result<(), SpeciesError> {
        let species_name = species.borrow().display_name.clone();
        let (channel_name, allowed_primary, allowed_secondary) = {
            let channel = channel.borrow();
            (
                channel.config().display_name.clone(),
                channel.allowed_primary_ion().to_string(),
                channel.allowed_secondary_ion().map(str::to_string),
            )
        };

        match (allowed_secondary, secondary) {
            (Some(_), None) => {
                return Err(SpeciesError::MissingSecondary {
                    channel: channel_name,
                    species: species_name,
                })
            }
            (Some(allowed_secondary), Some(secondary)) => {
                let secondary_name = secondary.borrow().display_name.clone();
                if species_name == allowed_primary && secondary_name == allowed_secondary {
                    channel
                        .borrow_mut()
                        .connect_species(species, Some(secondary))?;
                } else if species_name == allowed_secondary && secondary_name == allowed_primary {
                    channel
                        .borrow_mut()
                        .connect_species(secondary, Some(species))?;
                } else {
                    return Err(SpeciesError::IncompatiblePair {
                        channel: channel_name,
                        primary: species_name,
                        secondary: secondary_name,
                        expected_primary: allowed_primary,
                        expected_secondary: allowed_secondary,
                    });
                }
            }
            (None, Some(secondary)) => {
                return Err(SpeciesError::UnexpectedSecondary {
                    channel: channel_name,
                    species: species_name,
                    secondary: secondary.borrow().display_name.clone(),
                })
            }
            (None, None) => {
                if species_name != allowed_primary {
                    return Err(SpeciesError::Unsupported {
                        channel: channel_name,
                        species: species_name,
                        expected: allowed_primary,
                    });
                }
                channel.borrow_mut().connect_species(species, None)?;
            }
        }

        species.borrow_mut().channels.push(Rc::downgrade(channel));
        log::debug!("Connected channel '{}' to species '{}'", channel_name, species_name);
        Ok(())
    }

    /// Sum of the fluxes of every connected channel, mol/s
    ///
    /// Every channel caches the flux it computed, so this also refreshes the channel
    /// histories.
    pub fn compute_total_flux(
        &self,
        params: &FluxCalculationParameters,
    ) -> Result<f64, SpeciesError> {
        let mut total_flux = 0.0;
        for channel in &self.channels {
            let channel = channel
                .upgrade()
                .ok_or_else(|| SpeciesError::ChannelDropped {
                    species: self.display_name.clone(),
                })?;
            let flux = channel.borrow_mut().compute_flux(params)?;
            total_flux += flux;
        }
        Ok(total_flux)
    }

    // region Setters
    /// Set the vesicle concentration, values at or below zero are raised to [`MIN_CONCENTRATION`]
    pub fn set_vesicle_conc(&mut self, value: f64) {
        if value <= 0.0 {
            log::warn!(
                "Species '{}': vesicle concentration {} is not positive, using {}",
                self.display_name,
                value,
                MIN_CONCENTRATION
            );
            self.vesicle_conc = MIN_CONCENTRATION;
        } else {
            self.vesicle_conc = value;
        }
    }

    /// Set the vesicle amount, negative values are raised to zero
    pub fn set_vesicle_amount(&mut self, value: f64) {
        if value < 0.0 {
            log::warn!(
                "Species '{}': vesicle amount {} is negative, using 0",
                self.display_name,
                value
            );
            self.vesicle_amount = 0.0;
        } else {
            self.vesicle_amount = value;
        }
    }
    // endregion Setters

    // region Getters
    pub fn init_vesicle_conc(&self) -> f64 {
        self.init_vesicle_conc
    }

    pub fn exterior_conc(&self) -> f64 {
        self.exterior_conc
    }

    pub fn elementary_charge(&self) -> f64 {
        self.elementary_charge
    }

    pub fn vesicle_conc(&self) -> f64 {
        self.vesicle_conc
    }

    pub fn vesicle_amount(&self) -> f64 {
        self.vesicle_amount
    }

    /// Display names of the connected channels, in connection order
    pub fn channel_names(&self) -> Vec<String> {
        self.channels
            .iter()
            .filter_map(Weak::upgrade)
            .map(|channel| channel.borrow().config().display_name.clone())
            .collect()
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
    // endregion Getters
}

impl Trackable for IonSpecies {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::IonSpecies
    }

    fn current_state(&self) -> IndexMap<String, f64> {
        IndexMap::from([
            ("vesicle_conc".to_string(), self.vesicle_conc),
            ("vesicle_amount".to_string(), self.vesicle_amount),
        ])
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeciesError {
    #[error("Two-ion channel '{channel}' requires a secondary ion species to connect '{species}'")]
    MissingSecondary { channel: String, species: String },
    #[error("Channel '{channel}' does not support the ion pair: primary='{primary}', secondary='{secondary}', expected '{expected_primary}' and '{expected_secondary}'")]
    IncompatiblePair {
        channel: String,
        primary: String,
        secondary: String,
        expected_primary: String,
        expected_secondary: String,
    },
    #[error("Channel '{channel}' does not support the ion species '{species}', expected primary ion '{expected}'")]
    Unsupported {
        channel: String,
        species: String,
        expected: String,
    },
    #[error("Single-ion channel '{channel}' cannot take a secondary ion species ('{secondary}') for '{species}'")]
    UnexpectedSecondary {
        channel: String,
        species: String,
        secondary: String,
    },
    #[error("A channel connected to species '{species}' no longer exists")]
    ChannelDropped { species: String },
    #[error(transparent)]
    Channel(#[from] ChannelError),
}
