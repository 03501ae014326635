//! This module provides the IonChannel struct, which moves ions across the membrane according
//! to a Nernst potential based flux law with optional logistic gating
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};
use std::str::FromStr;

use derive_builder::Builder;
use indexmap::IndexMap;
use thiserror::Error;

use crate::histories::{EntityKind, Trackable};
use crate::vesicle_model::flux_parameters::FluxCalculationParameters;
use crate::vesicle_model::ion_species::IonSpecies;
use crate::vesicle_model::vesicle::{SAFE_HALF_ACT_VOLTAGE, SAFE_VOLTAGE_EXPONENT};
use crate::vesicle_model::{ChannelRef, SpeciesRef};

// region Channel Configuration
/// Parameters of an ion channel, fixed once the channel is created
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct IonChannelConfig {
    /// Used to identify the channel (must be unique)
    #[builder(setter(into))]
    pub display_name: String,
    /// Permeability per unit area
    #[builder(default = "0.0")]
    pub conductance: f64,
    /// Channel variant, used to look up default pH gating parameters
    #[builder(default = "None")]
    pub channel_type: Option<ChannelType>,
    /// Which signals gate the channel (see [`DependenceType`])
    #[builder(default = "DependenceType::None")]
    pub dependence_type: DependenceType,
    #[builder(default = "1.0")]
    pub voltage_multiplier: f64,
    #[builder(default = "1.0")]
    pub nernst_multiplier: f64,
    /// Voltage subtracted from both the potential and the gated voltage, V
    #[builder(default = "0.0")]
    pub voltage_shift: f64,
    #[builder(default = "1.0")]
    pub flux_multiplier: f64,
    /// Display name of the ion species this channel moves
    #[builder(setter(into))]
    pub allowed_primary_ion: String,
    /// Display name of the second ion species for exchangers, None for single ion channels
    #[builder(setter(into, strip_option), default = "None")]
    pub allowed_secondary_ion: Option<String>,
    /// Stoichiometric exponent of the primary ion
    #[builder(default = "1")]
    pub primary_exponent: i32,
    /// Stoichiometric exponent of the secondary ion
    #[builder(default = "1")]
    pub secondary_exponent: i32,
    /// Replaces the simulation Nernst constant when non-zero
    #[builder(default = "0.0")]
    pub custom_nernst_constant: f64,
    /// Use the free (unbuffered) hydrogen concentrations for the hydrogen species
    #[builder(default = "false")]
    pub use_free_hydrogen: bool,
    #[builder(default = "0.0")]
    pub voltage_exponent: f64,
    #[builder(default = "0.0")]
    pub half_act_voltage: f64,
    #[builder(default = "0.0")]
    pub ph_exponent: f64,
    #[builder(default = "0.0")]
    pub half_act_ph: f64,
    #[builder(default = "0.0")]
    pub time_exponent: f64,
    #[builder(default = "0.0")]
    pub half_act_time: f64,
}

impl IonChannelConfig {
    /// Whether this channel exchanges two ion species
    pub fn is_two_ion(&self) -> bool {
        self.allowed_secondary_ion
            .as_deref()
            .is_some_and(|ion| !ion.is_empty())
    }

    /// Exponent and half activation point of a gating axis
    pub fn gating_parameters(&self, axis: GatingAxis) -> (f64, f64) {
        match axis {
            GatingAxis::Voltage => (self.voltage_exponent, self.half_act_voltage),
            GatingAxis::Ph => (self.ph_exponent, self.half_act_ph),
            GatingAxis::Time => (self.time_exponent, self.half_act_time),
        }
    }

    /// Fill in gating parameters for the active axes which are unset
    ///
    /// pH gating falls back to the defaults of the channel type, voltage gating to an
    /// exponent of 80 with half activation at -40 mV. Time gating has no default.
    pub fn apply_gating_defaults(&mut self) {
        let axes = self.dependence_type.axes();
        if axes.contains(&GatingAxis::Ph) && (self.ph_exponent == 0.0 || self.half_act_ph == 0.0) {
            let (exponent, half_act) = self.channel_type.unwrap_or_default().default_ph_gating();
            self.ph_exponent = exponent;
            self.half_act_ph = half_act;
        }
        if axes.contains(&GatingAxis::Voltage)
            && (self.voltage_exponent == 0.0 || self.half_act_voltage == 0.0)
        {
            self.voltage_exponent = SAFE_VOLTAGE_EXPONENT;
            self.half_act_voltage = SAFE_HALF_ACT_VOLTAGE;
        }
    }
}

/// Signals which gate a channel
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DependenceType {
    /// Always fully open
    #[default]
    None,
    Voltage,
    Ph,
    Time,
    VoltageAndPh,
}

impl DependenceType {
    /// Gating axes active for this dependence type
    pub fn axes(&self) -> &'static [GatingAxis] {
        match self {
            DependenceType::None => &[],
            DependenceType::Voltage => &[GatingAxis::Voltage],
            DependenceType::Ph => &[GatingAxis::Ph],
            DependenceType::Time => &[GatingAxis::Time],
            DependenceType::VoltageAndPh => &[GatingAxis::Ph, GatingAxis::Voltage],
        }
    }
}

impl FromStr for DependenceType {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(DependenceType::None),
            "voltage" => Ok(DependenceType::Voltage),
            "pH" => Ok(DependenceType::Ph),
            "time" => Ok(DependenceType::Time),
            "voltage_and_pH" => Ok(DependenceType::VoltageAndPh),
            other => Err(ChannelError::UnknownDependenceType(other.to_string())),
        }
    }
}

impl Display for DependenceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DependenceType::None => write!(f, "none"),
            DependenceType::Voltage => write!(f, "voltage"),
            DependenceType::Ph => write!(f, "pH"),
            DependenceType::Time => write!(f, "time"),
            DependenceType::VoltageAndPh => write!(f, "voltage_and_pH"),
        }
    }
}

/// Channel variants with known pH gating behaviour
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// Wild type
    #[default]
    Wt,
    /// Mutant
    Mt,
    /// Chloride/proton exchanger
    Clc,
}

impl ChannelType {
    /// Default (exponent, half activation pH) of the pH gating
    pub fn default_ph_gating(&self) -> (f64, f64) {
        match self {
            ChannelType::Wt => (3.0, 5.4),
            ChannelType::Mt => (1.0, 7.4),
            ChannelType::Clc => (-1.5, 5.5),
        }
    }
}

impl FromStr for ChannelType {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wt" => Ok(ChannelType::Wt),
            "mt" => Ok(ChannelType::Mt),
            "clc" => Ok(ChannelType::Clc),
            other => Err(ChannelError::UnknownChannelType(other.to_string())),
        }
    }
}

/// The signals a channel can be gated by
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GatingAxis {
    Voltage,
    Ph,
    Time,
}
// endregion Channel Configuration

/// An ion channel (or exchanger) in the vesicle membrane
#[derive(Debug)]
pub struct IonChannel {
    config: IonChannelConfig,
    /// Species moved by the channel, matching `allowed_primary_ion`
    primary: Option<Weak<RefCell<IonSpecies>>>,
    /// Second species of an exchanger, matching `allowed_secondary_ion`
    secondary: Option<Weak<RefCell<IonSpecies>>>,
    flux: f64,
    nernst_potential: f64,
    ph_dependence: f64,
    voltage_dependence: f64,
    time_dependence: f64,
}

impl IonChannel {
    pub fn new(config: IonChannelConfig) -> IonChannel {
        IonChannel {
            config,
            primary: None,
            secondary: None,
            flux: 0.0,
            nernst_potential: 0.0,
            ph_dependence: 1.0,
            voltage_dependence: 1.0,
            time_dependence: 1.0,
        }
    }

    /// Wrap the channel for sharing between the simulation, its species and the histories
    pub fn wrap(self) -> ChannelRef {
        Rc::new(RefCell::new(self))
    }

    /// Store references to the species moved by this channel
    ///
    /// The species must already be in the roles given by the allowed primary and
    /// secondary ions, see [`IonSpecies::connect_channel`] for the validated entry point.
    pub fn connect_species(
        &mut self,
        primary: &SpeciesRef,
        secondary: Option<&SpeciesRef>,
    ) -> Result<(), ChannelError> {
        match (self.config.is_two_ion(), secondary) {
            (true, None) => {
                return Err(ChannelError::SecondaryNotConnected {
                    channel: self.config.display_name.clone(),
                })
            }
            (false, Some(secondary)) => {
                return Err(ChannelError::UnexpectedSecondary {
                    channel: self.config.display_name.clone(),
                    secondary: secondary.borrow().display_name().to_string(),
                })
            }
            _ => {}
        }
        self.primary = Some(Rc::downgrade(primary));
        self.secondary = secondary.map(Rc::downgrade);
        Ok(())
    }

    // region Flux Model
    /// Logistic gating factor of one axis, cached for tracking
    ///
    /// Returns 1 when the exponent or the half activation point of the axis is unset.
    ///
    /// # Note:
    /// factor = 1 / (1 + exp(exponent * (value - half_activation))), where the voltage
    /// axis uses value * voltage_multiplier - voltage_shift as its value
    pub fn gating_factor(&mut self, axis: GatingAxis, value: f64) -> f64 {
        let (exponent, half_activation) = self.config.gating_parameters(axis);
        let factor = if exponent == 0.0 || half_activation == 0.0 {
            1.0
        } else {
            let effective = match axis {
                GatingAxis::Voltage => {
                    value * self.config.voltage_multiplier - self.config.voltage_shift
                }
                GatingAxis::Ph | GatingAxis::Time => value,
            };
            1.0 / (1.0 + (exponent * (effective - half_activation)).exp())
        };
        match axis {
            GatingAxis::Voltage => self.voltage_dependence = factor,
            GatingAxis::Ph => self.ph_dependence = factor,
            GatingAxis::Time => self.time_dependence = factor,
        }
        factor
    }

    /// Natural log of the concentration ratio driving the channel
    ///
    /// # Note:
    /// Single ion: ln((ext / ves)^p).
    /// Two ion: ln((ext_p / ves_p)^p * (ves_s / ext_s)^s).
    /// Non-positive concentrations or ratios give 0.
    pub fn compute_log_term(&self, params: &FluxCalculationParameters) -> Result<f64, ChannelError> {
        let channel = &self.config.display_name;
        let primary = self
            .primary
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| ChannelError::NotConnected {
                channel: channel.clone(),
            })?;
        let primary = primary.borrow();
        if primary.display_name() != self.config.allowed_primary_ion {
            return Err(ChannelError::PrimaryMismatch {
                channel: channel.clone(),
                expected: self.config.allowed_primary_ion.clone(),
                actual: primary.display_name().to_string(),
            });
        }
        let secondary = self.secondary.as_ref().and_then(Weak::upgrade);
        if self.config.is_two_ion() && secondary.is_none() {
            return Err(ChannelError::SecondaryNotConnected {
                channel: channel.clone(),
            });
        }
        let secondary = secondary.as_ref().map(|species| species.borrow());
        if let Some(secondary) = &secondary {
            let expected = self.config.allowed_secondary_ion.as_deref().unwrap_or_default();
            if secondary.display_name() != expected {
                return Err(ChannelError::SecondaryMismatch {
                    channel: channel.clone(),
                    expected: expected.to_string(),
                    actual: secondary.display_name().to_string(),
                });
            }
        }

        let (vesicle_primary, exterior_primary) = self.concentrations(&primary, params);
        if vesicle_primary <= 0.0 || exterior_primary <= 0.0 {
            log::warn!(
                "Channel '{}': non-positive {} concentration, log term set to zero",
                channel,
                primary.display_name()
            );
            return Ok(0.0);
        }
        let mut ratio = (exterior_primary / vesicle_primary).powi(self.config.primary_exponent);

        if let Some(secondary) = &secondary {
            let (vesicle_secondary, exterior_secondary) = self.concentrations(secondary, params);
            if vesicle_secondary <= 0.0 || exterior_secondary <= 0.0 {
                log::warn!(
                    "Channel '{}': non-positive {} concentration, log term set to zero",
                    channel,
                    secondary.display_name()
                );
                return Ok(0.0);
            }
            ratio *= (vesicle_secondary / exterior_secondary).powi(self.config.secondary_exponent);
        }

        if ratio <= 0.0 || !ratio.is_finite() {
            log::warn!("Channel '{}': concentration ratio {} has no finite log", channel, ratio);
            return Ok(0.0);
        }
        Ok(ratio.ln())
    }

    /// Vesicle and exterior concentrations of a species as seen by this channel
    fn concentrations(&self, species: &IonSpecies, params: &FluxCalculationParameters) -> (f64, f64) {
        if self.config.use_free_hydrogen && params.hydrogen_species == species.display_name() {
            (params.vesicle_hydrogen_free, params.exterior_hydrogen_free)
        } else {
            (species.vesicle_conc(), species.exterior_conc())
        }
    }

    /// Driving potential of the channel, cached for tracking
    ///
    /// # Note:
    /// voltage_multiplier * V + nernst_multiplier * k * log_term - voltage_shift, where k is
    /// the custom Nernst constant if set and the simulation Nernst constant otherwise
    pub fn compute_nernst_potential(
        &mut self,
        params: &FluxCalculationParameters,
    ) -> Result<f64, ChannelError> {
        let nernst_constant = if self.config.custom_nernst_constant != 0.0 {
            self.config.custom_nernst_constant
        } else {
            params.nernst_constant
        };
        let log_term = self.compute_log_term(params)?;
        let potential = self.config.voltage_multiplier * params.voltage
            + self.config.nernst_multiplier * nernst_constant * log_term
            - self.config.voltage_shift;
        self.nernst_potential = potential;
        Ok(potential)
    }

    /// Flux through the channel in mol/s, cached for tracking
    ///
    /// Positive flux moves the primary ion into the vesicle. A channel with zero
    /// conductance returns 0 without evaluating gating or the potential.
    pub fn compute_flux(&mut self, params: &FluxCalculationParameters) -> Result<f64, ChannelError> {
        if self.config.conductance == 0.0 {
            self.flux = 0.0;
            return Ok(0.0);
        }
        let mut gating = 1.0;
        for &axis in self.config.dependence_type.axes() {
            let value = match axis {
                GatingAxis::Voltage => params.voltage,
                GatingAxis::Ph => params.ph,
                GatingAxis::Time => params.time,
            };
            gating *= self.gating_factor(axis, value);
        }
        let nernst_potential = self.compute_nernst_potential(params)?;
        let mut flux =
            self.config.flux_multiplier * nernst_potential * self.config.conductance * params.area;
        flux *= gating;
        self.flux = flux;
        Ok(flux)
    }
    // endregion Flux Model

    // region Getters
    pub fn config(&self) -> &IonChannelConfig {
        &self.config
    }

    pub fn allowed_primary_ion(&self) -> &str {
        &self.config.allowed_primary_ion
    }

    /// The allowed secondary ion, None for single ion channels
    pub fn allowed_secondary_ion(&self) -> Option<&str> {
        self.config
            .allowed_secondary_ion
            .as_deref()
            .filter(|ion| !ion.is_empty())
    }

    pub fn is_two_ion(&self) -> bool {
        self.config.is_two_ion()
    }

    /// Whether the primary (and for exchangers the secondary) species are connected
    pub fn is_connected(&self) -> bool {
        let alive = |species: &Option<Weak<RefCell<IonSpecies>>>| {
            species.as_ref().is_some_and(|s| s.strong_count() > 0)
        };
        alive(&self.primary) && (!self.is_two_ion() || alive(&self.secondary))
    }

    pub fn flux(&self) -> f64 {
        self.flux
    }

    pub fn nernst_potential(&self) -> f64 {
        self.nernst_potential
    }

    pub fn ph_dependence(&self) -> f64 {
        self.ph_dependence
    }

    pub fn voltage_dependence(&self) -> f64 {
        self.voltage_dependence
    }

    pub fn time_dependence(&self) -> f64 {
        self.time_dependence
    }
    // endregion Getters
}

impl Trackable for IonChannel {
    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::IonChannel
    }

    fn current_state(&self) -> IndexMap<String, f64> {
        IndexMap::from([
            ("flux".to_string(), self.flux),
            ("nernst_potential".to_string(), self.nernst_potential),
            ("pH_dependence".to_string(), self.ph_dependence),
            ("voltage_dependence".to_string(), self.voltage_dependence),
            ("time_dependence".to_string(), self.time_dependence),
        ])
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChannelError {
    #[error("Channel '{channel}' has no primary ion species connected")]
    NotConnected { channel: String },
    #[error("Primary species mismatch: channel '{channel}' expects '{expected}' but is connected to '{actual}'")]
    PrimaryMismatch {
        channel: String,
        expected: String,
        actual: String,
    },
    #[error("Two-ion channel '{channel}' has no secondary ion species connected")]
    SecondaryNotConnected { channel: String },
    #[error("Secondary species mismatch: channel '{channel}' expects '{expected}' but is connected to '{actual}'")]
    SecondaryMismatch {
        channel: String,
        expected: String,
        actual: String,
    },
    #[error("Single-ion channel '{channel}' cannot be connected to a secondary species ('{secondary}')")]
    UnexpectedSecondary { channel: String, secondary: String },
    #[error("Unknown dependence type '{0}'")]
    UnknownDependenceType(String),
    #[error("Unknown channel type '{0}'")]
    UnknownChannelType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FluxCalculationParameters {
        FluxCalculationParameters {
            voltage: 0.01,
            ph: 7.0,
            time: 2.0,
            area: 2e-11,
            nernst_constant: 0.0267,
            vesicle_hydrogen_free: 4e-8,
            exterior_hydrogen_free: 6e-8,
            hydrogen_species: "h".to_string(),
        }
    }

    fn species(name: &str, vesicle: f64, exterior: f64) -> SpeciesRef {
        IonSpecies::new(name, vesicle, exterior, 1.0).wrap()
    }

    fn single_ion(name: &str, ion: &str) -> IonChannelConfigBuilder {
        let mut builder = IonChannelConfigBuilder::default();
        builder.display_name(name).allowed_primary_ion(ion);
        builder
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1e-300)
    }

    #[test]
    fn zero_conductance_gives_zero_flux() {
        let config = single_ion("leak", "k")
            .conductance(0.0)
            .dependence_type(DependenceType::VoltageAndPh)
            .voltage_exponent(80.0)
            .half_act_voltage(-0.04)
            .build()
            .unwrap();
        // Not even connected: nothing is evaluated
        let mut channel = IonChannel::new(config);
        assert_eq!(channel.compute_flux(&params()).unwrap(), 0.0);
        assert_eq!(channel.flux(), 0.0);
        assert_eq!(channel.voltage_dependence(), 1.0);
    }

    #[test]
    fn unset_gating_is_neutral() {
        let mut channel = IonChannel::new(single_ion("c", "k").build().unwrap());
        assert_eq!(channel.gating_factor(GatingAxis::Voltage, 0.3), 1.0);
        assert_eq!(channel.gating_factor(GatingAxis::Ph, 3.0), 1.0);
        assert_eq!(channel.gating_factor(GatingAxis::Time, 10.0), 1.0);
    }

    #[test]
    fn logistic_gating() {
        let config = single_ion("c", "k")
            .voltage_exponent(80.0)
            .half_act_voltage(-0.04)
            .voltage_multiplier(2.0)
            .voltage_shift(0.01)
            .ph_exponent(3.0)
            .half_act_ph(5.4)
            .time_exponent(1.0)
            .half_act_time(2.0)
            .build()
            .unwrap();
        let mut channel = IonChannel::new(config);
        // 2 * (-0.015) - 0.01 = -0.04 is the half activation point
        assert!(close(channel.gating_factor(GatingAxis::Voltage, -0.015), 0.5));
        assert!(close(channel.voltage_dependence(), 0.5));
        assert!(close(channel.gating_factor(GatingAxis::Ph, 5.4), 0.5));
        let expected = 1.0 / (1.0 + (3.0f64 * (7.0 - 5.4)).exp());
        assert!(close(channel.gating_factor(GatingAxis::Ph, 7.0), expected));
        assert!(close(channel.ph_dependence(), expected));
        assert!(close(channel.gating_factor(GatingAxis::Time, 2.0), 0.5));
        // Overflowing exponentials close the gate instead of producing NaN
        assert_eq!(channel.gating_factor(GatingAxis::Voltage, 100.0), 0.0);
    }

    #[test]
    fn single_ion_log_term() {
        let k = species("k", 0.005, 0.14);
        let mut channel = IonChannel::new(single_ion("kc", "k").primary_exponent(2).build().unwrap());
        channel.connect_species(&k, None).unwrap();
        let expected = (0.14f64 / 0.005).powi(2).ln();
        assert!(close(channel.compute_log_term(&params()).unwrap(), expected));
    }

    #[test]
    fn two_ion_log_term() {
        let cl = species("cl", 0.159, 0.02);
        let h = species("h", 8e-5, 1.2e-4);
        let config = single_ion("clc", "cl")
            .allowed_secondary_ion("h")
            .primary_exponent(2)
            .secondary_exponent(1)
            .build()
            .unwrap();
        let mut channel = IonChannel::new(config);
        channel.connect_species(&cl, Some(&h)).unwrap();
        let expected = ((0.02f64 / 0.159).powi(2) * (8e-5 / 1.2e-4)).ln();
        assert!(close(channel.compute_log_term(&params()).unwrap(), expected));
    }

    #[test]
    fn free_hydrogen_substitution() {
        let h = species("h", 8e-5, 1.2e-4);
        let config = single_ion("hleak", "h").use_free_hydrogen(true).build().unwrap();
        let mut channel = IonChannel::new(config);
        channel.connect_species(&h, None).unwrap();
        let expected = (6e-8f64 / 4e-8).ln();
        assert!(close(channel.compute_log_term(&params()).unwrap(), expected));
    }

    #[test]
    fn free_hydrogen_follows_snapshot_species_name() {
        let h = species("h", 8e-5, 1.2e-4);
        let config = single_ion("hleak", "h").use_free_hydrogen(true).build().unwrap();
        let mut channel = IonChannel::new(config);
        channel.connect_species(&h, None).unwrap();
        let mut snapshot = params();
        snapshot.hydrogen_species = "proton".to_string();
        let expected = (1.2e-4f64 / 8e-5).ln();
        assert!(close(channel.compute_log_term(&snapshot).unwrap(), expected));
    }

    #[test]
    fn non_positive_concentration_gives_zero_log_term() {
        let h = species("h", 8e-5, 1.2e-4);
        let config = single_ion("hleak", "h").use_free_hydrogen(true).build().unwrap();
        let mut channel = IonChannel::new(config);
        channel.connect_species(&h, None).unwrap();
        let mut snapshot = params();
        snapshot.vesicle_hydrogen_free = 0.0;
        assert_eq!(channel.compute_log_term(&snapshot).unwrap(), 0.0);

        let na = species("na", 0.15, 0.0);
        let mut channel = IonChannel::new(single_ion("tpc", "na").build().unwrap());
        channel.connect_species(&na, None).unwrap();
        assert_eq!(channel.compute_log_term(&params()).unwrap(), 0.0);
    }

    #[test]
    fn log_term_wiring_errors() {
        let channel = IonChannel::new(single_ion("kc", "k").build().unwrap());
        assert_eq!(
            channel.compute_log_term(&params()),
            Err(ChannelError::NotConnected {
                channel: "kc".to_string()
            })
        );

        let na = species("na", 0.15, 0.01);
        let mut channel = IonChannel::new(single_ion("kc", "k").build().unwrap());
        channel.connect_species(&na, None).unwrap();
        assert_eq!(
            channel.compute_log_term(&params()),
            Err(ChannelError::PrimaryMismatch {
                channel: "kc".to_string(),
                expected: "k".to_string(),
                actual: "na".to_string()
            })
        );

        let cl = species("cl", 0.159, 0.02);
        let mut exchanger = IonChannel::new(
            single_ion("clc", "cl")
                .allowed_secondary_ion("h")
                .build()
                .unwrap(),
        );
        assert_eq!(
            exchanger.connect_species(&cl, None),
            Err(ChannelError::SecondaryNotConnected {
                channel: "clc".to_string()
            })
        );
        exchanger.connect_species(&cl, Some(&na)).unwrap();
        assert_eq!(
            exchanger.compute_log_term(&params()),
            Err(ChannelError::SecondaryMismatch {
                channel: "clc".to_string(),
                expected: "h".to_string(),
                actual: "na".to_string()
            })
        );
    }

    #[test]
    fn nernst_potential_and_flux() {
        let k = species("k", 0.005, 0.14);
        let config = single_ion("kc", "k")
            .conductance(1e-6)
            .voltage_multiplier(-1.0)
            .nernst_multiplier(1.0)
            .voltage_shift(0.002)
            .flux_multiplier(2.0)
            .dependence_type(DependenceType::Ph)
            .ph_exponent(3.0)
            .half_act_ph(5.4)
            .build()
            .unwrap();
        let mut channel = IonChannel::new(config);
        channel.connect_species(&k, None).unwrap();
        let p = params();
        let log_term = (0.14f64 / 0.005).ln();
        let potential = -1.0 * p.voltage + p.nernst_constant * log_term - 0.002;
        let gate = 1.0 / (1.0 + (3.0f64 * (p.ph - 5.4)).exp());
        let flux = channel.compute_flux(&p).unwrap();
        assert!(close(channel.nernst_potential(), potential));
        assert!(close(flux, 2.0 * potential * 1e-6 * p.area * gate));
        assert!(close(channel.flux(), flux));
        assert!(close(channel.ph_dependence(), gate));
        // Axes not selected by the dependence type stay neutral
        assert_eq!(channel.voltage_dependence(), 1.0);
        assert_eq!(channel.time_dependence(), 1.0);
    }

    #[test]
    fn custom_nernst_constant_overrides() {
        let k = species("k", 0.005, 0.14);
        let config = single_ion("kc", "k")
            .custom_nernst_constant(1.0)
            .voltage_multiplier(0.0)
            .build()
            .unwrap();
        let mut channel = IonChannel::new(config);
        channel.connect_species(&k, None).unwrap();
        let potential = channel.compute_nernst_potential(&params()).unwrap();
        assert!(close(potential, (0.14f64 / 0.005).ln()));
    }

    #[test]
    fn gating_defaults_from_channel_type() {
        let mut config = single_ion("clc", "cl")
            .channel_type(Some(ChannelType::Clc))
            .dependence_type(DependenceType::VoltageAndPh)
            .build()
            .unwrap();
        config.apply_gating_defaults();
        assert_eq!(config.gating_parameters(GatingAxis::Ph), (-1.5, 5.5));
        assert_eq!(config.gating_parameters(GatingAxis::Voltage), (80.0, -0.04));
        assert_eq!(config.gating_parameters(GatingAxis::Time), (0.0, 0.0));
    }

    #[test]
    fn parse_tags() {
        assert_eq!(
            "voltage_and_pH".parse::<DependenceType>(),
            Ok(DependenceType::VoltageAndPh)
        );
        assert_eq!("".parse::<DependenceType>(), Ok(DependenceType::None));
        assert_eq!(
            "ph".parse::<DependenceType>(),
            Err(ChannelError::UnknownDependenceType("ph".to_string()))
        );
        assert_eq!("mt".parse::<ChannelType>(), Ok(ChannelType::Mt));
        assert_eq!(DependenceType::Ph.to_string(), "pH");
    }
}
