//! This module provides the Vesicle struct, holding the geometry and electrical state of the
//! compartment
use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::histories::{EntityKind, Trackable};

/// Voltage gating exponent used to bound the initial voltage
pub const SAFE_VOLTAGE_EXPONENT: f64 = 80.0;
/// Half activation voltage used to bound the initial voltage, V
pub const SAFE_HALF_ACT_VOLTAGE: f64 = -0.04;

/// Largest initial voltage magnitude for which the logistic voltage gating stays finite
pub fn max_safe_voltage() -> f64 {
    709.0 / SAFE_VOLTAGE_EXPONENT + SAFE_HALF_ACT_VOLTAGE
}

/// Parameters describing a vesicle before the simulation starts
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VesicleParameters {
    /// Initial radius, m
    #[builder(default = "1.3e-6")]
    pub init_radius: f64,
    /// Initial membrane voltage, V
    #[builder(default = "4e-2")]
    pub init_voltage: f64,
    /// Initial lumen pH
    #[builder(default = "7.4")]
    pub init_ph: f64,
    /// Membrane capacitance per unit area, F/m^2
    #[builder(default = "1e-2")]
    pub specific_capacitance: f64,
    /// Used to identify the vesicle
    #[builder(default = "\"Vesicle\".to_string()")]
    pub display_name: String,
}

impl Default for VesicleParameters {
    fn default() -> Self {
        VesicleParameters {
            init_radius: 1.3e-6,
            init_voltage: 4e-2,
            init_ph: 7.4,
            specific_capacitance: 1e-2,
            display_name: "Vesicle".to_string(),
        }
    }
}

/// The membrane bound compartment
///
/// Geometry is that of a sphere: the initial values derive from the initial radius, later
/// areas derive from the current volume so the vesicle can swell or shrink.
#[derive(Clone, Debug, PartialEq)]
pub struct Vesicle {
    display_name: String,
    specific_capacitance: f64,
    init_radius: f64,
    init_voltage: f64,
    init_ph: f64,
    init_volume: f64,
    init_area: f64,
    init_capacitance: f64,
    init_charge: f64,
    ph: f64,
    volume: f64,
    area: f64,
    capacitance: f64,
    charge: f64,
    voltage: f64,
}

impl Vesicle {
    /// Create a new vesicle, clamping the initial voltage into the safe range
    pub fn new(params: VesicleParameters) -> Vesicle {
        let max_voltage = max_safe_voltage();
        let init_voltage = if params.init_voltage > max_voltage {
            log::warn!(
                "init_voltage {} exceeds the safe limit, clamping to {}",
                params.init_voltage,
                max_voltage
            );
            max_voltage
        } else if params.init_voltage < -max_voltage {
            log::warn!(
                "init_voltage {} is below the negative safe limit, clamping to {}",
                params.init_voltage,
                -max_voltage
            );
            -max_voltage
        } else {
            params.init_voltage
        };

        let init_volume = 4.0 / 3.0 * PI * params.init_radius.powi(3);
        let init_area = 4.0 * PI * params.init_radius.powi(2);
        let init_capacitance = init_area * params.specific_capacitance;
        let init_charge = init_voltage * init_capacitance;

        Vesicle {
            display_name: params.display_name,
            specific_capacitance: params.specific_capacitance,
            init_radius: params.init_radius,
            init_voltage,
            init_ph: params.init_ph,
            init_volume,
            init_area,
            init_capacitance,
            init_charge,
            ph: params.init_ph,
            volume: init_volume,
            area: init_area,
            capacitance: init_capacitance,
            charge: init_charge,
            voltage: init_voltage,
        }
    }

    /// Wrap the vesicle for shared use by the simulation and the histories
    pub fn wrap(self) -> Rc<RefCell<Vesicle>> {
        Rc::new(RefCell::new(self))
    }

    // region Updates
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    /// Recompute the area of a sphere with the current volume
    ///
    /// # Note:
    /// A = (36 pi)^(1/3) * V^(2/3)
    pub fn update_area(&mut self) {
        self.area = (36.0 * PI).cbrt() * self.volume.powf(2.0 / 3.0);
    }

    /// Recompute the capacitance from the current area
    pub fn update_capacitance(&mut self) {
        self.capacitance = self.area * self.specific_capacitance;
    }

    pub fn set_charge(&mut self, charge: f64) {
        self.charge = charge;
    }

    /// Recompute the voltage from the current charge and capacitance
    pub fn update_voltage(&mut self) {
        self.voltage = self.charge / self.capacitance;
    }

    pub fn set_ph(&mut self, ph: f64) {
        self.ph = ph;
    }
    // endregion Updates

    // region Getters
    pub fn specific_capacitance(&self) -> f64 {
        self.specific_capacitance
    }

    pub fn init_radius(&self) -> f64 {
        self.init_radius
    }

    /// Initial voltage after clamping
    pub fn init_voltage(&self) -> f64 {
        self.init_voltage
    }

    pub fn init_ph(&self) -> f64 {
        self.init_ph
    }

    pub fn init_volume(&self) -> f64 {
        self.init_volume
    }

    pub fn init_area(&self) -> f64 {
        self.init_area
    }

    pub fn init_capacitance(&self) -> f64 {
        self.init_capacitance
    }

    pub fn init_charge(&self) -> f64 {
        self.init_charge
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn capacitance(&self) -> f64 {
        self.capacitance
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn voltage(&self) -> f64 {
        self.voltage
    }
    // endregion Getters
}

impl Default for Vesicle {
    fn default() -> Self {
        Vesicle::new(VesicleParameters::default())
    }
}

impl Trackable for Vesicle {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Vesicle
    }

    fn current_state(&self) -> IndexMap<String, f64> {
        IndexMap::from([
            ("pH".to_string(), self.ph),
            ("volume".to_string(), self.volume),
            ("area".to_string(), self.area),
            ("capacitance".to_string(), self.capacitance),
            ("charge".to_string(), self.charge),
            ("voltage".to_string(), self.voltage),
        ])
    }
}
