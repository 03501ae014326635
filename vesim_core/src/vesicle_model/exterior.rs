//! This module provides the Exterior struct, representing the bath around the vesicle
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::histories::{EntityKind, Trackable};

/// The solution surrounding the vesicle
#[derive(Clone, Debug, PartialEq)]
pub struct Exterior {
    /// Used to identify the exterior
    display_name: String,
    /// Bath pH
    ph: f64,
}

impl Exterior {
    pub fn new(ph: f64, display_name: &str) -> Exterior {
        Exterior {
            display_name: display_name.to_string(),
            ph,
        }
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }

    pub fn set_ph(&mut self, ph: f64) {
        self.ph = ph;
    }

    /// Wrap the exterior for shared use by the simulation and the histories
    pub fn wrap(self) -> Rc<RefCell<Exterior>> {
        Rc::new(RefCell::new(self))
    }
}

impl Default for Exterior {
    fn default() -> Self {
        Exterior::new(7.2, "Exterior")
    }
}

impl Trackable for Exterior {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Exterior
    }

    fn current_state(&self) -> IndexMap<String, f64> {
        IndexMap::from([("pH".to_string(), self.ph)])
    }
}
