//! Module for recording the state of simulation entities over time

pub mod storage;

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;

pub use storage::{HistoriesError, HistoriesStorage};

/// Anything whose state can be recorded into a [`HistoriesStorage`]
pub trait Trackable {
    /// Name used to identify the entity, must be unique within a storage
    fn display_name(&self) -> &str;

    /// What kind of entity this is, used to report name conflicts
    fn kind(&self) -> EntityKind;

    /// Current value of every tracked field, keyed by field name
    fn current_state(&self) -> IndexMap<String, f64>;
}

/// The kinds of entities which can be tracked
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vesicle,
    Exterior,
    IonSpecies,
    IonChannel,
    Simulation,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Vesicle => write!(f, "Vesicle"),
            EntityKind::Exterior => write!(f, "Exterior"),
            EntityKind::IonSpecies => write!(f, "IonSpecies"),
            EntityKind::IonChannel => write!(f, "IonChannel"),
            EntityKind::Simulation => write!(f, "Simulation"),
        }
    }
}

/// Key of the history series holding `field` of the entity named `name`
///
/// # Note:
/// The key is "{name}_{field}"
pub fn history_key(name: &str, field: &str) -> String {
    format!("{}_{}", name, field)
}
