//! Provides the HistoriesStorage struct, which records entity states step by step
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use thiserror::Error;

use super::{history_key, EntityKind, Trackable};

/// Append only storage of the recorded states of registered entities
///
/// Each registered entity contributes one series per tracked field, all series
/// grow by exactly one value every time [`HistoriesStorage::record_step`] is called.
#[derive(Default)]
pub struct HistoriesStorage {
    /// Registered entities keyed by display name
    objects: IndexMap<String, Rc<RefCell<dyn Trackable>>>,
    /// Recorded series keyed by "{name}_{field}"
    histories: IndexMap<String, Vec<f64>>,
}

impl HistoriesStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity for tracking
    ///
    /// Creates one empty series per field of the current state of the entity.
    ///
    /// # Errors
    /// Fails if an entity with the same display name was registered before, with
    /// [`HistoriesError::Duplicate`] when it is of the same kind and
    /// [`HistoriesError::NameConflict`] otherwise.
    pub fn register(&mut self, object: Rc<RefCell<dyn Trackable>>) -> Result<(), HistoriesError> {
        let (name, kind, fields) = {
            let obj = object.borrow();
            (
                obj.display_name().to_string(),
                obj.kind(),
                obj.current_state().into_keys().collect::<Vec<_>>(),
            )
        };
        if let Some(existing) = self.objects.get(&name) {
            let existing_kind = existing.borrow().kind();
            return if existing_kind == kind {
                Err(HistoriesError::Duplicate { kind, name })
            } else {
                Err(HistoriesError::NameConflict {
                    name,
                    existing: existing_kind,
                    new: kind,
                })
            };
        }
        for field in fields {
            self.histories.insert(history_key(&name, &field), Vec::new());
        }
        self.objects.insert(name, object);
        Ok(())
    }

    /// Append the current state of every registered entity to its series
    pub fn record_step(&mut self) -> Result<(), HistoriesError> {
        for (name, object) in &self.objects {
            for (field, value) in object.borrow().current_state() {
                let key = history_key(name, &field);
                match self.histories.get_mut(&key) {
                    Some(series) => series.push(value),
                    None => return Err(HistoriesError::UnregisteredHistory(key)),
                }
            }
        }
        Ok(())
    }

    /// Append a single value to a named series, creating the series if needed
    pub fn append(&mut self, key: &str, value: f64) {
        self.histories.entry(key.to_string()).or_default().push(value);
    }

    /// Empty every series, keeping the registered entities
    pub fn clear(&mut self) {
        self.histories.values_mut().for_each(Vec::clear);
    }

    /// Drop every registered entity together with its series
    pub fn reset(&mut self) {
        self.objects.clear();
        self.histories.clear();
    }

    /// Whether an entity with this display name is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Kind of the entity registered under this display name
    pub fn kind_of(&self, name: &str) -> Option<EntityKind> {
        self.objects.get(name).map(|object| object.borrow().kind())
    }

    /// Number of registered entities
    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    /// Recorded series keyed by "{name}_{field}"
    pub fn histories(&self) -> &IndexMap<String, Vec<f64>> {
        &self.histories
    }

    /// A single recorded series
    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.histories.get(key).map(Vec::as_slice)
    }

    /// Number of recorded steps (length of the series)
    pub fn recorded_steps(&self) -> usize {
        self.histories.values().next().map_or(0, Vec::len)
    }

    /// Copy of every series, for handing over to a serializer
    pub fn export(&self) -> IndexMap<String, Vec<f64>> {
        self.histories.clone()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoriesError {
    #[error("Duplicate {kind}: an object with the name \"{name}\" has already been registered")]
    Duplicate { kind: EntityKind, name: String },
    #[error("Name conflict: \"{name}\" is already used by a {existing}, cannot use it for a {new}")]
    NameConflict {
        name: String,
        existing: EntityKind,
        new: EntityKind,
    },
    #[error("History \"{0}\" was never registered")]
    UnregisteredHistory(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gauge {
        name: String,
        kind: EntityKind,
        value: f64,
    }

    impl Trackable for Gauge {
        fn display_name(&self) -> &str {
            &self.name
        }

        fn kind(&self) -> EntityKind {
            self.kind
        }

        fn current_state(&self) -> IndexMap<String, f64> {
            let mut state = IndexMap::new();
            state.insert("value".to_string(), self.value);
            state.insert("double".to_string(), 2. * self.value);
            state
        }
    }

    fn gauge(name: &str, kind: EntityKind, value: f64) -> Rc<RefCell<Gauge>> {
        Rc::new(RefCell::new(Gauge {
            name: name.to_string(),
            kind,
            value,
        }))
    }

    #[test]
    fn register_creates_empty_series() {
        let mut storage = HistoriesStorage::new();
        storage.register(gauge("a", EntityKind::IonSpecies, 1.)).unwrap();
        assert!(storage.is_registered("a"));
        assert_eq!(storage.get("a_value").unwrap().len(), 0);
        assert_eq!(storage.get("a_double").unwrap().len(), 0);
        assert_eq!(storage.recorded_steps(), 0);
    }

    #[test]
    fn duplicate_and_conflict() {
        let mut storage = HistoriesStorage::new();
        storage.register(gauge("a", EntityKind::IonSpecies, 1.)).unwrap();
        let duplicate = storage.register(gauge("a", EntityKind::IonSpecies, 2.));
        assert_eq!(
            duplicate,
            Err(HistoriesError::Duplicate {
                kind: EntityKind::IonSpecies,
                name: "a".to_string()
            })
        );
        let conflict = storage.register(gauge("a", EntityKind::IonChannel, 2.));
        assert_eq!(
            conflict,
            Err(HistoriesError::NameConflict {
                name: "a".to_string(),
                existing: EntityKind::IonSpecies,
                new: EntityKind::IonChannel
            })
        );
        let message = format!("{}", conflict.unwrap_err());
        assert!(message.contains("already used by a IonSpecies"));
        assert_eq!(storage.num_objects(), 1);
    }

    #[test]
    fn kind_of_registered_entity() {
        let mut storage = HistoriesStorage::new();
        storage.register(gauge("a", EntityKind::IonChannel, 1.)).unwrap();
        assert_eq!(storage.kind_of("a"), Some(EntityKind::IonChannel));
        assert_eq!(storage.kind_of("b"), None);
    }

    #[test]
    fn record_step_keeps_series_aligned() {
        let mut storage = HistoriesStorage::new();
        let a = gauge("a", EntityKind::Vesicle, 1.);
        storage.register(a.clone()).unwrap();
        storage.register(gauge("b", EntityKind::Exterior, 5.)).unwrap();
        storage.record_step().unwrap();
        a.borrow_mut().value = 3.;
        storage.record_step().unwrap();
        assert_eq!(storage.get("a_value").unwrap(), &[1., 3.]);
        assert_eq!(storage.get("a_double").unwrap(), &[2., 6.]);
        assert_eq!(storage.get("b_value").unwrap(), &[5., 5.]);
        assert!(storage.histories().values().all(|s| s.len() == 2));
        assert_eq!(storage.recorded_steps(), 2);
    }

    #[test]
    fn clear_and_reset() {
        let mut storage = HistoriesStorage::new();
        storage.register(gauge("a", EntityKind::Vesicle, 1.)).unwrap();
        storage.record_step().unwrap();
        storage.clear();
        assert!(storage.is_registered("a"));
        assert_eq!(storage.get("a_value").unwrap().len(), 0);
        storage.record_step().unwrap();
        assert_eq!(storage.recorded_steps(), 1);

        storage.reset();
        assert!(!storage.is_registered("a"));
        assert!(storage.histories().is_empty());
        // The name is free again after a reset
        storage.register(gauge("a", EntityKind::IonChannel, 1.)).unwrap();
    }

    #[test]
    fn append_named_series() {
        let mut storage = HistoriesStorage::new();
        storage.append("extra", 1.5);
        storage.append("extra", 2.5);
        assert_eq!(storage.export().get("extra").unwrap(), &vec![1.5, 2.5]);
    }
}
