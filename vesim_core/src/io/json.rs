//! Module providing JSON IO for simulations: loading a configured simulation and exporting
//! the recorded histories
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::utils::hashing::json_fingerprint;
use crate::vesicle_model::exterior::Exterior;
use crate::vesicle_model::ion_channel::{
    ChannelError, ChannelType, DependenceType, IonChannel, IonChannelConfig, IonChannelConfigBuilder,
    IonChannelConfigBuilderError,
};
use crate::vesicle_model::ion_species::IonSpecies;
use crate::vesicle_model::simulation::{
    Simulation, SimulationError, SimulationParametersBuilder, SimulationParametersBuilderError,
};
use crate::vesicle_model::vesicle::{
    Vesicle, VesicleParameters, VesicleParametersBuilder, VesicleParametersBuilderError,
};

// region JSON Simulation
/// Represents a JSON simulation configuration
#[derive(Serialize, Deserialize)]
struct JsonSimulation {
    time_step: f64,
    total_time: f64,
    display_name: Option<String>,
    temperature: Option<f64>,
    init_buffer_capacity: Option<f64>,
    vesicle_params: Option<JsonVesicle>,
    exterior_params: Option<JsonExterior>,
    #[serde(default)]
    species: IndexMap<String, JsonSpecies>,
    #[serde(default)]
    channels: IndexMap<String, JsonChannel>,
    /// Per species list of `[channel]`, `[channel, null]` or `[channel, secondary]`
    #[serde(default)]
    ion_channel_links: IndexMap<String, Vec<Vec<Option<String>>>>,
}

#[derive(Serialize, Deserialize)]
struct JsonVesicle {
    init_radius: Option<f64>,
    init_voltage: Option<f64>,
    #[serde(rename = "init_pH")]
    init_ph: Option<f64>,
    specific_capacitance: Option<f64>,
    display_name: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonExterior {
    #[serde(rename = "pH")]
    ph: Option<f64>,
    display_name: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonSpecies {
    #[serde(default)]
    init_vesicle_conc: f64,
    #[serde(default)]
    exterior_conc: f64,
    #[serde(default)]
    elementary_charge: f64,
}

#[derive(Serialize, Deserialize)]
struct JsonChannel {
    conductance: Option<f64>,
    channel_type: Option<String>,
    dependence_type: Option<String>,
    voltage_multiplier: Option<f64>,
    nernst_multiplier: Option<f64>,
    voltage_shift: Option<f64>,
    flux_multiplier: Option<f64>,
    allowed_primary_ion: String,
    allowed_secondary_ion: Option<String>,
    primary_exponent: Option<i32>,
    secondary_exponent: Option<i32>,
    custom_nernst_constant: Option<f64>,
    use_free_hydrogen: Option<bool>,
    voltage_exponent: Option<f64>,
    half_act_voltage: Option<f64>,
    #[serde(rename = "pH_exponent")]
    ph_exponent: Option<f64>,
    #[serde(rename = "half_act_pH")]
    half_act_ph: Option<f64>,
    time_exponent: Option<f64>,
    half_act_time: Option<f64>,
}
// endregion JSON Simulation

// region Conversions
impl TryFrom<JsonVesicle> for VesicleParameters {
    type Error = JsonError;

    fn try_from(v: JsonVesicle) -> Result<Self, Self::Error> {
        let mut builder = VesicleParametersBuilder::default();
        if let Some(init_radius) = v.init_radius {
            builder.init_radius(init_radius);
        }
        if let Some(init_voltage) = v.init_voltage {
            builder.init_voltage(init_voltage);
        }
        if let Some(init_ph) = v.init_ph {
            builder.init_ph(init_ph);
        }
        if let Some(specific_capacitance) = v.specific_capacitance {
            builder.specific_capacitance(specific_capacitance);
        }
        if let Some(display_name) = v.display_name {
            builder.display_name(display_name);
        }
        Ok(builder.build()?)
    }
}

impl From<JsonExterior> for Exterior {
    fn from(e: JsonExterior) -> Self {
        let default = Exterior::default();
        Exterior::new(
            e.ph.unwrap_or(default.ph()),
            e.display_name.as_deref().unwrap_or("Exterior"),
        )
    }
}

impl JsonSpecies {
    fn into_species(self, name: &str) -> IonSpecies {
        IonSpecies::new(
            name,
            self.init_vesicle_conc,
            self.exterior_conc,
            self.elementary_charge,
        )
    }
}

impl JsonChannel {
    /// Build the channel configuration, the channel is named after its key
    ///
    /// Gating parameters missing for an active axis fall back to the defaults of the
    /// channel type (see [`IonChannelConfig::apply_gating_defaults`]).
    fn into_config(self, name: &str) -> Result<IonChannelConfig, JsonError> {
        let channel_type = match self.channel_type.as_deref() {
            None | Some("") => None,
            Some(tag) => Some(tag.parse::<ChannelType>()?),
        };
        let dependence_type = match self.dependence_type.as_deref() {
            None => DependenceType::None,
            Some(tag) => tag.parse::<DependenceType>()?,
        };
        let mut builder = IonChannelConfigBuilder::default();
        builder
            .display_name(name)
            .channel_type(channel_type)
            .dependence_type(dependence_type)
            .allowed_primary_ion(self.allowed_primary_ion)
            .conductance(self.conductance.unwrap_or(0.0))
            .voltage_multiplier(self.voltage_multiplier.unwrap_or(1.0))
            .nernst_multiplier(self.nernst_multiplier.unwrap_or(1.0))
            .voltage_shift(self.voltage_shift.unwrap_or(0.0))
            .flux_multiplier(self.flux_multiplier.unwrap_or(1.0))
            .primary_exponent(self.primary_exponent.unwrap_or(1))
            .secondary_exponent(self.secondary_exponent.unwrap_or(1))
            .custom_nernst_constant(self.custom_nernst_constant.unwrap_or(0.0))
            .use_free_hydrogen(self.use_free_hydrogen.unwrap_or(false))
            .voltage_exponent(self.voltage_exponent.unwrap_or(0.0))
            .half_act_voltage(self.half_act_voltage.unwrap_or(0.0))
            .ph_exponent(self.ph_exponent.unwrap_or(0.0))
            .half_act_ph(self.half_act_ph.unwrap_or(0.0))
            .time_exponent(self.time_exponent.unwrap_or(0.0))
            .half_act_time(self.half_act_time.unwrap_or(0.0));
        if let Some(secondary) = self.allowed_secondary_ion.filter(|ion| !ion.is_empty()) {
            builder.allowed_secondary_ion(secondary);
        }
        let mut config = builder.build()?;
        config.apply_gating_defaults();
        Ok(config)
    }
}

/// Split a link entry into the channel name and the optional secondary species
fn parse_link(
    species: &str,
    link: Vec<Option<String>>,
) -> Result<(String, Option<String>), JsonError> {
    let invalid = |reason: &str| JsonError::InvalidLink {
        species: species.to_string(),
        reason: reason.to_string(),
    };
    if link.len() > 2 {
        return Err(invalid("expected at most a channel and a secondary species"));
    }
    let mut entries = link.into_iter();
    let channel = entries
        .next()
        .flatten()
        .filter(|channel| !channel.is_empty())
        .ok_or_else(|| invalid("missing channel name"))?;
    Ok((channel, entries.next().flatten()))
}
// endregion Conversions

impl Simulation {
    /// Read a JSON configuration file into a configured simulation
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Simulation, JsonError> {
        let json_str = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
        };
        Simulation::from_json_str(&json_str)
    }

    /// Parse a JSON configuration into a configured simulation
    pub fn from_json_str(json_str: &str) -> Result<Simulation, JsonError> {
        let json_simulation = match serde_json::from_str::<JsonSimulation>(json_str) {
            Ok(simulation) => simulation,
            Err(err) => return Err(JsonError::UnableToParse(format!("{}", err))),
        };
        Simulation::from_json(json_simulation)
    }

    fn from_json(json: JsonSimulation) -> Result<Simulation, JsonError> {
        let mut builder = SimulationParametersBuilder::default();
        builder.time_step(json.time_step).total_time(json.total_time);
        if let Some(display_name) = json.display_name {
            builder.display_name(display_name);
        }
        if let Some(temperature) = json.temperature {
            builder.temperature(temperature);
        }
        if let Some(init_buffer_capacity) = json.init_buffer_capacity {
            builder.init_buffer_capacity(init_buffer_capacity);
        }
        let mut simulation = Simulation::new(builder.build()?)?;

        if let Some(vesicle) = json.vesicle_params {
            simulation.set_vesicle(Vesicle::new(vesicle.try_into()?))?;
        }
        if let Some(exterior) = json.exterior_params {
            simulation.set_exterior(exterior.into())?;
        }
        for (name, species) in json.species {
            simulation.add_species(species.into_species(&name))?;
        }
        for (name, channel) in json.channels {
            simulation.add_channel(IonChannel::new(channel.into_config(&name)?))?;
        }
        for (species, links) in json.ion_channel_links {
            for link in links {
                let (channel, secondary) = parse_link(&species, link)?;
                simulation.add_link(&species, &channel, secondary.as_deref())?;
            }
        }

        simulation.configure()?;
        log::info!(
            "Loaded simulation '{}' from JSON",
            simulation.display_name()
        );
        Ok(simulation)
    }

    /// Recorded histories (with `simulation_time`) as a JSON object of arrays
    pub fn histories_json(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string(&self.export_histories())?)
    }

    pub fn write_histories_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let histories = self.histories_json()?;
        fs::write(path, histories)?;
        Ok(())
    }
}

/// Fingerprint of a JSON configuration, independent of key order and formatting
///
/// Used to name the result set of a configuration.
pub fn config_fingerprint(json_str: &str) -> Result<String, JsonError> {
    let value: Value = serde_json::from_str(json_str)?;
    Ok(json_fingerprint(&value))
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Invalid channel link for species '{species}': {reason}")]
    InvalidLink { species: String, reason: String },
    #[error("Unable to build simulation parameters")]
    UnableToBuildSimulation(#[from] SimulationParametersBuilderError),
    #[error("Unable to build vesicle parameters")]
    UnableToBuildVesicle(#[from] VesicleParametersBuilderError),
    #[error("Unable to build channel configuration")]
    UnableToBuildChannel(#[from] IonChannelConfigBuilderError),
    #[error("Invalid channel parameter: {0}")]
    Channel(#[from] ChannelError),
    #[error("Unable to set up simulation: {0}")]
    Simulation(#[from] SimulationError),
    #[error("Serde json parse error")]
    SerdeJsonParseError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}

#[cfg(test)]
mod json_tests {
    use super::*;
    use crate::histories::Trackable;
    use crate::vesicle_model::ion_channel::GatingAxis;
    use crate::vesicle_model::simulation::{ConfigurationError, SimulationStatus};

    const CONFIG: &str = r#"{
"time_step": 0.001,
"total_time": 0.005,
"display_name": "two species",
"init_buffer_capacity": 5e-4,
"vesicle_params": {
"init_radius": 1.3e-6,
"init_voltage": 0.04,
"init_pH": 7.4
},
"exterior_params": {
"pH": 7.2
},
"species": {
"cl": {"init_vesicle_conc": 0.159, "exterior_conc": 0.02, "elementary_charge": -1},
"h": {"init_vesicle_conc": 7.962143411069939e-5, "exterior_conc": 1.261914688960386e-4, "elementary_charge": 1}
},
"channels": {
"asor": {
"conductance": 8e-5,
"channel_type": "mt",
"dependence_type": "voltage_and_pH",
"allowed_primary_ion": "cl"
},
"clc": {
"conductance": 1e-7,
"channel_type": "clc",
"dependence_type": "pH",
"nernst_multiplier": 0.3333333333333333,
"flux_multiplier": 2.0,
"allowed_primary_ion": "cl",
"allowed_secondary_ion": "h",
"primary_exponent": 2,
"pH_exponent": -1.0,
"half_act_pH": 6.0,
"use_free_hydrogen": true
},
"hleak": {
"conductance": 1.6e-8,
"voltage_multiplier": -1.0,
"allowed_primary_ion": "h",
"allowed_secondary_ion": "",
"use_free_hydrogen": true
}
},
"ion_channel_links": {
"cl": [["asor"], ["clc", "h"]],
"h": [["hleak", null]]
}
}"#;

    #[test]
    fn load_configured_simulation() {
        let simulation = Simulation::from_json_str(CONFIG).unwrap();
        assert_eq!(simulation.status(), SimulationStatus::Configured);
        assert_eq!(simulation.display_name(), "two species");
        assert_eq!(simulation.iteration_count(), 5);
        assert_eq!(simulation.exterior().ph(), 7.2);
        let names: Vec<&String> = simulation.species_names().collect();
        assert_eq!(names, vec!["cl", "h"]);
        assert_eq!(
            simulation.species("cl").unwrap().borrow().channel_names(),
            vec!["asor".to_string(), "clc".to_string()]
        );
        let hleak = simulation.channel("hleak").unwrap().borrow();
        assert!(!hleak.is_two_ion());
        assert!(hleak.is_connected());
        assert_eq!(hleak.display_name(), "hleak");
    }

    #[test]
    fn gating_defaults_only_fill_missing_parameters() {
        let simulation = Simulation::from_json_str(CONFIG).unwrap();
        let asor = simulation.channel("asor").unwrap().borrow();
        assert_eq!(asor.config().channel_type, Some(ChannelType::Mt));
        assert_eq!(asor.config().gating_parameters(GatingAxis::Ph), (1.0, 7.4));
        assert_eq!(
            asor.config().gating_parameters(GatingAxis::Voltage),
            (80.0, -0.04)
        );
        let clc = simulation.channel("clc").unwrap().borrow();
        assert_eq!(clc.config().gating_parameters(GatingAxis::Ph), (-1.0, 6.0));
        assert_eq!(clc.config().gating_parameters(GatingAxis::Voltage), (0.0, 0.0));
        assert_eq!(clc.config().primary_exponent, 2);
        assert_eq!(clc.config().secondary_exponent, 1);
    }

    #[test]
    fn run_and_export_histories() {
        let mut simulation = Simulation::from_json_str(CONFIG).unwrap();
        simulation.run().unwrap();
        let exported: IndexMap<String, Vec<f64>> =
            serde_json::from_str(&simulation.histories_json().unwrap()).unwrap();
        assert_eq!(exported.len(), simulation.export_histories().len());
        assert!(exported.values().all(|series| series.len() == 6));
        assert_eq!(exported["simulation_time"][0], 0.0);
        assert!(exported.contains_key("clc_flux"));
        assert!(exported.contains_key("Vesicle_voltage"));

        let path = std::env::temp_dir().join("vesim_core_histories_test.json");
        simulation.write_histories_json(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, simulation.histories_json().unwrap());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_required_parameter() {
        let err = Simulation::from_json_str(r#"{"total_time": 1.0}"#).unwrap_err();
        match err {
            JsonError::UnableToParse(message) => assert!(message.contains("time_step")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn invalid_parameter_values() {
        let err = Simulation::from_json_str(r#"{"time_step": -0.1, "total_time": 1.0}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            JsonError::Simulation(SimulationError::Configuration(
                ConfigurationError::NonPositiveTimeStep(_)
            ))
        ));

        let err = Simulation::from_json_str(
            r#"{"time_step": 0.1, "total_time": 1.0, "channels": {"c": {"allowed_primary_ion": "k", "dependence_type": "humidity"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            JsonError::Channel(ChannelError::UnknownDependenceType(_))
        ));
    }

    #[test]
    fn invalid_links() {
        let err = Simulation::from_json_str(
            r#"{"time_step": 0.1, "total_time": 1.0, "ion_channel_links": {"k": [[]]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, JsonError::InvalidLink { .. }));

        let err = Simulation::from_json_str(
            r#"{"time_step": 0.1, "total_time": 1.0,
                "species": {"k": {"init_vesicle_conc": 0.005, "exterior_conc": 0.14, "elementary_charge": 1}},
                "ion_channel_links": {"k": [["k_channel"]]}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            JsonError::Simulation(SimulationError::UnknownChannel(_))
        ));
    }

    #[test]
    fn unreadable_file() {
        let err = Simulation::read_json("/definitely/not/a/config.json").unwrap_err();
        assert!(matches!(err, JsonError::UnableToRead(_)));
    }

    #[test]
    fn exterior_display_name() {
        let exterior: Exterior = JsonExterior {
            ph: None,
            display_name: Some("Bath".to_string()),
        }
        .into();
        assert_eq!(exterior.display_name(), "Bath");
        assert_eq!(exterior.ph(), 7.2);
    }

    #[test]
    fn fingerprint_ignores_formatting() {
        let a = config_fingerprint(r#"{"time_step": 0.001, "total_time": 1.0}"#).unwrap();
        let b = config_fingerprint("{\n  \"total_time\": 1.0,\n  \"time_step\": 0.001\n}").unwrap();
        let c = config_fingerprint(r#"{"time_step": 0.002, "total_time": 1.0}"#).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(config_fingerprint(CONFIG).unwrap().len(), 16);
        assert!(config_fingerprint("{").is_err());
    }
}
