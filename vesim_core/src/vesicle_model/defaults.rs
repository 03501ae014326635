//! The reference lysosome model: chloride, hydrogen, sodium and potassium moved by seven
//! channel families
//!
//! Exchangers which move two species in opposite directions (clc, nhe) appear twice, once
//! per species, with opposite flux multipliers.
use crate::vesicle_model::ion_channel::{
    ChannelType, DependenceType, IonChannelConfig, IonChannelConfigBuilder,
    IonChannelConfigBuilderError,
};
use crate::vesicle_model::ion_species::IonSpecies;
use crate::vesicle_model::links::IonChannelLinks;

/// Species of the reference model
pub fn default_species() -> Vec<IonSpecies> {
    vec![
        IonSpecies::new("cl", 0.159, 0.02, -1.0),
        IonSpecies::new("h", 7.962143411069939e-5, 1.261914688960386e-4, 1.0),
        IonSpecies::new("na", 0.15, 0.01, 1.0),
        IonSpecies::new("k", 0.005, 0.14, 1.0),
    ]
}

/// Channel configurations of the reference model, display names match [`default_links`]
pub fn default_channels() -> Result<Vec<IonChannelConfig>, IonChannelConfigBuilderError> {
    let asor = IonChannelConfigBuilder::default()
        .display_name("asor")
        .conductance(8e-5)
        .channel_type(Some(ChannelType::Wt))
        .dependence_type(DependenceType::VoltageAndPh)
        .allowed_primary_ion("cl")
        .voltage_exponent(80.0)
        .half_act_voltage(-0.04)
        .ph_exponent(3.0)
        .half_act_ph(5.4)
        .build()?;

    let clc = clc_builder().display_name("clc").flux_multiplier(2.0).build()?;
    let clc_h = clc_builder().display_name("clc_h").flux_multiplier(-1.0).build()?;

    let tpc = IonChannelConfigBuilder::default()
        .display_name("tpc")
        .conductance(2e-6)
        .voltage_multiplier(-1.0)
        .allowed_primary_ion("na")
        .build()?;

    let nhe = nhe_builder().display_name("nhe").build()?;
    let nhe_h = nhe_builder().display_name("nhe_h").flux_multiplier(-1.0).build()?;

    let vatpase = IonChannelConfigBuilder::default()
        .display_name("vatpase")
        .conductance(8e-9)
        .dependence_type(DependenceType::Time)
        .voltage_shift(0.27)
        .nernst_multiplier(-1.0)
        .flux_multiplier(-1.0)
        .allowed_primary_ion("h")
        .build()?;

    let hleak = IonChannelConfigBuilder::default()
        .display_name("hleak")
        .conductance(1.6e-8)
        .voltage_multiplier(-1.0)
        .allowed_primary_ion("h")
        .use_free_hydrogen(true)
        .build()?;

    let k_channel = IonChannelConfigBuilder::default()
        .display_name("k_channel")
        .conductance(0.0)
        .voltage_multiplier(-1.0)
        .allowed_primary_ion("k")
        .build()?;

    Ok(vec![asor, clc, clc_h, tpc, nhe, nhe_h, vatpase, hleak, k_channel])
}

/// Shared parameters of the chloride/proton exchanger pair
fn clc_builder() -> IonChannelConfigBuilder {
    let mut builder = IonChannelConfigBuilder::default();
    builder
        .conductance(1e-7)
        .channel_type(Some(ChannelType::Clc))
        .dependence_type(DependenceType::VoltageAndPh)
        .nernst_multiplier(1.0 / 3.0)
        .allowed_primary_ion("cl")
        .allowed_secondary_ion("h")
        .primary_exponent(2)
        .secondary_exponent(1)
        .voltage_exponent(80.0)
        .half_act_voltage(-0.04)
        .ph_exponent(-1.5)
        .half_act_ph(5.5)
        .use_free_hydrogen(true);
    builder
}

/// Shared parameters of the sodium/proton exchanger pair
fn nhe_builder() -> IonChannelConfigBuilder {
    let mut builder = IonChannelConfigBuilder::default();
    builder
        .conductance(0.0)
        .voltage_multiplier(0.0)
        .allowed_primary_ion("na")
        .allowed_secondary_ion("h")
        .custom_nernst_constant(1.0)
        .use_free_hydrogen(true);
    builder
}

/// Links of the reference model
pub fn default_links() -> IonChannelLinks {
    let mut links = IonChannelLinks::new();
    links.add_link("cl", "asor", None);
    links.add_link("cl", "clc", Some("h"));
    links.add_link("na", "tpc", None);
    links.add_link("na", "nhe", Some("h"));
    links.add_link("h", "vatpase", None);
    links.add_link("h", "nhe_h", Some("na"));
    links.add_link("h", "hleak", None);
    links.add_link("h", "clc_h", Some("cl"));
    links.add_link("k", "k_channel", None);
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_linked_name_exists() {
        let species: Vec<String> = default_species()
            .iter()
            .map(|s| crate::histories::Trackable::display_name(s).to_string())
            .collect();
        let channels: Vec<String> = default_channels()
            .unwrap()
            .into_iter()
            .map(|c| c.display_name)
            .collect();
        let mut linked_channels = 0;
        for (name, links) in &default_links() {
            assert!(species.contains(name));
            for link in links {
                assert!(channels.contains(&link.channel));
                if let Some(secondary) = &link.secondary {
                    assert!(species.contains(secondary));
                }
                linked_channels += 1;
            }
        }
        assert_eq!(linked_channels, channels.len());
    }

    #[test]
    fn exchanger_pairs_share_parameters() {
        let channels = default_channels().unwrap();
        let find = |name: &str| channels.iter().find(|c| c.display_name == name).unwrap();
        let (clc, clc_h) = (find("clc"), find("clc_h"));
        assert_eq!(clc.flux_multiplier, 2.0);
        assert_eq!(clc_h.flux_multiplier, -1.0);
        assert_eq!(clc.half_act_ph, clc_h.half_act_ph);
        assert_eq!(clc.allowed_secondary_ion, clc_h.allowed_secondary_ion);
        assert_eq!(find("nhe_h").flux_multiplier, -1.0);
        assert!(find("nhe").is_two_ion());
        assert!(!find("vatpase").is_two_ion());
    }
}
