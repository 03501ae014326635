//! This module provides IonChannelLinks, the connectivity between species and channels
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A link from a species to a channel, with the secondary species of a two ion channel
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelLink {
    pub channel: String,
    pub secondary: Option<String>,
}

/// Ordered map from species display name to the channels it is linked to
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IonChannelLinks {
    links: IndexMap<String, Vec<ChannelLink>>,
}

impl IonChannelLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a channel to a species
    ///
    /// Empty species or channel names are ignored, and an empty secondary name counts
    /// as no secondary. Linking a channel already linked to the species replaces the
    /// old secondary.
    pub fn add_link(&mut self, species: &str, channel: &str, secondary: Option<&str>) {
        if species.is_empty() || channel.is_empty() {
            log::warn!(
                "Ignoring link with an empty name (species '{}', channel '{}')",
                species,
                channel
            );
            return;
        }
        let secondary = secondary.filter(|s| !s.is_empty()).map(str::to_string);
        let links = self.links.entry(species.to_string()).or_default();
        match links.iter_mut().find(|link| link.channel == channel) {
            Some(link) if link.secondary == secondary => {}
            Some(link) => link.secondary = secondary,
            None => links.push(ChannelLink {
                channel: channel.to_string(),
                secondary,
            }),
        }
    }

    /// Remove the link between a species and a channel, returns whether a link was removed
    pub fn remove_link(&mut self, species: &str, channel: &str) -> bool {
        let Some(links) = self.links.get_mut(species) else {
            return false;
        };
        let before = links.len();
        links.retain(|link| link.channel != channel);
        let removed = links.len() != before;
        if links.is_empty() {
            self.links.shift_remove(species);
        }
        removed
    }

    /// Links of a species, in insertion order
    pub fn links_for_species(&self, species: &str) -> &[ChannelLink] {
        self.links.get(species).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Vec<ChannelLink>> {
        self.links.iter()
    }

    /// Number of species with at least one link
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<'a> IntoIterator for &'a IonChannelLinks {
    type Item = (&'a String, &'a Vec<ChannelLink>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<ChannelLink>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(channel: &str, secondary: Option<&str>) -> ChannelLink {
        ChannelLink {
            channel: channel.to_string(),
            secondary: secondary.map(str::to_string),
        }
    }

    #[test]
    fn add_keeps_order_and_ignores_duplicates() {
        let mut links = IonChannelLinks::new();
        links.add_link("h", "vatpase", None);
        links.add_link("h", "nhe_h", Some("na"));
        links.add_link("h", "vatpase", None);
        links.add_link("cl", "asor", Some(""));
        assert_eq!(
            links.links_for_species("h"),
            &[link("vatpase", None), link("nhe_h", Some("na"))]
        );
        assert_eq!(links.links_for_species("cl"), &[link("asor", None)]);
        let species: Vec<&String> = links.iter().map(|(s, _)| s).collect();
        assert_eq!(species, vec!["h", "cl"]);
    }

    #[test]
    fn add_replaces_secondary() {
        let mut links = IonChannelLinks::new();
        links.add_link("cl", "clc", Some("na"));
        links.add_link("cl", "clc", Some("h"));
        assert_eq!(links.links_for_species("cl"), &[link("clc", Some("h"))]);
    }

    #[test]
    fn empty_names_are_ignored() {
        let mut links = IonChannelLinks::new();
        links.add_link("", "clc", None);
        links.add_link("cl", "", None);
        assert!(links.is_empty());
        assert!(links.links_for_species("cl").is_empty());
    }

    #[test]
    fn remove_and_clear() {
        let mut links = IonChannelLinks::new();
        links.add_link("na", "tpc", None);
        links.add_link("na", "nhe", Some("h"));
        links.add_link("k", "k_channel", None);
        assert!(links.remove_link("na", "tpc"));
        assert!(!links.remove_link("na", "tpc"));
        assert!(!links.remove_link("cl", "asor"));
        assert_eq!(links.links_for_species("na"), &[link("nhe", Some("h"))]);
        assert!(links.remove_link("k", "k_channel"));
        assert_eq!(links.len(), 1);
        links.clear();
        assert!(links.is_empty());
    }
}
