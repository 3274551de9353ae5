use std::collections::BTreeSet;

use indexmap::IndexMap;
use ros_export_core::{unquote, ConfigDocument};
use serde::Serialize;
use tracing::debug;

use crate::profile::{NamingScheme, Profile, Rename};

/// Insertion-ordered source → target interface names. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterfaceMapping(IndexMap<String, String>);

impl InterfaceMapping {
    /// Build from a static rename table. The first entry for a name wins.
    pub fn from_renames(renames: &[Rename]) -> Self {
        renames
            .iter()
            .map(|r| (r.from.clone(), r.to.clone()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for InterfaceMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = IndexMap::new();
        for (from, to) in iter {
            map.entry(from).or_insert(to);
        }
        Self(map)
    }
}

/// Sequential renumbering for the target profile. Empty unless the target
/// uses [`NamingScheme::Sequential`].
pub fn remap(doc: &ConfigDocument, target: &Profile) -> InterfaceMapping {
    match &target.naming {
        NamingScheme::Sequential { family } => sequential(doc, family),
        NamingScheme::Fixed => InterfaceMapping::default(),
    }
}

/// Mapping the engine applies for a profile pair: sequential renumbering when
/// the target asks for it, otherwise the source model's static rename table.
pub fn plan(doc: &ConfigDocument, source: &Profile, target: &Profile) -> InterfaceMapping {
    match &target.naming {
        NamingScheme::Sequential { .. } => remap(doc, target),
        NamingScheme::Fixed => InterfaceMapping::from_renames(&source.renames),
    }
}

fn sequential(doc: &ConfigDocument, family: &str) -> InterfaceMapping {
    let names: Vec<&str> = doc
        .statements()
        .filter_map(|stmt| stmt.get("default-name"))
        .map(unquote)
        .collect();
    // Indices already taken by ports in the target family are never reassigned.
    let reserved: BTreeSet<u32> = names
        .iter()
        .filter_map(|name| family_index(name, family))
        .collect();

    let (map, _) = names
        .iter()
        .filter(|name| is_port_name(name) && family_index(name, family).is_none())
        .fold(
            (IndexMap::new(), 1u32),
            |(mut map, next): (IndexMap<String, String>, u32), name| {
                if map.contains_key(*name) {
                    return (map, next);
                }
                let index = (next..)
                    .find(|i| !reserved.contains(i))
                    .unwrap_or(next);
                let renamed = format!("{family}{index}");
                debug!(from = *name, to = %renamed, "assigned sequential interface name");
                map.insert(name.to_string(), renamed);
                (map, index + 1)
            },
        );
    InterfaceMapping(map)
}

/// Index of `name` within `family` (`sfp-sfpplus12` → 12).
fn family_index(name: &str, family: &str) -> Option<u32> {
    let digits = name.strip_prefix(family)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Bare physical port name: letters (hyphens allowed inside) followed by digits.
fn is_port_name(name: &str) -> bool {
    let Some(split) = name.find(|c: char| c.is_ascii_digit()) else {
        return false;
    };
    let (prefix, digits) = name.split_at(split);
    prefix.starts_with(|c: char| c.is_ascii_alphabetic())
        && !prefix.ends_with('-')
        && prefix.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
        && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::{is_port_name, plan, remap, InterfaceMapping};
    use crate::profile::ProfileRegistry;
    use ros_export_core::parse;

    fn pairs(mapping: &InterfaceMapping) -> Vec<(&str, &str)> {
        mapping.iter().collect()
    }

    #[test]
    fn assigns_in_document_order_not_numeric_order() {
        let registry = ProfileRegistry::embedded().expect("profiles");
        let doc = parse(
            "/interface ethernet\nset [ find default-name=ether2 ]\nset [ find default-name=ether1 ]\n",
        );
        let mapping = remap(&doc, registry.get("2004").expect("2004"));
        assert_eq!(
            pairs(&mapping),
            vec![("ether2", "sfp-sfpplus1"), ("ether1", "sfp-sfpplus2")]
        );
    }

    #[test]
    fn skips_names_already_in_family_and_their_indices() {
        let registry = ProfileRegistry::embedded().expect("profiles");
        let doc = parse(
            "/interface ethernet\nset [ find default-name=sfp-sfpplus1 ]\nset [ find default-name=ether1 ]\nset [ find default-name=ether1 ]\nset [ find default-name=combo-1 ]\n",
        );
        let mapping = remap(&doc, registry.get("2004").expect("2004"));
        assert_eq!(pairs(&mapping), vec![("ether1", "sfp-sfpplus2")]);
    }

    #[test]
    fn already_migrated_document_maps_nothing() {
        let registry = ProfileRegistry::embedded().expect("profiles");
        let doc = parse(
            "/interface ethernet\nset [ find default-name=sfp-sfpplus1 ]\nset [ find default-name=sfp-sfpplus2 ]\n",
        );
        assert!(remap(&doc, registry.get("2004").expect("2004")).is_empty());
    }

    #[test]
    fn fixed_target_uses_source_static_table() {
        let registry = ProfileRegistry::embedded().expect("profiles");
        let doc = parse("/interface ethernet\nset [ find default-name=sfp-sfpplus1 ]\n");
        let source = registry.get("2004").expect("2004");
        let target = registry.get("1036").expect("1036");

        assert!(remap(&doc, target).is_empty());
        let mapping = plan(&doc, source, target);
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get("sfp-sfpplus2"), Some("ether2"));
    }

    #[test]
    fn port_name_shapes() {
        assert!(is_port_name("ether1"));
        assert!(is_port_name("sfp-sfpplus12"));
        assert!(is_port_name("sfp1"));
        assert!(!is_port_name("qsfp28-1-1"));
        assert!(!is_port_name("bridge"));
        assert!(!is_port_name("1ether"));
        assert!(!is_port_name("ether-1"));
    }

    #[test]
    fn first_static_entry_wins() {
        let mapping: InterfaceMapping = vec![
            ("a1".to_string(), "b1".to_string()),
            ("a1".to_string(), "b2".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(mapping.get("a1"), Some("b1"));
        assert_eq!(mapping.len(), 1);
    }
}
