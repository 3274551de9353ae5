//! Router model profiles.
//!
//! A profile describes one hardware model's dialect: how its ports are named,
//! which static renames apply when migrating away from it, and what the
//! engine must regenerate when migrating towards it. Profiles are plain TOML
//! data. The built-in set is compiled into the binary; a directory of
//! `*.toml` files can override or extend it. Once loaded, a
//! [`ProfileRegistry`] is never mutated and is shared by reference between
//! migrations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a model names its physical ports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum NamingScheme {
    /// Port names are kept; only the source's static rename table applies.
    #[default]
    Fixed,
    /// Ports are renumbered `family1`, `family2`, ... in export order.
    Sequential { family: String },
}

/// One entry of a static interface rename table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// A dialect attribute rename applied to statement keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenRewrite {
    pub from: String,
    pub to: String,
}

/// Settings for regenerating dynamic-routing and peering sections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingSettings {
    pub synthesize: bool,
    /// Existing sections under these paths are superseded by the synthesized ones.
    pub replaced_prefixes: Vec<String>,
    pub loopback_interface: String,
    pub lan_interface: String,
    pub ospf_instance: String,
    pub ospf_area: String,
    pub bgp_template: String,
    pub peer_role: String,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            synthesize: false,
            replaced_prefixes: Vec::new(),
            loopback_interface: "loop0".to_string(),
            lan_interface: "lan-bridge".to_string(),
            ospf_instance: "default-v2".to_string(),
            ospf_area: "backbone-v2".to_string(),
            bgp_template: "default".to_string(),
            peer_role: "ibgp".to_string(),
        }
    }
}

/// Sections carried over verbatim but moved to the end of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PreserveSettings {
    pub trailing_prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub naming: NamingScheme,
    #[serde(default)]
    pub renames: Vec<Rename>,
    #[serde(default)]
    pub routing: RoutingSettings,
    #[serde(default)]
    pub token_rewrites: Vec<TokenRewrite>,
    #[serde(default)]
    pub preserve: PreserveSettings,
}

/// A profile together with where it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedProfile {
    pub profile: Profile,
    /// `embedded` or `file:<path>`.
    pub source: String,
}

/// Errors returned when loading profile files.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("failed to read profiles from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse profile {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid profile {path}: {reason}")]
    Invalid { path: String, reason: String },
}

const EMBEDDED_PROFILES: &[(&str, &str)] = &[
    (
        "1036.toml",
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/profiles/1036.toml")),
    ),
    (
        "2004.toml",
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/profiles/2004.toml")),
    ),
];

/// Immutable set of known profiles, in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRegistry {
    profiles: Vec<LoadedProfile>,
}

impl ProfileRegistry {
    /// Built-in profiles only.
    pub fn embedded() -> Result<Self, ProfileLoadError> {
        Self::load(None)
    }

    /// Built-in profiles, overlaid with every `*.toml` in `profiles_dir`.
    /// A file profile replaces the embedded profile with the same id.
    pub fn load(profiles_dir: Option<&Path>) -> Result<Self, ProfileLoadError> {
        let mut registry = Self {
            profiles: Vec::new(),
        };
        for (name, raw) in EMBEDDED_PROFILES {
            let profile = parse_profile(raw, &format!("embedded:{name}"))?;
            registry.insert(LoadedProfile {
                profile,
                source: "embedded".to_string(),
            });
        }
        if let Some(dir) = profiles_dir {
            for path in profile_files(dir)? {
                let profile = load_profile_file(&path)?;
                registry.insert(LoadedProfile {
                    profile,
                    source: format!("file:{}", path.display()),
                });
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.get_loaded(id).map(|loaded| &loaded.profile)
    }

    pub fn get_loaded(&self, id: &str) -> Option<&LoadedProfile> {
        self.profiles.iter().find(|loaded| loaded.profile.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedProfile> {
        self.profiles.iter()
    }

    fn insert(&mut self, loaded: LoadedProfile) {
        match self
            .profiles
            .iter_mut()
            .find(|existing| existing.profile.id == loaded.profile.id)
        {
            Some(existing) => *existing = loaded,
            None => self.profiles.push(loaded),
        }
    }
}

fn profile_files(dir: &Path) -> Result<Vec<PathBuf>, ProfileLoadError> {
    let io_err = |source| ProfileLoadError::Io {
        path: dir.display().to_string(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    // read_dir order is platform dependent
    files.sort();
    Ok(files)
}

fn load_profile_file(path: &Path) -> Result<Profile, ProfileLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ProfileLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_profile(&raw, &path.display().to_string())
}

fn parse_profile(raw: &str, path: &str) -> Result<Profile, ProfileLoadError> {
    let profile: Profile = toml::from_str(raw).map_err(|source| ProfileLoadError::Parse {
        path: path.to_string(),
        source,
    })?;
    validate(&profile).map_err(|reason| ProfileLoadError::Invalid {
        path: path.to_string(),
        reason,
    })?;
    Ok(profile)
}

fn validate(profile: &Profile) -> Result<(), String> {
    if profile.id.trim().is_empty() {
        return Err("profile id must not be empty".to_string());
    }
    if let NamingScheme::Sequential { family } = &profile.naming {
        if family.is_empty() || family.ends_with(|c: char| c.is_ascii_digit()) {
            return Err(format!(
                "sequential family '{family}' must be non-empty and must not end with a digit"
            ));
        }
    }
    for (idx, rename) in profile.renames.iter().enumerate() {
        if profile.renames[..idx].iter().any(|r| r.from == rename.from) {
            return Err(format!("duplicate rename source '{}'", rename.from));
        }
    }
    if profile
        .token_rewrites
        .iter()
        .any(|rw| rw.from.is_empty() || rw.to.is_empty())
    {
        return Err("token rewrites must name both from and to".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_profile, NamingScheme, ProfileLoadError, ProfileRegistry};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn embedded_profiles_load() {
        let registry = ProfileRegistry::embedded().expect("embedded profiles");
        let source = registry.get("1036").expect("1036");
        assert_eq!(source.naming, NamingScheme::Fixed);
        assert_eq!(source.renames.len(), 4);

        let target = registry.get("2004").expect("2004");
        assert_eq!(
            target.naming,
            NamingScheme::Sequential {
                family: "sfp-sfpplus".to_string()
            }
        );
        assert!(target.routing.synthesize);
        assert_eq!(target.routing.loopback_interface, "loop0");
        assert_eq!(target.token_rewrites.len(), 1);
        assert!(registry.get("9999").is_none());
    }

    #[test]
    fn profile_source_reports_embedded() {
        let registry = ProfileRegistry::embedded().expect("embedded profiles");
        let loaded = registry.get_loaded("2004").expect("2004");
        assert_eq!(loaded.source, "embedded");
    }

    #[test]
    fn override_dir_replaces_and_extends() {
        let dir = tempdir().expect("tempdir");
        fs::write(
            dir.path().join("2004.toml"),
            r#"
id = "2004"
model = "lab"
[naming]
scheme = "sequential"
family = "ether"
"#,
        )
        .expect("write override");
        fs::write(dir.path().join("5009.toml"), "id = \"5009\"\n").expect("write new");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write other");

        let registry = ProfileRegistry::load(Some(dir.path())).expect("registry");
        let loaded = registry.get_loaded("2004").expect("2004");
        assert_eq!(loaded.profile.model, "lab");
        assert!(loaded.source.starts_with("file:"));
        assert!(!loaded.profile.routing.synthesize);
        assert!(registry.get("5009").is_some());
        assert_eq!(registry.iter().count(), 3);
    }

    #[test]
    fn rejects_sequential_family_ending_in_digit() {
        let err = parse_profile(
            "id = \"x\"\n[naming]\nscheme = \"sequential\"\nfamily = \"ether1\"\n",
            "inline",
        )
        .expect_err("invalid");
        assert!(matches!(err, ProfileLoadError::Invalid { .. }));
    }

    #[test]
    fn rejects_duplicate_rename_sources() {
        let err = parse_profile(
            "id = \"x\"\n[[renames]]\nfrom = \"a1\"\nto = \"b1\"\n[[renames]]\nfrom = \"a1\"\nto = \"b2\"\n",
            "inline",
        )
        .expect_err("invalid");
        assert!(err.to_string().contains("duplicate rename source"));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let err = parse_profile("id = ", "broken.toml").expect_err("parse error");
        assert!(matches!(err, ProfileLoadError::Parse { ref path, .. } if path == "broken.toml"));
    }

    #[test]
    fn missing_dir_is_an_io_error() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        let err = ProfileRegistry::load(Some(&missing)).expect_err("io");
        assert!(matches!(err, ProfileLoadError::Io { .. }));
    }
}
