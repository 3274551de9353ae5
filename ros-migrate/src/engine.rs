//! Migration orchestration.
//!
//! A [`Migrator`] owns an immutable [`ProfileRegistry`] and runs the phases in
//! a fixed order:
//!
//! 1. **Extract** semantic parameters from the source document
//! 2. **Remap** physical interface names for the profile pair
//! 3. **Rewrite references** to remapped interfaces everywhere
//! 4. **Synthesize and merge** target routing blocks, then apply dialect token rewrites
//! 5. **Deduplicate** repeated lines per section
//!
//! Every call is self-contained; a single `&Migrator` can serve many threads.

use std::fmt::{self, Display, Formatter};
use std::str::Utf8Error;
use std::sync::OnceLock;

use ros_export_core::{parse, render};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::extract::{extract_excluding, ExtractedParameters};
use crate::merge::{dedup, merge, MergeOutcome};
use crate::profile::{Profile, ProfileLoadError, ProfileRegistry};
use crate::references;
use crate::remap::{plan, InterfaceMapping};
use crate::synthesize::{apply_token_rewrites, synthesize_routing, SynthesisReport};

/// Which side of the migration a profile identifier was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    Source,
    Target,
}

impl Display for ProfileRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("unknown {role} profile '{id}'")]
    UnknownProfile { role: ProfileRole, id: String },
    #[error("input is not valid UTF-8: {0}")]
    MalformedInput(#[from] Utf8Error),
    #[error(transparent)]
    Profiles(#[from] ProfileLoadError),
}

/// Everything a caller needs to report on one migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub source_profile: String,
    pub target_profile: String,
    /// Source and target were the same profile; the text passed through untouched.
    pub identity: bool,
    pub mapping: InterfaceMapping,
    pub parameters: Option<ExtractedParameters>,
    pub references_rewritten: usize,
    pub token_rewrites: usize,
    pub merge: MergeOutcome,
    pub duplicates_removed: usize,
    pub synthesized: SynthesisReport,
}

impl MigrationSummary {
    fn identity(source: &Profile, target: &Profile) -> Self {
        Self {
            source_profile: source.id.clone(),
            target_profile: target.id.clone(),
            identity: true,
            mapping: InterfaceMapping::default(),
            parameters: None,
            references_rewritten: 0,
            token_rewrites: 0,
            merge: MergeOutcome::default(),
            duplicates_removed: 0,
            synthesized: SynthesisReport::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    pub source_text: String,
    pub target_text: String,
    pub summary: MigrationSummary,
}

/// Runs migrations against a fixed set of profiles.
#[derive(Debug, Clone)]
pub struct Migrator {
    registry: ProfileRegistry,
}

impl Migrator {
    pub fn new(registry: ProfileRegistry) -> Self {
        Self { registry }
    }

    /// A migrator over the built-in profiles.
    pub fn embedded() -> Result<Self, ProfileLoadError> {
        ProfileRegistry::embedded().map(Self::new)
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Migrate an export from the `source` model's dialect to the `target` model's.
    ///
    /// # Errors
    ///
    /// [`MigrateError::UnknownProfile`] when either identifier is not in the
    /// registry (checked before the input is looked at), and
    /// [`MigrateError::MalformedInput`] when `input` is not UTF-8.
    pub fn migrate(
        &self,
        input: &[u8],
        source: &str,
        target: &str,
    ) -> Result<MigrationResult, MigrateError> {
        let source_profile = self.profile(source, ProfileRole::Source)?;
        let target_profile = self.profile(target, ProfileRole::Target)?;
        let text = std::str::from_utf8(input)?;

        if source_profile.id == target_profile.id {
            debug!(profile = %source_profile.id, "identical profiles, passing input through");
            return Ok(MigrationResult {
                source_text: text.to_string(),
                target_text: text.to_string(),
                summary: MigrationSummary::identity(source_profile, target_profile),
            });
        }

        let mut doc = parse(text);
        // Relocated sections end up after everything else, so they must not
        // decide first-match extraction.
        let parameters = extract_excluding(&doc, &target_profile.preserve.trailing_prefixes);
        let mapping = plan(&doc, source_profile, target_profile);
        debug!(entries = mapping.len(), "interface mapping built");

        let references_rewritten = references::apply(&mut doc, &mapping);
        let routing = synthesize_routing(&parameters, target_profile);
        let (mut doc, merge_outcome) = merge(doc, &routing, target_profile);
        let token_rewrites = apply_token_rewrites(&mut doc, &target_profile.token_rewrites);
        let duplicates_removed = dedup(&mut doc);

        info!(
            source = %source_profile.id,
            target = %target_profile.id,
            mapped = mapping.len(),
            references = references_rewritten,
            duplicates = duplicates_removed,
            "migration complete"
        );

        Ok(MigrationResult {
            source_text: text.to_string(),
            target_text: render(&doc),
            summary: MigrationSummary {
                source_profile: source_profile.id.clone(),
                target_profile: target_profile.id.clone(),
                identity: false,
                mapping,
                parameters: Some(parameters),
                references_rewritten,
                token_rewrites,
                merge: merge_outcome,
                duplicates_removed,
                synthesized: SynthesisReport::from(&routing),
            },
        })
    }

    fn profile(&self, id: &str, role: ProfileRole) -> Result<&Profile, MigrateError> {
        self.registry
            .get(id)
            .ok_or_else(|| MigrateError::UnknownProfile {
                role,
                id: id.to_string(),
            })
    }
}

/// Migrate with the built-in profiles, parsed once per process.
///
/// Callers that load profiles from a directory build their own [`Migrator`].
pub fn migrate(input: &[u8], source: &str, target: &str) -> Result<MigrationResult, MigrateError> {
    embedded_migrator()?.migrate(input, source, target)
}

fn embedded_migrator() -> Result<&'static Migrator, ProfileLoadError> {
    static EMBEDDED: OnceLock<Migrator> = OnceLock::new();
    if let Some(migrator) = EMBEDDED.get() {
        return Ok(migrator);
    }
    let migrator = Migrator::embedded()?;
    Ok(EMBEDDED.get_or_init(|| migrator))
}
