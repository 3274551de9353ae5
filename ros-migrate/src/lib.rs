//! Migration of RouterOS export configurations between router hardware models.
//!
//! Different MikroTik models name their physical ports differently and may
//! need different routing blocks. This library takes an export from one model
//! and produces an equivalent export for another, changing only what the move
//! requires and leaving every other byte as it was.
//!
//! # Architecture
//!
//! ## Profiles
//!
//! - [`profile`] - Model profiles (naming scheme, rename tables, routing settings)
//!
//! ## Pipeline phases
//!
//! - [`extract`] - Router id, AS number, networks and peers pulled from the export
//! - [`remap`] - Physical interface mapping for a profile pair
//! - [`references`] - Interface reference rewriting across every section
//! - [`synthesize`] - Target routing blocks and dialect token rewrites
//! - [`merge`] - Section replacement, firewall relocation and deduplication
//!
//! ## Orchestration & reporting
//!
//! - [`engine`] - [`Migrator`] and the ordered pipeline
//! - [`report`] - Terminal output for summaries, inventories and profiles
//!
//! # Examples
//!
//! ```ignore
//! use ros_migrate::Migrator;
//!
//! let migrator = Migrator::embedded()?;
//! let input = std::fs::read("ccr1036-export.rsc")?;
//! let result = migrator.migrate(&input, "1036", "2004")?;
//! print!("{}", result.target_text);
//! ```
//!
//! # Built on ros-export-core
//!
//! Parsing and lossless rendering live in `ros-export-core`. All model-specific
//! logic is contained in this crate.

pub mod engine;
pub mod extract;
pub mod merge;
pub mod profile;
pub mod references;
pub mod remap;
pub mod report;
pub mod synthesize;

pub use engine::{
    migrate, MigrateError, MigrationResult, MigrationSummary, Migrator, ProfileRole,
};
pub use profile::{Profile, ProfileLoadError, ProfileRegistry};
