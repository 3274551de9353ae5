use colored::Colorize;
use ros_export_core::ConfigDocument;
use serde::Serialize;

use crate::engine::MigrationSummary;
use crate::extract::ExtractedParameters;
use crate::merge::MergeOutcome;
use crate::profile::{NamingScheme, ProfileRegistry};
use crate::remap::InterfaceMapping;

/// Per-section counts for `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStats {
    pub path: String,
    pub statements: usize,
    pub lines: usize,
}

/// One row per section, in document order. Repeated paths get separate rows.
pub fn section_inventory(doc: &ConfigDocument) -> Vec<SectionStats> {
    doc.sections
        .iter()
        .map(|section| SectionStats {
            path: section.path().to_string(),
            statements: section.statements().count(),
            lines: section.lines.len() + 1,
        })
        .collect()
}

/// One-line summary of a migration.
pub fn render_summary(summary: &MigrationSummary) -> String {
    if summary.identity {
        return format!(
            "migrate_summary source={} target={} identity=true",
            summary.source_profile, summary.target_profile
        )
        .cyan()
        .to_string();
    }
    format!(
        "migrate_summary source={} target={} mapped={} references={} replaced={} appended={} dropped={} relocated={} token_rewrites={} duplicates={}",
        summary.source_profile,
        summary.target_profile,
        summary.mapping.len(),
        summary.references_rewritten,
        summary.merge.replaced.len(),
        summary.merge.appended.len(),
        summary.merge.dropped.len(),
        summary.merge.relocated.len(),
        summary.token_rewrites,
        summary.duplicates_removed,
    )
    .cyan()
    .to_string()
}

/// Section-level merge actions, coloured by kind.
pub fn render_merge_outcome(outcome: &MergeOutcome) -> String {
    let mut out = vec!["sections".to_string()];
    let groups = [
        ("replaced", &outcome.replaced),
        ("appended", &outcome.appended),
        ("dropped", &outcome.dropped),
        ("relocated", &outcome.relocated),
    ];
    for (kind, paths) in groups {
        for path in paths {
            let line = format!("{kind:>9} {path}");
            out.push(match kind {
                "appended" => line.green().to_string(),
                "dropped" => line.red().to_string(),
                "replaced" => line.yellow().to_string(),
                _ => line,
            });
        }
    }
    if out.len() == 1 {
        out.push("- none".to_string());
    }
    out.join("\n")
}

pub fn render_mapping(mapping: &InterfaceMapping) -> String {
    let mut out = vec!["interface_mapping".to_string()];
    if mapping.is_empty() {
        out.push("- none".to_string());
    }
    for (from, to) in mapping.iter() {
        out.push(format!("- {from} -> {to}"));
    }
    out.join("\n")
}

pub fn render_parameters(params: &ExtractedParameters) -> String {
    let peers: Vec<String> = params
        .peer_addresses
        .iter()
        .map(ToString::to_string)
        .collect();
    [
        "parameters".to_string(),
        format!("- router_id: {}", params.router_id),
        format!("- as_number: {}", params.as_number),
        format!("- lan_network: {}", params.lan_network),
        format!("- loopback_network: {}", params.loopback_network),
        format!("- peer_addresses: {}", peers.join(",")),
    ]
    .join("\n")
}

pub fn render_section_inventory(rows: &[SectionStats]) -> String {
    let mut out = vec!["section_inventory".to_string()];
    if rows.is_empty() {
        out.push("- none".to_string());
    }
    for row in rows {
        out.push(format!(
            "- {}: statements={} lines={}",
            row.path, row.statements, row.lines
        ));
    }
    out.join("\n")
}

pub fn render_profiles(registry: &ProfileRegistry) -> String {
    let mut out = vec!["profiles".to_string()];
    for loaded in registry.iter() {
        let profile = &loaded.profile;
        let naming = match &profile.naming {
            NamingScheme::Fixed => "fixed".to_string(),
            NamingScheme::Sequential { family } => format!("sequential:{family}"),
        };
        out.push(format!(
            "- {} model={} naming={} renames={} synthesize={} source={}",
            profile.id.bold(),
            profile.model,
            naming,
            profile.renames.len(),
            profile.routing.synthesize,
            loaded.source
        ));
    }
    out.join("\n")
}
