use anyhow::{Context, Result};
use ros_export_core::parse_file;
use ros_migrate::extract::{extract_excluding, ExtractedParameters};
use ros_migrate::remap::{plan, remap, InterfaceMapping};
use ros_migrate::report::{
    render_mapping, render_parameters, render_section_inventory, section_inventory, SectionStats,
};
use ros_migrate::{MigrateError, ProfileRegistry, ProfileRole};
use serde::Serialize;

use crate::cli::{InspectArgs, OutputFormat};

#[derive(Debug, Serialize)]
struct InspectReport {
    parameters: ExtractedParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    sections: Option<Vec<SectionStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mapping: Option<InterfaceMapping>,
}

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let doc = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    let registry = ProfileRegistry::load(args.profiles_dir.as_deref())
        .context("failed to load profiles")?;

    let target = args
        .to
        .as_deref()
        .map(|to| lookup(&registry, to, ProfileRole::Target))
        .transpose()?;
    let mapping = match target {
        Some(target) => Some(match &args.from {
            Some(from) => plan(&doc, lookup(&registry, from, ProfileRole::Source)?, target),
            None => remap(&doc, target),
        }),
        None => None,
    };
    // Match what `convert` would extract for this target.
    let excluded = target
        .map(|target| target.preserve.trailing_prefixes.as_slice())
        .unwrap_or_default();
    let report = InspectReport {
        parameters: extract_excluding(&doc, excluded),
        sections: args.sections.then(|| section_inventory(&doc)),
        mapping,
    };

    match args.format {
        OutputFormat::Text => {
            let mut out = vec![render_parameters(&report.parameters)];
            if let Some(rows) = &report.sections {
                out.push(render_section_inventory(rows));
            }
            if let Some(mapping) = &report.mapping {
                out.push(render_mapping(mapping));
            }
            println!("{}", out.join("\n\n"));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn lookup<'a>(
    registry: &'a ProfileRegistry,
    id: &str,
    role: ProfileRole,
) -> Result<&'a ros_migrate::Profile, MigrateError> {
    registry.get(id).ok_or_else(|| MigrateError::UnknownProfile {
        role,
        id: id.to_string(),
    })
}
