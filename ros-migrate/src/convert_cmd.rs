use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ros_migrate::report::{render_mapping, render_merge_outcome, render_summary};
use ros_migrate::{MigrationSummary, Migrator, ProfileRegistry};

use crate::cli::{ConvertArgs, OutputFormat};

/// Convert one export and write the result to a file or stdout.
///
/// The summary goes to stdout when the converted text is written to a file,
/// and to stderr when stdout carries the converted text.
pub fn run_convert(args: ConvertArgs) -> Result<()> {
    if let Some(output) = &args.output {
        ensure_distinct_output(output, &args.input)?;
    }

    let registry = ProfileRegistry::load(args.profiles_dir.as_deref())
        .context("failed to load profiles")?;
    let input = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let result = Migrator::new(registry)
        .migrate(&input, &args.from, &args.to)
        .with_context(|| format!("failed to migrate {}", args.input.display()))?;

    match &args.output {
        Some(path) => fs::write(path, &result.target_text)
            .with_context(|| format!("failed to write output {}", path.display()))?,
        None => print!("{}", result.target_text),
    }

    if args.quiet {
        return Ok(());
    }
    let summary = render(&result.summary, args.format)?;
    if args.output.is_some() {
        println!("{summary}");
    } else {
        eprintln!("{summary}");
    }
    Ok(())
}

fn render(summary: &MigrationSummary, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => {
            let mut out = vec![render_summary(summary)];
            if !summary.identity {
                out.push(render_mapping(&summary.mapping));
                out.push(render_merge_outcome(&summary.merge));
            }
            out.join("\n")
        }
        OutputFormat::Json => serde_json::to_string_pretty(summary)?,
    })
}

/// An export is never converted in place: the input must survive a bad profile.
fn ensure_distinct_output(output: &Path, input: &Path) -> Result<()> {
    let input_file = input
        .canonicalize()
        .with_context(|| format!("failed to read {}", input.display()))?;
    if resolve_output(output)? == input_file {
        bail!(
            "output {} is the input export; write the converted export elsewhere",
            output.display()
        );
    }
    Ok(())
}

/// The output may not exist yet, so resolve its directory and re-attach the file name.
fn resolve_output(output: &Path) -> Result<PathBuf> {
    if let Ok(resolved) = output.canonicalize() {
        return Ok(resolved);
    }
    let name = output
        .file_name()
        .with_context(|| format!("output {} has no file name", output.display()))?;
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = dir
        .canonicalize()
        .with_context(|| format!("output directory {} does not exist", dir.display()))?;
    Ok(dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::ensure_distinct_output;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn rejects_the_input_reached_through_another_path() {
        let dir = tempdir().expect("tempdir");
        let input = dir.path().join("export.rsc");
        fs::write(&input, "/ip address\n").expect("write");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        let aliased = dir.path().join("sub").join("..").join("export.rsc");

        let err = ensure_distinct_output(&aliased, &input).expect_err("same file");
        assert!(err.to_string().contains("is the input export"));
    }

    #[test]
    fn accepts_a_new_file_next_to_the_input() {
        let dir = tempdir().expect("tempdir");
        let input = dir.path().join("export.rsc");
        fs::write(&input, "").expect("write");
        let output = dir.path().join("sub").join("..").join("converted.rsc");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        assert!(ensure_distinct_output(&output, &input).is_ok());
    }

    #[test]
    fn missing_output_directory_is_reported() {
        let dir = tempdir().expect("tempdir");
        let input = dir.path().join("export.rsc");
        fs::write(&input, "").expect("write");
        let err = ensure_distinct_output(&dir.path().join("nope").join("out.rsc"), &input)
            .expect_err("missing dir");
        assert!(err.to_string().contains("does not exist"));
    }
}
