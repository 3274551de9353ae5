use anyhow::{Context, Result};
use ros_migrate::report::render_profiles;
use ros_migrate::ProfileRegistry;

use crate::cli::{OutputFormat, ProfilesArgs};

pub fn run_profiles(args: ProfilesArgs) -> Result<()> {
    let registry = ProfileRegistry::load(args.profiles_dir.as_deref())
        .context("failed to load profiles")?;

    match args.format {
        OutputFormat::Text => println!("{}", render_profiles(&registry)),
        OutputFormat::Json => {
            let loaded: Vec<_> = registry.iter().collect();
            println!("{}", serde_json::to_string_pretty(&loaded)?);
        }
    }
    Ok(())
}
