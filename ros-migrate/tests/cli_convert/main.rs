use std::path::PathBuf;
use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

fn convert() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ros-migrate"));
    cmd.arg("convert");
    cmd
}

mod basics;
mod errors;
mod profiles_dir;
