use super::*;

#[test]
fn profiles_dir_overrides_embedded_family() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("2004.toml"),
        "id = \"2004\"\nmodel = \"lab\"\n\n[naming]\nscheme = \"sequential\"\nfamily = \"sfp\"\n",
    )
    .expect("profile");

    convert()
        .arg(fixture("fixtures/minimal-export.rsc"))
        .arg("--from")
        .arg("1036")
        .arg("--to")
        .arg("2004")
        .arg("--profiles-dir")
        .arg(path_as_str(dir.path()))
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("default-name=sfp1"))
        .stdout(predicate::str::contains("interface=sfp2"))
        .stdout(predicate::str::contains("/routing").not());
}

#[test]
fn invalid_profile_file_fails_startup() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("broken.toml"),
        "id = \"3000\"\n[naming]\nscheme = \"sequential\"\nfamily = \"port1\"\n",
    )
    .expect("profile");

    convert()
        .arg(fixture("fixtures/minimal-export.rsc"))
        .arg("--from")
        .arg("1036")
        .arg("--to")
        .arg("2004")
        .arg("--profiles-dir")
        .arg(path_as_str(dir.path()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load profiles"))
        .stderr(predicate::str::contains("must not end with a digit"));
}
