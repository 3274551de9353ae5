use super::*;

#[test]
fn unknown_profiles_fail_with_identifier() {
    convert()
        .arg(fixture("fixtures/minimal-export.rsc"))
        .arg("--from")
        .arg("9999")
        .arg("--to")
        .arg("8888")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown source profile '9999'"));
}

#[test]
fn refuses_to_overwrite_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("export.rsc");
    fs::copy(fixture("fixtures/minimal-export.rsc"), &input).expect("copy");
    let before = fs::read(&input).expect("read");

    convert()
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&input))
        .arg("--from")
        .arg("1036")
        .arg("--to")
        .arg("2004")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is the input export"));

    assert_eq!(fs::read(&input).expect("read"), before);
}

#[test]
fn non_utf8_input_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("binary.rsc");
    fs::write(&input, [b'/', b'i', b'p', 0xff, b'\n']).expect("write");

    convert()
        .arg(path_as_str(&input))
        .arg("--from")
        .arg("1036")
        .arg("--to")
        .arg("2004")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn missing_input_reports_path() {
    convert()
        .arg("does-not-exist.rsc")
        .arg("--from")
        .arg("1036")
        .arg("--to")
        .arg("2004")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read does-not-exist.rsc"));
}
