use super::*;

#[test]
fn convert_to_stdout_keeps_summary_on_stderr() {
    convert()
        .arg(fixture("fixtures/ccr1036-export.rsc"))
        .arg("--from")
        .arg("1036")
        .arg("--to")
        .arg("2004")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "set [ find default-name=sfp-sfpplus1 ] comment=uplink-a",
        ))
        .stdout(predicate::str::contains("/routing bgp template"))
        .stdout(predicate::str::contains("migrate_summary").not())
        .stderr(predicate::str::contains("migrate_summary source=1036 target=2004 mapped=4"))
        .stderr(predicate::str::contains("- ether1 -> sfp-sfpplus1"));
}

#[test]
fn convert_writes_output_file() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("ccr2004.rsc");

    convert()
        .arg(fixture("fixtures/ccr1036-export.rsc"))
        .arg("-o")
        .arg(path_as_str(&output_path))
        .arg("--from")
        .arg("1036")
        .arg("--to")
        .arg("2004")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate_summary"));

    let converted = fs::read_to_string(&output_path).expect("converted file");
    assert!(converted.starts_with("# 2024-03-11 09:14:02 by RouterOS 7.12.1\n"));
    assert!(converted.contains("add address=192.0.2.2/30 interface=sfp-sfpplus1 network=192.0.2.0\n"));
    assert!(converted.contains("gateway=192.0.2.1%sfp-sfpplus1"));
    assert!(converted.ends_with("/ip firewall nat\nadd action=masquerade chain=srcnat out-interface=sfp-sfpplus1\n"));
}

#[test]
fn converting_converted_output_changes_nothing() {
    let dir = tempdir().expect("tempdir");
    let first = dir.path().join("first.rsc");
    let second = dir.path().join("second.rsc");

    for (input, output) in [
        (fixture("fixtures/ccr1036-export.rsc"), &first),
        (first.clone(), &second),
    ] {
        convert()
            .arg(path_as_str(&input))
            .arg("--output")
            .arg(path_as_str(output))
            .arg("--from")
            .arg("1036")
            .arg("--to")
            .arg("2004")
            .arg("--quiet")
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    let first = fs::read_to_string(&first).expect("first");
    let second = fs::read_to_string(&second).expect("second");
    pretty_assertions::assert_eq!(first, second);
}

#[test]
fn convert_json_summary_reports_mapping_and_sections() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("out.rsc");

    let assert = convert()
        .arg(fixture("fixtures/minimal-export.rsc"))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .arg("--from")
        .arg("1036")
        .arg("--to")
        .arg("2004")
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let summary: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json summary");
    assert_eq!(summary["mapping"]["ether2"], "sfp-sfpplus1");
    assert_eq!(summary["mapping"]["ether1"], "sfp-sfpplus2");
    assert_eq!(summary["identity"], false);
    assert_eq!(
        summary["merge"]["appended"][0],
        "/routing ospf instance"
    );
    assert_eq!(summary["parameters"]["lan_network"], "172.16.4.1/24");
}

#[test]
fn same_profile_is_byte_identical() {
    let input = fixture("fixtures/ccr1036-export.rsc");
    let expected = fs::read(&input).expect("fixture");

    convert()
        .arg(path_as_str(&input))
        .arg("--from")
        .arg("1036")
        .arg("--to")
        .arg("1036")
        .arg("-q")
        .assert()
        .success()
        .stdout(expected);
}
