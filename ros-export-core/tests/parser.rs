use std::path::PathBuf;

use ros_export_core::{parse_file, LineKind};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_real_world_export_structure() {
    let doc = parse_file(&fixture("fixtures/ccr1036-export.rsc")).expect("parse should succeed");

    assert_eq!(doc.preamble.len(), 5);
    assert!(doc
        .preamble
        .iter()
        .all(|line| line.kind == LineKind::Comment));

    let paths: Vec<&str> = doc.sections.iter().map(|s| s.path()).collect();
    assert_eq!(paths.first(), Some(&"/interface bridge"));
    assert_eq!(paths.last(), Some(&"/system identity"));
    assert!(paths.contains(&"/routing ospf interface-template"));

    let ethernet = doc.section("/interface ethernet").expect("ethernet section");
    let names: Vec<&str> = ethernet
        .statements()
        .filter_map(|s| s.get("default-name"))
        .collect();
    assert_eq!(names, vec!["ether1", "ether2", "ether3", "ether4"]);
}

#[test]
fn continued_statement_is_one_logical_line() {
    let doc = parse_file(&fixture("fixtures/ccr1036-export.rsc")).expect("parse should succeed");
    let addresses = doc.section("/ip address").expect("address section");
    assert_eq!(addresses.lines.len(), 4);

    let continued = addresses
        .statements()
        .find(|s| s.get("interface") == Some("ether2"))
        .expect("continued statement");
    assert_eq!(continued.get("comment"), Some("\"secondary uplink\""));
    assert_eq!(continued.get("network"), Some("198.51.100.0"));
}
