//! Interface reference rewriting.
//!
//! Only `add`/`set` statement lines are rewritten. A command written on the
//! path line itself (`/ip address add ... interface=ether1`) stays as it was;
//! a warning names its section when it refers to a remapped interface.

use ros_export_core::{unquote, ConfigDocument, Line, Statement, Token};
use tracing::warn;

use crate::remap::InterfaceMapping;

/// Keys whose values name interfaces, wherever the statement lives.
pub const REFERENCE_KEYS: &[&str] = &[
    "interface",
    "gateway",
    "default-name",
    "in-interface",
    "out-interface",
    "interfaces",
    "master-port",
];

/// Return a copy of `doc` with every interface reference rewritten through `mapping`.
pub fn rewrite_references(doc: &ConfigDocument, mapping: &InterfaceMapping) -> ConfigDocument {
    let mut out = doc.clone();
    apply(&mut out, mapping);
    out
}

/// Rewrite interface references in place. Returns the number of statements changed.
///
/// Statements that do not change keep their original raw text, including any
/// `\` continuations.
pub fn apply(doc: &mut ConfigDocument, mapping: &InterfaceMapping) -> usize {
    if mapping.is_empty() {
        return 0;
    }
    for path in stale_inline_commands(doc, mapping) {
        warn!(path, "inline command references a remapped interface; left unchanged");
    }
    let sections = doc.sections.iter_mut().map(|s| &mut s.lines);
    std::iter::once(&mut doc.preamble)
        .chain(sections)
        .flat_map(|lines| lines.iter_mut())
        .map(|line| rewrite_line(line, mapping))
        .filter(|changed| *changed)
        .count()
}

/// Paths whose path line carries an inline command naming a mapped interface.
pub fn stale_inline_commands<'a>(doc: &'a ConfigDocument, mapping: &InterfaceMapping) -> Vec<&'a str> {
    doc.sections
        .iter()
        .filter(|section| {
            section
                .header
                .inline_statement()
                .is_some_and(|stmt| rewrite_statement(&stmt, mapping).is_some())
        })
        .map(|section| section.path())
        .collect()
}

fn rewrite_line(line: &mut Line, mapping: &InterfaceMapping) -> bool {
    let Some(stmt) = line.as_statement() else {
        return false;
    };
    let Some(rewritten) = rewrite_statement(stmt, mapping) else {
        return false;
    };
    *line = line.with_statement(rewritten);
    true
}

fn rewrite_statement(stmt: &Statement, mapping: &InterfaceMapping) -> Option<Statement> {
    // `name=` is an interface reference only on the statement that also
    // identifies the port by `default-name=`.
    let names_port = stmt.get("default-name").is_some();
    let mut changed = false;
    let tokens = stmt
        .tokens
        .iter()
        .map(|token| match token {
            Token::Pair { key, value }
                if REFERENCE_KEYS.contains(&key.as_str()) || (names_port && key == "name") =>
            {
                match rewrite_value(value, mapping) {
                    Some(new_value) => {
                        changed = true;
                        Token::pair(key.clone(), new_value)
                    }
                    None => token.clone(),
                }
            }
            _ => token.clone(),
        })
        .collect();
    changed.then(|| Statement::new(stmt.verb.clone(), tokens))
}

/// Rewrite a reference value. Handles comma-separated lists and
/// `<address>%<interface>` gateways; keeps surrounding quotes.
fn rewrite_value(value: &str, mapping: &InterfaceMapping) -> Option<String> {
    let inner = unquote(value);
    let quoted = inner.len() != value.len();
    let mut changed = false;
    let elements: Vec<String> = inner
        .split(',')
        .map(|element| match rewrite_element(element, mapping) {
            Some(new) => {
                changed = true;
                new
            }
            None => element.to_string(),
        })
        .collect();
    if !changed {
        return None;
    }
    let joined = elements.join(",");
    Some(if quoted {
        format!("\"{joined}\"")
    } else {
        joined
    })
}

fn rewrite_element(element: &str, mapping: &InterfaceMapping) -> Option<String> {
    if let Some(new) = mapping.get(element) {
        return Some(new.to_string());
    }
    let (address, iface) = element.rsplit_once('%')?;
    mapping.get(iface).map(|new| format!("{address}%{new}"))
}

#[cfg(test)]
mod tests {
    use super::{rewrite_references, stale_inline_commands};
    use crate::remap::InterfaceMapping;
    use pretty_assertions::assert_eq;
    use ros_export_core::{parse, render};

    fn mapping(pairs: &[(&str, &str)]) -> InterfaceMapping {
        pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn rewrites_interface_and_gateway_tokens_anywhere() {
        let doc = parse(
            "/ip address\nadd address=10.0.0.1/24 interface=ether1 network=10.0.0.0\n/ip route\nadd dst-address=0.0.0.0/0 gateway=ether1\nadd gateway=192.0.2.1%ether1\n/ip firewall filter\nadd chain=input in-interface=ether1 action=drop\n",
        );
        let out = rewrite_references(&doc, &mapping(&[("ether1", "sfp-sfpplus1")]));
        assert_eq!(
            render(&out),
            "/ip address\nadd address=10.0.0.1/24 interface=sfp-sfpplus1 network=10.0.0.0\n/ip route\nadd dst-address=0.0.0.0/0 gateway=sfp-sfpplus1\nadd gateway=192.0.2.1%sfp-sfpplus1\n/ip firewall filter\nadd chain=input in-interface=sfp-sfpplus1 action=drop\n"
        );
    }

    #[test]
    fn leaves_unmapped_names_and_other_keys_alone() {
        let input = "/interface bridge port\nadd bridge=ether1 interface=ether10 comment=ether1\n";
        let out = rewrite_references(&parse(input), &mapping(&[("ether1", "sfp-sfpplus1")]));
        assert_eq!(render(&out), input);
    }

    #[test]
    fn rewrites_lists_and_quoted_values() {
        let doc = parse(
            "/routing ospf interface-template\nadd interfaces=ether1,ether2,bridge\n/interface list member\nadd interface=\"ether2\" list=LAN\n",
        );
        let out = rewrite_references(
            &doc,
            &mapping(&[("ether1", "sfp-sfpplus1"), ("ether2", "sfp-sfpplus2")]),
        );
        assert_eq!(
            render(&out),
            "/routing ospf interface-template\nadd interfaces=sfp-sfpplus1,sfp-sfpplus2,bridge\n/interface list member\nadd interface=\"sfp-sfpplus2\" list=LAN\n"
        );
    }

    #[test]
    fn renames_port_name_only_alongside_default_name() {
        let doc = parse(
            "/interface ethernet\nset [ find default-name=ether1 ] name=ether1\n/system identity\nset name=ether1\n",
        );
        let out = rewrite_references(&doc, &mapping(&[("ether1", "sfp-sfpplus1")]));
        assert_eq!(
            render(&out),
            "/interface ethernet\nset [ find default-name=sfp-sfpplus1 ] name=sfp-sfpplus1\n/system identity\nset name=ether1\n"
        );
    }

    #[test]
    fn untouched_continuation_lines_keep_raw_text() {
        let input = "/ip address\nadd address=10.0.0.1/24 \\\n    interface=ether9\n";
        let out = rewrite_references(&parse(input), &mapping(&[("ether1", "sfp-sfpplus1")]));
        assert_eq!(render(&out), input);
    }

    #[test]
    fn inline_commands_are_reported_not_rewritten() {
        let input = "/interface ethernet\nset [ find default-name=ether1 ]\n/ip address add address=10.0.0.1/24 interface=ether1\n/ip route add gateway=10.0.0.254\n";
        let doc = parse(input);
        let mapping = mapping(&[("ether1", "sfp-sfpplus1")]);
        assert_eq!(stale_inline_commands(&doc, &mapping), vec!["/ip address"]);

        let out = render(&rewrite_references(&doc, &mapping));
        assert!(out.contains("/ip address add address=10.0.0.1/24 interface=ether1\n"));
        assert!(out.contains("default-name=sfp-sfpplus1"));
    }
}
