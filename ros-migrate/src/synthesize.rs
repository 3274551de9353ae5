//! Target-dialect routing blocks generated from extracted parameters.
//!
//! The dynamic-routing block is an OSPF instance, one backbone area and two
//! interface templates (passive loopback, active LAN). The peering block is a
//! BGP template plus exactly two connections. Logical interface and object
//! names come from the profile, never from the document.

use ros_export_core::{ConfigDocument, Line, Section, Statement, Token};
use serde::Serialize;

use crate::extract::{ExtractedParameters, PLACEHOLDER_PEER};
use crate::profile::{Profile, RoutingSettings, TokenRewrite};

pub const OSPF_INSTANCE_PATH: &str = "/routing ospf instance";
pub const OSPF_AREA_PATH: &str = "/routing ospf area";
pub const OSPF_TEMPLATE_PATH: &str = "/routing ospf interface-template";
pub const BGP_TEMPLATE_PATH: &str = "/routing bgp template";
pub const BGP_CONNECTION_PATH: &str = "/routing bgp connection";

const OSPF_COST: &str = "10";
const OSPF_PRIORITY: &str = "1";
const BGP_PORT: &str = "179";
const BGP_OUTPUT_NETWORK: &str = "bgp-networks";
const BGP_ROUTING_TABLE: &str = "main";

/// Sections generated for one migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesizedRouting {
    pub dynamic_routing: Vec<Section>,
    pub peering: Vec<Section>,
}

impl SynthesizedRouting {
    pub fn is_empty(&self) -> bool {
        self.dynamic_routing.is_empty() && self.peering.is_empty()
    }

    /// Blocks in merge order, each a run of sections that belong together.
    pub fn blocks(&self) -> [&[Section]; 2] {
        [self.dynamic_routing.as_slice(), self.peering.as_slice()]
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.dynamic_routing
            .iter()
            .chain(self.peering.iter())
            .map(Section::path)
    }
}

/// Build the routing blocks for `target`. Empty when the profile does not synthesize.
pub fn synthesize_routing(params: &ExtractedParameters, target: &Profile) -> SynthesizedRouting {
    if !target.routing.synthesize {
        return SynthesizedRouting::default();
    }
    SynthesizedRouting {
        dynamic_routing: dynamic_routing_block(params, &target.routing),
        peering: peering_block(params, &target.routing),
    }
}

fn dynamic_routing_block(params: &ExtractedParameters, routing: &RoutingSettings) -> Vec<Section> {
    let instance = section(
        OSPF_INSTANCE_PATH,
        vec![add(vec![
            kv("disabled", "no"),
            kv("name", &routing.ospf_instance),
            kv("router-id", &params.router_id),
        ])],
    );
    let area = section(
        OSPF_AREA_PATH,
        vec![add(vec![
            kv("disabled", "no"),
            kv("instance", &routing.ospf_instance),
            kv("name", &routing.ospf_area),
        ])],
    );
    let templates = section(
        OSPF_TEMPLATE_PATH,
        vec![
            add(vec![
                kv("area", &routing.ospf_area),
                kv("cost", OSPF_COST),
                kv("disabled", "no"),
                kv("interfaces", &routing.loopback_interface),
                kv("networks", &params.loopback_network.to_string()),
                Token::word("passive"),
                kv("priority", OSPF_PRIORITY),
            ]),
            add(vec![
                kv("area", &routing.ospf_area),
                kv("cost", OSPF_COST),
                kv("disabled", "no"),
                kv("interfaces", &routing.lan_interface),
                kv("networks", &params.lan_network.to_string()),
                kv("priority", OSPF_PRIORITY),
            ]),
        ],
    );
    vec![instance, area, templates]
}

fn peering_block(params: &ExtractedParameters, routing: &RoutingSettings) -> Vec<Section> {
    let template = section(
        BGP_TEMPLATE_PATH,
        vec![Statement::new(
            "set",
            vec![
                Token::word(routing.bgp_template.clone()),
                kv("as", &params.as_number),
                kv("disabled", "no"),
                kv("multihop", "yes"),
                kv("output.network", BGP_OUTPUT_NETWORK),
                kv("router-id", &params.router_id),
                kv("routing-table", BGP_ROUTING_TABLE),
            ],
        )],
    );

    let connections = (0..2)
        .map(|idx| {
            let peer = params
                .peer_addresses
                .get(idx)
                .copied()
                .unwrap_or(PLACEHOLDER_PEER);
            add(vec![
                kv("cisco-vpls-nlri-len-fmt", "auto-bits"),
                kv("connect", "yes"),
                kv("listen", "yes"),
                kv("local.address", &params.router_id),
                kv(".role", &routing.peer_role),
                kv("multihop", "yes"),
                kv("name", &format!("Peer{}", idx + 1)),
                kv("remote.address", &peer.to_string()),
                kv(".as", &params.as_number),
                kv(".port", BGP_PORT),
                kv("templates", &routing.bgp_template),
            ])
        })
        .collect();

    vec![template, section(BGP_CONNECTION_PATH, connections)]
}

/// Rename statement keys per the dialect rewrites. Returns the number of keys renamed.
///
/// A key matches when it equals `from`, or when its last dotted segment does
/// (`local.from`, `.from`). Keys that merely contain `from` are untouched.
pub fn apply_token_rewrites(doc: &mut ConfigDocument, rewrites: &[TokenRewrite]) -> usize {
    if rewrites.is_empty() {
        return 0;
    }
    let mut renamed = 0;
    let sections = doc.sections.iter_mut().map(|s| &mut s.lines);
    for line in std::iter::once(&mut doc.preamble)
        .chain(sections)
        .flat_map(|lines| lines.iter_mut())
    {
        let Some(stmt) = line.as_statement() else {
            continue;
        };
        let mut count = 0;
        let tokens = stmt
            .tokens
            .iter()
            .map(|token| match token {
                Token::Pair { key, value } => match rename_key(key, rewrites) {
                    Some(new_key) => {
                        count += 1;
                        Token::pair(new_key, value.clone())
                    }
                    None => token.clone(),
                },
                Token::Word(_) => token.clone(),
            })
            .collect();
        if count > 0 {
            let rewritten = Statement::new(stmt.verb.clone(), tokens);
            *line = line.with_statement(rewritten);
            renamed += count;
        }
    }
    renamed
}

fn rename_key(key: &str, rewrites: &[TokenRewrite]) -> Option<String> {
    rewrites.iter().find_map(|rw| {
        if key == rw.from {
            return Some(rw.to.clone());
        }
        let head = key.strip_suffix(rw.from.as_str())?;
        head.ends_with('.').then(|| format!("{head}{}", rw.to))
    })
}

fn section(path: &str, statements: Vec<Statement>) -> Section {
    let mut section = Section::new(path);
    section.lines = statements.into_iter().map(Line::statement).collect();
    section
}

fn add(tokens: Vec<Token>) -> Statement {
    Statement::new("add", tokens)
}

fn kv(key: &str, value: &str) -> Token {
    Token::pair(key, value)
}

/// Serializable view of what was synthesized, for reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    pub paths: Vec<String>,
    pub statements: usize,
}

impl From<&SynthesizedRouting> for SynthesisReport {
    fn from(routing: &SynthesizedRouting) -> Self {
        let sections = routing.dynamic_routing.iter().chain(routing.peering.iter());
        let (paths, statements) = sections.fold((Vec::new(), 0), |(mut paths, count), s| {
            paths.push(s.path().to_string());
            (paths, count + s.statements().count())
        });
        Self { paths, statements }
    }
}
