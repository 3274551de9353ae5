//! Semantic parameters pulled out of an export.
//!
//! Every rule scans statements in document order and is independent of the
//! others. A rule that finds nothing falls back to a fixed default, so
//! extraction never fails.

use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;
use std::str::FromStr;

use ros_export_core::{unquote, ConfigDocument, Line, Statement};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ROUTER_ID: &str = "<dynamic-router-id>";
pub const DEFAULT_AS_NUMBER: &str = "65000";
pub const DEFAULT_LAN_NETWORK: Ipv4Cidr = Ipv4Cidr::new(Ipv4Addr::UNSPECIFIED, 22);
pub const DEFAULT_LOOPBACK_NETWORK: Ipv4Cidr = Ipv4Cidr::new(Ipv4Addr::UNSPECIFIED, 32);
pub const PLACEHOLDER_PEER: Ipv4Addr = Ipv4Addr::UNSPECIFIED;
/// Peering synthesis always emits this many connections.
pub const MIN_PEERS: usize = 2;

/// An IPv4 address with prefix length, kept as written (host bits are not cleared).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    pub addr: Ipv4Addr,
    pub prefix: u8,
}

impl Ipv4Cidr {
    pub const fn new(addr: Ipv4Addr, prefix: u8) -> Self {
        Self { addr, prefix }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrParseError {
    #[error("missing '/' prefix separator")]
    MissingPrefix,
    #[error("invalid IPv4 address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error("invalid prefix length: {0}")]
    Prefix(String),
}

impl FromStr for Ipv4Cidr {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s.split_once('/').ok_or(CidrParseError::MissingPrefix)?;
        let addr: Ipv4Addr = addr.parse()?;
        let prefix = prefix
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= 32)
            .ok_or_else(|| CidrParseError::Prefix(prefix.to_string()))?;
        Ok(Self { addr, prefix })
    }
}

impl Display for Ipv4Cidr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl Serialize for Ipv4Cidr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedParameters {
    pub router_id: String,
    pub as_number: String,
    pub lan_network: Ipv4Cidr,
    pub loopback_network: Ipv4Cidr,
    /// At least [`MIN_PEERS`] entries, padded with [`PLACEHOLDER_PEER`].
    pub peer_addresses: Vec<Ipv4Addr>,
}

/// Apply every extraction rule over the whole document, substituting defaults for gaps.
pub fn extract(doc: &ConfigDocument) -> ExtractedParameters {
    extract_excluding(doc, &[])
}

/// Like [`extract`], but statements in sections under `excluded` prefixes are
/// not consulted. The engine excludes the sections merge relocates, so a
/// migrated document yields the same parameters as its source.
pub fn extract_excluding(doc: &ConfigDocument, excluded: &[String]) -> ExtractedParameters {
    let scope = || statements_outside(doc, excluded);
    let router_id = router_id(scope()).unwrap_or_else(|| {
        debug!(default = DEFAULT_ROUTER_ID, "no router-id found");
        DEFAULT_ROUTER_ID.to_string()
    });
    let as_number = as_number(scope()).unwrap_or_else(|| {
        debug!(default = DEFAULT_AS_NUMBER, "no standalone as= found");
        DEFAULT_AS_NUMBER.to_string()
    });
    let lan_network = lan_network(scope()).unwrap_or_else(|| {
        debug!(default = %DEFAULT_LAN_NETWORK, "no address= found");
        DEFAULT_LAN_NETWORK
    });
    let loopback_network = loopback_network(scope()).unwrap_or_else(|| {
        debug!(default = %DEFAULT_LOOPBACK_NETWORK, "no loopback address found");
        DEFAULT_LOOPBACK_NETWORK
    });

    let mut peer_addresses = peer_addresses(scope());
    if peer_addresses.len() < MIN_PEERS {
        debug!(
            found = peer_addresses.len(),
            "padding peer addresses with placeholder"
        );
        peer_addresses.resize(MIN_PEERS, PLACEHOLDER_PEER);
    }

    ExtractedParameters {
        router_id,
        as_number,
        lan_network,
        loopback_network,
        peer_addresses,
    }
}

/// Statements in document order, skipping sections at or below any `excluded` prefix.
pub fn statements_outside<'a>(
    doc: &'a ConfigDocument,
    excluded: &'a [String],
) -> impl Iterator<Item = &'a Statement> + 'a {
    let sections = doc
        .sections
        .iter()
        .filter(move |section| !excluded.iter().any(|prefix| section.is_under(prefix)))
        .flat_map(|section| section.lines.iter());
    doc.preamble
        .iter()
        .chain(sections)
        .filter_map(Line::as_statement)
}

/// First non-empty `router-id=` value.
pub fn router_id<'a>(statements: impl Iterator<Item = &'a Statement>) -> Option<String> {
    statements
        .filter_map(|stmt| stmt.get("router-id"))
        .map(unquote)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// First `as=<digits>`. Dotted keys such as `remote.as` or `.as` are not standalone.
pub fn as_number<'a>(statements: impl Iterator<Item = &'a Statement>) -> Option<String> {
    statements
        .flat_map(|stmt| stmt.pairs())
        .find(|(key, value)| *key == "as" && is_digits(unquote(value)))
        .map(|(_, value)| unquote(value).to_string())
}

/// First `address=<IPv4>/<prefix>`.
pub fn lan_network<'a>(mut statements: impl Iterator<Item = &'a Statement>) -> Option<Ipv4Cidr> {
    statements.find_map(address_cidr)
}

/// First `address=<IPv4>/<prefix>` on a statement that also has `interface=loopback`.
pub fn loopback_network<'a>(
    statements: impl Iterator<Item = &'a Statement>,
) -> Option<Ipv4Cidr> {
    statements
        .filter(|stmt| stmt.has_value_ignore_case("interface", "loopback"))
        .find_map(address_cidr)
}

/// Every `remote.address=<IPv4>` in order of appearance.
pub fn peer_addresses<'a>(statements: impl Iterator<Item = &'a Statement>) -> Vec<Ipv4Addr> {
    statements
        .flat_map(|stmt| stmt.pairs())
        .filter(|(key, _)| *key == "remote.address")
        .filter_map(|(_, value)| unquote(value).parse::<Ipv4Addr>().ok())
        .collect()
}

fn address_cidr(stmt: &Statement) -> Option<Ipv4Cidr> {
    stmt.pairs()
        .filter(|(key, _)| *key == "address")
        .find_map(|(_, value)| unquote(value).parse::<Ipv4Cidr>().ok())
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
