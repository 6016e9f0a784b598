//! Strict IPv4 prefix parsing and rendering.
//!
//! Upstream lists supply networks in `address/length` form, optionally
//! followed by a `#` comment. Parsing is strict: a bare address without a
//! length is rejected (the Tor fetcher synthesizes `/32` before lines reach
//! this stage), and so is an address with host bits set past the prefix
//! length. Canonical `Ipv4Net` values are the only thing that leaves this
//! module.

use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

use crate::error::ParseError;

/// A line that failed to parse, kept for caller-side reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// The offending line, comment stripped.
    pub text: String,
    pub error: ParseError,
}

/// Strip an inline `#` comment and surrounding whitespace.
fn strip_comment(line: &str) -> &str {
    match line.split_once('#') {
        Some((before, _)) => before.trim(),
        None => line.trim(),
    }
}

/// Parse one `address/length` line into a canonical network.
///
/// The comment and surrounding whitespace are stripped first. Fails on
/// non-IPv4 shapes, lengths outside 0..=32, missing lengths and set host
/// bits. Pure; never masks.
pub fn parse_network(line: &str) -> Result<Ipv4Net, ParseError> {
    let text = strip_comment(line);

    let (addr_part, len_part) = text.split_once('/').ok_or(ParseError::MissingPrefixLen)?;

    let addr: Ipv4Addr = addr_part
        .parse()
        .map_err(|_| ParseError::InvalidSyntax)?;
    let len: u8 = len_part
        .parse()
        .map_err(|_| ParseError::InvalidSyntax)?;

    let net = Ipv4Net::new(addr, len).map_err(|_| ParseError::PrefixLenOutOfRange)?;
    if net.addr() != net.network() {
        return Err(ParseError::HostBitsSet);
    }
    Ok(net)
}

/// Parse a batch of lines into networks plus per-line failures.
///
/// Blank lines and pure comment lines are skipped silently; everything else
/// either parses or is returned as a [`ParseFailure`]. The caller decides
/// whether failures skip or abort the run.
pub fn parse_networks<S: AsRef<str>>(lines: &[S]) -> (Vec<Ipv4Net>, Vec<ParseFailure>) {
    let mut networks = Vec::with_capacity(lines.len());
    let mut failures = Vec::new();

    for line in lines {
        let text = strip_comment(line.as_ref());
        if text.is_empty() {
            continue;
        }
        match parse_network(text) {
            Ok(net) => networks.push(net),
            Err(error) => failures.push(ParseFailure {
                text: text.to_string(),
                error,
            }),
        }
    }

    (networks, failures)
}

/// Render a set of networks as sorted, deduplicated `address/length` lines.
///
/// Ordering is (base address ascending, prefix length ascending), so output
/// is byte-identical for a given set regardless of insertion order.
pub fn render(networks: &[Ipv4Net]) -> Vec<String> {
    let mut sorted: Vec<Ipv4Net> = networks.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted.iter().map(|net| net.to_string()).collect()
}
