//! Error types for routefilter.

use thiserror::Error;

/// Reasons a single line can fail strict prefix parsing.
///
/// Upstream lists are semantically networks, never host addresses, so a
/// line with host bits set past the prefix length is rejected rather than
/// silently masked. Callers that need masking must truncate before parsing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("not an IPv4 network")]
    InvalidSyntax,

    #[error("missing prefix length")]
    MissingPrefixLen,

    #[error("prefix length out of range (0-32)")]
    PrefixLenOutOfRange,

    #[error("host bits set past the prefix length")]
    HostBitsSet,
}

/// Errors surfaced by the engine entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The include set was empty after parsing. Surfaced instead of writing
    /// an empty reject list, which could be mistaken for "nothing filtered".
    #[error("no valid include networks after parsing")]
    EmptyInput,
}
