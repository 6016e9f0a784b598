//! # routefilter - IPv4 route collection and filtering for BIRD
//!
//! Aggregates IPv4 prefixes from several public sources, subtracts an
//! exclusion list and emits a minimal, exact, non-overlapping set of
//! prefixes as BIRD reject-route statements.
//!
//! ## Architecture
//!
//! ```text
//! CLI (clap)
//!   └── flags: AS list, output, exclude list, --apply, --summarize
//! Fetcher (reqwest + rustls)
//!   ├── bgp.tools table dump, Tor nodes, manual / antifilter / Twitter lists
//!   └── per-source disk cache fallback
//! Engine (ipnet)
//!   ├── strict prefix parsing (host bits rejected, comments stripped)
//!   ├── exclusion: exact recursive subtraction per include network
//!   └── aggregation: sibling merge (exact) or subsumption removal (lossy)
//! BIRD (CommandRunner trait)
//!   └── route ... reject; rendering and birdc configure reload
//! ```
//!
//! The engine is a pure library: deterministic output for a given input
//! set, no I/O, recursion bounded by the 32-bit prefix depth. Everything
//! around it is fetch-and-write glue owned by the collector.
//!
//! ## Modules
//!
//! - [`aggregator`] - sibling merging and subsumption removal
//! - [`aslist`] - AS number list parsing and loading
//! - [`bird`] - reject-statement rendering and daemon reload
//! - [`cache`] - disk-backed fallback cache for fetched lists
//! - [`cli`] - command-line interface definitions
//! - [`cmd`] - command execution abstraction
//! - [`collector`] - the fetch/filter/write pipeline driver
//! - [`config`] - configuration parsing and validation
//! - [`engine`] - the compute entry point over raw lines
//! - [`error`] - typed parse and engine errors
//! - [`exclusion`] - exact network subtraction
//! - [`fetcher`] - HTTP client for the upstream sources
//! - [`prefix`] - strict prefix parsing and rendering
//! - [`utils`] - formatting and file hashing helpers

pub mod aggregator;
pub mod aslist;
pub mod bird;
pub mod cache;
pub mod cli;
pub mod cmd;
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod fetcher;
pub mod prefix;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
