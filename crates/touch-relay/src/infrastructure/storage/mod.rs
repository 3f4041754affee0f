//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration file from the
//! platform-appropriate directory, writes it back on `--write-config`, and
//! supplies defaults when the file does not exist yet (first run).

pub mod config;
