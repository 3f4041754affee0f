//! Infrastructure layer for touch-relay.
//!
//! Contains OS-facing adapters: pointer injection, screen geometry, byte
//! sources, and the configuration file.
//!
//! **Dependency rule**: this layer may depend on `application` and `touch_core`,
//! but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`pointer`** – Implementations of `PointerActuator`.  The native backend
//!   is selected at compile time using `#[cfg(target_os)]`; `xdotool` and
//!   `dry-run` are available everywhere.  A `MockPointerActuator` is provided
//!   for tests.
//!
//! - **`region`** – Produces the destination rectangle once, before the loop
//!   starts: either a fixed rectangle from configuration or the primary
//!   screen's extent queried from the OS.
//!
//! - **`transport`** – Turns a configured source (TCP listener, capture file,
//!   or stdin) into a blocking byte stream.
//!
//! - **`storage`** – TOML configuration file persistence.

pub mod pointer;
pub mod region;
pub mod storage;
pub mod transport;
