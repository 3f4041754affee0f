//! Application layer use cases for touch-relay.
//!
//! - **`relay_touch`** – Drives the frame → state → gate → map → actuate
//!   pipeline over a blocking byte source.  The OS call is made by a
//!   `PointerActuator` implementation injected at construction time.

pub mod relay_touch;
