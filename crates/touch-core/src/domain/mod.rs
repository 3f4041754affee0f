//! Domain entities for Touch-Relay.
//!
//! This module contains pure geometry and timing logic with no infrastructure
//! dependencies.  It compiles and tests on any platform without a display,
//! a device, or a network.

/// Rectangles and the device-to-destination coordinate mapper.
///
/// See [`region::map_point`] for the projection itself.
pub mod region;

/// Fixed-rate admission gate for pointer actuation.
pub mod gate;
