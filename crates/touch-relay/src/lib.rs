//! touch-relay library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does touch-relay do?
//!
//! A touch tablet streams raw Linux input records (16 bytes each) over some
//! byte pipe.  The relay:
//!
//! 1. Reads the stream frame by frame (`touch_core::FrameReader`).
//! 2. Decodes each frame into the latest touch position and pressure.
//! 3. Throttles pointer updates to a fixed rate (~60 Hz by default).
//! 4. Projects the device position onto a destination rectangle on the host.
//! 5. Calls a platform [`application::relay_touch::PointerActuator`] to move
//!    the cursor and hold or release the left button.

/// Application layer: the relay loop and the actuation seam.
pub mod application;

/// Infrastructure layer: OS adapters, byte sources, and configuration.
pub mod infrastructure;
