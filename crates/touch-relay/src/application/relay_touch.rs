//! TouchRelay: turns a raw touch frame stream into pointer actuation.
//!
//! This use case sits at the application layer and delegates OS-level pointer
//! injection to a [`PointerActuator`] trait object.  The platform-specific
//! implementations live in the infrastructure layer and are chosen at startup.
//!
//! # Loop
//!
//! ```text
//! Running:
//!   1. read next 16-byte frame      ── EOF ──► Terminated
//!   2. decode into DeviceState
//!   3. RateGate admits?             ── no ───► 1
//!   4. contact?  ─ yes ─► map_point ─► move_to(x, y)
//!   5. pressed?  ─ yes ─► mouse_down   else mouse_up
//!   6. goto 1
//! ```
//!
//! Step 5 is level-triggered by default: the button state is re-asserted on
//! every admitted tick.  [`ButtonTrigger::Edge`] emits only on transitions.

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use touch_core::{
    map_point, ByteOrder, DeviceState, FrameDecoder, FrameReader, MappedPoint, RateGate,
    RawFrame, Rectangle, RegionError, DEFAULT_INTERVAL, DEVICE_SOURCE_RECT,
};
use tracing::{debug, info, warn};

/// Error type for pointer actuation.
#[derive(Debug, Error)]
pub enum ActuationError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("pointer backend not initialized: {0}")]
    NotInitialized(String),
}

/// Error type for the relay loop.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The byte source failed.  Fatal; the relay does not retry.
    #[error("byte source read failed: {0}")]
    Read(#[from] std::io::Error),
    /// The configured rectangles cannot be mapped between.
    #[error("coordinate mapping failed: {0}")]
    Mapping(#[from] RegionError),
    /// The platform actuator rejected a call.
    #[error("pointer actuation failed: {0}")]
    Actuation(#[from] ActuationError),
}

/// Platform-agnostic pointer capability.
///
/// Calls are synchronous.  Because button state is re-asserted every admitted
/// tick, implementations must tolerate redundant `mouse_down` / `mouse_up`.
pub trait PointerActuator: Send + Sync {
    /// Moves the cursor to an absolute position in host screen coordinates.
    fn move_to(&self, x: i32, y: i32) -> Result<(), ActuationError>;

    /// Presses (or keeps pressed) the primary button.
    fn mouse_down(&self) -> Result<(), ActuationError>;

    /// Releases (or keeps released) the primary button.
    fn mouse_up(&self) -> Result<(), ActuationError>;
}

/// When button state is sent to the actuator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonTrigger {
    /// Re-assert `mouse_down` / `mouse_up` on every admitted tick.
    #[default]
    Level,
    /// Emit only when `pressed` changes (the first admitted tick always emits).
    Edge,
}

/// Everything the relay loop needs besides the destination and the actuator.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Device-native extent of the absolute axes.
    pub source_rect: Rectangle,
    /// Minimum time between admitted ticks.
    pub interval: Duration,
    /// Swap axes and mirror device X (portrait tablet on a landscape screen).
    pub rotate: bool,
    pub button_trigger: ButtonTrigger,
    pub byte_order: ByteOrder,
}

impl Default for RelayConfig {
    /// | Field          | Default              |
    /// |----------------|----------------------|
    /// | source_rect    | `DEVICE_SOURCE_RECT` |
    /// | interval       | 16 ms                |
    /// | rotate         | `true`               |
    /// | button_trigger | `Level`              |
    /// | byte_order     | `Native`             |
    fn default() -> Self {
        Self {
            source_rect: DEVICE_SOURCE_RECT,
            interval: DEFAULT_INTERVAL,
            rotate: true,
            button_trigger: ButtonTrigger::Level,
            byte_order: ByteOrder::Native,
        }
    }
}

/// What happened to one frame after decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The rate gate dropped this tick; only state changed.
    Throttled,
    /// The tick was admitted.
    Admitted {
        /// Where the cursor was moved, if the device reported contact.
        moved_to: Option<MappedPoint>,
        /// Button state at this tick.
        pressed: bool,
    },
}

/// Counters reported when the loop terminates cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Complete frames read and decoded.
    pub frames: u64,
    /// Ticks admitted by the rate gate.
    pub admitted: u64,
    /// `move_to` calls issued.
    pub moves: u64,
    /// Bytes of an incomplete trailing frame discarded at end of stream.
    pub truncated_bytes: usize,
}

/// The relay use case.
///
/// Owns the per-session [`DeviceState`] and [`RateGate`]; one instance serves
/// one byte stream.
pub struct TouchRelay {
    config: RelayConfig,
    destination: Rectangle,
    actuator: Arc<dyn PointerActuator>,
    decoder: FrameDecoder,
    state: DeviceState,
    gate: RateGate,
    /// Prior button state, consulted only in edge-triggered mode.
    last_pressed: Option<bool>,
    /// Set while mapped points fall outside `destination`.
    outside_destination: bool,
    outcome: RelayOutcome,
}

impl TouchRelay {
    /// Creates a relay, validating both rectangles up front.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Mapping`] if the source rectangle is inverted or
    /// has zero extent, or if the destination rectangle is inverted.
    pub fn new(
        config: RelayConfig,
        destination: Rectangle,
        actuator: Arc<dyn PointerActuator>,
    ) -> Result<Self, RelayError> {
        config.source_rect.validate_source()?;
        destination.validate()?;

        Ok(Self {
            decoder: FrameDecoder::new(config.byte_order),
            gate: RateGate::new(config.interval),
            config,
            destination,
            actuator,
            state: DeviceState::new(),
            last_pressed: None,
            outside_destination: false,
            outcome: RelayOutcome::default(),
        })
    }

    /// Replaces the rate gate (e.g. with [`RateGate::primed`]).
    pub fn with_gate(mut self, gate: RateGate) -> Self {
        self.gate = gate;
        self
    }

    /// The latest decoded device state.
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// The destination rectangle device coordinates are projected onto.
    pub fn destination(&self) -> &Rectangle {
        &self.destination
    }

    /// Consumes `source` frame by frame until it is exhausted.
    ///
    /// The source is owned for the duration of the call and dropped on every
    /// exit path.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Read`] if the source fails and
    /// [`RelayError::Actuation`] if the actuator rejects a call.  A clean
    /// end of stream (including a truncated trailing frame) is `Ok`.  On an
    /// error a held button is released before returning.
    pub fn run<R: Read>(&mut self, source: R) -> Result<RelayOutcome, RelayError> {
        let mut reader = FrameReader::new(source);

        if let Err(e) = self.drain(&mut reader) {
            if let Err(release) = self.release_button() {
                warn!("failed to release the button after a relay error: {release}");
            }
            return Err(e);
        }

        self.outcome.truncated_bytes = reader.truncated_bytes();
        info!(
            "stream closed after {} frames ({} admitted ticks, {} moves)",
            self.outcome.frames, self.outcome.admitted, self.outcome.moves
        );
        Ok(self.outcome)
    }

    /// Runs steps 2–5 of the loop for one frame.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Actuation`] if the actuator fails.
    pub fn process_frame(&mut self, frame: &RawFrame) -> Result<Tick, RelayError> {
        self.decoder.decode(frame, &mut self.state);
        self.outcome.frames += 1;

        if !self.gate.has_elapsed() {
            return Ok(Tick::Throttled);
        }
        self.outcome.admitted += 1;

        let moved_to = if self.state.contact {
            let point = map_point(
                i64::from(self.state.x_raw),
                i64::from(self.state.y_raw),
                &self.config.source_rect,
                &self.destination,
                self.config.rotate,
            )?;
            self.track_excursion(point);
            self.actuator.move_to(point.x, point.y)?;
            self.outcome.moves += 1;
            Some(point)
        } else {
            None
        };

        let pressed = self.state.pressed;
        self.emit_button(pressed)?;

        debug!("tick admitted: moved_to={moved_to:?} pressed={pressed}");
        Ok(Tick::Admitted { moved_to, pressed })
    }

    /// Sends `mouse_up` if the last emitted button state was pressed.
    ///
    /// # Errors
    ///
    /// Returns the actuator's error if the release fails.
    pub fn release_button(&mut self) -> Result<(), ActuationError> {
        if self.last_pressed == Some(true) {
            self.actuator.mouse_up()?;
            self.last_pressed = Some(false);
        }
        Ok(())
    }

    fn drain<R: Read>(&mut self, reader: &mut FrameReader<R>) -> Result<(), RelayError> {
        while let Some(frame) = reader.next_frame()? {
            self.process_frame(&frame)?;
        }
        Ok(())
    }

    fn emit_button(&mut self, pressed: bool) -> Result<(), ActuationError> {
        if self.config.button_trigger == ButtonTrigger::Edge
            && self.last_pressed == Some(pressed)
        {
            return Ok(());
        }
        self.last_pressed = Some(pressed);

        if pressed {
            self.actuator.mouse_down()
        } else {
            self.actuator.mouse_up()
        }
    }

    /// Logs once when mapped points leave the destination, and once more when
    /// they come back.  Points are never clamped.
    fn track_excursion(&mut self, point: MappedPoint) {
        let inside = self
            .destination
            .contains(i64::from(point.x), i64::from(point.y));
        if !inside && !self.outside_destination {
            warn!(
                "device position ({}, {}) maps outside destination {}: ({}, {})",
                self.state.x_raw, self.state.y_raw, self.destination, point.x, point.y
            );
        } else if inside && self.outside_destination {
            debug!("pointer back inside destination");
        }
        self.outside_destination = !inside;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
