//! Mock pointer actuator for testing.
//!
//! The real actuators move the cursor of whatever desktop the tests run on,
//! need a display server, and cannot be observed from Rust code.
//! `MockPointerActuator` records every call in memory instead, in order, so
//! tests can assert on exactly what the relay emitted.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every call return
//! `ActuationError::Platform`, exercising the relay's failure path.
//!
//! ```ignore
//! let actuator = Arc::new(MockPointerActuator::new());
//! let mut relay = TouchRelay::new(config, dst, Arc::clone(&actuator) as _)?;
//! relay.run(Cursor::new(bytes))?;
//! assert_eq!(actuator.moves(), vec![(960, 539)]);
//! ```

use std::sync::Mutex;

use crate::application::relay_touch::{ActuationError, PointerActuator};

/// One recorded actuator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCall {
    Move { x: i32, y: i32 },
    Down,
    Up,
}

/// A mock actuator that records all calls without touching the OS.
#[derive(Debug, Default)]
pub struct MockPointerActuator {
    /// Every call in arrival order.
    pub calls: Mutex<Vec<PointerCall>>,
    /// When `true`, every method returns `ActuationError::Platform`.
    pub should_fail: bool,
}

impl MockPointerActuator {
    /// Creates a mock with no records and `should_fail = false`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// A snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<PointerCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Only the recorded `move_to` targets.
    pub fn moves(&self) -> Vec<(i32, i32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PointerCall::Move { x, y } => Some((x, y)),
                _ => None,
            })
            .collect()
    }

    /// Number of `mouse_down` calls.
    pub fn downs(&self) -> usize {
        self.count(PointerCall::Down)
    }

    /// Number of `mouse_up` calls.
    pub fn ups(&self) -> usize {
        self.count(PointerCall::Up)
    }

    fn count(&self, wanted: PointerCall) -> usize {
        self.calls().into_iter().filter(|c| *c == wanted).count()
    }

    fn record(&self, call: PointerCall) -> Result<(), ActuationError> {
        if self.should_fail {
            return Err(ActuationError::Platform("mock failure".into()));
        }
        self.calls
            .lock()
            .map_err(|_| ActuationError::Platform("mock call log poisoned".into()))?
            .push(call);
        Ok(())
    }
}

impl PointerActuator for MockPointerActuator {
    fn move_to(&self, x: i32, y: i32) -> Result<(), ActuationError> {
        self.record(PointerCall::Move { x, y })
    }

    fn mouse_down(&self) -> Result<(), ActuationError> {
        self.record(PointerCall::Down)
    }

    fn mouse_up(&self) -> Result<(), ActuationError> {
        self.record(PointerCall::Up)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_in_order() {
        // Arrange
        let mock = MockPointerActuator::new();

        // Act
        mock.move_to(1, 2).unwrap();
        mock.mouse_down().unwrap();
        mock.mouse_up().unwrap();

        // Assert
        assert_eq!(
            mock.calls(),
            vec![
                PointerCall::Move { x: 1, y: 2 },
                PointerCall::Down,
                PointerCall::Up
            ]
        );
        assert_eq!(mock.moves(), vec![(1, 2)]);
        assert_eq!((mock.downs(), mock.ups()), (1, 1));
    }

    #[test]
    fn test_failing_mock_records_nothing() {
        let mock = MockPointerActuator::failing();

        assert!(matches!(
            mock.move_to(0, 0),
            Err(ActuationError::Platform(_))
        ));
        assert!(mock.mouse_down().is_err());
        assert!(mock.calls().is_empty());
    }
}
