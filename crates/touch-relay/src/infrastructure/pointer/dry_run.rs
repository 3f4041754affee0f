//! Actuator that only logs.
//!
//! Useful for replaying a capture file on a headless machine, or for checking
//! the mapped coordinates before letting the relay take over the cursor.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use crate::application::relay_touch::{ActuationError, PointerActuator};

#[derive(Debug, Default)]
pub struct DryRunActuator {
    calls: AtomicU64,
}

impl DryRunActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total calls seen so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn note(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl PointerActuator for DryRunActuator {
    fn move_to(&self, x: i32, y: i32) -> Result<(), ActuationError> {
        self.note();
        info!("dry-run: move_to({x}, {y})");
        Ok(())
    }

    fn mouse_down(&self) -> Result<(), ActuationError> {
        self.note();
        info!("dry-run: mouse_down");
        Ok(())
    }

    fn mouse_up(&self) -> Result<(), ActuationError> {
        self.note();
        info!("dry-run: mouse_up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_counts_every_call() {
        let actuator = DryRunActuator::new();

        actuator.move_to(5, 5).unwrap();
        actuator.mouse_up().unwrap();
        actuator.mouse_up().unwrap();

        assert_eq!(actuator.calls(), 3);
    }
}
