//! Pointer actuation by running `xdotool`.
//!
//! Every call spawns one short-lived child process and waits for it:
//!
//! | Call         | Command                   |
//! |--------------|---------------------------|
//! | `move_to`    | `xdotool mousemove X Y`   |
//! | `mouse_down` | `xdotool mousedown 1`     |
//! | `mouse_up`   | `xdotool mouseup 1`       |
//!
//! Spawning costs a few milliseconds, which is why the relay's rate gate
//! defaults to ~60 Hz.  Prefer the native XTest backend where available.

use std::process::{Command, Stdio};

use tracing::trace;

use crate::application::relay_touch::{ActuationError, PointerActuator};

/// X11 button number of the primary (left) button.
const PRIMARY_BUTTON: &str = "1";

/// `xdotool`-backed [`PointerActuator`].
#[derive(Debug, Clone)]
pub struct XdotoolActuator {
    program: String,
}

impl XdotoolActuator {
    /// Uses `xdotool` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("xdotool")
    }

    /// Uses a specific executable instead of `xdotool`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable this actuator runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[&str]) -> Result<(), ActuationError> {
        trace!("{} {}", self.program, args.join(" "));
        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| ActuationError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ActuationError::Platform(format!(
                "{} {} exited with {status}",
                self.program,
                args.join(" ")
            )));
        }
        Ok(())
    }
}

impl Default for XdotoolActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerActuator for XdotoolActuator {
    fn move_to(&self, x: i32, y: i32) -> Result<(), ActuationError> {
        let (x, y) = (x.to_string(), y.to_string());
        self.run(&["mousemove", &x, &y])
    }

    fn mouse_down(&self) -> Result<(), ActuationError> {
        self.run(&["mousedown", PRIMARY_BUTTON])
    }

    fn mouse_up(&self) -> Result<(), ActuationError> {
        self.run(&["mouseup", PRIMARY_BUTTON])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program_is_xdotool() {
        assert_eq!(XdotoolActuator::default().program(), "xdotool");
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        // Arrange
        let actuator = XdotoolActuator::with_program("touch-relay-no-such-program");

        // Act
        let result = actuator.mouse_down();

        // Assert
        match result {
            Err(ActuationError::Spawn { program, .. }) => {
                assert_eq!(program, "touch-relay-no-such-program");
            }
            other => panic!("expected Spawn error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_status_is_success() {
        // `true` ignores its arguments and exits 0.
        let actuator = XdotoolActuator::with_program("true");
        assert!(actuator.move_to(100, 200).is_ok());
        assert!(actuator.mouse_up().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_status_is_platform_error() {
        // Arrange
        let actuator = XdotoolActuator::with_program("false");

        // Act
        let result = actuator.move_to(1, 2);

        // Assert – the message names the failing command
        match result {
            Err(ActuationError::Platform(msg)) => assert!(msg.contains("mousemove 1 2")),
            other => panic!("expected Platform error, got {other:?}"),
        }
    }
}
