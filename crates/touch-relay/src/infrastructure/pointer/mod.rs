//! Pointer actuation backends.
//!
//! Each backend implements [`PointerActuator`].  The binary picks one at
//! startup through [`create_actuator`]; the relay loop never knows which.
//!
//! | Backend   | Module     | Mechanism                                   |
//! |-----------|------------|---------------------------------------------|
//! | `native`  | `linux`    | XTest `XTestFakeMotionEvent` / `ButtonEvent`|
//! | `native`  | `windows`  | `SendInput` with absolute mouse input       |
//! | `native`  | `macos`    | `CGEventPost` mouse events                  |
//! | `xdotool` | `xdotool`  | one `xdotool` child process per call        |
//! | `dry-run` | `dry_run`  | logs each call, touches nothing             |

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::relay_touch::{ActuationError, PointerActuator};

pub mod dry_run;
pub mod mock;
pub mod xdotool;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "macos")]
pub mod macos;

/// Which actuator the binary should build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerBackend {
    /// The platform's own injection API.
    #[default]
    Native,
    /// Shell out to `xdotool` (X11 only, needs the binary on `PATH`).
    Xdotool,
    /// Log calls without moving anything.
    DryRun,
}

impl std::fmt::Display for PointerBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PointerBackend::Native => "native",
            PointerBackend::Xdotool => "xdotool",
            PointerBackend::DryRun => "dry-run",
        })
    }
}

impl std::str::FromStr for PointerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(PointerBackend::Native),
            "xdotool" => Ok(PointerBackend::Xdotool),
            "dry-run" | "dryrun" | "none" => Ok(PointerBackend::DryRun),
            other => Err(format!(
                "unknown pointer backend '{other}' (expected native, xdotool, or dry-run)"
            )),
        }
    }
}

/// Builds the actuator for `backend`.
///
/// # Errors
///
/// Returns [`ActuationError::NotInitialized`] if the native backend is not
/// available on this platform or its OS resources cannot be acquired (for
/// example no X display).
pub fn create_actuator(
    backend: PointerBackend,
) -> Result<Arc<dyn PointerActuator>, ActuationError> {
    match backend {
        PointerBackend::Native => native_actuator(),
        PointerBackend::Xdotool => Ok(Arc::new(xdotool::XdotoolActuator::new())),
        PointerBackend::DryRun => Ok(Arc::new(dry_run::DryRunActuator::new())),
    }
}

#[cfg(target_os = "linux")]
fn native_actuator() -> Result<Arc<dyn PointerActuator>, ActuationError> {
    Ok(Arc::new(linux::XTestActuator::new()?))
}

#[cfg(target_os = "windows")]
fn native_actuator() -> Result<Arc<dyn PointerActuator>, ActuationError> {
    Ok(Arc::new(windows::SendInputActuator::new()))
}

#[cfg(target_os = "macos")]
fn native_actuator() -> Result<Arc<dyn PointerActuator>, ActuationError> {
    Ok(Arc::new(macos::CoreGraphicsActuator::new()?))
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
fn native_actuator() -> Result<Arc<dyn PointerActuator>, ActuationError> {
    Err(ActuationError::NotInitialized(format!(
        "no native pointer backend for {}",
        std::env::consts::OS
    )))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_backend_parses_known_names() {
        assert_eq!("native".parse(), Ok(PointerBackend::Native));
        assert_eq!("XDOTOOL".parse(), Ok(PointerBackend::Xdotool));
        assert_eq!("dry-run".parse(), Ok(PointerBackend::DryRun));
        assert_eq!("none".parse(), Ok(PointerBackend::DryRun));
    }

    #[test]
    fn test_pointer_backend_rejects_unknown_name() {
        let result: Result<PointerBackend, _> = "wayland".parse();
        assert!(result.unwrap_err().contains("wayland"));
    }

    #[test]
    fn test_pointer_backend_display_round_trips_through_from_str() {
        for backend in [
            PointerBackend::Native,
            PointerBackend::Xdotool,
            PointerBackend::DryRun,
        ] {
            assert_eq!(backend.to_string().parse(), Ok(backend));
        }
    }

    #[test]
    fn test_pointer_backend_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            backend: PointerBackend,
        }

        let w: Wrapper = toml::from_str(r#"backend = "dry-run""#).unwrap();
        assert_eq!(w.backend, PointerBackend::DryRun);
    }

    #[test]
    fn test_create_actuator_builds_dry_run_backend() {
        // Act
        let actuator = create_actuator(PointerBackend::DryRun).unwrap();

        // Assert – dry-run accepts every call
        assert!(actuator.move_to(10, 20).is_ok());
        assert!(actuator.mouse_down().is_ok());
        assert!(actuator.mouse_up().is_ok());
    }

    #[test]
    fn test_create_actuator_builds_xdotool_without_spawning() {
        // Construction must not run the program; only calls do.
        assert!(create_actuator(PointerBackend::Xdotool).is_ok());
    }
}
