//! Latest decoded touch state for one relay session.

/// Full-scale value of the pressure channel (12-bit).
pub const PRESSURE_SCALE: f64 = 4096.0;

/// Normalized pressure above which the pen or finger is considered touching.
pub const CONTACT_THRESHOLD: f64 = 0.25;

/// Normalized pressure above which the touch counts as a button press.
pub const PRESS_THRESHOLD: f64 = 0.75;

/// Mutable device state, updated in place by every decoded frame.
///
/// `contact` and `pressed` are derived independently from the same pressure
/// sample; nothing forces `pressed` to imply `contact`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceState {
    /// Last absolute X reported by the device, in device units.
    pub x_raw: u32,
    /// Last absolute Y reported by the device, in device units.
    pub y_raw: u32,
    /// Light touch: pressure sample above [`CONTACT_THRESHOLD`].
    pub contact: bool,
    /// Firm press: pressure sample above [`PRESS_THRESHOLD`].
    pub pressed: bool,
}

impl DeviceState {
    /// Creates an idle state at the device origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes both flags from a raw pressure value.
    ///
    /// Both comparisons are strict: exactly 0.25 is not contact and exactly
    /// 0.75 is not a press.
    pub fn apply_pressure(&mut self, value: u32) {
        let sample = f64::from(value) / PRESSURE_SCALE;
        self.contact = sample > CONTACT_THRESHOLD;
        self.pressed = sample > PRESS_THRESHOLD;
    }
}
