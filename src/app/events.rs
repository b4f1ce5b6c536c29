//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  They are for
//! the local log only; nothing is sent off the device.

use crate::auth::TagUid;
use crate::error::{AuthFault, SensorFault};
use crate::fsm::Mode;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial mode).
    Started(Mode),

    /// The state machine moved between modes.
    ModeChanged { from: Mode, to: Mode },

    /// Snapshot taken at each monitoring evaluation.
    Telemetry(TelemetryData),

    /// A sensor sample was discarded.
    SensorFault(SensorFault),

    /// A code or tag was rejected.
    AccessDenied(AuthFault),

    /// A tag on the allow-list was accepted.
    Authorized(TagUid),

    /// The high-temperature streak reached its trigger.
    AlarmRaised { streak: u8, temperature_c: f32 },
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub mode: Mode,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub light: u16,
    pub pmv: f32,
    pub streak: u8,
    pub relay_on: bool,
    pub servo_deg: u8,
}
