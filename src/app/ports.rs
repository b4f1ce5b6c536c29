//! Port traits: the hexagonal boundary between the control core and the
//! classroom hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, keypad/RFID, display, storage,
//! event sinks) implement these traits.  The
//! [`ControlService`](super::service::ControlService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! Every output call is fire-and-forget: idempotent, no acknowledgement,
//! no error path back into the core.

use crate::auth::TagUid;
use crate::scheduler::TaskId;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw analog channels.  Averaging and conversion happen in the core.
pub trait SensorPort {
    /// Thermistor divider reading normalized to 0..1.
    fn read_raw_temperature(&mut self) -> f32;

    /// Relative humidity in percent.  NaN signals a failed read.
    fn read_raw_humidity(&mut self) -> f32;

    /// Instantaneous light level (raw counts).
    fn read_raw_light(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Status LED identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedId {
    Red,
    Blue,
    Green,
}

pub trait ActuatorPort {
    /// Fan relay on/off.
    fn set_relay(&mut self, on: bool);

    /// Vent servo position, 0..=180 degrees.
    fn set_servo_angle(&mut self, degrees: u8);

    fn set_buzzer(&mut self, on: bool);

    fn set_led(&mut self, led: LedId, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: keypad, RFID, button → domain)
// ───────────────────────────────────────────────────────────────

pub trait InputPort {
    /// One keypress (`0-9`, `A-D`, `*`, `#`) or none.  Never blocks.
    fn poll_key(&mut self) -> Option<char>;

    /// One tag UID read by the RFID module, or none.  Never blocks.
    fn poll_tag(&mut self) -> Option<TagUid>;

    /// Raw level of the unlock button (`true` = held down).
    fn button_pressed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → 16x2 character LCD)
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    /// Replace both lines.  Best effort.
    fn show_lines(&mut self, line0: &str, line1: &str);
}

// ───────────────────────────────────────────────────────────────
// Authorization marker port (driven adapter: domain → persistence)
// ───────────────────────────────────────────────────────────────

pub trait AuthMarkerPort {
    /// Record that `uid` was accepted.  Fire-and-forget; never read back
    /// by the core.
    fn mark_authorized(&mut self, uid: TagUid);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ flash / EEPROM)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage.
///
/// Keys are namespaced to prevent collisions between subsystems.  Writes
/// MUST be atomic: no partial record after power loss.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from task effects)
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes when a
/// task fires.  The scheduler knows nothing about LEDs, signals or modes;
/// the delegate maps each [`TaskId`] to its effect.
pub trait SchedulerDelegate {
    fn on_task_fired(&mut self, id: TaskId, kind: ScheduleFiredKind);
}

/// Discriminant passed to [`SchedulerDelegate::on_task_fired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFiredKind {
    /// A one-shot task fired and is now inactive.
    OneShot,
    /// A periodic task fired and has been re-armed.
    Periodic,
    /// A two-phase task entered its on phase.
    PhaseOn,
    /// A two-phase task entered its off phase.
    PhaseOff,
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage is full.
    Full,
    /// Destination buffer too small for the stored value.
    BufferTooSmall,
    /// Record could not be encoded.
    Encode,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::Encode => write!(f, "record encode failed"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
