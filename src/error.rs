//! Unified error types for the comfort controller.
//!
//! A single `Error` enum that every subsystem can convert into.  All
//! variants are `Copy` so they can be handed to the event sink and the
//! state machine without allocation.
//!
//! Only [`ConfigError`] is ever returned as `Err` from the public API.
//! Sensor and authentication faults are recovered inside the control loop
//! and surface as [`AppEvent`](crate::app::events::AppEvent)s and normal
//! mode transitions.

use core::fmt;

use crate::auth::TagUid;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// A sensor sample was malformed and has been discarded.
    Sensor(SensorFault),
    /// A credential (keypad code or RFID tag) was rejected.
    Auth(AuthFault),
    /// Configuration is invalid or could not be decoded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Auth(e) => write!(f, "auth: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// Analog channel a fault was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorChannel {
    Temperature,
    Humidity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFaultKind {
    /// Conversion produced NaN or infinity (open/short thermistor, bus error).
    NotANumber,
    /// Value is outside the physically plausible range for the channel.
    OutOfRange,
}

/// A discarded sample.  The stabilized average is left untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFault {
    pub channel: SensorChannel,
    pub kind: SensorFaultKind,
    /// The rejected value, for the log line.
    pub value: f32,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = match self.channel {
            SensorChannel::Temperature => "temperature",
            SensorChannel::Humidity => "humidity",
        };
        match self.kind {
            SensorFaultKind::NotANumber => write!(f, "{channel} reading is not a number"),
            SensorFaultKind::OutOfRange => {
                write!(f, "{channel} reading {:.1} out of range", self.value)
            }
        }
    }
}

impl From<SensorFault> for Error {
    fn from(e: SensorFault) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Authentication faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFault {
    /// The keypad code did not match.
    WrongCode,
    /// The tag UID is not on the allow-list.
    UnknownTag(TagUid),
}

impl fmt::Display for AuthFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongCode => write!(f, "wrong access code"),
            Self::UnknownTag(uid) => write!(
                f,
                "unknown tag {:02X}:{:02X}:{:02X}:{:02X}",
                uid[0], uid[1], uid[2], uid[3]
            ),
        }
    }
}

impl From<AuthFault> for Error {
    fn from(e: AuthFault) -> Self {
        Self::Auth(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.  The message names the field.
    ValidationFailed(&'static str),
    /// The serialized document could not be decoded.
    Decode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Decode => write!(f, "config could not be decoded"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
