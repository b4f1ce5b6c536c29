//! Classroom thermal-comfort controller.
//!
//! Gates a classroom behind a keypad code plus an RFID tag, then watches
//! temperature and humidity and drives a fan relay, a vent servo, status
//! LEDs and an alarm buzzer from a predicted-mean-vote comfort index.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareActuators  LogEventSink  LogDisplay  AuthMarkerStore  │
//! │  (ActuatorPort)     (EventSink)   (Display)   (AuthMarker)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │             ControlService (pure logic)                │    │
//! │  │  Mode FSM · Code entry · Sensor fusion · PMV · Streak  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven, tasks owned by modes)             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod auth;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod signal;

pub mod adapters;
pub mod app;
pub mod control;
pub mod drivers;
pub mod fsm;
pub mod sensors;

pub use error::{Error, Result};
