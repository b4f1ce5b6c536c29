//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! whatever logger the binary installed.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | mode={:?} | T={:.1}\u{00b0}C RH={:.0}% light={} | \
                     PMV={:+.2} streak={} | relay={} servo={}\u{00b0}",
                    t.mode,
                    t.temperature_c,
                    t.humidity_pct,
                    t.light,
                    t.pmv,
                    t.streak,
                    if t.relay_on { "ON" } else { "OFF" },
                    t.servo_deg,
                );
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {:?} -> {:?}", from, to);
            }
            AppEvent::SensorFault(fault) => {
                warn!("FAULT | {}", fault);
            }
            AppEvent::AccessDenied(fault) => {
                warn!("AUTH  | denied: {}", fault);
            }
            AppEvent::Authorized(uid) => {
                info!(
                    "AUTH  | tag {:02X}:{:02X}:{:02X}:{:02X} accepted",
                    uid[0], uid[1], uid[2], uid[3]
                );
            }
            AppEvent::AlarmRaised {
                streak,
                temperature_c,
            } => {
                warn!(
                    "ALARM | streak={} T={:.1}\u{00b0}C",
                    streak, temperature_c
                );
            }
            AppEvent::Started(mode) => {
                info!("START | initial_mode={:?}", mode);
            }
        }
    }
}
