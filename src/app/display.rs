//! Two-line status screen.
//!
//! Composes the 16-character lines for the current mode and pushes them to
//! the [`DisplayPort`] only when the text changed, so a slow character LCD
//! is not rewritten every iteration.

use core::fmt::{self, Write};

use heapless::String;

use super::ports::DisplayPort;
use crate::fsm::Mode;
use crate::fsm::context::ControlCore;

/// Characters per display line.
pub const LINE_WIDTH: usize = 16;

pub type Line = String<LINE_WIDTH>;

/// Writer that keeps the first [`LINE_WIDTH`] characters and drops the rest.
struct Truncating<'a>(&'a mut Line);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

fn line(args: fmt::Arguments<'_>) -> Line {
    let mut out = Line::new();
    let _ = Truncating(&mut out).write_fmt(args);
    out
}

/// Lines for the current state of `core`.
pub fn compose(core: &ControlCore) -> (Line, Line) {
    match core.mode {
        Mode::Idle => (line(format_args!("Enter code:")), Line::new()),
        Mode::Authenticating => {
            let mut masked = Line::new();
            for _ in 0..core.code_entry.len() {
                let _ = masked.push('*');
            }
            (line(format_args!("Enter code:")), masked)
        }
        Mode::Locked => (
            line(format_args!("Access denied")),
            line(format_args!("Press button")),
        ),
        Mode::TagWait if core.tag.validated => (
            line(format_args!("Tag accepted")),
            line(format_args!("Please wait...")),
        ),
        Mode::TagWait if core.tag.rejected > 0 => (
            line(format_args!("Unknown tag")),
            line(format_args!("Scan again")),
        ),
        Mode::TagWait => (line(format_args!("Scan your tag")), Line::new()),
        Mode::Monitoring => {
            let s = core.monitor.sample.unwrap_or_else(|| core.fusion.current());
            let top = line(format_args!("T:{:.1}C H:{:.0}%", s.temperature_c, s.humidity_pct));
            let bottom = match core.monitor.pmv {
                Some(pmv) => line(format_args!("PMV:{:+.2} L:{}", pmv, s.light)),
                None => line(format_args!("PMV:--- L:{}", s.light)),
            };
            (top, bottom)
        }
        Mode::ComfortHot => (
            line(format_args!("Too warm")),
            line(format_args!("Fan running")),
        ),
        Mode::ComfortCold => (
            line(format_args!("Too cool")),
            line(format_args!("Vent open")),
        ),
        Mode::Alarm => (
            line(format_args!("HIGH TEMP ALARM")),
            line(format_args!("Press # to ack")),
        ),
    }
}

#[derive(Debug, Default)]
pub struct StatusScreen {
    shown: Option<(Line, Line)>,
}

impl StatusScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw if the composed text differs from what is on screen.
    /// Returns `true` when the display was written.
    pub fn refresh(&mut self, core: &ControlCore, display: &mut impl DisplayPort) -> bool {
        let lines = compose(core);
        if self.shown.as_ref() == Some(&lines) {
            return false;
        }
        display.show_lines(&lines.0, &lines.1);
        self.shown = Some(lines);
        true
    }
}
