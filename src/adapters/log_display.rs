//! Display adapter that writes the two status lines to the log.
//! Stands in for the 16x2 LCD when running on the host.

use log::info;

use crate::app::ports::DisplayPort;

#[derive(Debug, Default)]
pub struct LogDisplay {
    frames: u32,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of redraws so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl DisplayPort for LogDisplay {
    fn show_lines(&mut self, line0: &str, line1: &str) {
        self.frames += 1;
        info!("LCD   | [{:<16}] [{:<16}]", line0, line1);
    }
}
