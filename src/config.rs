//! System configuration parameters
//!
//! All tunable parameters for the comfort controller.  The configuration is
//! fixed once the [`ControlService`](crate::app::service::ControlService)
//! is built; it can be loaded from a JSON document at boot but never
//! changed while the control loop runs.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::auth::TagUid;
use crate::error::ConfigError;

/// Longest accepted access code.
pub const MAX_CODE_LEN: usize = 8;
/// Allow-list capacity.
pub const MAX_TAGS: usize = 4;

/// NTC thermistor divider parameters for the Beta equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NtcParams {
    /// Nominal resistance at `t0_c` (ohms).
    pub r0_ohms: f32,
    /// Reference temperature for `r0_ohms` (°C).
    pub t0_c: f32,
    /// Beta coefficient (K).
    pub beta: f32,
    /// Fixed resistor on the supply side of the divider (ohms).
    pub series_ohms: f32,
}

impl Default for NtcParams {
    fn default() -> Self {
        Self {
            r0_ohms: 10_000.0,
            t0_c: 25.0,
            beta: 3950.0,
            series_ohms: 10_000.0,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Access ---
    /// Keypad code, digits only.
    pub access_code: String<MAX_CODE_LEN>,
    /// RFID UIDs allowed into monitoring.
    pub authorized_tags: Vec<TagUid, MAX_TAGS>,
    /// Abandon a half-typed code after this long (ms).
    pub code_entry_timeout_ms: u32,
    /// Window for presenting a tag after a correct code (ms).
    pub tag_window_ms: u32,
    /// Delay between a valid tag and entering monitoring (ms).
    pub tag_settle_ms: u32,
    /// Button must stay down this long to count as a press (ms).
    pub button_debounce_ms: u32,

    // --- Comfort band ---
    /// PMV above this raises `ComfortHigh`.
    pub comfort_high_pmv: f32,
    /// PMV below this raises `ComfortLow`.
    pub comfort_low_pmv: f32,
    /// Streak increments above this temperature (°C).
    pub streak_high_c: f32,
    /// Streak resets below this temperature (°C).
    pub streak_low_c: f32,
    /// Consecutive high evaluations that raise the alarm.
    pub streak_trigger: u8,
    /// Settle window after entering monitoring and between evaluations (ms).
    pub monitor_hold_ms: u32,
    /// Fan run time before returning to monitoring (ms).
    pub hot_return_ms: u32,
    /// Vent open time before returning to monitoring (ms).
    pub cold_return_ms: u32,

    // --- Actuators ---
    pub servo_open_deg: u8,
    pub servo_closed_deg: u8,
    /// Red LED toggle period while locked (ms).
    pub blink_red_ms: u32,
    /// Red LED toggle period while the fan runs (ms).
    pub fast_blink_red_ms: u32,
    pub blink_blue_on_ms: u32,
    pub blink_blue_off_ms: u32,
    pub alarm_blink_on_ms: u32,
    pub alarm_blink_off_ms: u32,
    pub buzzer_on_ms: u32,
    pub buzzer_off_ms: u32,

    // --- Sensors ---
    pub ntc: NtcParams,
    /// Boot value of every temperature averaging slot (°C).
    pub temperature_seed_c: f32,
    /// Boot value of every humidity averaging slot (%RH).
    pub humidity_seed_pct: f32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut access_code = String::new();
        let _ = access_code.push_str("1234");
        let mut authorized_tags = Vec::new();
        let _ = authorized_tags.push([0x9A, 0xD5, 0xB3, 0x05]);

        Self {
            // Access
            access_code,
            authorized_tags,
            code_entry_timeout_ms: 10_000,
            tag_window_ms: 30_000,
            tag_settle_ms: 5_000,
            button_debounce_ms: 50,

            // Comfort band
            comfort_high_pmv: 0.5,
            comfort_low_pmv: -0.7,
            streak_high_c: 30.0,
            streak_low_c: 29.5,
            streak_trigger: 3,
            monitor_hold_ms: 2_500,
            hot_return_ms: 3_000,
            cold_return_ms: 2_000,

            // Actuators
            servo_open_deg: 90,
            servo_closed_deg: 0,
            blink_red_ms: 500,
            fast_blink_red_ms: 150,
            blink_blue_on_ms: 400,
            blink_blue_off_ms: 200,
            alarm_blink_on_ms: 100,
            alarm_blink_off_ms: 400,
            buzzer_on_ms: 200,
            buzzer_off_ms: 800,

            // Sensors
            ntc: NtcParams::default(),
            temperature_seed_c: 25.0,
            humidity_seed_pct: 50.0,

            // Timing
            control_loop_interval_ms: 100, // 10 Hz
        }
    }
}

impl SystemConfig {
    /// Decode a JSON document and validate it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| {
            log::warn!("config decode failed: {}", e);
            ConfigError::Decode
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_code.is_empty() || !self.access_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::ValidationFailed(
                "access_code must be one or more digits",
            ));
        }
        if self.authorized_tags.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "authorized_tags must not be empty",
            ));
        }
        if self.comfort_high_pmv <= self.comfort_low_pmv {
            return Err(ConfigError::ValidationFailed(
                "comfort_high_pmv must exceed comfort_low_pmv",
            ));
        }
        if !(-3.0..=3.0).contains(&self.comfort_high_pmv)
            || !(-3.0..=3.0).contains(&self.comfort_low_pmv)
        {
            return Err(ConfigError::ValidationFailed(
                "comfort thresholds must lie in [-3, 3]",
            ));
        }
        if self.streak_high_c <= self.streak_low_c {
            return Err(ConfigError::ValidationFailed(
                "streak_high_c must exceed streak_low_c",
            ));
        }
        if self.streak_trigger == 0 {
            return Err(ConfigError::ValidationFailed("streak_trigger must be non-zero"));
        }
        if self.servo_open_deg > 180 || self.servo_closed_deg > 180 {
            return Err(ConfigError::ValidationFailed("servo angles must be <= 180"));
        }
        let intervals = [
            self.code_entry_timeout_ms,
            self.tag_window_ms,
            self.tag_settle_ms,
            self.button_debounce_ms,
            self.monitor_hold_ms,
            self.hot_return_ms,
            self.cold_return_ms,
            self.blink_red_ms,
            self.fast_blink_red_ms,
            self.blink_blue_on_ms,
            self.blink_blue_off_ms,
            self.alarm_blink_on_ms,
            self.alarm_blink_off_ms,
            self.buzzer_on_ms,
            self.buzzer_off_ms,
            self.control_loop_interval_ms,
        ];
        if intervals.contains(&0) {
            return Err(ConfigError::ValidationFailed("timer intervals must be non-zero"));
        }
        if self.ntc.r0_ohms <= 0.0 || self.ntc.series_ohms <= 0.0 || self.ntc.beta <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "ntc resistances and beta must be positive",
            ));
        }
        if !self.temperature_seed_c.is_finite()
            || !(0.0..=100.0).contains(&self.humidity_seed_pct)
        {
            return Err(ConfigError::ValidationFailed(
                "averaging seeds must be plausible readings",
            ));
        }
        Ok(())
    }
}
