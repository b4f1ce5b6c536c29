//! NTC thermistor conversion (Beta equation).
//!
//! The thermistor sits on the ground side of a divider with a fixed
//! series resistor to the supply, so the normalized ADC reading is
//! `v = R / (R + Rs)`.
//!
//! ```text
//!   R     = Rs * v / (1 - v)
//!   1 / T = 1 / T0 + ln(R / R0) / B        (T in kelvin)
//! ```

use crate::config::NtcParams;

const KELVIN_OFFSET: f32 = 273.15;

/// Convert a normalized divider voltage (0..1) to °C.
///
/// Returns NaN for a rail reading (open or shorted thermistor); the caller
/// treats NaN as a sensor fault.
pub fn ratio_to_celsius(v: f32, ntc: &NtcParams) -> f32 {
    if !(v > 0.0 && v < 1.0) {
        return f32::NAN;
    }
    let r = ntc.series_ohms * v / (1.0 - v);
    let t0_k = ntc.t0_c + KELVIN_OFFSET;
    let inv_t = 1.0 / t0_k + (r / ntc.r0_ohms).ln() / ntc.beta;
    if inv_t <= 0.0 {
        return f32::NAN;
    }
    1.0 / inv_t - KELVIN_OFFSET
}

/// Inverse of [`ratio_to_celsius`].  Used by simulated sensors to produce
/// the divider reading a given room temperature would give.
pub fn celsius_to_ratio(celsius: f32, ntc: &NtcParams) -> f32 {
    let t_k = celsius + KELVIN_OFFSET;
    let t0_k = ntc.t0_c + KELVIN_OFFSET;
    let r = ntc.r0_ohms * (ntc.beta * (1.0 / t_k - 1.0 / t0_k)).exp();
    r / (r + ntc.series_ohms)
}
