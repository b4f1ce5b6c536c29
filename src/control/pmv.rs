//! Predicted Mean Vote by bilinear interpolation over a fixed table.
//!
//! The analytical PMV model needs clothing, metabolic rate and air speed;
//! a classroom with seated occupants is close enough to one operating point
//! that a temperature × humidity table covers it.

/// Temperature axis (°C).  Irregular spacing.
pub const TEMP_AXIS: [f32; 6] = [20.0, 24.0, 27.0, 30.0, 32.0, 35.0];

/// Relative humidity axis (%RH).
pub const RH_AXIS: [f32; 5] = [30.0, 40.0, 55.0, 70.0, 90.0];

/// PMV values, one row per temperature, one column per humidity.
pub const PMV_TABLE: [[f32; 5]; 6] = [
    [-1.9, -1.8, -1.6, -1.5, -1.3], // 20 °C
    [-0.9, -0.8, -0.6, -0.5, -0.3], // 24 °C
    [-0.2, -0.1, 0.1, 0.2, 0.4],    // 27 °C
    [0.3, 0.4, 0.6, 0.8, 1.0],      // 30 °C
    [0.7, 0.8, 1.0, 1.2, 1.5],      // 32 °C
    [1.5, 1.7, 1.9, 2.2, 2.6],      // 35 °C
];

pub const PMV_MIN: f32 = -3.0;
pub const PMV_MAX: f32 = 3.0;

/// Compute PMV for a temperature/humidity pair.
///
/// Inputs are clamped to the table bounds first, so there is no
/// extrapolation.  The result is clamped to `[-3, 3]`.
pub fn compute_pmv(temperature_c: f32, humidity_pct: f32) -> f32 {
    let t = clamp_to_axis(temperature_c, &TEMP_AXIS);
    let h = clamp_to_axis(humidity_pct, &RH_AXIS);

    let i = locate(t, &TEMP_AXIS);
    let j = locate(h, &RH_AXIS);

    let ft = (t - TEMP_AXIS[i]) / (TEMP_AXIS[i + 1] - TEMP_AXIS[i]);
    let fh = (h - RH_AXIS[j]) / (RH_AXIS[j + 1] - RH_AXIS[j]);

    // Weighted corners so a grid point returns its table entry exactly.
    let v = PMV_TABLE[i][j] * (1.0 - ft) * (1.0 - fh)
        + PMV_TABLE[i + 1][j] * ft * (1.0 - fh)
        + PMV_TABLE[i][j + 1] * (1.0 - ft) * fh
        + PMV_TABLE[i + 1][j + 1] * ft * fh;

    v.clamp(PMV_MIN, PMV_MAX)
}

fn clamp_to_axis(x: f32, axis: &[f32]) -> f32 {
    let lo = axis[0];
    let hi = axis[axis.len() - 1];
    // NaN clamps to the low edge.
    if x.is_nan() { lo } else { x.clamp(lo, hi) }
}

/// Lowest `i` with `axis[i] <= x <= axis[i + 1]`, saturating at the last cell.
fn locate(x: f32, axis: &[f32]) -> usize {
    let last_cell = axis.len() - 2;
    (0..last_cell)
        .find(|&i| axis[i] <= x && x <= axis[i + 1])
        .unwrap_or(last_cell)
}
