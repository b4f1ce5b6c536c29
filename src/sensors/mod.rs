//! Sensor fusion: raw analog channels in, stabilized readings out.
//!
//! [`SensorFusion`] owns the averaging buffers.  Each `sample_*` call reads
//! one raw value through the [`SensorPort`], discards it if it is malformed,
//! and returns the current stabilized value.  A discarded sample leaves the
//! average untouched and is queued as a [`SensorFault`] for the service to
//! report.

pub mod moving_average;
pub mod thermistor;

use heapless::Vec;
use log::warn;

use crate::app::ports::SensorPort;
use crate::config::{NtcParams, SystemConfig};
use crate::error::{SensorChannel, SensorFault, SensorFaultKind};
use moving_average::MovingAverage;

/// Samples per averaging window.
pub const WINDOW: usize = 5;

/// Plausible physical range of the thermistor channel (°C).
const TEMP_RANGE_C: (f32, f32) = (-40.0, 125.0);
/// Plausible physical range of the humidity channel (%RH).
const HUMIDITY_RANGE_PCT: (f32, f32) = (0.0, 100.0);

/// A point-in-time view of the stabilized readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Averaged temperature (°C).
    pub temperature_c: f32,
    /// Averaged relative humidity (%RH).
    pub humidity_pct: f32,
    /// Instantaneous light level (raw counts).
    pub light: u16,
}

pub struct SensorFusion {
    ntc: NtcParams,
    temperature: MovingAverage<WINDOW>,
    humidity: MovingAverage<WINDOW>,
    light: u16,
    /// Faults since the last [`take_faults`](Self::take_faults).  At most one
    /// per channel per refresh; older faults are dropped if nobody drains.
    faults: Vec<SensorFault, 4>,
}

impl SensorFusion {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            ntc: config.ntc,
            temperature: MovingAverage::new(config.temperature_seed_c),
            humidity: MovingAverage::new(config.humidity_seed_pct),
            light: 0,
            faults: Vec::new(),
        }
    }

    /// Read, convert and average one temperature sample.
    pub fn sample_temperature(&mut self, port: &mut impl SensorPort) -> f32 {
        let ratio = port.read_raw_temperature();
        let celsius = thermistor::ratio_to_celsius(ratio, &self.ntc);
        match classify(celsius, TEMP_RANGE_C) {
            None => self.temperature.push(celsius),
            Some(kind) => {
                self.record(SensorFault {
                    channel: SensorChannel::Temperature,
                    kind,
                    value: celsius,
                });
                self.temperature.mean()
            }
        }
    }

    /// Read and average one humidity sample.
    pub fn sample_humidity(&mut self, port: &mut impl SensorPort) -> f32 {
        let pct = port.read_raw_humidity();
        match classify(pct, HUMIDITY_RANGE_PCT) {
            None => self.humidity.push(pct),
            Some(kind) => {
                self.record(SensorFault {
                    channel: SensorChannel::Humidity,
                    kind,
                    value: pct,
                });
                self.humidity.mean()
            }
        }
    }

    /// Light is passed through without averaging.
    pub fn sample_light(&mut self, port: &mut impl SensorPort) -> u16 {
        self.light = port.read_raw_light();
        self.light
    }

    /// Sample every channel once.
    pub fn refresh(&mut self, port: &mut impl SensorPort) -> SensorSample {
        SensorSample {
            temperature_c: self.sample_temperature(port),
            humidity_pct: self.sample_humidity(port),
            light: self.sample_light(port),
        }
    }

    /// Current stabilized readings without sampling.
    pub fn current(&self) -> SensorSample {
        SensorSample {
            temperature_c: self.temperature.mean(),
            humidity_pct: self.humidity.mean(),
            light: self.light,
        }
    }

    /// Drain faults recorded since the previous call.
    pub fn take_faults(&mut self) -> Vec<SensorFault, 4> {
        core::mem::take(&mut self.faults)
    }

    fn record(&mut self, fault: SensorFault) {
        warn!("discarding sample: {}", fault);
        if self.faults.is_full() {
            self.faults.remove(0);
        }
        let _ = self.faults.push(fault);
    }
}

fn classify(value: f32, (lo, hi): (f32, f32)) -> Option<SensorFaultKind> {
    if !value.is_finite() {
        Some(SensorFaultKind::NotANumber)
    } else if value < lo || value > hi {
        Some(SensorFaultKind::OutOfRange)
    } else {
        None
    }
}
