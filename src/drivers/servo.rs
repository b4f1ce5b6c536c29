//! Hobby servo on a 50 Hz PWM channel.
//!
//! 0°..180° maps linearly to a 0.5 ms..2.5 ms pulse in a 20 ms frame.

use embedded_hal::pwm::SetDutyCycle;

const FRAME_US: u32 = 20_000;
const MIN_PULSE_US: u32 = 500;
const MAX_PULSE_US: u32 = 2_500;
pub const MAX_ANGLE: u8 = 180;

pub struct Servo<P> {
    pwm: P,
    angle: u8,
}

impl<P: SetDutyCycle> Servo<P> {
    /// Take the PWM channel (already configured for 50 Hz) and move to
    /// `initial_deg`.
    pub fn new(pwm: P, initial_deg: u8) -> Result<Self, P::Error> {
        let mut servo = Self { pwm, angle: 0 };
        servo.set_angle(initial_deg)?;
        Ok(servo)
    }

    /// Move to `degrees`, clamped to 0..=180.
    pub fn set_angle(&mut self, degrees: u8) -> Result<(), P::Error> {
        let degrees = degrees.min(MAX_ANGLE);
        let duty = duty_for_angle(degrees, self.pwm.max_duty_cycle());
        self.pwm.set_duty_cycle(duty)?;
        self.angle = degrees;
        Ok(())
    }

    pub fn angle(&self) -> u8 {
        self.angle
    }
}

/// Duty value for `degrees` on a channel whose full scale is `max_duty`.
pub fn duty_for_angle(degrees: u8, max_duty: u16) -> u16 {
    let span = MAX_PULSE_US - MIN_PULSE_US;
    let pulse_us = MIN_PULSE_US + span * u32::from(degrees.min(MAX_ANGLE)) / u32::from(MAX_ANGLE);
    (u32::from(max_duty) * pulse_us / FRAME_US) as u16
}
