//! Hardware adapter: bridges the actuator drivers to [`ActuatorPort`].
//!
//! The core never sees a pin error: outputs are fire-and-forget, so a
//! failed write is logged here and the next change retries it.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{ActuatorPort, LedId};
use crate::drivers::buzzer::Buzzer;
use crate::drivers::relay::Relay;
use crate::drivers::servo::Servo;
use crate::drivers::status_led::StatusLeds;

/// Concrete adapter that owns every actuator driver.
pub struct HardwareActuators<RP, BP, SP, LR, LB, LG> {
    relay: Relay<RP>,
    buzzer: Buzzer<BP>,
    servo: Servo<SP>,
    leds: StatusLeds<LR, LB, LG>,
}

impl<RP, BP, SP, LR, LB, LG> HardwareActuators<RP, BP, SP, LR, LB, LG>
where
    RP: OutputPin,
    BP: OutputPin,
    SP: SetDutyCycle,
    LR: OutputPin,
    LB: OutputPin,
    LG: OutputPin,
{
    pub fn new(
        relay: Relay<RP>,
        buzzer: Buzzer<BP>,
        servo: Servo<SP>,
        leds: StatusLeds<LR, LB, LG>,
    ) -> Self {
        Self {
            relay,
            buzzer,
            servo,
            leds,
        }
    }

    pub fn relay_on(&self) -> bool {
        self.relay.is_on()
    }

    pub fn buzzer_on(&self) -> bool {
        self.buzzer.is_sounding()
    }

    pub fn servo_angle(&self) -> u8 {
        self.servo.angle()
    }

    pub fn led_on(&self, led: LedId) -> bool {
        self.leds.is_on(led)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<RP, BP, SP, LR, LB, LG> ActuatorPort for HardwareActuators<RP, BP, SP, LR, LB, LG>
where
    RP: OutputPin,
    BP: OutputPin,
    SP: SetDutyCycle,
    LR: OutputPin,
    LB: OutputPin,
    LG: OutputPin,
{
    fn set_relay(&mut self, on: bool) {
        if let Err(e) = self.relay.set(on) {
            warn!("relay write failed: {:?}", e);
        }
    }

    fn set_servo_angle(&mut self, degrees: u8) {
        if let Err(e) = self.servo.set_angle(degrees) {
            warn!("servo write failed: {:?}", e);
        }
    }

    fn set_buzzer(&mut self, on: bool) {
        if let Err(e) = self.buzzer.set(on) {
            warn!("buzzer write failed: {:?}", e);
        }
    }

    fn set_led(&mut self, led: LedId, on: bool) {
        if let Err(e) = self.leds.set(led, on) {
            warn!("{:?} LED write failed: {:?}", led, e);
        }
    }
}
