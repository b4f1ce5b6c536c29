//! Actuator drivers, generic over `embedded-hal` 1.0 pin and PWM traits.

pub mod buzzer;
pub mod relay;
pub mod servo;
pub mod status_led;
