//! Fan relay driver.
//!
//! Single active-high GPIO.  Tracks the commanded level so callers can
//! query it without reading the pin back.

use embedded_hal::digital::OutputPin;

pub struct Relay<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Take ownership of `pin` and drive it low.
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, on: false })
    }

    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        if on {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
