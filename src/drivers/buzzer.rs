//! Active piezo buzzer.  The tone is generated by the part itself; the
//! cadence comes from the scheduler's two-phase buzzer task.

use embedded_hal::digital::{OutputPin, PinState};

pub struct Buzzer<P> {
    pin: P,
    sounding: bool,
}

impl<P: OutputPin> Buzzer<P> {
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self {
            pin,
            sounding: false,
        })
    }

    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        self.pin.set_state(PinState::from(on))?;
        self.sounding = on;
        Ok(())
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }
}
