//! Discrete red / blue / green status LEDs.
//!
//! Three GPIOs of possibly different types (one per LED).  Blink patterns
//! are not generated here; the scheduler toggles the commanded level.

use embedded_hal::digital::{OutputPin, PinState};

use crate::app::ports::LedId;

/// Error from whichever LED pin failed.
#[derive(Debug)]
pub enum LedError<R, B, G> {
    Red(R),
    Blue(B),
    Green(G),
}

pub struct StatusLeds<R, B, G> {
    red: R,
    blue: B,
    green: G,
    /// Commanded levels: red, blue, green.
    state: [bool; 3],
}

impl<R: OutputPin, B: OutputPin, G: OutputPin> StatusLeds<R, B, G> {
    pub fn new(red: R, blue: B, green: G) -> Result<Self, LedError<R::Error, B::Error, G::Error>> {
        let mut leds = Self {
            red,
            blue,
            green,
            state: [false; 3],
        };
        leds.all_off()?;
        Ok(leds)
    }

    pub fn set(
        &mut self,
        led: LedId,
        on: bool,
    ) -> Result<(), LedError<R::Error, B::Error, G::Error>> {
        let level = PinState::from(on);
        match led {
            LedId::Red => self.red.set_state(level).map_err(LedError::Red)?,
            LedId::Blue => self.blue.set_state(level).map_err(LedError::Blue)?,
            LedId::Green => self.green.set_state(level).map_err(LedError::Green)?,
        }
        self.state[led as usize] = on;
        Ok(())
    }

    pub fn all_off(&mut self) -> Result<(), LedError<R::Error, B::Error, G::Error>> {
        self.set(LedId::Red, false)?;
        self.set(LedId::Blue, false)?;
        self.set(LedId::Green, false)
    }

    pub fn is_on(&self, led: LedId) -> bool {
        self.state[led as usize]
    }
}
