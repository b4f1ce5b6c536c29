//! Single-slot input signal shared by the scheduler, input polling and
//! monitoring evaluation.
//!
//! There is no queue.  The slot holds at most one signal; a later write in
//! the same iteration replaces an earlier one, and the state machine takes
//! whatever is left once per tick.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum InputSignal {
    #[default]
    None = 0,
    Timeout = 1,
    ButtonPress = 2,
    CorrectCode = 3,
    WrongCode = 4,
    ValidTag = 5,
    AlarmCondition = 6,
    ComfortHigh = 7,
    ComfortLow = 8,
    AckKey = 9,
}

#[derive(Debug, Default)]
pub struct SignalSlot {
    pending: InputSignal,
}

impl SignalSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `signal`, replacing anything not yet consumed.
    pub fn raise(&mut self, signal: InputSignal) {
        if self.pending != InputSignal::None && self.pending != signal {
            debug!("signal {:?} overwritten by {:?}", self.pending, signal);
        }
        self.pending = signal;
    }

    /// Consume the pending signal, leaving the slot empty.
    pub fn take(&mut self) -> InputSignal {
        core::mem::take(&mut self.pending)
    }

    pub fn peek(&self) -> InputSignal {
        self.pending
    }
}
