//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ModeTable                                                      │
//! │  ┌────────────────┬───────────┬──────────┬────────────────────┐ │
//! │  │ Mode           │ on_enter  │ on_exit  │ on_update          │ │
//! │  ├────────────────┼───────────┼──────────┼────────────────────┤ │
//! │  │ Idle           │ fn(core)  │ -        │ fn(core, sig)->Opt │ │
//! │  │ Authenticating │ fn(core)  │ fn(core) │ fn(core, sig)->Opt │ │
//! │  │ Locked         │ fn(core)  │ fn(core) │ fn(core, sig)->Opt │ │
//! │  │ TagWait        │ fn(core)  │ fn(core) │ fn(core, sig)->Opt │ │
//! │  │ Monitoring     │ fn(core)  │ fn(core) │ fn(core, sig)->Opt │ │
//! │  │ ComfortHot     │ fn(core)  │ fn(core) │ fn(core, sig)->Opt │ │
//! │  │ ComfortCold    │ fn(core)  │ fn(core) │ fn(core, sig)->Opt │ │
//! │  │ Alarm          │ fn(core)  │ fn(core) │ fn(core, sig)->Opt │ │
//! │  └────────────────┴───────────┴──────────┴────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine takes the pending [`InputSignal`] out of the core
//! and hands it to `on_update` for the current mode.  If that returns
//! `Some(next)`, the engine runs `on_exit` for the current mode, reclaims
//! any scheduler task the departing mode still owns, records the new mode
//! in the core and runs `on_enter` for it.  Nothing else writes
//! [`ControlCore::mode`].

pub mod context;
pub mod states;

use context::ControlCore;
use log::{info, warn};

use crate::signal::InputSignal;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Operating modes.  Exactly one is active.
/// Must stay in sync with the table built in [`states::build_mode_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Idle = 0,
    Authenticating = 1,
    Locked = 2,
    TagWait = 3,
    Monitoring = 4,
    ComfortHot = 5,
    ComfortCold = 6,
    Alarm = 7,
}

impl Mode {
    /// Total number of modes.  Sizes the table array.
    pub const COUNT: usize = 8;

    /// Convert an index back to `Mode`.  Panics on out-of-range in debug
    /// builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Authenticating,
            2 => Self::Locked,
            3 => Self::TagWait,
            4 => Self::Monitoring,
            5 => Self::ComfortHot,
            6 => Self::ComfortCold,
            7 => Self::Alarm,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type ModeActionFn = fn(&mut ControlCore);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type ModeUpdateFn = fn(&mut ControlCore, InputSignal) -> Option<Mode>;

// ---------------------------------------------------------------------------
// Mode descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct ModeDescriptor {
    pub id: Mode,
    pub name: &'static str,
    pub on_enter: Option<ModeActionFn>,
    pub on_exit: Option<ModeActionFn>,
    pub on_update: ModeUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [ModeDescriptor; Mode::COUNT],
    /// Index of the currently active mode.
    current: usize,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current mode was entered.
    mode_entry_tick: u64,
}

impl Fsm {
    /// Construct a new FSM with the given table, starting in `initial`.
    pub fn new(table: [ModeDescriptor; Mode::COUNT], initial: Mode) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "mode table out of order"
        );
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            mode_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, core: &mut ControlCore) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        core.mode = self.current_mode();
        core.mode_entered_ms = core.now_ms;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(core);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Take the pending signal out of the core.
    /// 2. Call `on_update` for the current mode.
    /// 3. If it returns `Some(next)`, run the transition.
    ///
    /// Returns `(from, to)` when a transition happened.
    pub fn tick(&mut self, core: &mut ControlCore) -> Option<(Mode, Mode)> {
        self.tick_count += 1;

        let signal = core.signal.take();
        let next = (self.table[self.current].on_update)(core, signal)?;

        let from = self.current_mode();
        self.transition(next, core);
        Some((from, next))
    }

    /// Force an immediate transition regardless of the pending signal.
    pub fn force_transition(&mut self, next: Mode, core: &mut ControlCore) {
        if next as usize != self.current {
            self.transition(next, core);
        }
    }

    pub fn current_mode(&self) -> Mode {
        Mode::from_index(self.current)
    }

    /// How many ticks the FSM has been in the current mode.
    pub fn ticks_in_current_mode(&self) -> u64 {
        self.tick_count - self.mode_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Mode, core: &mut ControlCore) {
        let from = self.current_mode();
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(core);
        }

        // No task may outlive the mode that started it.
        let leaked = core.scheduler.stop_owned_by(from);
        if leaked > 0 {
            warn!(
                "{} left {} task(s) running on exit",
                self.table[self.current].name, leaked
            );
        }

        self.current = next_idx;
        self.mode_entry_tick = self.tick_count;
        core.mode = next;
        core.mode_entered_ms = core.now_ms;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(core);
        }
    }
}
