//! Keypad code entry and RFID allow-list checks.
//!
//! Code entry is a non-blocking accumulator: the control loop feeds it one
//! polled key per tick and it reports progress, so no path of the loop ever
//! waits on the keypad.

use heapless::String;
use log::{debug, warn};

use crate::config::MAX_CODE_LEN;
use crate::error::AuthFault;

/// 4-byte RFID tag UID.
pub type TagUid = [u8; 4];

// ───────────────────────────────────────────────────────────────
// Keypad keys
// ───────────────────────────────────────────────────────────────

/// One key of the 4×4 matrix keypad (`0-9`, `A-D`, `*`, `#`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Letter(char),
    Star,
    Hash,
}

impl Key {
    /// Map a polled character to a key.  Characters outside the keypad set
    /// return `None`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Self::Digit(c as u8 - b'0')),
            'A'..='D' => Some(Self::Letter(c)),
            '*' => Some(Self::Star),
            '#' => Some(Self::Hash),
            _ => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Code accumulator
// ───────────────────────────────────────────────────────────────

/// Result of feeding one key into [`CodeEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryProgress {
    /// Key is not part of code entry.
    Ignored,
    /// Digit accepted; this many digits are buffered.
    Pending(usize),
    /// `*` wiped the buffer.
    Cleared,
    /// Code length reached.  The buffer has been reset.
    Complete(Result<(), AuthFault>),
}

#[derive(Debug, Default)]
pub struct CodeEntry {
    digits: String<MAX_CODE_LEN>,
}

impl CodeEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key.  The entry completes once as many digits as `code`
    /// holds have been typed.
    pub fn push(&mut self, key: Key, code: &str) -> EntryProgress {
        match key {
            Key::Digit(d) => {
                // Config validation guarantees `code` fits the buffer.
                if self.digits.push(char::from(b'0' + d)).is_err() {
                    self.digits.clear();
                    return EntryProgress::Cleared;
                }
                if self.digits.len() < code.len() {
                    debug!("code entry: {} digit(s)", self.digits.len());
                    return EntryProgress::Pending(self.digits.len());
                }
                let verdict = if codes_match(self.digits.as_bytes(), code.as_bytes()) {
                    Ok(())
                } else {
                    warn!("access code rejected");
                    Err(AuthFault::WrongCode)
                };
                self.digits.clear();
                EntryProgress::Complete(verdict)
            }
            Key::Star => {
                if self.digits.is_empty() {
                    return EntryProgress::Ignored;
                }
                self.digits.clear();
                EntryProgress::Cleared
            }
            Key::Letter(_) | Key::Hash => EntryProgress::Ignored,
        }
    }

    pub fn in_progress(&self) -> bool {
        !self.digits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }
}

/// Length-checked comparison that touches every byte regardless of where
/// the first mismatch is.
fn codes_match(entered: &[u8], expected: &[u8]) -> bool {
    if entered.len() != expected.len() {
        return false;
    }
    entered
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

// ───────────────────────────────────────────────────────────────
// Tag allow-list
// ───────────────────────────────────────────────────────────────

/// Exact byte-for-byte match against the allow-list.
pub fn check_tag(uid: TagUid, allowed: &[TagUid]) -> Result<TagUid, AuthFault> {
    if allowed.iter().any(|t| *t == uid) {
        Ok(uid)
    } else {
        let fault = AuthFault::UnknownTag(uid);
        warn!("{}", fault);
        Err(fault)
    }
}
