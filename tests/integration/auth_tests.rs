//! Keypad code, lockout and RFID tag handling.

use comfortctl::app::events::AppEvent;
use comfortctl::app::ports::LedId;
use comfortctl::error::AuthFault;
use comfortctl::fsm::Mode;
use comfortctl::scheduler::TaskId;

use super::mock_hw::{GOOD_TAG, Rig};

const STRANGER: [u8; 4] = [0x01, 0x02, 0x03, 0x04];

fn locked_rig() -> Rig {
    let mut rig = Rig::new();
    rig.hw.type_keys("9999");
    assert_eq!(rig.run_until(Mode::Locked, 1_000), Some(400));
    rig
}

// ── Code entry ───────────────────────────────────────────────

#[test]
fn wrong_code_locks_until_button() {
    let mut rig = locked_rig();
    assert!(rig.hw.led_on(LedId::Red));
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::AccessDenied(AuthFault::WrongCode))),
        1
    );

    rig.hw.button = true;
    // One tick arms the debounce, the next confirms the press.
    assert_eq!(rig.run_until(Mode::Idle, 500), Some(200));
    assert!(!rig.hw.led_on(LedId::Red));
    assert!(!rig.service.core().scheduler.is_active(TaskId::BlinkRed));
}

#[test]
fn button_bounce_does_not_unlock() {
    let mut rig = locked_rig();
    rig.hw.button = true;
    rig.tick();
    rig.hw.button = false;
    rig.run_for(1_000);
    assert_eq!(rig.mode(), Mode::Locked);
}

#[test]
fn keys_are_ignored_while_locked() {
    let mut rig = locked_rig();
    rig.hw.type_keys("1234");
    rig.run_for(1_000);
    assert_eq!(rig.mode(), Mode::Locked);
    assert!(rig.hw.keys.is_empty(), "keys are drained, not buffered");
}

#[test]
fn star_clears_partial_code() {
    let mut rig = Rig::new();
    rig.hw.type_keys("12*");
    rig.run_for(300);
    assert_eq!(rig.mode(), Mode::Authenticating);
    assert_eq!(rig.hw.last_lines(), Some(("Enter code:", "")));

    rig.hw.type_keys("1234");
    assert_eq!(rig.run_until(Mode::TagWait, 1_000), Some(400));
}

#[test]
fn masked_digits_are_shown() {
    let mut rig = Rig::new();
    rig.hw.type_keys("12");
    rig.run_for(200);
    assert_eq!(rig.hw.last_lines(), Some(("Enter code:", "**")));
}

#[test]
fn letters_do_not_start_entry() {
    let mut rig = Rig::new();
    rig.hw.type_keys("AB");
    rig.run_for(300);
    assert_eq!(rig.mode(), Mode::Idle);
}

#[test]
fn entry_timeout_returns_to_idle_and_forgets_digits() {
    let mut rig = Rig::new();
    rig.hw.type_keys("12");
    rig.tick();
    assert_eq!(rig.mode(), Mode::Authenticating);

    // Measured from entering Authenticating, not from the last key.
    assert_eq!(rig.run_until(Mode::Idle, 11_000), Some(10_000));

    rig.hw.type_keys("1234");
    assert!(rig.run_until(Mode::TagWait, 1_000).is_some());
}

// ── RFID ─────────────────────────────────────────────────────

#[test]
fn unknown_tag_is_rejected_then_valid_tag_accepted() {
    let mut rig = Rig::new();
    rig.hw.type_keys("1234");
    rig.run_until(Mode::TagWait, 1_000).expect("code accepted");

    rig.hw.present_tag(STRANGER);
    rig.tick();
    assert_eq!(rig.mode(), Mode::TagWait);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::AccessDenied(AuthFault::UnknownTag(uid)) if *uid == STRANGER
        )),
        1
    );
    assert_eq!(rig.hw.last_lines(), Some(("Unknown tag", "Scan again")));
    assert!(rig.marker.marks.is_empty());

    rig.hw.present_tag(GOOD_TAG);
    rig.tick();
    assert_eq!(rig.marker.marks, vec![GOOD_TAG]);
    assert!(rig.run_until(Mode::Monitoring, 6_000).is_some());
}

#[test]
fn tag_window_expires_to_idle() {
    let mut rig = Rig::new();
    rig.hw.type_keys("1234");
    rig.run_until(Mode::TagWait, 1_000).expect("code accepted");
    assert_eq!(rig.run_until(Mode::Idle, 31_000), Some(30_000));
}

#[test]
fn tag_is_marked_once_per_visit() {
    let mut rig = Rig::new();
    rig.hw.type_keys("1234");
    rig.run_until(Mode::TagWait, 1_000).expect("code accepted");

    rig.hw.present_tag(GOOD_TAG);
    rig.hw.present_tag(GOOD_TAG);
    rig.run_for(1_000);
    assert_eq!(rig.marker.marks.len(), 1);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::Authorized(_))),
        1
    );
}
