//! Mode exit cleanup: tasks owned by a mode never outlive it and outputs
//! return to their resting levels.

use comfortctl::app::ports::LedId;
use comfortctl::fsm::Mode;
use comfortctl::scheduler::TaskId;

use super::mock_hw::{GOOD_TAG, Rig};

fn assert_tasks_owned_by_current_mode(rig: &Rig) {
    let scheduler = &rig.service.core().scheduler;
    for id in TaskId::ALL {
        if let Some(owner) = scheduler.owner_of(id) {
            assert_eq!(
                owner,
                rig.mode(),
                "{:?} outlived its owner at {} ms",
                id,
                rig.now_ms
            );
        }
    }
}

#[test]
fn fan_mode_exit_stops_fan_and_blink() {
    let mut rig = Rig::new();
    rig.hw.set_room(32.0, 30.0);
    rig.authorize();
    rig.run_until(Mode::ComfortHot, 3_000).expect("fan mode");

    // Leave mid-blink: 150 ms toggles against a 3 s timeout.
    rig.run_for(1_550);
    assert_eq!(rig.mode(), Mode::ComfortHot);
    rig.run_until(Mode::Monitoring, 3_000).expect("timeout");

    let scheduler = &rig.service.core().scheduler;
    assert!(!scheduler.is_active(TaskId::FastBlinkRed));
    assert!(!scheduler.is_active(TaskId::AutoReturn));
    assert!(!rig.hw.relay_on());
    assert!(!rig.hw.led_on(LedId::Red));
    assert!(rig.hw.led_on(LedId::Green));
}

#[test]
fn alarm_ack_leaves_no_tasks_running() {
    let mut rig = Rig::new();
    rig.hw.set_room(30.5, 30.0);
    rig.authorize();
    rig.run_until(Mode::Alarm, 8_000).expect("alarm");
    rig.run_for(700);

    rig.hw.type_keys("#");
    rig.tick();
    assert_eq!(rig.mode(), Mode::Idle);
    assert_eq!(rig.service.core().scheduler.active_count(), 0);
    assert!(!rig.hw.buzzer_on());
    assert!(!rig.hw.led_on(LedId::Red));
    assert!(!rig.hw.relay_on());
}

#[test]
fn every_live_task_belongs_to_current_mode() {
    let mut rig = Rig::new();
    rig.hw.set_room(32.0, 30.0);

    let drive = |rig: &mut Rig, ms: u64| {
        let end = rig.now_ms + ms;
        while rig.now_ms < end {
            rig.tick();
            assert_tasks_owned_by_current_mode(rig);
        }
    };

    rig.hw.type_keys("9999");
    drive(&mut rig, 1_000);
    rig.hw.button = true;
    drive(&mut rig, 300);
    rig.hw.button = false;
    rig.hw.type_keys("1234");
    drive(&mut rig, 1_000);
    rig.hw.present_tag(GOOD_TAG);
    drive(&mut rig, 25_000);
    assert_eq!(rig.mode(), Mode::Alarm);
    rig.hw.type_keys("#");
    drive(&mut rig, 500);
    assert_eq!(rig.mode(), Mode::Idle);
}

#[test]
fn actuator_writes_only_on_change() {
    let mut rig = Rig::new();
    let after_start = rig.hw.calls.len();
    rig.run_for(2_000);
    assert_eq!(rig.hw.calls.len(), after_start, "Idle is quiet");

    let cmds = rig.service.commands();
    assert!(!cmds.relay && !cmds.buzzer && !cmds.red);
    assert_eq!(cmds.servo_deg, rig.service.config().servo_closed_deg);
}
