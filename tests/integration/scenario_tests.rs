//! End-to-end classroom sessions through `ControlService` → FSM → actuators.

use comfortctl::app::events::AppEvent;
use comfortctl::app::ports::LedId;
use comfortctl::fsm::Mode;

use super::mock_hw::{GOOD_TAG, Rig};

fn last_telemetry_pmv(rig: &Rig) -> Option<f32> {
    rig.sink.events.iter().rev().find_map(|e| match e {
        AppEvent::Telemetry(t) => Some(t.pmv),
        _ => None,
    })
}

// ── Code + tag → Monitoring ──────────────────────────────────

#[test]
fn code_then_tag_reaches_monitoring_after_settle() {
    let mut rig = Rig::new();
    assert_eq!(rig.mode(), Mode::Idle);
    assert_eq!(rig.hw.last_lines(), Some(("Enter code:", "")));

    rig.hw.type_keys("1234");
    assert_eq!(rig.run_until(Mode::TagWait, 1_000), Some(400));
    assert_eq!(rig.hw.last_lines(), Some(("Scan your tag", "")));

    rig.hw.present_tag(GOOD_TAG);
    rig.tick();
    assert_eq!(rig.mode(), Mode::TagWait, "tag starts the settle window");
    assert_eq!(rig.hw.last_lines(), Some(("Tag accepted", "Please wait...")));
    assert_eq!(rig.marker.marks, vec![GOOD_TAG]);

    // Settle started on the tick the tag was read.
    assert_eq!(rig.run_until(Mode::Monitoring, 6_000), Some(5_000));
    assert!(rig.hw.led_on(LedId::Green));
    assert_eq!(
        rig.sink.mode_changes(),
        vec![
            (Mode::Idle, Mode::Authenticating),
            (Mode::Authenticating, Mode::TagWait),
            (Mode::TagWait, Mode::Monitoring),
        ]
    );
}

#[test]
fn monitoring_screen_shows_readings() {
    let mut rig = Rig::new();
    rig.hw.set_room(26.0, 45.0);
    rig.authorize();
    rig.run_for(1_000);

    let (top, bottom) = rig.hw.last_lines().expect("screen drawn");
    assert_eq!(top, "T:26.0C H:45%");
    assert!(bottom.starts_with("PMV:"), "got {:?}", bottom);
}

// ── Warm room → fan ──────────────────────────────────────────

#[test]
fn warm_room_runs_fan_then_returns() {
    let mut rig = Rig::new();
    rig.hw.set_room(32.0, 30.0);
    rig.authorize();

    // Readings only inside the first hold window.
    assert_eq!(rig.run_until(Mode::ComfortHot, 3_000), Some(2_500));
    assert!(rig.hw.relay_on());
    let pmv = last_telemetry_pmv(&rig).expect("evaluation emits telemetry");
    assert!((pmv - 0.7).abs() < 0.01, "pmv = {}", pmv);
    assert_eq!(rig.service.core().streak.count(), 1);

    assert_eq!(rig.run_until(Mode::Monitoring, 4_000), Some(3_000));
    assert!(!rig.hw.relay_on());
}

#[test]
fn sustained_heat_escalates_from_fan_to_alarm() {
    let mut rig = Rig::new();
    rig.hw.set_room(32.0, 30.0);
    rig.authorize();

    // Two fan cycles, then the third hot evaluation trips the alarm.
    for expected_streak in 1..=2 {
        rig.run_until(Mode::ComfortHot, 3_000).expect("fan cycle");
        assert_eq!(rig.service.core().streak.count(), expected_streak);
        rig.run_until(Mode::Monitoring, 4_000).expect("fan timeout");
    }
    assert_eq!(rig.run_until(Mode::Alarm, 3_000), Some(2_500));
    assert!(rig.hw.buzzer_on());
    assert!(!rig.hw.relay_on(), "alarm does not run the fan");
}

// ── Cool room → vent ─────────────────────────────────────────

#[test]
fn cool_room_opens_vent_then_returns() {
    let mut rig = Rig::new();
    rig.hw.set_room(22.0, 40.0);
    rig.authorize();

    assert_eq!(rig.run_until(Mode::ComfortCold, 3_000), Some(2_500));
    assert_eq!(rig.hw.servo_deg(), Some(90));
    assert!(rig.hw.led_on(LedId::Blue));
    assert_eq!(rig.hw.last_lines(), Some(("Too cool", "Vent open")));

    assert_eq!(rig.run_until(Mode::Monitoring, 3_000), Some(2_000));
    assert_eq!(rig.hw.servo_deg(), Some(0));
    assert!(!rig.hw.led_on(LedId::Blue));
}

// ── Neutral heat streak → alarm → acknowledge ────────────────

#[test]
fn neutral_but_hot_streak_raises_alarm_and_ack_resets() {
    let mut rig = Rig::new();
    rig.hw.set_room(30.5, 30.0);
    rig.authorize();

    // PMV ≈ 0.4 stays inside the band; only the streak moves.
    assert_eq!(rig.run_until(Mode::Alarm, 8_000), Some(7_500));
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::AlarmRaised { streak: 3, .. })),
        1
    );
    assert!(rig.hw.buzzer_on());
    assert_eq!(rig.hw.last_lines(), Some(("HIGH TEMP ALARM", "Press # to ack")));

    // Other keys do nothing.
    rig.hw.type_keys("1*");
    rig.run_for(200);
    assert_eq!(rig.mode(), Mode::Alarm);

    rig.hw.type_keys("#");
    rig.tick();
    assert_eq!(rig.mode(), Mode::Idle);
    assert_eq!(rig.service.core().streak.count(), 0);
    assert!(!rig.hw.buzzer_on());
    assert!(!rig.hw.led_on(LedId::Red));
}

#[test]
fn dead_zone_holds_streak() {
    let mut rig = Rig::new();
    rig.hw.set_room(30.5, 30.0);
    rig.authorize();
    rig.run_for(5_000);
    assert_eq!(rig.service.core().streak.count(), 2);

    // 29.7 °C is between the thresholds: no increment, no reset.
    rig.hw.set_room(29.7, 30.0);
    rig.run_for(2_500);
    assert_eq!(rig.service.core().streak.count(), 2);

    rig.hw.set_room(28.0, 30.0);
    rig.run_for(2_500);
    assert_eq!(rig.service.core().streak.count(), 0);
    assert_eq!(rig.mode(), Mode::Monitoring);
}

// ── Sensor faults ────────────────────────────────────────────

#[test]
fn failed_humidity_read_is_reported_and_skipped() {
    let mut rig = Rig::new();
    rig.hw.set_room(26.0, 45.0);
    rig.authorize();
    rig.run_for(1_000);

    rig.hw.humidity_pct = f32::NAN;
    rig.tick();
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::SensorFault(_))),
        1
    );
    let sample = rig.service.core().monitor.sample.expect("sampled");
    assert!((sample.humidity_pct - 45.0).abs() < 1e-3);
    assert_eq!(rig.mode(), Mode::Monitoring);
}
