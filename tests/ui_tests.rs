//! UI automation tests using egui_kittest and AccessKit
//!
//! These tests render the real panel, find widgets through the accessibility
//! tree and click them, then check the session behind the panel.

use crossbeam_channel::{unbounded, Receiver};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use std::time::Duration;
use teleop::config::TeleopConfig;
use teleop::dispatch::{DispatchHandle, Dispatcher};
use teleop::robot::{ChannelLink, RobotMessage, SharedRobotStatus};
use teleop::session::Session;
use teleop::ui::TeleopApp;
use tempfile::TempDir;

const SCRIPT: &str = "hello.wav\tHello!\tWAVE\tWave\nbye.wav\tGoodbye\n";
const STATIC_SCRIPT: &str = "look_here.wav\tLook over here\n";

struct Panel {
    app: TeleopApp,
    sent: Receiver<RobotMessage>,
    _dir: TempDir,
}

fn panel(use_entrainer: bool) -> Panel {
    let dir = TempDir::new().unwrap();
    let scripts = dir.path().join("scripts");
    let statics = dir.path().join("static_scripts");
    std::fs::create_dir_all(&scripts).unwrap();
    std::fs::create_dir_all(&statics).unwrap();
    std::fs::write(scripts.join("intro.txt"), SCRIPT).unwrap();
    std::fs::write(scripts.join("outro.txt"), "end.wav\tThe end\n").unwrap();
    std::fs::write(statics.join("redirects.txt"), STATIC_SCRIPT).unwrap();

    let config = TeleopConfig {
        options: 2,
        script: Some(scripts.join("intro.txt")),
        static_script: Some(statics.join("redirects.txt")),
        script_dir: scripts,
        static_script_dir: statics,
        use_entrainer,
        ..Default::default()
    };

    // Robot that reports idle and never starts anything; keep waits short
    let status = SharedRobotStatus::new(Duration::from_millis(5));
    let mut settings = config.dispatch_settings();
    settings.idle_timeout = Duration::from_millis(20);
    settings.speech_start_timeout = Duration::from_millis(20);
    settings.motion_start_timeout = Duration::from_millis(20);

    let (tx, sent) = unbounded();
    let dispatcher = Dispatcher::new(ChannelLink::new(tx), status.clone(), settings);
    let (handle, worker) = DispatchHandle::new(dispatcher);
    worker.start();

    let mut session = Session::new(&config, handle);
    session.load_initial(&config);

    Panel {
        app: TeleopApp::from_parts(session, status, &config),
        sent,
        _dir: dir,
    }
}

fn panel_harness(app: TeleopApp) -> Harness<'static, TeleopApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(960.0, 640.0))
        .build_state(|ctx, app: &mut TeleopApp| app.show(ctx), app)
}

/// Test that the current line's options are rendered as buttons
#[test]
fn test_option_buttons_exist() {
    let p = panel(false);
    let mut harness = panel_harness(p.app);
    harness.run();

    let _first = harness.get_by_label("Hello!");
    let _second = harness.get_by_label("Wave");
    let _static = harness.get_by_label("Look over here");
}

/// Test that the navigation row is rendered
#[test]
fn test_navigation_buttons_exist() {
    let p = panel(false);
    let mut harness = panel_harness(p.app);
    harness.run();

    let _back = harness.get_by_label("<< back");
    let _pause = harness.get_by_label("-- pause --");
    let _forward = harness.get_by_label("forward >>");
    let _start = harness.get_by_label("[jump to start]");
    let _end = harness.get_by_label("[jump to end]");
}

/// Test that forward and back move through the script
#[test]
fn test_forward_then_back() {
    let p = panel(false);
    let mut harness = panel_harness(p.app);
    harness.run();

    harness.get_by_label("forward >>").click();
    harness.run();
    assert_eq!(harness.state().session().current_line(), 1);
    let _next = harness.get_by_label("Goodbye");

    harness.get_by_label("<< back").click();
    harness.run();
    assert_eq!(harness.state().session().current_line(), 0);
}

/// Test that the pause button flips its label
#[test]
fn test_pause_toggle() {
    let p = panel(false);
    let mut harness = panel_harness(p.app);
    harness.run();

    harness.get_by_label("-- pause --").click();
    harness.run();
    assert!(harness.state().session().is_paused());
    let _unpause = harness.get_by_label("-- unpause --");

    harness.get_by_label("forward >>").click();
    harness.run();
    assert_eq!(harness.state().session().current_line(), 0);
    assert_eq!(
        harness.state().session().advisory(),
        "Cannot go forward! Script paused."
    );
}

/// Test that the jump buttons reach both ends
#[test]
fn test_jump_buttons() {
    let p = panel(false);
    let mut harness = panel_harness(p.app);
    harness.run();

    harness.get_by_label("[jump to end]").click();
    harness.run();
    assert_eq!(harness.state().session().current_line(), 1);

    harness.get_by_label("[jump to start]").click();
    harness.run();
    assert_eq!(harness.state().session().current_line(), 0);
}

/// Test that clicking the first option sends speech and advances
#[test]
fn test_click_first_option() {
    let p = panel(false);
    let mut harness = panel_harness(p.app);
    harness.run();

    harness.get_by_label("Hello!").click();
    harness.run();
    assert!(harness.state_mut().session_mut().settle(Duration::from_secs(5)));
    harness.run();

    assert_eq!(harness.state().session().current_line(), 1);
    assert_eq!(
        p.sent.try_recv().unwrap(),
        RobotMessage::Speech {
            filename: "hello.wav".to_string()
        }
    );
}

/// Test that the entrainer box only shows when the entrainer is on
#[test]
fn test_entrainer_box_visibility() {
    let p = panel(false);
    let mut harness = panel_harness(p.app);
    harness.run();
    assert!(harness.query_by_label("PARTICIPANT TURN").is_none());

    let p = panel(true);
    let mut harness = panel_harness(p.app);
    harness.run();
    let _turn = harness.get_by_label("PARTICIPANT TURN");
    let _entrain = harness.get_by_label("Entrain?");
}

/// Test that the participant turn button sends the turn signal
#[test]
fn test_participant_turn_button() {
    let p = panel(true);
    let mut harness = panel_harness(p.app);
    harness.run();

    harness.get_by_label("PARTICIPANT TURN").click();
    harness.run();

    let message = p.sent.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(
        message,
        RobotMessage::InteractionState {
            is_participant_turn: true
        }
    );
}

/// Test that both script directories are scanned on the first frame
#[test]
fn test_script_catalog_scanned() {
    let p = panel(false);
    let mut harness = panel_harness(p.app);
    harness.run();

    assert_eq!(harness.state().script_choices().len(), 2);
    assert_eq!(harness.state().static_choices().len(), 1);
}
