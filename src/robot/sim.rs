//! In-process stand-in for the robot
//!
//! Lets an operator rehearse a script without hardware. Every speech or motion
//! message raises the matching status flag after a short latency, holds it for
//! a fixed duration, then lowers it again.

use super::link::{ChannelLink, RobotMessage};
use super::status::SharedRobotStatus;
use crossbeam_channel::{unbounded, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Timing of the simulated robot
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Delay between receiving a command and raising the flag
    pub start_latency: Duration,
    /// How long sound stays playing
    pub speech_duration: Duration,
    /// How long a motion stays playing
    pub motion_duration: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_latency: Duration::from_millis(200),
            speech_duration: Duration::from_millis(1500),
            motion_duration: Duration::from_millis(1000),
        }
    }
}

/// Simulated robot driven by a [`ChannelLink`]
pub struct SimulatedRobot {
    rx: Receiver<RobotMessage>,
    status: SharedRobotStatus,
    config: SimConfig,
}

impl SimulatedRobot {
    /// Create the robot and the link that drives it
    pub fn new(status: SharedRobotStatus, config: SimConfig) -> (ChannelLink, Self) {
        let (tx, rx) = unbounded();
        let robot = Self { rx, status, config };
        (ChannelLink::new(tx), robot)
    }

    /// Run the robot on its own thread until every link is dropped
    pub fn start(self) -> JoinHandle<()> {
        thread::spawn(move || self.run())
    }

    fn run(self) {
        info!("[SIM] Simulated robot ready");
        while let Ok(message) = self.rx.recv() {
            self.perform(message);
        }
        info!("[SIM] Link closed, simulated robot stopping");
    }

    fn perform(&self, message: RobotMessage) {
        match message {
            RobotMessage::Speech { filename } => {
                debug!("[SIM] Speaking {}", filename);
                self.play(|s, v| s.set_playing_sound(v), self.config.speech_duration);
            }
            RobotMessage::EntrainAudio { audio_path, .. } => {
                debug!("[SIM] Speaking entrained {}", audio_path);
                self.play(|s, v| s.set_playing_sound(v), self.config.speech_duration);
            }
            RobotMessage::Motion { name } => {
                debug!("[SIM] Moving {}", name);
                self.play(|s, v| s.set_doing_motion(v), self.config.motion_duration);
            }
            RobotMessage::InteractionState {
                is_participant_turn,
            } => {
                debug!("[SIM] Participant turn: {}", is_participant_turn);
            }
        }
    }

    fn play(&self, set: impl Fn(&SharedRobotStatus, bool), duration: Duration) {
        thread::sleep(self.config.start_latency);
        set(&self.status, true);
        thread::sleep(duration);
        set(&self.status, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{RobotLink, StatusCondition, StatusSource};

    fn fast() -> SimConfig {
        SimConfig {
            start_latency: Duration::from_millis(5),
            speech_duration: Duration::from_millis(30),
            motion_duration: Duration::from_millis(30),
        }
    }

    #[test]
    fn test_speech_raises_then_lowers_sound_flag() {
        let status = SharedRobotStatus::new(Duration::from_millis(5));
        let (mut link, robot) = SimulatedRobot::new(status.clone(), fast());
        let handle = robot.start();

        link.send_speech("hi.wav").unwrap();
        assert!(status.wait_until(StatusCondition::PlayingSound, Duration::from_secs(2)));
        assert!(status.wait_until(StatusCondition::Idle, Duration::from_secs(2)));

        drop(link);
        handle.join().unwrap();
    }

    #[test]
    fn test_motion_raises_motion_flag() {
        let status = SharedRobotStatus::new(Duration::from_millis(5));
        let (mut link, robot) = SimulatedRobot::new(status.clone(), fast());
        let handle = robot.start();

        link.send_motion("WAVE").unwrap();
        assert!(status.wait_until(StatusCondition::DoingMotion, Duration::from_secs(2)));

        drop(link);
        handle.join().unwrap();
        assert!(status.snapshot().is_idle());
    }
}
