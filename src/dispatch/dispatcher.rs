//! Turns a pressed option into robot messages
//!
//! Each token of a command is sent only once the robot is idle, and the
//! dispatcher then waits (bounded) for the robot to report that it started.
//! Timeouts are logged and never abort the command: the session has to keep
//! moving even when status updates lag or never arrive.

use super::action::{parse_command, viseme_for, Action};
use crate::robot::{RobotLink, StatusCondition, StatusSource};
use crate::TeleopError;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where a dispatched command came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Option slot on the current script line
    Line(usize),
    /// Entry in the static option list
    Static(usize),
}

impl Trigger {
    /// Only the first option of a line moves the script forward
    pub fn auto_advances(&self) -> bool {
        matches!(self, Trigger::Line(0))
    }
}

/// Color policy for the static options after a dispatch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaticTone {
    /// Participant is attending; static options look normal
    #[default]
    Attending,
    /// Participant is not attending; suggest a redirect
    Redirect,
}

impl StaticTone {
    pub fn from_attending(attending: bool) -> Self {
        if attending {
            StaticTone::Attending
        } else {
            StaticTone::Redirect
        }
    }
}

/// Entrainer settings captured when the option was pressed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntrainSettings {
    /// Route speech through the entrainer instead of the robot
    pub enabled: bool,
    /// Speaker age passed along with the audio
    pub speaker_age: u32,
    /// Whether the entrainer should entrain or just stream
    pub entrain: bool,
}

impl Default for EntrainSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            speaker_age: 5,
            entrain: false,
        }
    }
}

/// Fixed dispatch parameters
#[derive(Clone, Debug)]
pub struct DispatchSettings {
    /// Prefix for entrainer audio paths
    pub audio_base_dir: String,
    /// Prefix for entrainer viseme paths
    pub viseme_base_dir: String,
    /// Longest wait for the robot to go idle before sending
    pub idle_timeout: Duration,
    /// Longest wait for sound to start after a speech command
    pub speech_start_timeout: Duration,
    /// Longest wait for motion to start after an animation command
    pub motion_start_timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            audio_base_dir: String::new(),
            viseme_base_dir: String::new(),
            idle_timeout: Duration::from_secs(60),
            speech_start_timeout: Duration::from_secs(15),
            motion_start_timeout: Duration::from_secs(8),
        }
    }
}

/// What happened during one dispatch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchReport {
    pub trigger: Trigger,
    /// Actions actually sent, in order
    pub sent: Vec<Action>,
    /// Waits that ran out of time
    pub timeouts: usize,
    /// Static option tone derived from the attention flag afterwards
    pub tone: StaticTone,
    /// Set when a send failed and the rest of the command was abandoned
    pub error: Option<TeleopError>,
}

impl DispatchReport {
    /// Whether the session should move to the next line (before the pause check)
    pub fn should_advance(&self) -> bool {
        self.error.is_none() && self.trigger.auto_advances()
    }
}

/// Synchronous command dispatcher
pub struct Dispatcher<L, S> {
    link: L,
    status: S,
    settings: DispatchSettings,
}

impl<L: RobotLink, S: StatusSource> Dispatcher<L, S> {
    pub fn new(link: L, status: S, settings: DispatchSettings) -> Self {
        Self {
            link,
            status,
            settings,
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Dispatch a command field
    pub fn dispatch(
        &mut self,
        command: &str,
        trigger: Trigger,
        entrain: EntrainSettings,
    ) -> DispatchReport {
        self.dispatch_with(command, trigger, entrain, |_| {})
    }

    /// Dispatch a command field, calling `on_send` just before each action goes out
    pub fn dispatch_with(
        &mut self,
        command: &str,
        trigger: Trigger,
        entrain: EntrainSettings,
        mut on_send: impl FnMut(&Action),
    ) -> DispatchReport {
        let mut report = DispatchReport {
            trigger,
            sent: Vec::new(),
            timeouts: 0,
            tone: StaticTone::Attending,
            error: None,
        };

        for action in parse_command(command) {
            on_send(&action);
            if let Err(e) = self.perform(&action, entrain, &mut report.timeouts) {
                warn!("Abandoning command {:?} after {:?}: {}", command, action, e);
                report.error = Some(e);
                break;
            }
            report.sent.push(action);
        }

        let attending = self.status.current().participant_attending;
        report.tone = StaticTone::from_attending(attending);
        debug!(
            "Dispatched {:?} from {:?}: {} sent, {} timeouts, attending={}",
            command,
            trigger,
            report.sent.len(),
            report.timeouts,
            attending
        );
        report
    }

    /// Send the turn signal right away, without waiting on the robot
    pub fn send_participant_turn(&mut self) -> crate::Result<()> {
        info!("Sending participant turn");
        self.link.send_interaction_state(true)
    }

    fn perform(
        &mut self,
        action: &Action,
        entrain: EntrainSettings,
        timeouts: &mut usize,
    ) -> crate::Result<()> {
        match action {
            Action::ParticipantTurn => self.send_participant_turn(),
            Action::Animation(name) => {
                self.wait(StatusCondition::Idle, self.settings.idle_timeout, timeouts);
                info!("Sending animation {}", name);
                self.link.send_motion(name)?;
                self.wait(
                    StatusCondition::DoingMotion,
                    self.settings.motion_start_timeout,
                    timeouts,
                );
                Ok(())
            }
            Action::Speech(filename) => {
                self.wait(StatusCondition::Idle, self.settings.idle_timeout, timeouts);
                if entrain.enabled {
                    let audio_path = format!("{}{}", self.settings.audio_base_dir, filename);
                    let viseme_path =
                        format!("{}{}", self.settings.viseme_base_dir, viseme_for(filename));
                    info!("Sending {} to entrainer (visemes {})", audio_path, viseme_path);
                    self.link.send_entrain_audio(
                        audio_path,
                        viseme_path,
                        entrain.speaker_age,
                        entrain.entrain,
                    )?;
                } else {
                    info!("Sending speech {}", filename);
                    self.link.send_speech(filename)?;
                }
                self.wait(
                    StatusCondition::PlayingSound,
                    self.settings.speech_start_timeout,
                    timeouts,
                );
                Ok(())
            }
        }
    }

    fn wait(&self, condition: StatusCondition, timeout: Duration, timeouts: &mut usize) {
        if !self.status.wait_until(condition, timeout) {
            *timeouts += 1;
            warn!(
                "Timed out after {:?} waiting for {}, moving on",
                timeout, condition
            );
        }
    }
}
