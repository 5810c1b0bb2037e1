//! Outbound messages to the robot control process

use crate::{Result, TeleopError};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

/// A message for the robot (or the audio entrainer in front of it)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RobotMessage {
    /// Play an audio file on the robot
    Speech { filename: String },
    /// Play a named animation
    Motion { name: String },
    /// Turn-taking signal
    InteractionState { is_participant_turn: bool },
    /// Stream audio through the entrainer
    EntrainAudio {
        audio_path: String,
        viseme_path: String,
        speaker_age: u32,
        entrain: bool,
    },
}

/// Outbound messaging client
pub trait RobotLink: Send {
    /// Deliver one message
    fn send(&mut self, message: RobotMessage) -> Result<()>;

    fn send_speech(&mut self, filename: &str) -> Result<()> {
        self.send(RobotMessage::Speech {
            filename: filename.to_string(),
        })
    }

    fn send_motion(&mut self, name: &str) -> Result<()> {
        self.send(RobotMessage::Motion {
            name: name.to_string(),
        })
    }

    fn send_interaction_state(&mut self, is_participant_turn: bool) -> Result<()> {
        self.send(RobotMessage::InteractionState {
            is_participant_turn,
        })
    }

    fn send_entrain_audio(
        &mut self,
        audio_path: String,
        viseme_path: String,
        speaker_age: u32,
        entrain: bool,
    ) -> Result<()> {
        self.send(RobotMessage::EntrainAudio {
            audio_path,
            viseme_path,
            speaker_age,
            entrain,
        })
    }
}

impl<L: RobotLink + ?Sized> RobotLink for Box<L> {
    fn send(&mut self, message: RobotMessage) -> Result<()> {
        (**self).send(message)
    }
}

/// Link that forwards messages over a channel
///
/// Used with the in-process simulated robot and in tests.
#[derive(Clone)]
pub struct ChannelLink {
    tx: Sender<RobotMessage>,
}

impl ChannelLink {
    pub fn new(tx: Sender<RobotMessage>) -> Self {
        Self { tx }
    }
}

impl RobotLink for ChannelLink {
    fn send(&mut self, message: RobotMessage) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|e| TeleopError::ChannelError(format!("Robot channel closed: {}", e)))
    }
}

/// Link that writes one JSON object per line
///
/// Intended for piping into an external bridge process.
pub struct JsonLinesLink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesLink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> RobotLink for JsonLinesLink<W> {
    fn send(&mut self, message: RobotMessage) -> Result<()> {
        let line = serde_json::to_string(&message)
            .map_err(|e| TeleopError::LinkError(format!("Could not encode message: {}", e)))?;
        debug!("[LINK] {}", line);
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| TeleopError::LinkError(format!("Could not write message: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_json_lines_wire_format() {
        let mut link = JsonLinesLink::new(Vec::new());
        link.send_speech("hi.wav").unwrap();
        link.send_interaction_state(true).unwrap();

        let out = String::from_utf8(link.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], r#"{"type":"speech","filename":"hi.wav"}"#);
        assert_eq!(
            lines[1],
            r#"{"type":"interaction_state","is_participant_turn":true}"#
        );
    }

    #[test]
    fn test_channel_link_closed_receiver() {
        let (tx, rx) = unbounded();
        let mut link = ChannelLink::new(tx);
        link.send_motion("WAVE").unwrap();
        assert_eq!(
            rx.recv().unwrap(),
            RobotMessage::Motion {
                name: "WAVE".into()
            }
        );

        drop(rx);
        let err = link.send_motion("NOD").unwrap_err();
        assert!(matches!(err, TeleopError::ChannelError(_)));
    }
}
