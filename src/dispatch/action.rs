//! Command tokens and the actions they resolve to

use crate::script::ABSENT;

/// Token that hands the turn to the participant
pub const PARTICIPANT_TURN: &str = "PARTICIPANT_TURN";

/// One atomic thing to tell the robot
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Signal that it is the participant's turn
    ParticipantTurn,
    /// Play a named animation (all-caps token)
    Animation(String),
    /// Play an audio file (any other token)
    Speech(String),
}

impl Action {
    pub fn from_token(token: &str) -> Self {
        if token == PARTICIPANT_TURN {
            Action::ParticipantTurn
        } else if is_upper(token) {
            Action::Animation(token.to_string())
        } else {
            Action::Speech(token.to_string())
        }
    }

    /// Advisory text shown while this action is being sent
    pub fn advisory(&self) -> &'static str {
        match self {
            Action::ParticipantTurn => "Sending participant turn message.",
            Action::Animation(_) => "Sending animation.",
            Action::Speech(_) => "Sending speech command.",
        }
    }
}

/// Resolve a command field into its actions, in order
///
/// `"-"` resolves to nothing. Empty tokens from stray commas are skipped.
pub fn parse_command(field: &str) -> Vec<Action> {
    if field == ABSENT {
        return Vec::new();
    }
    field
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Action::from_token)
        .collect()
}

/// At least one cased character and none of them lower-case
fn is_upper(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

/// Viseme file matching an audio file: same name with `.txt` for `.wav`
pub fn viseme_for(audio: &str) -> String {
    audio.replace(".wav", ".txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_classification() {
        assert_eq!(Action::from_token("PARTICIPANT_TURN"), Action::ParticipantTurn);
        assert_eq!(Action::from_token("WAVE"), Action::Animation("WAVE".into()));
        assert_eq!(Action::from_token("LEAN_2"), Action::Animation("LEAN_2".into()));
        assert_eq!(Action::from_token("hi.wav"), Action::Speech("hi.wav".into()));
        assert_eq!(Action::from_token("Hi.WAV"), Action::Speech("Hi.WAV".into()));
        // no cased characters at all is not an animation
        assert_eq!(Action::from_token("123"), Action::Speech("123".into()));
    }

    #[test]
    fn test_parse_keeps_order() {
        assert_eq!(
            parse_command("WAVE,b.wav"),
            vec![Action::Animation("WAVE".into()), Action::Speech("b.wav".into())]
        );
    }

    #[test]
    fn test_absent_is_empty() {
        assert!(parse_command("-").is_empty());
    }

    #[test]
    fn test_stray_commas_skipped() {
        assert_eq!(parse_command(",a.wav,,"), vec![Action::Speech("a.wav".into())]);
    }

    #[test]
    fn test_viseme_for() {
        assert_eq!(viseme_for("greet.wav"), "greet.txt");
        assert_eq!(viseme_for("greet.mp3"), "greet.mp3");
    }
}
