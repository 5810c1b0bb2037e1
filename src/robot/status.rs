//! Robot status flags and waiting on them
//!
//! The robot bridge owns these flags and writes them through
//! [`SharedRobotStatus`]. The dispatcher only ever sees a [`StatusSource`],
//! which can read the flags and block until one of them reaches a state.

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Snapshot of the robot's reported state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotStatus {
    pub is_playing_sound: bool,
    pub is_doing_motion: bool,
    pub participant_attending: bool,
}

impl Default for RobotStatus {
    fn default() -> Self {
        Self {
            is_playing_sound: false,
            is_doing_motion: false,
            // No redirect suggested until the bridge says otherwise
            participant_attending: true,
        }
    }
}

impl RobotStatus {
    /// Neither speaking nor moving
    pub fn is_idle(&self) -> bool {
        !self.is_playing_sound && !self.is_doing_motion
    }
}

/// Partial status update as received from a bridge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub is_playing_sound: Option<bool>,
    #[serde(default)]
    pub is_doing_motion: Option<bool>,
    #[serde(default)]
    pub participant_attending: Option<bool>,
}

impl StatusUpdate {
    fn apply_to(&self, status: &mut RobotStatus) {
        if let Some(v) = self.is_playing_sound {
            status.is_playing_sound = v;
        }
        if let Some(v) = self.is_doing_motion {
            status.is_doing_motion = v;
        }
        if let Some(v) = self.participant_attending {
            status.participant_attending = v;
        }
    }
}

/// Something worth waiting for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCondition {
    /// Not playing sound and not moving
    Idle,
    /// Sound playback has started
    PlayingSound,
    /// Motion playback has started
    DoingMotion,
}

impl StatusCondition {
    pub fn holds(&self, status: &RobotStatus) -> bool {
        match self {
            StatusCondition::Idle => status.is_idle(),
            StatusCondition::PlayingSound => status.is_playing_sound,
            StatusCondition::DoingMotion => status.is_doing_motion,
        }
    }
}

impl std::fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusCondition::Idle => write!(f, "robot idle"),
            StatusCondition::PlayingSound => write!(f, "sound playing"),
            StatusCondition::DoingMotion => write!(f, "motion playing"),
        }
    }
}

/// Read-only view of the robot status
pub trait StatusSource: Send + Sync {
    /// Current flags
    fn current(&self) -> RobotStatus;

    /// Block until `condition` holds or `timeout` elapses
    ///
    /// Returns `true` if the condition was met, `false` on timeout.
    fn wait_until(&self, condition: StatusCondition, timeout: Duration) -> bool;
}

impl<S: StatusSource + ?Sized> StatusSource for Arc<S> {
    fn current(&self) -> RobotStatus {
        (**self).current()
    }

    fn wait_until(&self, condition: StatusCondition, timeout: Duration) -> bool {
        (**self).wait_until(condition, timeout)
    }
}

struct StatusInner {
    status: Mutex<RobotStatus>,
    changed: Condvar,
}

/// Thread-safe status flags, written by the robot bridge
///
/// Waiters wake on every write and re-check at least once per poll interval.
#[derive(Clone)]
pub struct SharedRobotStatus {
    inner: Arc<StatusInner>,
    poll_interval: Duration,
}

impl Default for SharedRobotStatus {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl SharedRobotStatus {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new(StatusInner {
                status: Mutex::new(RobotStatus::default()),
                changed: Condvar::new(),
            }),
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn snapshot(&self) -> RobotStatus {
        *self.inner.status.lock()
    }

    /// Apply a partial update and wake any waiters
    pub fn apply(&self, update: StatusUpdate) {
        let mut status = self.inner.status.lock();
        update.apply_to(&mut status);
        self.inner.changed.notify_all();
    }

    pub fn set_playing_sound(&self, value: bool) {
        self.apply(StatusUpdate {
            is_playing_sound: Some(value),
            ..Default::default()
        });
    }

    pub fn set_doing_motion(&self, value: bool) {
        self.apply(StatusUpdate {
            is_doing_motion: Some(value),
            ..Default::default()
        });
    }

    pub fn set_participant_attending(&self, value: bool) {
        self.apply(StatusUpdate {
            participant_attending: Some(value),
            ..Default::default()
        });
    }
}

impl StatusSource for SharedRobotStatus {
    fn current(&self) -> RobotStatus {
        self.snapshot()
    }

    fn wait_until(&self, condition: StatusCondition, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut status = self.inner.status.lock();
        loop {
            if condition.holds(&status) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let slice = (deadline - now).min(self.poll_interval);
            self.inner.changed.wait_for(&mut status, slice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_default_is_idle_and_attending() {
        let status = RobotStatus::default();
        assert!(status.is_idle());
        assert!(status.participant_attending);
    }

    #[test]
    fn test_partial_update_leaves_other_flags() {
        let shared = SharedRobotStatus::default();
        shared.set_doing_motion(true);
        shared.apply(StatusUpdate {
            participant_attending: Some(false),
            ..Default::default()
        });

        let status = shared.snapshot();
        assert!(status.is_doing_motion);
        assert!(!status.is_playing_sound);
        assert!(!status.participant_attending);
    }

    #[test]
    fn test_wait_returns_immediately_when_met() {
        let shared = SharedRobotStatus::default();
        let start = Instant::now();
        assert!(shared.wait_until(StatusCondition::Idle, Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_times_out() {
        let shared = SharedRobotStatus::new(Duration::from_millis(5));
        let start = Instant::now();
        assert!(!shared.wait_until(StatusCondition::PlayingSound, Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_wait_wakes_on_update() {
        let shared = SharedRobotStatus::new(Duration::from_secs(1));
        let writer = shared.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.set_playing_sound(true);
        });

        assert!(shared.wait_until(StatusCondition::PlayingSound, Duration::from_secs(5)));
        handle.join().unwrap();
    }

    #[test]
    fn test_status_update_from_json() {
        let update: StatusUpdate = serde_json::from_str(r#"{"is_playing_sound": true}"#).unwrap();
        assert_eq!(update.is_playing_sound, Some(true));
        assert_eq!(update.participant_attending, None);
    }
}
