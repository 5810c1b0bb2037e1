//! Status feed from an external bridge process
//!
//! The bridge writes one JSON [`StatusUpdate`] per line; each is applied to the
//! shared status as it arrives.

use super::status::{SharedRobotStatus, StatusUpdate};
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Read status updates from `reader` on a background thread
///
/// The thread ends at end-of-input or on a read error. Malformed lines are
/// logged and skipped.
pub fn spawn_status_reader<R>(reader: R, status: SharedRobotStatus) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        read_status_updates(reader, &status);
        info!("[BRIDGE] Status feed closed");
    })
}

/// Apply every update from `reader`; returns how many were applied
pub fn read_status_updates<R: BufRead>(reader: R, status: &SharedRobotStatus) -> usize {
    let mut applied = 0;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("[BRIDGE] Status feed read error: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<StatusUpdate>(&line) {
            Ok(update) => {
                status.apply(update);
                applied += 1;
            }
            Err(e) => warn!("[BRIDGE] Ignoring malformed status line {:?}: {}", line, e),
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_applies_updates_in_order() {
        let status = SharedRobotStatus::default();
        let feed = Cursor::new(
            "{\"is_playing_sound\": true}\n\nnot json\n{\"participant_attending\": false}\n",
        );

        let applied = read_status_updates(feed, &status);
        assert_eq!(applied, 2);

        let snapshot = status.snapshot();
        assert!(snapshot.is_playing_sound);
        assert!(!snapshot.participant_attending);
    }

    #[test]
    fn test_reader_thread_finishes_at_eof() {
        let status = SharedRobotStatus::default();
        let handle = spawn_status_reader(Cursor::new("{\"is_doing_motion\": true}\n"), status.clone());
        handle.join().unwrap();
        assert!(status.snapshot().is_doing_motion);
    }
}
