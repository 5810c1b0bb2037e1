//! Dispatcher thread
//!
//! Dispatching blocks on robot status, so it runs on its own thread. The
//! panel talks to it through a [`DispatchHandle`]; commands are handled
//! strictly one at a time in arrival order.

use super::action::Action;
use super::dispatcher::{DispatchReport, Dispatcher, EntrainSettings, Trigger};
use crate::robot::{RobotLink, StatusSource};
use crate::{Result, TeleopError};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

/// Commands that can be sent to the dispatch worker
#[derive(Clone, Debug)]
pub enum DispatchCommand {
    /// Dispatch a command field
    Run {
        command: String,
        trigger: Trigger,
        entrain: EntrainSettings,
    },
    /// Send the turn signal outside of any script line
    ParticipantTurn,
    /// Stop the worker
    Shutdown,
}

/// Events emitted by the dispatch worker
#[derive(Clone, Debug)]
pub enum DispatchEvent {
    /// An action is about to be sent
    Sending(Action),
    /// A `Run` command finished
    Completed(DispatchReport),
    /// A `ParticipantTurn` command finished
    TurnSignalled(std::result::Result<(), TeleopError>),
    /// Worker has shut down
    Shutdown,
}

/// Handle for controlling the dispatch worker
pub struct DispatchHandle {
    command_tx: Sender<DispatchCommand>,
    event_rx: Receiver<DispatchEvent>,
}

impl DispatchHandle {
    /// Create a handle and the worker that serves it
    ///
    /// The worker does nothing until [`DispatchWorker::start`] is called.
    pub fn new<L, S>(dispatcher: Dispatcher<L, S>) -> (Self, DispatchWorker<L, S>)
    where
        L: RobotLink + 'static,
        S: StatusSource + 'static,
    {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        let handle = Self {
            command_tx,
            event_rx,
        };
        let worker = DispatchWorker {
            command_rx,
            event_tx,
            dispatcher,
        };

        (handle, worker)
    }

    /// Send a command to the worker
    pub fn send_command(&self, cmd: DispatchCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| TeleopError::ChannelError(format!("Failed to send command: {}", e)))
    }

    /// Queue a command field for dispatch
    pub fn run(&self, command: String, trigger: Trigger, entrain: EntrainSettings) -> Result<()> {
        self.send_command(DispatchCommand::Run {
            command,
            trigger,
            entrain,
        })
    }

    /// Queue a turn signal
    pub fn participant_turn(&self) -> Result<()> {
        self.send_command(DispatchCommand::ParticipantTurn)
    }

    /// Request shutdown
    pub fn shutdown(&self) -> Result<()> {
        self.send_command(DispatchCommand::Shutdown)
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<DispatchEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event, giving up after `timeout`
    ///
    /// Returns `Ok(None)` on timeout.
    pub fn recv_event_timeout(&self, timeout: Duration) -> Result<Option<DispatchEvent>> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(TeleopError::ChannelError(
                "Dispatch worker has stopped".to_string(),
            )),
        }
    }
}

/// Worker that owns the dispatcher
pub struct DispatchWorker<L, S> {
    command_rx: Receiver<DispatchCommand>,
    event_tx: Sender<DispatchEvent>,
    dispatcher: Dispatcher<L, S>,
}

impl<L, S> DispatchWorker<L, S>
where
    L: RobotLink + 'static,
    S: StatusSource + 'static,
{
    /// Start the worker thread
    pub fn start(self) -> JoinHandle<()> {
        thread::spawn(move || {
            if let Err(e) = self.run() {
                error!("Dispatch worker error: {}", e);
            }
        })
    }

    /// Main worker loop
    fn run(mut self) -> Result<()> {
        info!("Dispatch worker starting");

        loop {
            match self.command_rx.recv() {
                Ok(DispatchCommand::Run {
                    command,
                    trigger,
                    entrain,
                }) => {
                    debug!("Dispatching {:?} from {:?}", command, trigger);
                    let event_tx = self.event_tx.clone();
                    let report =
                        self.dispatcher
                            .dispatch_with(&command, trigger, entrain, |action| {
                                let _ = event_tx.send(DispatchEvent::Sending(action.clone()));
                            });
                    self.emit(DispatchEvent::Completed(report))?;
                }
                Ok(DispatchCommand::ParticipantTurn) => {
                    let result = self.dispatcher.send_participant_turn();
                    self.emit(DispatchEvent::TurnSignalled(result))?;
                }
                Ok(DispatchCommand::Shutdown) => {
                    info!("Dispatch worker shutting down");
                    let _ = self.event_tx.send(DispatchEvent::Shutdown);
                    break;
                }
                Err(_) => {
                    debug!("Dispatch command channel closed");
                    break;
                }
            }
        }

        Ok(())
    }

    fn emit(&self, event: DispatchEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .map_err(|e| TeleopError::ChannelError(format!("Failed to send event: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchSettings;
    use crate::robot::{ChannelLink, RobotMessage, SharedRobotStatus};
    use crossbeam_channel::unbounded;

    fn start_worker() -> (DispatchHandle, Receiver<RobotMessage>, JoinHandle<()>) {
        let (tx, rx) = unbounded();
        let settings = DispatchSettings {
            speech_start_timeout: Duration::from_millis(10),
            motion_start_timeout: Duration::from_millis(10),
            ..Default::default()
        };
        let status = SharedRobotStatus::new(Duration::from_millis(5));
        let dispatcher = Dispatcher::new(ChannelLink::new(tx), status, settings);
        let (handle, worker) = DispatchHandle::new(dispatcher);
        (handle, rx, worker.start())
    }

    fn next_completion(handle: &DispatchHandle) -> DispatchReport {
        loop {
            match handle.recv_event_timeout(Duration::from_secs(5)).unwrap() {
                Some(DispatchEvent::Completed(report)) => return report,
                Some(_) => continue,
                None => panic!("no completion within timeout"),
            }
        }
    }

    #[test]
    fn test_run_reports_sending_then_completed() {
        let (handle, rx, join) = start_worker();
        handle
            .run("hi.wav".into(), Trigger::Line(0), EntrainSettings::default())
            .unwrap();

        let first = handle.recv_event_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(first, Some(DispatchEvent::Sending(Action::Speech(_)))));

        let report = next_completion(&handle);
        assert_eq!(report.sent, vec![Action::Speech("hi.wav".into())]);
        // nothing raised the sound flag, so the start wait timed out
        assert_eq!(report.timeouts, 1);
        assert_eq!(
            rx.try_recv().unwrap(),
            RobotMessage::Speech {
                filename: "hi.wav".into()
            }
        );

        handle.shutdown().unwrap();
        join.join().unwrap();
    }

    #[test]
    fn test_commands_processed_in_order() {
        let (handle, rx, join) = start_worker();
        handle
            .run("a.wav".into(), Trigger::Line(0), EntrainSettings::default())
            .unwrap();
        handle.participant_turn().unwrap();
        handle
            .run("NOD".into(), Trigger::Static(0), EntrainSettings::default())
            .unwrap();

        next_completion(&handle);
        next_completion(&handle);
        handle.shutdown().unwrap();
        join.join().unwrap();

        let sent: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            sent,
            vec![
                RobotMessage::Speech {
                    filename: "a.wav".into()
                },
                RobotMessage::InteractionState {
                    is_participant_turn: true
                },
                RobotMessage::Motion { name: "NOD".into() },
            ]
        );
    }

    #[test]
    fn test_shutdown_event() {
        let (handle, _rx, join) = start_worker();
        handle.shutdown().unwrap();
        join.join().unwrap();
        assert!(matches!(
            handle.try_recv_event(),
            Some(DispatchEvent::Shutdown)
        ));
    }
}
