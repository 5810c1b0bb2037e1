//! Command dispatch: token parsing, the synchronous dispatcher, and its worker thread

pub mod action;
pub mod dispatcher;
pub mod worker;

pub use action::{parse_command, Action, PARTICIPANT_TURN};
pub use dispatcher::{
    DispatchReport, DispatchSettings, Dispatcher, EntrainSettings, StaticTone, Trigger,
};
pub use worker::{DispatchCommand, DispatchEvent, DispatchHandle, DispatchWorker};
