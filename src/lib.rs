//! Teleop - speech and motion control panel for a social robot
//!
//! An operator steps through a tab-separated script, one line per turn of
//! the conversation, and presses option buttons that send speech and
//! animation commands to the robot. Each command waits for the robot to
//! finish what it is doing and to acknowledge the new one before the next
//! goes out.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod robot;
pub mod script;
pub mod session;
pub mod testconfig;
pub mod ui;

// Re-export error types
pub use error::{Result, TeleopError};

pub use config::TeleopConfig;
pub use session::Session;
