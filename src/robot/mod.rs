//! Robot side of the panel: outbound link, inbound status, and backends

pub mod bridge;
pub mod link;
pub mod sim;
pub mod status;

pub use bridge::{read_status_updates, spawn_status_reader};
pub use link::{ChannelLink, JsonLinesLink, RobotLink, RobotMessage};
pub use sim::{SimConfig, SimulatedRobot};
pub use status::{RobotStatus, SharedRobotStatus, StatusCondition, StatusSource, StatusUpdate};
