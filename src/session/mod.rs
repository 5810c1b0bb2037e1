//! Session: cursor over the script plus the operator-facing controller

pub mod controller;
pub mod cursor;

pub use controller::Session;
pub use cursor::{Cursor, NavBlocked};
