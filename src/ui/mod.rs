//! UI components and application module
//!
//! The egui panel over a [`Session`](crate::session::Session). All decisions
//! live in the session; this module only draws and forwards clicks.

mod app;
pub mod components;
mod theme;

pub use app::TeleopApp;
pub use components::{EntrainerBox, NavBar, OptionList, ScriptPicker, StaticPanel, StatusStrip};
pub use theme::Theme;
