//! UI components module
//!
//! Each component borrows the session (and theme) for one frame and maps
//! clicks straight onto session operations.

pub mod entrainer_box;
pub mod nav_bar;
pub mod option_list;
pub mod script_picker;
pub mod static_panel;
pub mod status_strip;

pub use entrainer_box::EntrainerBox;
pub use nav_bar::NavBar;
pub use option_list::OptionList;
pub use script_picker::ScriptPicker;
pub use static_panel::StaticPanel;
pub use status_strip::StatusStrip;
