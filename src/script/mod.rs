//! Script files: the per-line script, the static options, and the picker catalog

pub mod catalog;
pub mod static_options;
pub mod store;

pub use catalog::list_scripts;
pub use static_options::{StaticOption, StaticScript};
pub use store::{Script, ScriptLine, ScriptOption, ABSENT};
