//! Dropdown of script files

use egui::ComboBox;
use std::path::{Path, PathBuf};

/// Combo box over a list of script paths
///
/// `show` returns the path the operator picked this frame, if any.
pub struct ScriptPicker<'a> {
    id: &'a str,
    choices: &'a [PathBuf],
    current: Option<&'a Path>,
}

impl<'a> ScriptPicker<'a> {
    pub fn new(id: &'a str, choices: &'a [PathBuf], current: Option<&'a Path>) -> Self {
        Self {
            id,
            choices,
            current,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<PathBuf> {
        let selected_text = self
            .current
            .map(display_name)
            .unwrap_or_else(|| "(none)".to_string());
        let mut picked = None;

        ComboBox::from_id_salt(self.id)
            .selected_text(selected_text)
            .width(220.0)
            .show_ui(ui, |ui| {
                if self.choices.is_empty() {
                    ui.label("No scripts found");
                }
                for path in self.choices {
                    let is_current = self.current == Some(path.as_path());
                    if ui.selectable_label(is_current, display_name(path)).clicked() {
                        picked = Some(path.clone());
                    }
                }
            });

        picked
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
