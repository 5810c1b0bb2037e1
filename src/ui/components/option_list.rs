//! Option buttons for the current script line

use crate::session::Session;
use crate::ui::theme::Theme;
use egui::{Button, RichText};

/// One button per configured option slot
///
/// Slot 0 is drawn green: pressing it auto-advances the script.
pub struct OptionList<'a> {
    session: &'a mut Session,
    theme: &'a Theme,
}

impl<'a> OptionList<'a> {
    pub fn new(session: &'a mut Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let enabled = self.session.has_script() && !self.session.is_busy();
        let width = ui.available_width();
        let mut pressed = None;

        for (slot, option) in self.session.options().iter().enumerate() {
            let mut text = RichText::new(&option.label).size(16.0);
            if slot == 0 {
                text = text.color(self.theme.advance);
            }
            let button = Button::new(text).min_size(egui::vec2(width, 36.0));
            if ui.add_enabled(enabled, button).clicked() {
                pressed = Some(slot);
            }
        }

        if let Some(slot) = pressed {
            self.session.press_option(slot);
        }
    }
}
