//! Always-available options

use crate::session::Session;
use crate::ui::theme::Theme;
use egui::{Button, RichText, ScrollArea};

/// Static option buttons, colored by the latest attention reading
pub struct StaticPanel<'a> {
    session: &'a mut Session,
    theme: &'a Theme,
}

impl<'a> StaticPanel<'a> {
    pub fn new(session: &'a mut Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let color = self.theme.static_color(self.session.tone());
        let enabled = !self.session.is_busy();
        let width = ui.available_width();
        let mut pressed = None;

        if self.session.static_options().is_empty() {
            ui.label(RichText::new("No static script loaded").color(self.theme.text_muted));
            return;
        }

        ScrollArea::vertical()
            .id_salt("static_options")
            .show(ui, |ui| {
                for (index, option) in self.session.static_options().iter().enumerate() {
                    let button = Button::new(RichText::new(&option.label).color(color))
                        .min_size(egui::vec2(width, 28.0));
                    if ui.add_enabled(enabled, button).clicked() {
                        pressed = Some(index);
                    }
                }
            });

        if let Some(index) = pressed {
            self.session.press_static(index);
        }
    }
}
