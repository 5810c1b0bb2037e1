//! Script navigation row

use crate::session::Session;
use crate::ui::theme::Theme;
use egui::{Button, RichText};

/// Back / pause / forward / jump buttons
pub struct NavBar<'a> {
    session: &'a mut Session,
    theme: &'a Theme,
}

impl<'a> NavBar<'a> {
    pub fn new(session: &'a mut Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let can_step = self.session.has_script() && !self.session.is_busy();

        ui.horizontal(|ui| {
            if ui.add_enabled(can_step, Button::new("<< back")).clicked() {
                self.session.back();
            }

            let pause = if self.session.is_paused() {
                RichText::new("-- unpause --").color(self.theme.paused)
            } else {
                RichText::new("-- pause --")
            };
            if ui.add(Button::new(pause)).clicked() {
                self.session.toggle_pause();
            }

            if ui.add_enabled(can_step, Button::new("forward >>")).clicked() {
                self.session.forward();
            }

            ui.add_space(self.theme.spacing);

            let start = RichText::new("[jump to start]").color(self.theme.text_muted);
            if ui.add_enabled(can_step, Button::new(start)).clicked() {
                self.session.jump_start();
            }

            let end = RichText::new("[jump to end]").color(self.theme.text_muted);
            if ui.add_enabled(can_step, Button::new(end)).clicked() {
                self.session.jump_end();
            }
        });
    }
}
