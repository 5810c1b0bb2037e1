//! Robot status readout

use crate::robot::SharedRobotStatus;
use crate::ui::theme::Theme;
use egui::RichText;

/// Shows the three robot flags
///
/// With `allow_override`, the attention flag becomes a checkbox so a
/// rehearsal operator can play the participant.
pub struct StatusStrip<'a> {
    status: &'a SharedRobotStatus,
    theme: &'a Theme,
    allow_override: bool,
}

impl<'a> StatusStrip<'a> {
    pub fn new(status: &'a SharedRobotStatus, theme: &'a Theme) -> Self {
        Self {
            status,
            theme,
            allow_override: false,
        }
    }

    pub fn allow_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let snapshot = self.status.snapshot();

        ui.horizontal(|ui| {
            self.flag(ui, "Sound", snapshot.is_playing_sound, "playing", "quiet");
            ui.separator();
            self.flag(ui, "Motion", snapshot.is_doing_motion, "moving", "still");
            ui.separator();

            if self.allow_override {
                let mut attending = snapshot.participant_attending;
                if ui.checkbox(&mut attending, "Participant attending").changed() {
                    self.status.set_participant_attending(attending);
                }
            } else {
                let (text, color) = if snapshot.participant_attending {
                    ("Participant attending", self.theme.text_secondary)
                } else {
                    ("Participant NOT attending", self.theme.static_redirect)
                };
                ui.label(RichText::new(text).size(12.0).color(color));
            }
        });
    }

    fn flag(&self, ui: &mut egui::Ui, name: &str, on: bool, on_text: &str, off_text: &str) {
        let (text, color) = if on {
            (on_text, self.theme.warning)
        } else {
            (off_text, self.theme.text_muted)
        };
        ui.label(
            RichText::new(format!("{}: {}", name, text))
                .size(12.0)
                .family(egui::FontFamily::Monospace)
                .color(color),
        );
    }
}
