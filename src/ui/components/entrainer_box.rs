//! Entrainer controls, shown only when speech goes through the entrainer

use crate::session::Session;
use crate::ui::theme::Theme;
use egui::{Button, DragValue, RichText};

pub struct EntrainerBox<'a> {
    session: &'a mut Session,
    theme: &'a Theme,
}

impl<'a> EntrainerBox<'a> {
    pub fn new(session: &'a mut Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let mut settings = self.session.entrain();

        ui.group(|ui| {
            ui.label(RichText::new("Entrainer").strong());

            if ui.checkbox(&mut settings.entrain, "Entrain?").changed() {
                self.session.set_entrain(settings.entrain);
            }

            ui.horizontal(|ui| {
                ui.label("Speaker's age:");
                let age = ui.add(
                    DragValue::new(&mut settings.speaker_age)
                        .range(0..=120)
                        .suffix(" years"),
                );
                if age.changed() {
                    self.session.set_speaker_age(settings.speaker_age);
                }
            });

            ui.add_space(self.theme.spacing_sm);
            if ui.add(Button::new("PARTICIPANT TURN")).clicked() {
                self.session.send_participant_turn();
            }
        });
    }
}
