//! Header bar: prev/next navigation, scene title and progress

use eframe::egui;
use crate::theme::colors;
use super::StoryApp;

impl StoryApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        let scene = self.slideshow.scene();
        let loaded = self.dataset.is_some();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(loaded && self.slideshow.has_prev(), egui::Button::new("prev"))
                .clicked()
            {
                self.prev();
            }
            if ui
                .add_enabled(loaded && self.slideshow.has_next(), egui::Button::new("next"))
                .clicked()
            {
                self.next();
            }

            ui.add_space(10.0);
            ui.label(egui::RichText::new(scene.title()).size(18.0).strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{}/{}",
                        self.slideshow.cursor() + 1,
                        self.slideshow.scene_count()
                    ))
                    .color(colors::TEXT_MUTED),
                );
                if let Some(ds) = &self.dataset {
                    ui.label(
                        egui::RichText::new(format!("{} records", ds.len()))
                            .color(colors::TEXT_MUTED),
                    );
                }
            });
        });
    }
}
