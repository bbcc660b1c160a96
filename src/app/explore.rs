//! Explorer selector and statistics panel

use eframe::egui;
use crate::core::scenes::{ExploreDetails, SceneView, Selection};
use crate::theme::colors;
use super::StoryApp;

impl StoryApp {
    pub(crate) fn render_explore_controls(&mut self, ui: &mut egui::Ui) {
        let state = self.slideshow.explore().clone();
        let current = state
            .country
            .clone()
            .unwrap_or_else(|| state.metric.label().to_string());

        let mut chosen: Option<Selection> = None;
        let mut clear = false;
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Compare against:").color(colors::TEXT_SECONDARY));
            egui::ComboBox::from_id_salt("explore_select")
                .selected_text(current)
                .width(260.0)
                .show_ui(ui, |ui| {
                    egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                        for option in &self.options {
                            let selected = match option {
                                Selection::Metric(m) => state.country.is_none() && *m == state.metric,
                                Selection::Country(c) => state.country.as_deref() == Some(c.as_str()),
                            };
                            if ui.selectable_label(selected, option.label()).clicked() {
                                chosen = Some(option.clone());
                            }
                        }
                    });
                });

            if state.country.is_some() && ui.button("clear").clicked() {
                clear = true;
            }
        });

        if clear {
            self.slideshow.clear_country();
            self.rerender();
        }
        if let Some(selection) = chosen {
            self.select(selection);
        }

        let Some(SceneView::Scatter(view)) = &self.view else {
            return;
        };
        let Some(panel) = &view.explore else {
            return;
        };

        let group_frame = egui::Frame::new()
            .stroke(egui::Stroke::new(1.0, colors::TEXT_MUTED))
            .corner_radius(4.0)
            .inner_margin(6.0);

        group_frame.show(ui, |ui| match &panel.details {
            ExploreDetails::Prompt => {
                ui.label(
                    egui::RichText::new("Select a country to see its statistics.")
                        .color(colors::TEXT_MUTED),
                );
            }
            ExploreDetails::Stats(lines) => {
                if let Some(country) = &panel.country {
                    ui.label(egui::RichText::new(country).strong());
                }
                for line in lines {
                    ui.label(line);
                }
            }
            ExploreDetails::NoData(msg) => {
                ui.label(egui::RichText::new(msg).color(colors::ANNOTATION));
            }
        });
    }
}
