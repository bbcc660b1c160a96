//! Scene charts: horizontal bars for the intro, scatter plots for the rest

use eframe::egui;
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::core::scenes::{BarChartView, ScatterView};
use crate::theme::colors;
use super::StoryApp;

impl StoryApp {
    pub(crate) fn render_bar_chart(&self, ui: &mut egui::Ui, view: &BarChartView) {
        ui.label(
            egui::RichText::new("Deaths per million, highest first")
                .color(colors::TEXT_MUTED)
                .size(14.0),
        );

        // Band 0 sits at the top of the chart, so flip the index for plot y.
        let n = view.bars.len();
        let bars: Vec<Bar> = view
            .bars
            .iter()
            .enumerate()
            .map(|(i, b)| {
                Bar::new((n - 1 - i) as f64, b.deaths)
                    .name(&b.country)
                    .width(1.0 - view.y.padding)
                    .fill(colors::BAR)
            })
            .collect();

        let labels: Vec<String> = view.bars.iter().map(|b| b.country.clone()).collect();

        Plot::new("intro_bars")
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(0.0)
            .include_x(view.x.domain[1])
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 || idx as usize >= n {
                    return String::new();
                }
                labels[n - 1 - idx as usize].clone()
            })
            .label_formatter(|name, value| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{}: {:.1}", name, value.x)
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().color(colors::BAR));
            });
    }

    pub(crate) fn render_scatter(&self, ui: &mut egui::Ui, view: &ScatterView) {
        ui.label(
            egui::RichText::new(format!("{} vs {}", view.y_label, view.x_label))
                .color(colors::TEXT_MUTED)
                .size(14.0),
        );

        let regular: Vec<[f64; 2]> = view
            .points
            .iter()
            .filter(|p| !p.highlighted)
            .map(|p| [p.value, p.deaths])
            .collect();
        let highlighted: Vec<[f64; 2]> = view
            .points
            .iter()
            .filter(|p| p.highlighted)
            .map(|p| [p.value, p.deaths])
            .collect();

        // Annotations carry pixel offsets; convert them back to data units.
        let notes: Vec<([f64; 2], [f64; 2], String)> = view
            .annotations
            .iter()
            .map(|a| {
                let anchor = [view.x.invert(a.x), view.y.invert(a.y)];
                let text_at = [view.x.invert(a.x + a.dx), view.y.invert(a.y + a.dy)];
                (anchor, text_at, format!("{}\n{}", a.title, a.label))
            })
            .collect();

        let x_label = view.x_label.clone();
        Plot::new("scatter")
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(view.x.domain[0])
            .include_x(view.x.domain[1])
            .include_y(view.y.domain[0])
            .include_y(view.y.domain[1])
            .x_axis_label(view.x_label.clone())
            .y_axis_label(view.y_label.clone())
            .label_formatter(move |_name, value| {
                format!("{}={:.2}\ndeaths={:.1}", x_label, value.x, value.y)
            })
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(regular))
                        .color(colors::POINT)
                        .radius(3.0)
                        .filled(true),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(highlighted))
                        .color(colors::HIGHLIGHT)
                        .radius(5.0)
                        .filled(true),
                );
                for (anchor, text_at, label) in notes {
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![anchor, text_at]))
                            .color(colors::ANNOTATION)
                            .width(1.0),
                    );
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(text_at[0], text_at[1]),
                            egui::RichText::new(label).color(colors::ANNOTATION),
                        )
                        .anchor(egui::Align2::LEFT_BOTTOM),
                    );
                }
            });
    }
}
