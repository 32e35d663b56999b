use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoints, Points, VLine};

use crate::charts::{ChartBody, ChartSpec};

// ---------------------------------------------------------------------------
// ChartSpec renderer
// ---------------------------------------------------------------------------

/// Render one chart at its fixed size (shrunk to the available width).
pub fn chart(ui: &mut Ui, spec: &ChartSpec) {
    ui.strong(spec.title.as_str());
    if spec.is_empty() {
        ui.label(RichText::new("No data for this selection.").italics());
    }

    let mut plot = Plot::new(spec.id)
        .width(spec.size[0].min(ui.available_width()))
        .height(spec.size[1])
        .x_axis_label(spec.x_label.as_str())
        .y_axis_label(spec.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    if !matches!(spec.body, ChartBody::Bubbles(_)) {
        plot = plot.legend(Legend::default());
    }
    if let Some((lo, hi)) = spec.y_range {
        plot = plot.include_y(lo).include_y(hi);
    }
    if !spec.x_categories.is_empty() {
        let categories = spec.x_categories.clone();
        plot = plot.x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            category_label(&categories, mark.value)
        });
    }

    // Bars start at the bottom of a forced range so the range is not pulled
    // back down to zero.
    let bar_base = spec.y_range.map(|(lo, _)| lo);

    plot.show(ui, |plot_ui| match &spec.body {
        ChartBody::Bars(series) => {
            for s in series {
                let bars: Vec<Bar> = s
                    .bars
                    .iter()
                    .map(|&[x, y]| {
                        let bar = match bar_base {
                            Some(base) => Bar::new(x, y - base).base_offset(base),
                            None => Bar::new(x, y),
                        };
                        bar.width(s.bar_width)
                            .fill(s.color)
                            .name(bar_label(&spec.x_categories, x, y))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&s.name).color(s.color));
            }
        }
        ChartBody::Lines(series) => {
            for s in series {
                let points = PlotPoints::from(s.points.clone());
                plot_ui.line(Line::new(points).name(&s.name).color(s.color).width(2.0));
            }
        }
        ChartBody::Parallel { axes, lines } => {
            for i in 0..axes.len() {
                plot_ui.vline(VLine::new(i as f64).color(Color32::GRAY).width(1.0));
            }
            for s in lines {
                let points = PlotPoints::from(s.points.clone());
                plot_ui.line(Line::new(points).name(&s.name).color(s.color).width(1.5));
            }
        }
        ChartBody::Bubbles(bubbles) => {
            for b in bubbles {
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[b.lon, b.lat]]))
                        .name(&b.hover)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(b.radius)
                        .color(b.color),
                );
            }
        }
    });

    if !spec.color_legend.is_empty() {
        color_legend(ui, &spec.color_legend);
    }
    ui.add_space(12.0);
}

fn color_legend(ui: &mut Ui, entries: &[(String, Color32)]) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Avg. gross rent:");
        for (label, color) in entries {
            ui.label(RichText::new("●").color(*color));
            ui.label(label.as_str());
        }
    });
}

/// Label for a categorical x position; empty between categories.
pub fn category_label(categories: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

fn bar_label(categories: &[String], x: f64, y: f64) -> String {
    if categories.is_empty() {
        format!("{x:.0}: {y:.0}")
    } else {
        format!("{}: {y:.2}", category_label(categories, x))
    }
}

/// Placeholder shown when a tab has nothing loaded.
pub fn empty_notice(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(RichText::new(text).weak());
    });
}
