use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::{AppState, Tab};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar – tab strip and dataset summary
// ---------------------------------------------------------------------------

/// Render the tab strip.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.label());
        }

        ui.separator();
        ui.label(RichText::new(state.summary()).weak());
    });
}

/// Render whichever tab is active.
pub fn active_tab(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.active_tab {
            Tab::Introduction => introduction(ui, state),
            Tab::CityTrends => city_trends(ui, state),
            Tab::NeighborhoodBreakdown => neighborhood_breakdown(ui, state),
            Tab::Map => map(ui, state),
        });
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

fn introduction(ui: &mut Ui, state: &AppState) {
    ui.heading("San Francisco Housing Rental Analysis");
    ui.add_space(8.0);
    ui.label(
        "This dashboard explores housing units, gross rent and sale price per \
         square foot across San Francisco neighborhoods between 2010 and 2016.",
    );
    ui.label(
        "City Trends shows the yearly city-wide averages. Neighborhood Breakdown \
         ranks the most expensive neighborhoods and follows a single neighborhood \
         over time. Map places every neighborhood by its average gross rent.",
    );
    ui.add_space(8.0);
    ui.label(RichText::new(state.summary()).strong());

    if let Some(path) = &state.intro_image {
        ui.add_space(8.0);
        ui.add(
            egui::Image::new(format!("file://{}", path.display()))
                .max_width(ui.available_width().min(800.0))
                .corner_radius(4.0),
        );
    }
}

fn city_trends(ui: &mut Ui, state: &AppState) {
    plot::chart(ui, &state.city.housing_units);
    ui.separator();
    ui.columns(2, |cols: &mut [Ui]| {
        plot::chart(&mut cols[0], &state.city.gross_rent);
        plot::chart(&mut cols[1], &state.city.sale_price);
    });
}

fn neighborhood_breakdown(ui: &mut Ui, state: &mut AppState) {
    plot::chart(ui, &state.city.top_neighborhoods);
    plot::chart(ui, &state.city.parallel_coordinates);
    ui.separator();

    if state.dataset.neighborhoods.is_empty() {
        plot::empty_notice(ui, "No neighborhoods loaded.");
        return;
    }

    neighborhood_dropdown(ui, state);
    ui.add_space(4.0);

    let Some(views) = &state.neighborhood_views else {
        return;
    };
    for pair in views.charts().chunks(2) {
        ui.columns(pair.len(), |cols: &mut [Ui]| {
            for (col, spec) in cols.iter_mut().zip(pair) {
                plot::chart(col, spec);
            }
        });
    }
}

/// The single dashboard control: neighborhood names, sorted and deduplicated.
fn neighborhood_dropdown(ui: &mut Ui, state: &mut AppState) {
    let current = state.selected.clone().unwrap_or_default();
    let mut picked: Option<String> = None;

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Neighborhood");
        egui::ComboBox::from_id_salt("neighborhood")
            .selected_text(current.as_str())
            .height(400.0)
            .show_ui(ui, |ui: &mut Ui| {
                for name in &state.dataset.neighborhoods {
                    if ui.selectable_label(current == *name, name.as_str()).clicked() {
                        picked = Some(name.clone());
                    }
                }
            });
    });

    if let Some(name) = picked {
        state.select_neighborhood(&name);
    }
}

fn map(ui: &mut Ui, state: &AppState) {
    plot::chart(ui, &state.city.map);
}
