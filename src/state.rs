use std::path::PathBuf;

use crate::config::DashboardConfig;
use crate::dashboard::{CityTrendViews, NeighborhoodViews};
use crate::data::filter::{default_selection, is_known_neighborhood};
use crate::data::model::HousingDataset;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Introduction,
    CityTrends,
    NeighborhoodBreakdown,
    Map,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Introduction,
        Tab::CityTrends,
        Tab::NeighborhoodBreakdown,
        Tab::Map,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Introduction => "Introduction",
            Tab::CityTrends => "City Trends",
            Tab::NeighborhoodBreakdown => "Neighborhood Breakdown",
            Tab::Map => "Map",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Both tables, loaded once at startup.
    pub dataset: HousingDataset,

    /// Selection-independent charts.
    pub city: CityTrendViews,

    /// Current dropdown value.
    pub selected: Option<String>,

    /// Charts for `selected` (cached until the selection changes).
    pub neighborhood_views: Option<NeighborhoodViews>,

    pub active_tab: Tab,

    /// Image shown on the introduction tab, if configured.
    pub intro_image: Option<PathBuf>,
}

impl AppState {
    /// Build every selection-independent view and the views for the default
    /// dropdown value.
    pub fn new(dataset: HousingDataset, config: &DashboardConfig) -> Self {
        if dataset.is_empty() {
            log::warn!("Census table has no usable rows; every chart will be empty");
        }
        let city = CityTrendViews::build(&dataset, config.top_n);
        let mut state = AppState {
            dataset,
            city,
            selected: None,
            neighborhood_views: None,
            active_tab: Tab::Introduction,
            intro_image: config.intro_image.clone(),
        };
        if let Some(first) = default_selection(&state.dataset) {
            state.select_neighborhood(&first);
        }
        state
    }

    /// Apply a dropdown selection. Dependent charts are rebuilt only when the
    /// value actually changes.
    pub fn select_neighborhood(&mut self, name: &str) -> &NeighborhoodViews {
        let views = match self.neighborhood_views.take() {
            Some(views) if views.neighborhood == name => views,
            _ => {
                log::debug!("Neighborhood selection changed to {name:?}");
                if !is_known_neighborhood(&self.dataset, name) {
                    log::warn!("Unknown neighborhood {name:?}; its charts will be empty");
                }
                NeighborhoodViews::for_selection(&self.dataset, name)
            }
        };
        self.selected = Some(name.to_string());
        self.neighborhood_views.insert(views)
    }

    /// One-line summary for the top bar.
    pub fn summary(&self) -> String {
        let years = self.dataset.records.iter().map(|r| r.year);
        let span = match (years.clone().min(), years.max()) {
            (Some(lo), Some(hi)) => format!(", {lo}–{hi}"),
            _ => String::new(),
        };
        format!(
            "{} records, {} neighborhoods{span}",
            self.dataset.len(),
            self.dataset.neighborhoods.len()
        )
    }
}
