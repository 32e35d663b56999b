use eframe::egui::Color32;

use crate::color::{generate_palette, ContinuousScale, PRICE_COLOR, RENT_COLOR, UNITS_COLOR};
use crate::data::aggregate::{
    std_padded_range, MapPoint, NeighborhoodMeans, ParallelCoordinates, YearValue, YearlyMeans,
};
use crate::data::model::Metric;

// ---------------------------------------------------------------------------
// Chart description (renderer independent)
// ---------------------------------------------------------------------------

/// A fully styled chart, ready for the plot renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Stable id used as the egui plot id.
    pub id: &'static str,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fixed canvas size in points: `[width, height]`.
    pub size: [f32; 2],
    /// Forced y-axis range; `None` lets the plot auto-fit.
    pub y_range: Option<(f64, f64)>,
    /// Labels for integer x positions on categorical charts.
    pub x_categories: Vec<String>,
    /// Colour key drawn under the chart (continuous scales only).
    pub color_legend: Vec<(String, Color32)>,
    pub body: ChartBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    /// One series is a plain bar chart; several form a grouped bar chart.
    Bars(Vec<BarSeries>),
    Lines(Vec<LineSeries>),
    /// Geo scatter: x is longitude, y is latitude.
    Bubbles(Vec<Bubble>),
    /// Parallel coordinates: x is the axis index, y is the scaled value.
    Parallel { axes: Vec<String>, lines: Vec<LineSeries> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub color: Color32,
    pub bar_width: f64,
    /// `(x, y)` per bar.
    pub bars: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub label: String,
    pub lon: f64,
    pub lat: f64,
    pub radius: f32,
    pub color: Color32,
    pub hover: String,
}

impl ChartSpec {
    fn new(
        id: &'static str,
        title: impl Into<String>,
        x_label: &str,
        y_label: &str,
        size: [f32; 2],
        body: ChartBody,
    ) -> Self {
        ChartSpec {
            id,
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            size,
            y_range: None,
            x_categories: Vec::new(),
            color_legend: Vec::new(),
            body,
        }
    }

    /// True when there is nothing to draw (e.g. an unknown neighborhood).
    pub fn is_empty(&self) -> bool {
        match &self.body {
            ChartBody::Bars(series) => series.iter().all(|s| s.bars.is_empty()),
            ChartBody::Lines(series) => series.iter().all(|s| s.points.is_empty()),
            ChartBody::Bubbles(bubbles) => bubbles.is_empty(),
            ChartBody::Parallel { lines, .. } => lines.is_empty(),
        }
    }
}

fn year_points(means: &[YearlyMeans], metric: Metric) -> Vec<[f64; 2]> {
    means
        .iter()
        .filter_map(|m| m.get(metric).map(|v| [m.year as f64, v]))
        .collect()
}

fn line(name: &str, color: Color32, points: Vec<[f64; 2]>) -> LineSeries {
    LineSeries {
        name: name.to_string(),
        color,
        points,
    }
}

// ---------------------------------------------------------------------------
// City-wide trends
// ---------------------------------------------------------------------------

/// Bar chart of mean housing units per year. The y-axis is widened by one
/// sample standard deviation past the observed min and max.
pub fn housing_units_chart(units: &[YearValue]) -> ChartSpec {
    let values: Vec<f64> = units.iter().map(|u| u.value).collect();
    let mut spec = ChartSpec::new(
        "housing_units_per_year",
        "Housing Units in San Francisco from 2010-2016",
        "Year",
        Metric::HousingUnits.label(),
        [700.0, 500.0],
        ChartBody::Bars(vec![BarSeries {
            name: "housing_units".to_string(),
            color: UNITS_COLOR,
            bar_width: 0.8,
            bars: units.iter().map(|u| [u.year as f64, u.value]).collect(),
        }]),
    );
    spec.y_range = std_padded_range(&values);
    spec
}

/// Line chart of the city-wide mean sale price per square foot.
pub fn sale_price_chart(means: &[YearlyMeans]) -> ChartSpec {
    ChartSpec::new(
        "sale_price_per_year",
        "Avg. Sales Price per Sq. Foot in San Francisco over Time",
        "Year",
        "Avg. Sale Price per Square Foot",
        [800.0, 500.0],
        ChartBody::Lines(vec![line(
            "sale_price_sqr_foot",
            PRICE_COLOR,
            year_points(means, Metric::SalePricePerSqft),
        )]),
    )
}

/// Line chart of the city-wide mean gross rent.
pub fn gross_rent_chart(means: &[YearlyMeans]) -> ChartSpec {
    ChartSpec::new(
        "gross_rent_per_year",
        "Avg. San Francisco Rent over Time",
        "Year",
        "Avg. Rent",
        [800.0, 500.0],
        ChartBody::Lines(vec![line(
            "gross_rent",
            RENT_COLOR,
            year_points(means, Metric::GrossRent),
        )]),
    )
}

// ---------------------------------------------------------------------------
// Neighborhood breakdown
// ---------------------------------------------------------------------------

/// Bar chart of the most expensive neighborhoods, one bar per category.
pub fn top_neighborhoods_chart(top: &[NeighborhoodMeans]) -> ChartSpec {
    let bars = top
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.sale_price_sqr_foot.map(|p| [i as f64, p]))
        .collect();
    let mut spec = ChartSpec::new(
        "top_expensive_neighborhoods",
        format!("Top {} Most Expensive Neighborhoods in San Francisco", top.len()),
        "Neighborhood",
        Metric::SalePricePerSqft.label(),
        [900.0, 500.0],
        ChartBody::Bars(vec![BarSeries {
            name: "sale_price_sqr_foot".to_string(),
            color: PRICE_COLOR,
            bar_width: 0.7,
            bars,
        }]),
    );
    spec.x_categories = top.iter().map(|m| m.neighborhood.clone()).collect();
    spec
}

/// Parallel-coordinates chart over the most expensive neighborhoods.
pub fn parallel_coordinates_chart(pc: &ParallelCoordinates) -> ChartSpec {
    let palette = generate_palette(pc.rows.len());
    let lines = pc
        .rows
        .iter()
        .zip(palette)
        .map(|(row, color)| {
            let points = row
                .scaled
                .iter()
                .enumerate()
                .map(|(i, &v)| [i as f64, v])
                .collect();
            line(&row.neighborhood, color, points)
        })
        .collect();
    let axes: Vec<String> = pc.axes.iter().map(|m| m.column().to_string()).collect();

    let mut spec = ChartSpec::new(
        "parallel_coordinates",
        "Parallel Coordinates of the Most Expensive Neighborhoods",
        "Metric",
        "Scaled value",
        [900.0, 450.0],
        ChartBody::Parallel {
            axes: axes.clone(),
            lines,
        },
    );
    spec.x_categories = axes;
    spec.y_range = Some((0.0, 1.0));
    spec
}

/// Sale price per square foot over time for one neighborhood.
pub fn neighborhood_price_chart(name: &str, means: &[YearlyMeans]) -> ChartSpec {
    ChartSpec::new(
        "neighborhood_sale_price",
        format!("Avg. Sale Price per Sq. Foot in {name}"),
        "Year",
        Metric::SalePricePerSqft.label(),
        [800.0, 400.0],
        ChartBody::Lines(vec![line(
            "sale_price_sqr_foot",
            PRICE_COLOR,
            year_points(means, Metric::SalePricePerSqft),
        )]),
    )
}

/// Gross rent over time for one neighborhood.
pub fn neighborhood_rent_chart(name: &str, means: &[YearlyMeans]) -> ChartSpec {
    ChartSpec::new(
        "neighborhood_gross_rent",
        format!("Avg. Gross Rent in {name}"),
        "Year",
        Metric::GrossRent.label(),
        [800.0, 400.0],
        ChartBody::Lines(vec![line(
            "gross_rent",
            RENT_COLOR,
            year_points(means, Metric::GrossRent),
        )]),
    )
}

/// Sale price and gross rent on one line chart for one neighborhood.
pub fn neighborhood_price_rent_chart(name: &str, means: &[YearlyMeans]) -> ChartSpec {
    ChartSpec::new(
        "neighborhood_price_rent",
        format!("Sale Price and Rent over Time in {name}"),
        "Year",
        "Price / Rent",
        [800.0, 400.0],
        ChartBody::Lines(vec![
            line(
                "sale_price_sqr_foot",
                PRICE_COLOR,
                year_points(means, Metric::SalePricePerSqft),
            ),
            line("gross_rent", RENT_COLOR, year_points(means, Metric::GrossRent)),
        ]),
    )
}

/// Grouped bars comparing rent and sale price per year for one neighborhood.
pub fn rent_vs_sales_chart(name: &str, means: &[YearlyMeans]) -> ChartSpec {
    const GROUP_OFFSET: f64 = 0.2;
    let shifted = |metric, offset: f64| -> Vec<[f64; 2]> {
        year_points(means, metric)
            .into_iter()
            .map(|[x, y]| [x + offset, y])
            .collect()
    };
    ChartSpec::new(
        "rent_vs_sales",
        format!("Rent vs. Sale Price in {name}"),
        "Year",
        "Amount",
        [900.0, 400.0],
        ChartBody::Bars(vec![
            BarSeries {
                name: "gross_rent".to_string(),
                color: RENT_COLOR,
                bar_width: GROUP_OFFSET * 2.0,
                bars: shifted(Metric::GrossRent, -GROUP_OFFSET),
            },
            BarSeries {
                name: "sale_price_sqr_foot".to_string(),
                color: PRICE_COLOR,
                bar_width: GROUP_OFFSET * 2.0,
                bars: shifted(Metric::SalePricePerSqft, GROUP_OFFSET),
            },
        ]),
    )
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// Bubble map of neighborhoods; colour and size both follow mean gross rent.
pub fn neighborhood_map_chart(points: &[MapPoint]) -> ChartSpec {
    let scale =
        ContinuousScale::from_values(points.iter().map(|p| p.gross_rent)).with_radius(6.0, 24.0);
    let bubbles = points
        .iter()
        .map(|p| {
            let price = p
                .sale_price_sqr_foot
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "n/a".to_string());
            Bubble {
                label: p.neighborhood.clone(),
                lon: p.lon,
                lat: p.lat,
                radius: scale.radius_for(p.gross_rent),
                color: scale.color_for(p.gross_rent),
                hover: format!(
                    "{}\nAvg. gross rent: {:.0}\nAvg. sale price / sq ft: {price}",
                    p.neighborhood, p.gross_rent
                ),
            }
        })
        .collect();
    let mut spec = ChartSpec::new(
        "neighborhood_map",
        "Average Gross Rent by San Francisco Neighborhood",
        "Longitude",
        "Latitude",
        [900.0, 650.0],
        ChartBody::Bubbles(bubbles),
    );
    if !points.is_empty() {
        spec.color_legend = scale.legend_entries(5);
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    fn means(year: i32, price: Option<f64>, rent: Option<f64>) -> YearlyMeans {
        YearlyMeans {
            year,
            sale_price_sqr_foot: price,
            housing_units: None,
            gross_rent: rent,
        }
    }

    #[test]
    fn housing_units_range_is_padded_by_std() {
        let units = [
            YearValue { year: 2010, value: 100.0 },
            YearValue { year: 2011, value: 200.0 },
            YearValue { year: 2012, value: 300.0 },
        ];
        let spec = housing_units_chart(&units);
        // sample std of 100/200/300 is 100
        let (lo, hi) = spec.y_range.unwrap();
        assert!((lo - 0.0).abs() < 1e-9);
        assert!((hi - 400.0).abs() < 1e-9);
        assert_eq!(spec.size, [700.0, 500.0]);
        assert_eq!(spec.x_label, "Year");
    }

    #[test]
    fn missing_years_are_skipped_per_series() {
        let data = [
            means(2010, Some(300.0), Some(1200.0)),
            means(2011, None, Some(1500.0)),
        ];
        let spec = neighborhood_price_rent_chart("Marina", &data);
        let ChartBody::Lines(series) = &spec.body else {
            panic!("expected lines");
        };
        assert_eq!(series[0].points, vec![[2010.0, 300.0]]);
        assert_eq!(series[1].points, vec![[2010.0, 1200.0], [2011.0, 1500.0]]);
        assert!(spec.title.contains("Marina"));
    }

    #[test]
    fn grouped_bars_are_offset_around_the_year() {
        let spec = rent_vs_sales_chart("Marina", &[means(2014, Some(600.0), Some(3000.0))]);
        let ChartBody::Bars(series) = &spec.body else {
            panic!("expected bars");
        };
        assert_eq!(series.len(), 2);
        assert!((series[0].bars[0][0] - 2013.8).abs() < 1e-9);
        assert!((series[1].bars[0][0] - 2014.2).abs() < 1e-9);
    }

    #[test]
    fn empty_aggregation_gives_empty_chart() {
        assert!(neighborhood_rent_chart("Atlantis", &[]).is_empty());
        assert!(rent_vs_sales_chart("Atlantis", &[]).is_empty());
        assert!(neighborhood_map_chart(&[]).is_empty());
    }

    #[test]
    fn top_chart_labels_categories_in_order() {
        let top = vec![
            NeighborhoodMeans {
                neighborhood: "Union Square District".into(),
                sale_price_sqr_foot: Some(903.0),
                housing_units: None,
                gross_rent: None,
            },
            NeighborhoodMeans {
                neighborhood: "Merced Heights".into(),
                sale_price_sqr_foot: Some(788.8),
                housing_units: None,
                gross_rent: None,
            },
        ];
        let spec = top_neighborhoods_chart(&top);
        assert_eq!(spec.x_categories, vec!["Union Square District", "Merced Heights"]);
        let ChartBody::Bars(series) = &spec.body else {
            panic!("expected bars");
        };
        assert_eq!(series[0].bars, vec![[0.0, 903.0], [1.0, 788.8]]);
    }

    #[test]
    fn map_bubbles_grow_with_rent() {
        let points = [
            MapPoint {
                neighborhood: "Bayview".into(),
                lat: 37.73,
                lon: -122.39,
                sale_price_sqr_foot: None,
                housing_units: None,
                gross_rent: 1500.0,
            },
            MapPoint {
                neighborhood: "Pacific Heights".into(),
                lat: 37.79,
                lon: -122.43,
                sale_price_sqr_foot: Some(690.0),
                housing_units: None,
                gross_rent: 3500.0,
            },
        ];
        let spec = neighborhood_map_chart(&points);
        let ChartBody::Bubbles(bubbles) = &spec.body else {
            panic!("expected bubbles");
        };
        assert!(bubbles[1].radius > bubbles[0].radius);
        assert_ne!(bubbles[0].color, bubbles[1].color);
        assert!(bubbles[0].hover.contains("n/a"));
    }
}
