use std::collections::{BTreeMap, HashMap};

use super::filter::neighborhood_rows;
use super::model::{HousingDataset, Metric, YearlyNeighborhoodRecord};

// ---------------------------------------------------------------------------
// Derived tables
// ---------------------------------------------------------------------------

/// A single (year, value) point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Mean of each metric column for one year. `None` when every value in the
/// group was missing.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyMeans {
    pub year: i32,
    pub sale_price_sqr_foot: Option<f64>,
    pub housing_units: Option<f64>,
    pub gross_rent: Option<f64>,
}

impl YearlyMeans {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::SalePricePerSqft => self.sale_price_sqr_foot,
            Metric::HousingUnits => self.housing_units,
            Metric::GrossRent => self.gross_rent,
        }
    }
}

/// Mean of each metric column for one neighborhood across all years.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodMeans {
    pub neighborhood: String,
    pub sale_price_sqr_foot: Option<f64>,
    pub housing_units: Option<f64>,
    pub gross_rent: Option<f64>,
}

impl NeighborhoodMeans {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::SalePricePerSqft => self.sale_price_sqr_foot,
            Metric::HousingUnits => self.housing_units,
            Metric::GrossRent => self.gross_rent,
        }
    }
}

/// Neighborhood means joined with coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub neighborhood: String,
    pub lat: f64,
    pub lon: f64,
    pub sale_price_sqr_foot: Option<f64>,
    pub housing_units: Option<f64>,
    pub gross_rent: f64,
}

/// One neighborhood on the parallel-coordinates chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelRow {
    pub neighborhood: String,
    /// Raw means, in [`ParallelCoordinates::axes`] order.
    pub raw: Vec<f64>,
    /// Means scaled to `[0, 1]` per axis.
    pub scaled: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallelCoordinates {
    pub axes: Vec<Metric>,
    pub rows: Vec<ParallelRow>,
}

// ---------------------------------------------------------------------------
// Mean accumulator
// ---------------------------------------------------------------------------

/// Running sums per metric. Missing cells are skipped per column, so a row
/// with no price still counts towards rent and housing units.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sums: [f64; 3],
    counts: [usize; 3],
}

impl MeanAccumulator {
    fn push(&mut self, record: &YearlyNeighborhoodRecord) {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            if let Some(v) = metric.value(record) {
                self.sums[i] += v;
                self.counts[i] += 1;
            }
        }
    }

    fn mean(&self, metric: Metric) -> Option<f64> {
        let i = Metric::ALL.iter().position(|m| *m == metric)?;
        (self.counts[i] > 0).then(|| self.sums[i] / self.counts[i] as f64)
    }
}

fn group_by_year<'a>(
    records: impl IntoIterator<Item = &'a YearlyNeighborhoodRecord>,
) -> Vec<YearlyMeans> {
    let mut groups: BTreeMap<i32, MeanAccumulator> = BTreeMap::new();
    for r in records {
        groups.entry(r.year).or_default().push(r);
    }
    groups
        .into_iter()
        .map(|(year, acc)| YearlyMeans {
            year,
            sale_price_sqr_foot: acc.mean(Metric::SalePricePerSqft),
            housing_units: acc.mean(Metric::HousingUnits),
            gross_rent: acc.mean(Metric::GrossRent),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Mean housing units per year, ascending by year. Years with no housing
/// unit values are omitted.
pub fn housing_units_per_year(dataset: &HousingDataset) -> Vec<YearValue> {
    group_by_year(&dataset.records)
        .into_iter()
        .filter_map(|m| {
            m.housing_units.map(|value| YearValue {
                year: m.year,
                value,
            })
        })
        .collect()
}

/// City-wide mean sale price and gross rent per year. The rent and price
/// charts both read from this one table.
pub fn price_and_rent_per_year(dataset: &HousingDataset) -> Vec<YearlyMeans> {
    group_by_year(&dataset.records)
}

/// Per-year means for a single neighborhood. Unknown names give an empty Vec.
pub fn neighborhood_yearly_means(dataset: &HousingDataset, name: &str) -> Vec<YearlyMeans> {
    group_by_year(neighborhood_rows(dataset, name))
}

/// Means per neighborhood across all years, in order of first appearance in
/// the census table.
pub fn neighborhood_means(dataset: &HousingDataset) -> Vec<NeighborhoodMeans> {
    let mut order: Vec<(String, MeanAccumulator)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for r in &dataset.records {
        let slot = *index.entry(r.neighborhood.as_str()).or_insert_with(|| {
            order.push((r.neighborhood.clone(), MeanAccumulator::default()));
            order.len() - 1
        });
        order[slot].1.push(r);
    }

    order
        .into_iter()
        .map(|(neighborhood, acc)| NeighborhoodMeans {
            neighborhood,
            sale_price_sqr_foot: acc.mean(Metric::SalePricePerSqft),
            housing_units: acc.mean(Metric::HousingUnits),
            gross_rent: acc.mean(Metric::GrossRent),
        })
        .collect()
}

/// The `n` neighborhoods with the highest mean sale price per square foot,
/// descending. The sort is stable, so ties keep first-appearance order.
/// Neighborhoods without any price value are left out.
pub fn top_most_expensive_neighborhoods(dataset: &HousingDataset, n: usize) -> Vec<NeighborhoodMeans> {
    let mut priced: Vec<(f64, NeighborhoodMeans)> = neighborhood_means(dataset)
        .into_iter()
        .filter_map(|m| m.sale_price_sqr_foot.map(|p| (p, m)))
        .collect();
    priced.sort_by(|a, b| b.0.total_cmp(&a.0));
    priced.truncate(n);
    priced.into_iter().map(|(_, m)| m).collect()
}

/// Neighborhood means inner-joined with the coordinate table. Neighborhoods
/// with no coordinates, or no rent to size the bubble by, are dropped.
pub fn neighborhood_map(dataset: &HousingDataset) -> Vec<MapPoint> {
    neighborhood_means(dataset)
        .into_iter()
        .filter_map(|m| {
            let coord = dataset.coordinate_for(&m.neighborhood)?;
            let gross_rent = m.gross_rent?;
            Some(MapPoint {
                lat: coord.lat,
                lon: coord.lon,
                neighborhood: m.neighborhood,
                sale_price_sqr_foot: m.sale_price_sqr_foot,
                housing_units: m.housing_units,
                gross_rent,
            })
        })
        .collect()
}

/// Top-`n` neighborhoods with every metric scaled to `[0, 1]` per axis.
/// Rows missing any metric are skipped; a constant axis maps to 0.5.
pub fn parallel_coordinates(dataset: &HousingDataset, n: usize) -> ParallelCoordinates {
    let axes = Metric::ALL.to_vec();
    let complete: Vec<(String, Vec<f64>)> = top_most_expensive_neighborhoods(dataset, n)
        .into_iter()
        .filter_map(|m| {
            let raw = axes
                .iter()
                .map(|&metric| m.get(metric))
                .collect::<Option<Vec<f64>>>()?;
            Some((m.neighborhood, raw))
        })
        .collect();

    let bounds: Vec<(f64, f64)> = (0..axes.len())
        .map(|i| {
            complete.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, raw)| {
                (lo.min(raw[i]), hi.max(raw[i]))
            })
        })
        .collect();

    let rows = complete
        .into_iter()
        .map(|(neighborhood, raw)| {
            let scaled = raw
                .iter()
                .zip(&bounds)
                .map(|(&v, &(lo, hi))| {
                    let range = hi - lo;
                    if range.abs() < f64::EPSILON {
                        0.5
                    } else {
                        (v - lo) / range
                    }
                })
                .collect();
            ParallelRow {
                neighborhood,
                raw,
                scaled,
            }
        })
        .collect();

    ParallelCoordinates { axes, rows }
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator). A single value has a
/// deviation of 0.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if values.len() < 2 {
        return Some(0.0);
    }
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// `[min - std, max + std]` over `values`; keeps a near-flat series from
/// filling the whole plot height.
pub fn std_padded_range(values: &[f64]) -> Option<(f64, f64)> {
    let std = sample_std_dev(values)?;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some((min - std, max + std))
}
