use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Source rows
// ---------------------------------------------------------------------------

/// One row of the census table. Monetary and count columns are optional
/// because malformed cells are coerced to missing at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyNeighborhoodRecord {
    pub year: i32,
    pub neighborhood: String,
    pub sale_price_sqr_foot: Option<f64>,
    pub housing_units: Option<f64>,
    pub gross_rent: Option<f64>,
}

/// One row of the coordinates table.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodCoordinate {
    pub neighborhood: String,
    pub lat: f64,
    pub lon: f64,
}

/// Selects one of the three numeric columns of a [`YearlyNeighborhoodRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    SalePricePerSqft,
    HousingUnits,
    GrossRent,
}

impl Metric {
    pub const ALL: [Metric; 3] = [
        Metric::SalePricePerSqft,
        Metric::HousingUnits,
        Metric::GrossRent,
    ];

    /// Read this metric from a record.
    pub fn value(self, record: &YearlyNeighborhoodRecord) -> Option<f64> {
        match self {
            Metric::SalePricePerSqft => record.sale_price_sqr_foot,
            Metric::HousingUnits => record.housing_units,
            Metric::GrossRent => record.gross_rent,
        }
    }

    /// Column name in the source table.
    pub fn column(self) -> &'static str {
        match self {
            Metric::SalePricePerSqft => "sale_price_sqr_foot",
            Metric::HousingUnits => "housing_units",
            Metric::GrossRent => "gross_rent",
        }
    }

    /// Human-readable axis label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::SalePricePerSqft => "Avg. Sale Price per Square Foot",
            Metric::HousingUnits => "Average Housing Units",
            Metric::GrossRent => "Avg. Gross Rent",
        }
    }
}

// ---------------------------------------------------------------------------
// HousingDataset – both tables, loaded once
// ---------------------------------------------------------------------------

/// The two loaded tables plus the dropdown index. Never mutated after load.
#[derive(Debug, Clone, Default)]
pub struct HousingDataset {
    /// Census rows in source order.
    pub records: Vec<YearlyNeighborhoodRecord>,
    /// Coordinate rows in source order.
    pub coordinates: Vec<NeighborhoodCoordinate>,
    /// Sorted, deduplicated neighborhood names from `records`.
    pub neighborhoods: Vec<String>,
}

impl HousingDataset {
    pub fn new(
        records: Vec<YearlyNeighborhoodRecord>,
        coordinates: Vec<NeighborhoodCoordinate>,
    ) -> Self {
        let neighborhoods: Vec<String> = records
            .iter()
            .map(|r| r.neighborhood.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        HousingDataset {
            records,
            coordinates,
            neighborhoods,
        }
    }

    /// Number of census rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Coordinates for a neighborhood. The first matching row wins.
    pub fn coordinate_for(&self, neighborhood: &str) -> Option<&NeighborhoodCoordinate> {
        self.coordinates
            .iter()
            .find(|c| c.neighborhood == neighborhood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, name: &str) -> YearlyNeighborhoodRecord {
        YearlyNeighborhoodRecord {
            year,
            neighborhood: name.to_string(),
            sale_price_sqr_foot: None,
            housing_units: None,
            gross_rent: None,
        }
    }

    #[test]
    fn neighborhood_index_is_sorted_and_deduplicated() {
        let ds = HousingDataset::new(
            vec![
                record(2010, "Twin Peaks"),
                record(2010, "Bayview"),
                record(2011, "Twin Peaks"),
                record(2011, "Alamo Square"),
            ],
            Vec::new(),
        );
        assert_eq!(ds.neighborhoods, vec!["Alamo Square", "Bayview", "Twin Peaks"]);
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn metric_reads_matching_column() {
        let mut r = record(2012, "Marina");
        r.gross_rent = Some(2100.0);
        assert_eq!(Metric::GrossRent.value(&r), Some(2100.0));
        assert_eq!(Metric::SalePricePerSqft.value(&r), None);
    }
}
