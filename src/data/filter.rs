use super::model::{HousingDataset, YearlyNeighborhoodRecord};

// ---------------------------------------------------------------------------
// Neighborhood selection filter
// ---------------------------------------------------------------------------

/// Return the census rows whose neighborhood equals `name` exactly, in
/// source order.
///
/// * Matching is case- and whitespace-sensitive; there is no fuzzy matching.
/// * An unknown name yields an empty Vec, never an error.
pub fn neighborhood_rows<'a>(
    dataset: &'a HousingDataset,
    name: &str,
) -> Vec<&'a YearlyNeighborhoodRecord> {
    dataset
        .records
        .iter()
        .filter(|r| r.neighborhood == name)
        .collect()
}

/// Whether `name` appears in the dropdown index.
pub fn is_known_neighborhood(dataset: &HousingDataset, name: &str) -> bool {
    dataset
        .neighborhoods
        .binary_search_by(|n| n.as_str().cmp(name))
        .is_ok()
}

/// Initial dropdown value: the first neighborhood in sorted order.
pub fn default_selection(dataset: &HousingDataset) -> Option<String> {
    dataset.neighborhoods.first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> HousingDataset {
        let rows = [
            (2010, "Noe Valley"),
            (2010, "Marina"),
            (2011, "Noe Valley"),
            (2011, "noe valley"),
        ];
        HousingDataset::new(
            rows.iter()
                .map(|&(year, name)| YearlyNeighborhoodRecord {
                    year,
                    neighborhood: name.to_string(),
                    sale_price_sqr_foot: None,
                    housing_units: None,
                    gross_rent: Some(1000.0),
                })
                .collect(),
            Vec::new(),
        )
    }

    #[test]
    fn exact_match_only() {
        let ds = dataset();
        let rows = neighborhood_rows(&ds, "Noe Valley");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.neighborhood == "Noe Valley"));
        assert_eq!(rows[0].year, 2010);
        assert_eq!(rows[1].year, 2011);
    }

    #[test]
    fn unknown_name_is_empty_not_error() {
        let ds = dataset();
        assert!(neighborhood_rows(&ds, "Atlantis").is_empty());
        assert!(!is_known_neighborhood(&ds, "Atlantis"));
        assert!(is_known_neighborhood(&ds, "Marina"));
    }

    #[test]
    fn default_is_first_sorted_name() {
        assert_eq!(default_selection(&dataset()).as_deref(), Some("Marina"));
        assert_eq!(default_selection(&HousingDataset::default()), None);
    }
}
