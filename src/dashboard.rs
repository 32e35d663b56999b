use crate::charts::{self, ChartSpec};
use crate::data::aggregate;
use crate::data::model::HousingDataset;

// ---------------------------------------------------------------------------
// View sets: what each tab draws
// ---------------------------------------------------------------------------

/// Charts that do not depend on the dropdown. Built once at startup.
#[derive(Debug, Clone)]
pub struct CityTrendViews {
    pub housing_units: ChartSpec,
    pub gross_rent: ChartSpec,
    pub sale_price: ChartSpec,
    pub top_neighborhoods: ChartSpec,
    pub parallel_coordinates: ChartSpec,
    pub map: ChartSpec,
}

impl CityTrendViews {
    pub fn build(dataset: &HousingDataset, top_n: usize) -> Self {
        let yearly = aggregate::price_and_rent_per_year(dataset);
        let top = aggregate::top_most_expensive_neighborhoods(dataset, top_n);
        CityTrendViews {
            housing_units: charts::housing_units_chart(&aggregate::housing_units_per_year(dataset)),
            gross_rent: charts::gross_rent_chart(&yearly),
            sale_price: charts::sale_price_chart(&yearly),
            top_neighborhoods: charts::top_neighborhoods_chart(&top),
            parallel_coordinates: charts::parallel_coordinates_chart(
                &aggregate::parallel_coordinates(dataset, top_n),
            ),
            map: charts::neighborhood_map_chart(&aggregate::neighborhood_map(dataset)),
        }
    }
}

/// The four dropdown-driven charts for one selected neighborhood.
#[derive(Debug, Clone)]
pub struct NeighborhoodViews {
    pub neighborhood: String,
    pub sale_price: ChartSpec,
    pub gross_rent: ChartSpec,
    pub price_and_rent: ChartSpec,
    pub rent_vs_sales: ChartSpec,
}

impl NeighborhoodViews {
    /// Handle a selection: aggregate the neighborhood once and build every
    /// dependent chart from that one table. Unknown names give empty charts.
    pub fn for_selection(dataset: &HousingDataset, neighborhood: &str) -> Self {
        let yearly = aggregate::neighborhood_yearly_means(dataset, neighborhood);
        NeighborhoodViews {
            neighborhood: neighborhood.to_string(),
            sale_price: charts::neighborhood_price_chart(neighborhood, &yearly),
            gross_rent: charts::neighborhood_rent_chart(neighborhood, &yearly),
            price_and_rent: charts::neighborhood_price_rent_chart(neighborhood, &yearly),
            rent_vs_sales: charts::rent_vs_sales_chart(neighborhood, &yearly),
        }
    }

    pub fn charts(&self) -> [&ChartSpec; 4] {
        [
            &self.sale_price,
            &self.gross_rent,
            &self.price_and_rent,
            &self.rent_vs_sales,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartBody;
    use crate::data::model::{NeighborhoodCoordinate, YearlyNeighborhoodRecord};

    fn dataset() -> HousingDataset {
        let rows = [
            (2010, "Noe Valley", Some(450.0), 3000.0),
            (2011, "Noe Valley", Some(480.0), 3200.0),
            (2010, "Bayview", None, 1200.0),
        ];
        HousingDataset::new(
            rows.iter()
                .map(|&(year, name, price, rent)| YearlyNeighborhoodRecord {
                    year,
                    neighborhood: name.to_string(),
                    sale_price_sqr_foot: price,
                    housing_units: Some(380000.0),
                    gross_rent: Some(rent),
                })
                .collect(),
            vec![NeighborhoodCoordinate {
                neighborhood: "Noe Valley".to_string(),
                lat: 37.75,
                lon: -122.43,
            }],
        )
    }

    #[test]
    fn selection_builds_all_four_charts() {
        let views = NeighborhoodViews::for_selection(&dataset(), "Noe Valley");
        assert!(views.charts().iter().all(|c| !c.is_empty()));
        let ChartBody::Lines(series) = &views.gross_rent.body else {
            panic!("expected lines");
        };
        assert_eq!(series[0].points, vec![[2010.0, 3000.0], [2011.0, 3200.0]]);
    }

    #[test]
    fn unknown_selection_gives_empty_charts() {
        let views = NeighborhoodViews::for_selection(&dataset(), "Atlantis");
        assert!(views.charts().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn city_views_cover_joined_map_only() {
        let views = CityTrendViews::build(&dataset(), 10);
        let ChartBody::Bubbles(bubbles) = &views.map.body else {
            panic!("expected bubbles");
        };
        assert_eq!(bubbles.len(), 1);
        assert_eq!(bubbles[0].label, "Noe Valley");
        assert!(!views.housing_units.is_empty());
        // Bayview has no price, so only Noe Valley ranks.
        assert_eq!(views.top_neighborhoods.x_categories, vec!["Noe Valley"]);
    }
}
