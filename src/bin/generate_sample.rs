//! Writes a deterministic synthetic dataset so the dashboard can run without
//! the real census files: both tables as CSV plus the census table as Parquet.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// (name, lat, lon, base sale price per sq ft)
const NEIGHBORHOODS: [(&str, f64, f64, f64); 12] = [
    ("Alamo Square", 37.791012, -122.402100, 291.0),
    ("Bayview", 37.734670, -122.401060, 170.0),
    ("Cow Hollow", 37.797330, -122.436620, 665.0),
    ("Glen Park", 37.728630, -122.433070, 418.0),
    ("Marina", 37.800580, -122.436910, 589.0),
    ("Merced Heights", 37.718710, -122.462810, 788.0),
    ("Mission Bay", 37.775090, -122.393810, 486.0),
    ("Noe Valley", 37.750930, -122.433290, 542.0),
    ("Pacific Heights", 37.792980, -122.435790, 689.0),
    ("Presidio Heights", 37.785710, -122.456000, 675.0),
    ("Twin Peaks", 37.752870, -122.447030, 469.0),
    ("Union Square District", 37.791010, -122.402100, 903.0),
];

/// Neighborhood with census rows but no coordinates, to exercise the join.
const UNMAPPED: (&str, f64) = ("Treasure Island", 320.0);

const YEARS: std::ops::RangeInclusive<i64> = 2010..=2016;
const CITY_RENT: [f64; 7] = [1239.0, 1530.0, 2324.0, 2971.0, 3528.0, 3739.0, 4390.0];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[-spread, spread)`.
    fn jitter(&mut self, spread: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * spread
    }
}

struct CensusRow {
    year: i64,
    neighborhood: String,
    /// `None` is written as "N/A" in the CSV.
    sale_price_sqr_foot: Option<f64>,
    housing_units: i64,
    gross_rent: f64,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<CensusRow> {
    let bases = NEIGHBORHOODS
        .iter()
        .map(|&(name, _, _, price)| (name, price))
        .chain(std::iter::once(UNMAPPED));

    let mut rows = Vec::new();
    for (name, base_price) in bases {
        for (offset, year) in YEARS.enumerate() {
            // Roughly every 15th price is unreadable in the source data.
            let unreadable = rng.next_u64() % 15 == 0;
            let growth = 1.0 + 0.06 * offset as f64;
            rows.push(CensusRow {
                year,
                neighborhood: name.to_string(),
                sale_price_sqr_foot: (!unreadable)
                    .then(|| (base_price * growth + rng.jitter(40.0)).max(50.0)),
                housing_units: 372_560 + 1_947 * offset as i64,
                gross_rent: CITY_RENT[offset],
            });
        }
    }
    rows
}

fn write_census_csv(path: &Path, rows: &[CensusRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "year",
        "neighborhood",
        "sale_price_sqr_foot",
        "housing_units",
        "gross_rent",
    ])?;
    for row in rows {
        let price = row
            .sale_price_sqr_foot
            .map(|p| format!("{p:.6}"))
            .unwrap_or_else(|| "N/A".to_string());
        writer.write_record([
            row.year.to_string(),
            row.neighborhood.clone(),
            price,
            row.housing_units.to_string(),
            row.gross_rent.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_coordinates_csv(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Neighborhood", "Lat", "Lon"])?;
    for (name, lat, lon, _) in NEIGHBORHOODS {
        writer.write_record([name.to_string(), lat.to_string(), lon.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_census_parquet(path: &Path, rows: &[CensusRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("year", DataType::Int64, false),
        Field::new("neighborhood", DataType::Utf8, false),
        Field::new("sale_price_sqr_foot", DataType::Float64, true),
        Field::new("housing_units", DataType::Int64, false),
        Field::new("gross_rent", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.neighborhood.as_str()),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.sale_price_sqr_foot).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.housing_units))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.gross_rent))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::var_os("SFO_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let census_csv = out_dir.join("sfo_neighborhoods_census_data.csv");
    let census_parquet = out_dir.join("sfo_neighborhoods_census_data.parquet");
    let coords_csv = out_dir.join("neighborhoods_coordinates.csv");

    write_census_csv(&census_csv, &rows)?;
    write_census_parquet(&census_parquet, &rows)?;
    write_coordinates_csv(&coords_csv)?;

    log::info!(
        "Wrote {} census rows for {} neighborhoods to {}",
        rows.len(),
        NEIGHBORHOODS.len() + 1,
        out_dir.display()
    );
    println!(
        "Wrote {}, {} and {}",
        census_csv.display(),
        census_parquet.display(),
        coords_csv.display()
    );
    Ok(())
}
