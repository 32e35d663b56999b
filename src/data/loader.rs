use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{HousingDataset, NeighborhoodCoordinate, YearlyNeighborhoodRecord};
use crate::error::{DataError, DataResult};

pub const YEAR_COLUMN: &str = "year";
pub const NEIGHBORHOOD_COLUMN: &str = "neighborhood";
pub const SALE_PRICE_COLUMN: &str = "sale_price_sqr_foot";
pub const HOUSING_UNITS_COLUMN: &str = "housing_units";
pub const GROSS_RENT_COLUMN: &str = "gross_rent";

pub const COORD_NAME_COLUMN: &str = "Neighborhood";
pub const COORD_LAT_COLUMN: &str = "Lat";
pub const COORD_LON_COLUMN: &str = "Lon";

const CENSUS_COLUMNS: [&str; 5] = [
    YEAR_COLUMN,
    NEIGHBORHOOD_COLUMN,
    SALE_PRICE_COLUMN,
    HOUSING_UNITS_COLUMN,
    GROSS_RENT_COLUMN,
];
const COORD_COLUMNS: [&str; 3] = [COORD_NAME_COLUMN, COORD_LAT_COLUMN, COORD_LON_COLUMN];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both tables and build the dataset. Any failure here is fatal for the
/// dashboard.
pub fn load_dataset(census_path: &Path, coordinates_path: &Path) -> DataResult<HousingDataset> {
    let records = load_census(census_path)?;
    let coordinates = load_coordinates(coordinates_path)?;
    let dataset = HousingDataset::new(records, coordinates);
    log::info!(
        "Loaded {} census rows ({} neighborhoods) and {} coordinates",
        dataset.len(),
        dataset.neighborhoods.len(),
        dataset.coordinates.len()
    );
    Ok(dataset)
}

/// Load the yearly census table. Dispatch by extension.
pub fn load_census(path: &Path) -> DataResult<Vec<YearlyNeighborhoodRecord>> {
    let rows = read_table(path, &CENSUS_COLUMNS)?;
    let total = rows.len();
    let records: Vec<YearlyNeighborhoodRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(row_no, cells)| census_record(cells, row_no))
        .collect();
    if records.len() < total {
        log::warn!(
            "{}: dropped {} of {total} rows without a usable year or neighborhood",
            path.display(),
            total - records.len()
        );
    }
    Ok(records)
}

/// Load the neighborhood coordinates table. Dispatch by extension.
pub fn load_coordinates(path: &Path) -> DataResult<Vec<NeighborhoodCoordinate>> {
    let rows = read_table(path, &COORD_COLUMNS)?;
    let total = rows.len();
    let coordinates: Vec<NeighborhoodCoordinate> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(row_no, cells)| coordinate_record(cells, row_no))
        .collect();
    if coordinates.len() < total {
        log::warn!(
            "{}: dropped {} of {total} coordinate rows",
            path.display(),
            total - coordinates.len()
        );
    }
    Ok(coordinates)
}

// ---------------------------------------------------------------------------
// Cell model shared by all formats
// ---------------------------------------------------------------------------

/// A single cell as read from any of the supported formats, before coercion.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            Cell::Text(s) => coerce_numeric(s),
            _ => None,
        }
    }

    fn as_year(&self) -> Option<i32> {
        let v = self.as_f64()?;
        (v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64).then_some(v as i32)
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Cell::Number(v) => Some(v.to_string()),
            _ => None,
        }
    }
}

/// Parse a numeric cell. Anything that is not a finite number ("N/A", "",
/// "nan", "inf") becomes missing.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn census_record(cells: Vec<Cell>, row_no: usize) -> Option<YearlyNeighborhoodRecord> {
    let year = cells[0].as_year();
    let neighborhood = cells[1].as_text();
    match (year, neighborhood) {
        (Some(year), Some(neighborhood)) => Some(YearlyNeighborhoodRecord {
            year,
            neighborhood,
            sale_price_sqr_foot: cells[2].as_f64(),
            housing_units: cells[3].as_f64(),
            gross_rent: cells[4].as_f64(),
        }),
        _ => {
            log::debug!("census row {row_no}: unusable year/neighborhood {cells:?}");
            None
        }
    }
}

fn coordinate_record(cells: Vec<Cell>, row_no: usize) -> Option<NeighborhoodCoordinate> {
    match (cells[0].as_text(), cells[1].as_f64(), cells[2].as_f64()) {
        (Some(neighborhood), Some(lat), Some(lon)) => {
            Some(NeighborhoodCoordinate { neighborhood, lat, lon })
        }
        _ => {
            log::debug!("coordinate row {row_no}: unusable cells {cells:?}");
            None
        }
    }
}

/// Read the requested columns (in order) from a table file.
fn read_table(path: &Path, columns: &[&str]) -> DataResult<Vec<Vec<Cell>>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(path, columns),
        "json" => read_json(path, columns),
        "parquet" | "pq" => read_parquet(path, columns),
        other => Err(DataError::UnsupportedExtension(other.to_string())),
    }
}

fn missing_column(path: &Path, column: &str) -> DataError {
    DataError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; extra columns are ignored.
fn read_csv(path: &Path, columns: &[&str]) -> DataResult<Vec<Vec<Cell>>> {
    let csv_err = |source: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();

    let indices = columns
        .iter()
        .map(|col| {
            headers
                .iter()
                .position(|h| h == *col)
                .ok_or_else(|| missing_column(path, col))
        })
        .collect::<DataResult<Vec<usize>>>()?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let cells = indices
            .iter()
            .map(|&i| match record.get(i) {
                Some("") | None => Cell::Missing,
                Some(text) => Cell::Text(text.to_string()),
            })
            .collect();
        rows.push(cells);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "year": 2010, "neighborhood": "Alamo Square",
///     "sale_price_sqr_foot": 291.18, "housing_units": 372560, "gross_rent": 1239 },
///   ...
/// ]
/// ```
fn read_json(path: &Path, columns: &[&str]) -> DataResult<Vec<Vec<Cell>>> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = root.as_array().ok_or_else(|| DataError::Malformed {
        path: path.to_path_buf(),
        message: "expected a top-level JSON array".to_string(),
    })?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> DataResult<Vec<Cell>> {
            let obj = rec.as_object().ok_or_else(|| DataError::Malformed {
                path: path.to_path_buf(),
                message: format!("row {i} is not a JSON object"),
            })?;
            Ok(columns.iter().map(|col| json_cell(obj, col)).collect())
        })
        .collect()
}

fn json_cell(obj: &Map<String, JsonValue>, column: &str) -> Cell {
    match obj.get(column) {
        Some(JsonValue::String(s)) => Cell::Text(s.clone()),
        Some(JsonValue::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
        Some(JsonValue::Null) | None => Cell::Missing,
        Some(other) => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Parquet written by Pandas (`df.to_parquet()`) or Polars. Numeric columns
/// may be integer, float or string typed; strings are coerced.
fn read_parquet(path: &Path, columns: &[&str]) -> DataResult<Vec<Vec<Cell>>> {
    let parquet_err = |source: parquet::errors::ParquetError| DataError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(parquet_err)?
        .build()
        .map_err(parquet_err)?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|source| DataError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        append_batch_rows(path, &batch, columns, &mut rows)?;
    }
    Ok(rows)
}

fn append_batch_rows(
    path: &Path,
    batch: &RecordBatch,
    columns: &[&str],
    rows: &mut Vec<Vec<Cell>>,
) -> DataResult<()> {
    let arrays = columns
        .iter()
        .map(|col| {
            batch
                .column_by_name(col)
                .cloned()
                .ok_or_else(|| missing_column(path, col))
        })
        .collect::<DataResult<Vec<ArrayRef>>>()?;

    for row in 0..batch.num_rows() {
        rows.push(arrays.iter().map(|arr| arrow_cell(arr, row)).collect());
    }
    Ok(())
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Missing;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => Cell::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Int32 => Cell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        other => {
            log::debug!("unsupported Arrow type {other:?}; treating cell as missing");
            Cell::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CENSUS_CSV: &str = "\
year,neighborhood,sale_price_sqr_foot,housing_units,gross_rent
2010,Alamo Square,291.18,372560,1239
2010,Anza Vista,N/A,372560,1239
2011,Alamo Square,272.52,374507,1530
,Bayview,170.0,374507,1530
2012,,200.0,376454,2324
";

    const COORDS_CSV: &str = "\
Neighborhood,Lat,Lon
Alamo Square,37.791012,-122.4021
Anza Vista,37.779598,-122.443451
Bayview,unknown,-122.39
";

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn csv_coerces_bad_numbers_and_drops_unkeyed_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "census.csv", CENSUS_CSV);

        let records = load_census(&path).unwrap();
        assert_eq!(records.len(), 3);

        let anza = &records[1];
        assert_eq!(anza.neighborhood, "Anza Vista");
        assert_eq!(anza.sale_price_sqr_foot, None);
        assert_eq!(anza.housing_units, Some(372560.0));
        assert_eq!(anza.gross_rent, Some(1239.0));
    }

    #[test]
    fn coordinates_without_numeric_lat_are_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "coords.csv", COORDS_CSV);

        let coords = load_coordinates(&path).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].neighborhood, "Alamo Square");
        assert!((coords[1].lon - -122.443451).abs() < 1e-9);
    }

    #[test]
    fn load_dataset_builds_neighborhood_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let census = write(&dir, "census.csv", CENSUS_CSV);
        let coords = write(&dir, "coords.csv", COORDS_CSV);

        let ds = load_dataset(&census, &coords).unwrap();
        assert_eq!(ds.neighborhoods, vec!["Alamo Square", "Anza Vista"]);
    }

    #[test]
    fn short_csv_row_is_dropped_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "census.csv",
            "year,neighborhood,sale_price_sqr_foot,housing_units,gross_rent\n\
             2010,Marina,589.0,372560,1239\n\
             2011,Marina,600\n\
             2012\n\
             2013,Marina,650.0,378401,2971\n",
        );

        let records = load_census(&path).unwrap();
        assert_eq!(records.iter().map(|r| r.year).collect::<Vec<_>>(), vec![2010, 2011, 2013]);

        let short = &records[1];
        assert_eq!(short.sale_price_sqr_foot, Some(600.0));
        assert_eq!(short.housing_units, None);
        assert_eq!(short.gross_rent, None);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load_census(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(DataError::Csv { .. })));
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "census.csv", "year,neighborhood\n2010,Marina\n");
        match load_census(&path) {
            Err(DataError::MissingColumn { column, .. }) => {
                assert_eq!(column, "sale_price_sqr_foot")
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "census.xlsx", "");
        assert!(matches!(
            load_census(&path),
            Err(DataError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_records_accept_numbers_and_strings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "census.json",
            r#"[
                {"year": 2014, "neighborhood": "Marina", "sale_price_sqr_foot": "611.5",
                 "housing_units": 380000, "gross_rent": 3739},
                {"year": 2015, "neighborhood": "Marina", "sale_price_sqr_foot": null,
                 "housing_units": 382295, "gross_rent": "N/A"}
            ]"#,
        );

        let records = load_census(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sale_price_sqr_foot, Some(611.5));
        assert_eq!(records[1].sale_price_sqr_foot, None);
        assert_eq!(records[1].gross_rent, None);
        assert_eq!(records[1].housing_units, Some(382295.0));
    }

    #[test]
    fn parquet_reads_typed_and_string_columns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("census.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int64, false),
            Field::new("neighborhood", DataType::Utf8, false),
            Field::new("sale_price_sqr_foot", DataType::Utf8, true),
            Field::new("housing_units", DataType::Int64, true),
            Field::new("gross_rent", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![2016, 2016])),
                Arc::new(StringArray::from(vec!["Noe Valley", "Presidio Heights"])),
                Arc::new(StringArray::from(vec![Some("710.1"), Some("N/A")])),
                Arc::new(Int64Array::from(vec![Some(384242), None])),
                Arc::new(Float64Array::from(vec![Some(4390.0), Some(4390.0)])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let records = load_census(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, 2016);
        assert_eq!(records[0].sale_price_sqr_foot, Some(710.1));
        assert_eq!(records[1].sale_price_sqr_foot, None);
        assert_eq!(records[1].housing_units, None);
        assert_eq!(records[1].gross_rent, Some(4390.0));
    }

    #[test]
    fn coerce_numeric_rejects_non_finite() {
        assert_eq!(coerce_numeric(" 12.5 "), Some(12.5));
        assert_eq!(coerce_numeric("N/A"), None);
        assert_eq!(coerce_numeric("nan"), None);
        assert_eq!(coerce_numeric("inf"), None);
        assert_eq!(coerce_numeric(""), None);
    }
}
