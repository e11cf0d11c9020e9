use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, NumericColumn, Track, TrackTable, ARTIST, TITLE, TOP_GENRE};
use super::stats;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Row {row}, column '{column}': '{value}' is not a whole number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Column-name normalisation
// ---------------------------------------------------------------------------

/// Capitalise the first letter of every run of letters, lower-case the rest.
///
/// `top genre` → `Top Genre`, `dB` → `Db`, `beats_per_minute` → `Beats_Per_Minute`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Map a title-cased abbreviation to its canonical name; anything else passes
/// through unchanged.
pub fn rename_column(header: &str) -> String {
    NumericColumn::from_abbreviation(header)
        .map(|col| col.name().to_string())
        .unwrap_or_else(|| header.to_string())
}

/// Title-case then rename.
pub fn normalize_header(header: &str) -> String {
    rename_column(&title_case(header))
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Cells of every row, aligned with `columns` (already normalised).
struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Load a track table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one record per track
/// * `.json`    – `[{ "title": "...", "bpm": 171, ... }, ...]`
/// * `.parquet` – one column per attribute
pub fn load_file(path: &Path) -> Result<TrackTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let raw = match ext.as_str() {
        "csv" => read_csv(file)?,
        "json" => read_json(file)?,
        "parquet" | "pq" => read_parquet(file)?,
        _ => return Err(DatasetError::UnsupportedExtension(ext).into()),
    };

    let table = build_table(raw).with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "Loaded {} tracks from {}",
        table.len(),
        path.display()
    );
    if table.is_empty() {
        log::warn!("{} holds no tracks", path.display());
    }
    report_inspection(&table);
    Ok(table)
}

fn report_inspection(table: &TrackTable) {
    for (column, nulls) in &table.inspection.null_counts {
        if *nulls > 0 {
            log::warn!("Column '{column}' has {nulls} empty cells");
        }
    }
    if !table.inspection.duplicate_rows.is_empty() {
        log::warn!(
            "Duplicate rows at {:?}",
            table.inspection.duplicate_rows
        );
    }
}

// ---------------------------------------------------------------------------
// RawTable → TrackTable
// ---------------------------------------------------------------------------

static NULL_CELL: CellValue = CellValue::Null;

/// Positions of the required columns within a raw row.
struct ColumnIndex {
    title: usize,
    artist: usize,
    top_genre: usize,
    numeric: BTreeMap<NumericColumn, usize>,
}

impl ColumnIndex {
    fn resolve(columns: &[String]) -> Result<Self, DatasetError> {
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            title: find(TITLE)?,
            artist: find(ARTIST)?,
            top_genre: find(TOP_GENRE)?,
            numeric: NumericColumn::ALL
                .into_iter()
                .map(|col| find(col.name()).map(|idx| (col, idx)))
                .collect::<Result<_, _>>()?,
        })
    }

    fn track(&self, cells: &[CellValue], row: usize) -> Result<Track, DatasetError> {
        let cell = |idx: usize| cells.get(idx).unwrap_or(&NULL_CELL);
        let number = |col: NumericColumn| {
            let value = self.numeric.get(&col).map_or(&NULL_CELL, |&idx| cell(idx));
            value.as_i64().ok_or_else(|| DatasetError::InvalidNumber {
                row,
                column: col.name().to_string(),
                value: value.to_string(),
            })
        };

        Ok(Track {
            title: cell(self.title).as_text(),
            artist: cell(self.artist).as_text(),
            top_genre: cell(self.top_genre).as_text(),
            beats_per_minute: number(NumericColumn::BeatsPerMinute)?,
            energy: number(NumericColumn::Energy)?,
            danceability: number(NumericColumn::Danceability)?,
            loudness: number(NumericColumn::Loudness)?,
            liveness: number(NumericColumn::Liveness)?,
            valence: number(NumericColumn::Valence)?,
            duration: number(NumericColumn::Duration)?,
            acousticness: number(NumericColumn::Acousticness)?,
            speechiness: number(NumericColumn::Speechiness)?,
            popularity: number(NumericColumn::Popularity)?,
        })
    }
}

fn build_table(raw: RawTable) -> Result<TrackTable, DatasetError> {
    let index = ColumnIndex::resolve(&raw.columns)?;
    let tracks = raw
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| index.track(cells, row))
        .collect::<Result<Vec<_>, _>>()?;

    let inspection = stats::inspect(&raw.columns, &raw.rows);
    Ok(TrackTable::new(tracks, inspection))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(file: File) -> Result<RawTable> {
    let mut reader = csv::Reader::from_reader(file);
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(RawTable { columns, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "title": "Blinding Lights", "artist": "The Weeknd", "bpm": 171, ... },
///   ...
/// ]
/// ```
fn read_json(file: File) -> Result<RawTable> {
    let root: JsonValue =
        serde_json::from_reader(BufReader::new(file)).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects: Vec<BTreeMap<String, CellValue>> = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            let name = normalize_header(key);
            if !columns.contains(&name) {
                columns.push(name.clone());
            }
            cells.insert(name, json_to_cell(val));
        }
        objects.push(cells);
    }

    let rows = objects
        .into_iter()
        .map(|mut cells| {
            columns
                .iter()
                .map(|c| cells.remove(c).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per track attribute.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); integer columns may come back as
/// floats when the writer had nulls to represent.
fn read_parquet(file: File) -> Result<RawTable> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| normalize_header(f.name()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable { columns, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        other => CellValue::Text(format!("<{other}>")),
    }
}
