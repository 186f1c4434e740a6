use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Date32Type};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{Dataset, RawNotice};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a notice dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "date": "...", "company": "...", "product": "...", ... }, ...]`
/// * `.csv`     – header row with the notice field names
/// * `.parquet` – one column per field, `date` as text, date or timestamp
///
/// Rows with a blank company or product are dropped; any other malformed
/// row fails the whole load.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_json(&text)?
        }
        "csv" => {
            let reader = csv::Reader::from_path(path)?;
            parse_csv(reader)?
        }
        "parquet" | "pq" => {
            let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            read_parquet(file)?
        }
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let dataset = Dataset::from_records(records);
    log::info!(
        "Loaded {} notices from {} ({} rows dropped for blank company/product)",
        dataset.len(),
        path.display(),
        dataset.dropped()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Parse the date component of a source date string.
///
/// Accepts ISO dates, ISO / RFC 3339 date-times (time of day is dropped)
/// and German `DD.MM.YYYY` dates.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%d.%m.%Y").ok()
}

fn required_date(value: Option<&str>, row: usize) -> Result<NaiveDate, LoadError> {
    let value = value.ok_or(LoadError::MissingField { row, field: "date" })?;
    parse_date(value).ok_or_else(|| LoadError::InvalidDate {
        row,
        value: value.to_string(),
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "date": "2024-01-05",
///     "company": "Acme Medical GmbH",
///     "product": "Infusion pump X2",
///     "category": "Infusion",
///     "title": "Urgent field safety notice",
///     "reference_number": "12345/24",
///     "link": "https://..."
///   },
///   ...
/// ]
/// ```
///
/// `date` may also be an integer of epoch milliseconds (pandas' default
/// JSON date encoding).
pub fn parse_json(text: &str) -> Result<Vec<RawNotice>, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    records
        .iter()
        .enumerate()
        .map(|(row, rec)| {
            let obj = rec.as_object().ok_or_else(|| LoadError::FieldType {
                row,
                field: "record",
                found: json_type_name(rec).to_string(),
            })?;
            json_record(obj, row)
        })
        .collect()
}

fn json_record(obj: &Map<String, JsonValue>, row: usize) -> Result<RawNotice, LoadError> {
    let date = match obj.get("date") {
        None | Some(JsonValue::Null) => return Err(LoadError::MissingField { row, field: "date" }),
        Some(JsonValue::Number(n)) => {
            let millis = n.as_i64().ok_or_else(|| LoadError::InvalidDate {
                row,
                value: n.to_string(),
            })?;
            DateTime::from_timestamp_millis(millis)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| LoadError::InvalidDate {
                    row,
                    value: n.to_string(),
                })?
        }
        Some(JsonValue::String(s)) => required_date(Some(s.as_str()), row)?,
        Some(other) => {
            return Err(LoadError::FieldType {
                row,
                field: "date",
                found: json_type_name(other).to_string(),
            })
        }
    };

    Ok(RawNotice {
        date,
        company: json_text(obj, row, "company")?,
        product: json_text(obj, row, "product")?,
        category: json_text(obj, row, "category")?.unwrap_or_default(),
        title: json_text(obj, row, "title")?.unwrap_or_default(),
        reference_number: json_text(obj, row, "reference_number")?.unwrap_or_default(),
        link: json_text(obj, row, "link")?.unwrap_or_default(),
    })
}

/// Read a text field; numbers are stringified, absent/null is `None`.
fn json_text(
    obj: &Map<String, JsonValue>,
    row: usize,
    field: &'static str,
) -> Result<Option<String>, LoadError> {
    match obj.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(LoadError::FieldType {
            row,
            field,
            found: json_type_name(other).to_string(),
        }),
    }
}

fn json_type_name(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the field names. Only `date`, `company`
/// and `product` columns are required; column order is free.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: Option<String>,
    company: Option<String>,
    product: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    reference_number: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

pub fn parse_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawNotice>, LoadError> {
    let mut records = Vec::new();

    for (row, result) in reader.deserialize::<CsvRow>().enumerate() {
        let rec = result?;
        records.push(RawNotice {
            date: required_date(rec.date.as_deref(), row)?,
            company: rec.company,
            product: rec.product,
            category: rec.category.unwrap_or_default(),
            title: rec.title.unwrap_or_default(),
            reference_number: rec.reference_number.unwrap_or_default(),
            link: rec.link.unwrap_or_default(),
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Read notices from a Parquet file.
///
/// Expected schema:
/// - `date`: Utf8 / LargeUtf8, Date32, Date64 or Timestamp
/// - `company`, `product`: Utf8 / LargeUtf8 (required)
/// - `category`, `title`, `reference_number`, `link`: Utf8 (optional)
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
pub fn read_parquet(file: std::fs::File) -> Result<Vec<RawNotice>, LoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        batch_records(&batch, records.len(), &mut records)?;
    }
    Ok(records)
}

fn batch_records(
    batch: &RecordBatch,
    row_offset: usize,
    out: &mut Vec<RawNotice>,
) -> Result<(), LoadError> {
    let schema = batch.schema();
    let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i).clone());

    let date_col = column("date").ok_or(LoadError::MissingField {
        row: row_offset,
        field: "date",
    })?;
    let company_col = column("company").ok_or(LoadError::MissingField {
        row: row_offset,
        field: "company",
    })?;
    let product_col = column("product").ok_or(LoadError::MissingField {
        row: row_offset,
        field: "product",
    })?;
    let category_col = column("category");
    let title_col = column("title");
    let reference_col = column("reference_number");
    let link_col = column("link");

    let dates = DateColumn::new(&date_col, row_offset)?;

    for i in 0..batch.num_rows() {
        let row = row_offset + i;
        let text = |col: &Option<Arc<dyn Array>>, field: &'static str| -> Result<String, LoadError> {
            Ok(match col {
                Some(c) => string_at(c, i, row, field)?.unwrap_or_default(),
                None => String::new(),
            })
        };

        out.push(RawNotice {
            date: dates.date_at(i, row)?,
            company: string_at(&company_col, i, row, "company")?,
            product: string_at(&product_col, i, row, "product")?,
            category: text(&category_col, "category")?,
            title: text(&title_col, "title")?,
            reference_number: text(&reference_col, "reference_number")?,
            link: text(&link_col, "link")?,
        });
    }
    Ok(())
}

// -- Parquet / Arrow helpers --

/// Extract a string from a Utf8 or LargeUtf8 column; null is `None`.
fn string_at(
    col: &Arc<dyn Array>,
    i: usize,
    row: usize,
    field: &'static str,
) -> Result<Option<String>, LoadError> {
    if col.is_null(i) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => Ok(Some(col.as_string::<i32>().value(i).to_string())),
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(i).to_string())),
        other => Err(LoadError::FieldType {
            row,
            field,
            found: format!("{other:?}"),
        }),
    }
}

/// The `date` column, either as raw text or cast to Arrow `Date32`.
enum DateColumn {
    Text(Arc<dyn Array>),
    Days(Arc<dyn Array>),
}

impl DateColumn {
    fn new(col: &Arc<dyn Array>, row_offset: usize) -> Result<Self, LoadError> {
        match col.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 => Ok(DateColumn::Text(col.clone())),
            DataType::Date32 => Ok(DateColumn::Days(col.clone())),
            DataType::Date64 | DataType::Timestamp(_, _) => Ok(DateColumn::Days(
                arrow::compute::cast(col, &DataType::Date32)?,
            )),
            other => Err(LoadError::FieldType {
                row: row_offset,
                field: "date",
                found: format!("{other:?}"),
            }),
        }
    }

    fn date_at(&self, i: usize, row: usize) -> Result<NaiveDate, LoadError> {
        match self {
            DateColumn::Text(col) => {
                let value = string_at(col, i, row, "date")?;
                required_date(value.as_deref(), row)
            }
            DateColumn::Days(col) => {
                if col.is_null(i) {
                    return Err(LoadError::MissingField { row, field: "date" });
                }
                col.as_primitive::<Date32Type>()
                    .value_as_date(i)
                    .ok_or_else(|| LoadError::InvalidDate {
                        row,
                        value: format!("{:?}", col.as_primitive::<Date32Type>().value(i)),
                    })
            }
        }
    }
}
