use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use fsn_dashboard::data::loader::load_file;
use fsn_dashboard::data::LoadError;
use parquet::arrow::ArrowWriter;
use tempfile::{Builder, NamedTempFile};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn json_file_is_loaded_and_cleaned() {
    let file = temp_with(
        ".json",
        r#"[
            {"date": "2024-01-01T00:00:00", "company": " A ", "product": "X", "category": "c1",
             "title": "Recall", "reference_number": "001/24", "link": "https://example.org/1.pdf"},
            {"date": "2024-01-02", "company": "", "product": "Y", "category": "c2"},
            {"date": "2024-01-03", "company": "B", "product": null, "category": "c2"},
            {"date": "2024-01-04", "company": "B", "product": "Z"}
        ]"#,
    );

    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.dropped(), 2);
    assert_eq!(ds.companies(), ["A".to_string(), "B".to_string()]);
    assert_eq!(ds.date_span(), Some((ymd(2024, 1, 1), ymd(2024, 1, 4))));

    let first = &ds.notices()[0];
    assert_eq!(first.company, "A");
    assert_eq!(first.title, "Recall");
    assert_eq!(first.link, "https://example.org/1.pdf");
    assert_eq!(ds.notices()[1].category, "");
}

#[test]
fn csv_file_is_loaded() {
    let file = temp_with(
        ".csv",
        "date,company,product,category,title,reference_number,link\n\
         2024-02-01,A,X,c1,First,1,https://example.org/a.pdf\n\
         01.02.2024,B,Y,c2,Second,2,\n\
         2024-02-03,   ,Z,c1,Dropped,3,\n",
    );

    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.dropped(), 1);
    assert!(ds.notices().iter().all(|n| n.date == ymd(2024, 2, 1)));
}

#[test]
fn parquet_file_with_timestamp_dates_is_loaded() {
    let file = Builder::new().suffix(".parquet").tempfile().unwrap();

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Timestamp(TimeUnit::Millisecond, None), false),
        Field::new("company", DataType::Utf8, true),
        Field::new("product", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, true),
    ]));
    // 2024-03-01T10:30:00 and 2024-03-02T00:00:00 UTC
    let dates = TimestampMillisecondArray::from(vec![1_709_289_000_000, 1_709_337_600_000]);
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(dates) as ArrayRef,
            Arc::new(StringArray::from(vec![Some("A"), None])),
            Arc::new(StringArray::from(vec!["X", "Y"])),
            Arc::new(StringArray::from(vec![Some("c1"), None])),
        ],
    )
    .unwrap();

    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.dropped(), 1);
    let n = &ds.notices()[0];
    assert_eq!(n.date, ymd(2024, 3, 1));
    assert_eq!(n.company, "A");
    assert_eq!(n.category, "c1");
    assert_eq!(n.title, "");
}

#[test]
fn unparseable_date_fails_the_load() {
    let file = temp_with(
        ".json",
        r#"[{"date": "2024-01-01", "company": "A", "product": "X"},
            {"date": "someday", "company": "A", "product": "X"}]"#,
    );
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::InvalidDate { row: 1, .. }), "{err}");
}

#[test]
fn malformed_json_fails_the_load() {
    let file = temp_with(".json", "[{\"date\": ");
    assert!(matches!(load_file(file.path()), Err(LoadError::Json(_))));
}

#[test]
fn unknown_extension_is_rejected() {
    let file = temp_with(".xlsx", "");
    assert!(matches!(
        load_file(file.path()),
        Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    assert!(matches!(load_file(&path), Err(LoadError::Io { .. })));
}
