use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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

    /// Uniform index in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Index drawn with weight proportional to `1 / (i + 1)`, so the first
    /// entries dominate the rankings like real manufacturers do.
    fn skewed(&mut self, n: usize) -> usize {
        let total: f64 = (1..=n).map(|i| 1.0 / i as f64).sum();
        let mut target = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64 * total;
        for i in 0..n {
            target -= 1.0 / (i + 1) as f64;
            if target <= 0.0 {
                return i;
            }
        }
        n - 1
    }
}

#[derive(Serialize)]
struct SampleNotice {
    date: String,
    company: String,
    product: String,
    category: String,
    title: String,
    reference_number: String,
    link: String,
}

const COMPANIES: [&str; 8] = [
    "Medtronic GmbH",
    "Siemens Healthineers AG",
    "B. Braun Melsungen AG",
    "Philips Medizin Systeme GmbH",
    "Fresenius Kabi Deutschland GmbH",
    "Dräger Medical GmbH",
    "Roche Diagnostics GmbH",
    "Smiths Medical Deutschland GmbH",
];

const CATEGORIES: [(&str, &[&str]); 5] = [
    ("Infusion technology", &["Infusion pump", "Syringe pump", "Infusion set"]),
    ("In-vitro diagnostics", &["Blood glucose meter", "Immunoassay analyzer", "Test strips"]),
    ("Imaging", &["CT scanner", "MRI system", "Ultrasound probe"]),
    ("Respiratory", &["Ventilator", "Anaesthesia workstation", "Breathing circuit"]),
    ("Cardiology", &["Defibrillator", "Pacemaker", "ECG monitor"]),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).context("invalid start date")?;

    let mut notices = Vec::new();
    for i in 0..400 {
        let date = start + Duration::days(rng.below(730) as i64);
        let company = COMPANIES[rng.skewed(COMPANIES.len())];
        let (category, products) = CATEGORIES[rng.below(CATEGORIES.len())];
        let product = products[rng.skewed(products.len())];

        // A few rows without a company exercise the load-time cleaning.
        let company = if i % 97 == 13 { "  " } else { company };

        notices.push(SampleNotice {
            date: date.format("%Y-%m-%d").to_string(),
            company: company.to_string(),
            product: format!("{product} {}", (b'A' + rng.below(4) as u8) as char),
            category: category.to_string(),
            title: format!("Urgent field safety notice: {product}"),
            reference_number: format!("{:05}/{:02}", 10000 + i, date.year() % 100),
            link: format!("https://example.org/fsn/{}/{:05}.pdf", date.year(), 10000 + i),
        });
    }
    notices.sort_by(|a, b| a.date.cmp(&b.date));

    // ---- JSON (records-oriented) ----
    let json_path = "sample_notices.json";
    let json = serde_json::to_string_pretty(&notices).context("serializing notices")?;
    std::fs::write(json_path, json).with_context(|| format!("writing {json_path}"))?;

    // ---- Parquet ----
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("invalid epoch")?;
    let dates: Vec<i32> = notices
        .iter()
        .map(|n| {
            let d = NaiveDate::parse_from_str(&n.date, "%Y-%m-%d")?;
            Ok((d - epoch).num_days() as i32)
        })
        .collect::<Result<_, chrono::ParseError>>()
        .context("re-parsing sample dates")?;
    let text = |f: fn(&SampleNotice) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(notices.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("company", DataType::Utf8, false),
        Field::new("product", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("reference_number", DataType::Utf8, false),
        Field::new("link", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(dates)) as ArrayRef,
            text(|n| n.company.as_str()),
            text(|n| n.product.as_str()),
            text(|n| n.category.as_str()),
            text(|n| n.title.as_str()),
            text(|n| n.reference_number.as_str()),
            text(|n| n.link.as_str()),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_notices.parquet";
    let file = std::fs::File::create(parquet_path)
        .with_context(|| format!("creating {parquet_path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!(
        "Wrote {} notices to {json_path} and {parquet_path}",
        notices.len()
    );
    Ok(())
}
