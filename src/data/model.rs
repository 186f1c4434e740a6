use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Dimension – the categorical columns notices can be grouped by
// ---------------------------------------------------------------------------

/// A categorical column of the notice table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Dimension {
    Company,
    Product,
    Category,
}

impl Dimension {
    /// Column name as it appears in the source data.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Company => "company",
            Dimension::Product => "product",
            Dimension::Category => "category",
        }
    }

    /// Human-readable axis label.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Company => "Company",
            Dimension::Product => "Product",
            Dimension::Category => "Category",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// RawNotice – one parsed source row, before cleaning
// ---------------------------------------------------------------------------

/// A source row after date parsing but before the company/product check.
///
/// Rows without a usable date never get this far: the loader rejects them.
///
/// `company` and `product` are `None` when the source value was absent or
/// null; every other text field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNotice {
    pub date: NaiveDate,
    pub company: Option<String>,
    pub product: Option<String>,
    pub category: String,
    pub title: String,
    pub reference_number: String,
    pub link: String,
}

// ---------------------------------------------------------------------------
// Notice – one row of the dataset
// ---------------------------------------------------------------------------

/// A single field safety notice.
///
/// `company` and `product` are always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub date: NaiveDate,
    pub company: String,
    pub product: String,
    pub category: String,
    pub title: String,
    pub reference_number: String,
    pub link: String,
}

impl Notice {
    /// Value of a categorical column.
    pub fn value(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::Company => &self.company,
            Dimension::Product => &self.product,
            Dimension::Category => &self.category,
        }
    }

    /// Apply the cleaning rule to a raw row. Returns `None` if the row has
    /// a blank company or product.
    fn from_raw(raw: RawNotice) -> Option<Self> {
        let company = non_blank(raw.company)?;
        let product = non_blank(raw.product)?;
        Some(Notice {
            date: raw.date,
            company,
            product,
            category: raw.category,
            title: raw.title,
            reference_number: raw.reference_number,
            link: raw.link,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded, cleaned collection
// ---------------------------------------------------------------------------

/// The full cleaned dataset with pre-computed indices. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    notices: Vec<Notice>,
    companies: Vec<String>,
    categories: Vec<String>,
    date_span: Option<(NaiveDate, NaiveDate)>,
    dropped: usize,
}

impl Dataset {
    /// Clean the raw rows and build the column indices.
    pub fn from_records(records: Vec<RawNotice>) -> Self {
        let total = records.len();
        let notices: Vec<Notice> = records
            .into_iter()
            .enumerate()
            .filter_map(|(row, raw)| {
                let notice = Notice::from_raw(raw);
                if notice.is_none() {
                    log::debug!("dropping row {row}: blank company or product");
                }
                notice
            })
            .collect();
        let dropped = total - notices.len();

        let mut companies = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;
        for n in &notices {
            companies.insert(n.company.clone());
            categories.insert(n.category.clone());
            date_span = Some(match date_span {
                None => (n.date, n.date),
                Some((lo, hi)) => (lo.min(n.date), hi.max(n.date)),
            });
        }

        Dataset {
            notices,
            companies: companies.into_iter().collect(),
            categories: categories.into_iter().collect(),
            date_span,
            dropped,
        }
    }

    /// Every notice, in source order.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// The whole dataset as an (unfiltered) subset.
    pub fn all(&self) -> Vec<&Notice> {
        self.notices.iter().collect()
    }

    /// Sorted distinct company names.
    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    /// Sorted distinct categories (may include the empty string).
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Earliest and latest notice date, `None` for an empty dataset.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_span
    }

    /// Rows discarded by the cleaning rule.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of notices.
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
