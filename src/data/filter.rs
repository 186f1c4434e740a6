use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::error::CriteriaError;
use super::model::{Dataset, Notice};

// ---------------------------------------------------------------------------
// Filter predicate: date range, company selection, category
// ---------------------------------------------------------------------------

/// The conjunctive filter applied to the dataset on every interaction.
///
/// * `start_date..=end_date` is inclusive on both ends.
/// * An empty `companies` set means "no company restriction".
/// * `category == None` means "all categories".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub companies: BTreeSet<String>,
    pub category: Option<String>,
}

impl FilterCriteria {
    /// Date range only, no company or category restriction.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        FilterCriteria {
            start_date,
            end_date,
            companies: BTreeSet::new(),
            category: None,
        }
    }

    /// Criteria that keep every notice of `dataset`.
    ///
    /// An empty dataset gets a degenerate range at `NaiveDate::MIN`.
    pub fn spanning(dataset: &Dataset) -> Self {
        let (start, end) = dataset
            .date_span()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MIN));
        Self::new(start, end)
    }

    pub fn with_companies<I, S>(mut self, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companies = companies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Reject an inverted date range.
    ///
    /// [`filter`] does not call this: an inverted range simply matches
    /// nothing. Callers that want to warn the user check it first.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if self.start_date > self.end_date {
            return Err(CriteriaError::InvertedRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Whether a single notice passes all three predicates.
    pub fn matches(&self, notice: &Notice) -> bool {
        if notice.date < self.start_date || notice.date > self.end_date {
            return false;
        }
        if !self.companies.is_empty() && !self.companies.contains(&notice.company) {
            return false;
        }
        match &self.category {
            Some(category) => notice.category == *category,
            None => true,
        }
    }
}

/// Return the notices of `dataset` that pass `criteria`, in source order.
pub fn filter<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> Vec<&'a Notice> {
    filter_rows(dataset.notices(), criteria)
}

/// Filter any collection of notices (the full dataset or an earlier
/// subset). Order is preserved and the input is never modified.
pub fn filter_rows<'a, I>(rows: I, criteria: &FilterCriteria) -> Vec<&'a Notice>
where
    I: IntoIterator<Item = &'a Notice>,
{
    let kept: Vec<&Notice> = rows.into_iter().filter(|n| criteria.matches(n)).collect();
    log::debug!(
        "filter {}..={} companies={} category={:?} -> {} rows",
        criteria.start_date,
        criteria.end_date,
        criteria.companies.len(),
        criteria.category,
        kept.len()
    );
    kept
}
