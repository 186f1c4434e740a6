use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{Dimension, Notice};

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// One point of a timeline: notices on `date`, optionally within one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedRow {
    pub date: NaiveDate,
    pub group: Option<String>,
    pub count: usize,
}

/// A distinct dimension value and how many notices carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub key: String,
    pub count: usize,
}

/// Per-value metrics for one dimension: notices for the value, and the
/// number of distinct categories among them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionMetrics {
    pub key: String,
    pub notice_count: usize,
    pub distinct_categories: usize,
}

/// Headline counts shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub companies: usize,
    pub products: usize,
    pub categories: usize,
}

// ---------------------------------------------------------------------------
// Truncation policy for rankings
// ---------------------------------------------------------------------------

/// How much of a ranking the caller wants to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Truncation {
    #[default]
    All,
    Top(usize),
}

impl Truncation {
    pub fn apply(self, mut ranking: Vec<RankedCount>) -> Vec<RankedCount> {
        if let Truncation::Top(n) = self {
            ranking.truncate(n);
        }
        ranking
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Count notices per date, or per `(date, group value)` when `group_by` is
/// given. Rows are ordered by date, then group value. Combinations that do
/// not occur in `subset` are not emitted.
pub fn aggregate_timeline(subset: &[&Notice], group_by: Option<Dimension>) -> Vec<AggregatedRow> {
    let mut counts: BTreeMap<(NaiveDate, Option<&str>), usize> = BTreeMap::new();
    for n in subset {
        let group = group_by.map(|dim| n.value(dim));
        *counts.entry((n.date, group)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((date, group), count)| AggregatedRow {
            date,
            group: group.map(str::to_string),
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// Count notices per distinct value of `dim`, most frequent first.
///
/// Ties keep the order in which values first appear in `subset`.
pub fn rank(subset: &[&Notice], dim: Dimension) -> Vec<RankedCount> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut ranking: Vec<RankedCount> = Vec::new();

    for n in subset {
        let key = n.value(dim);
        match position.get(key) {
            Some(&i) => ranking[i].count += 1,
            None => {
                position.insert(key, ranking.len());
                ranking.push(RankedCount {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    ranking.sort_by(|a, b| b.count.cmp(&a.count));
    ranking
}

pub fn rank_companies(subset: &[&Notice]) -> Vec<RankedCount> {
    rank(subset, Dimension::Company)
}

pub fn rank_products(subset: &[&Notice]) -> Vec<RankedCount> {
    rank(subset, Dimension::Product)
}

pub fn rank_categories(subset: &[&Notice]) -> Vec<RankedCount> {
    rank(subset, Dimension::Category)
}

// ---------------------------------------------------------------------------
// Cross metrics
// ---------------------------------------------------------------------------

/// Per company: number of notices and distinct categories. Sorted by company.
pub fn company_metrics(subset: &[&Notice]) -> Vec<DimensionMetrics> {
    metrics(subset, Dimension::Company)
}

/// Per product: number of notices and distinct categories. Sorted by product.
pub fn product_metrics(subset: &[&Notice]) -> Vec<DimensionMetrics> {
    metrics(subset, Dimension::Product)
}

fn metrics(subset: &[&Notice], dim: Dimension) -> Vec<DimensionMetrics> {
    let mut groups: BTreeMap<&str, (usize, BTreeSet<&str>)> = BTreeMap::new();
    for n in subset {
        let (count, categories) = groups.entry(n.value(dim)).or_default();
        *count += 1;
        categories.insert(n.category.as_str());
    }

    groups
        .into_iter()
        .map(|(key, (notice_count, categories))| DimensionMetrics {
            key: key.to_string(),
            notice_count,
            distinct_categories: categories.len(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

pub fn summarize(subset: &[&Notice]) -> Summary {
    let distinct = |dim: Dimension| subset.iter().map(|n| n.value(dim)).collect::<BTreeSet<_>>().len();
    Summary {
        total: subset.len(),
        companies: distinct(Dimension::Company),
        products: distinct(Dimension::Product),
        categories: distinct(Dimension::Category),
    }
}
