//! Chart specifications built from aggregated notice data.
//!
//! A [`ChartSpec`] is everything a renderer needs and nothing it has to
//! compute: ordered points or bars, titles, axis labels and layout hints.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::aggregate::{self, RankedCount, Truncation};
use crate::data::model::{Dimension, Notice};

/// Default chart height in points.
pub const CHART_HEIGHT: f32 = 400.0;

/// Product chart size used by the dashboard.
pub const TOP_PRODUCTS: usize = 10;

const COUNT_LABEL: &str = "Number of FSNs";

/// One line of a timeline chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(NaiveDate, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ChartKind {
    Lines(Vec<Series>),
    Bars(Vec<RankedCount>),
}

/// A renderer-agnostic chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Category labels on the x axis should be drawn slanted.
    pub rotate_x_labels: bool,
    pub show_legend: bool,
    pub height: f32,
    pub kind: ChartKind,
}

impl ChartSpec {
    /// Whether there is anything to draw.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            ChartKind::Lines(series) => series.iter().all(|s| s.points.is_empty()),
            ChartKind::Bars(bars) => bars.is_empty(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Notices over time. With `group_by`, one series per distinct value in
/// `subset` (sorted by value); otherwise a single series named "All".
pub fn timeline_chart(subset: &[&Notice], group_by: Option<Dimension>) -> ChartSpec {
    let rows = aggregate::aggregate_timeline(subset, group_by);

    let mut by_group: BTreeMap<String, Vec<(NaiveDate, usize)>> = BTreeMap::new();
    for row in rows {
        let name = row.group.unwrap_or_else(|| "All".to_string());
        by_group.entry(name).or_default().push((row.date, row.count));
    }
    let series: Vec<Series> = by_group
        .into_iter()
        .map(|(name, points)| Series { name, points })
        .collect();

    ChartSpec {
        title: "FSNs Over Time".to_string(),
        x_label: "Date".to_string(),
        y_label: COUNT_LABEL.to_string(),
        rotate_x_labels: false,
        show_legend: group_by.is_some(),
        height: CHART_HEIGHT,
        kind: ChartKind::Lines(series),
    }
}

/// Companies ranked by notice count.
pub fn company_chart(subset: &[&Notice], truncation: Truncation) -> ChartSpec {
    ranking_chart(subset, Dimension::Company, truncation, "Companies")
}

/// Products ranked by notice count.
pub fn product_chart(subset: &[&Notice], truncation: Truncation) -> ChartSpec {
    ranking_chart(subset, Dimension::Product, truncation, "Products")
}

fn ranking_chart(
    subset: &[&Notice],
    dim: Dimension,
    truncation: Truncation,
    noun: &str,
) -> ChartSpec {
    let bars = truncation.apply(aggregate::rank(subset, dim));
    let title = match truncation {
        Truncation::All => format!("{noun} by FSN Count"),
        Truncation::Top(n) => format!("Top {n} {noun} by FSN Count"),
    };

    ChartSpec {
        title,
        x_label: dim.label().to_string(),
        y_label: COUNT_LABEL.to_string(),
        rotate_x_labels: true,
        show_legend: false,
        height: CHART_HEIGHT,
        kind: ChartKind::Bars(bars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(d: u32, company: &str, product: &str) -> Notice {
        Notice {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            company: company.into(),
            product: product.into(),
            category: String::new(),
            title: String::new(),
            reference_number: String::new(),
            link: String::new(),
        }
    }

    #[test]
    fn ungrouped_timeline_is_one_series() {
        let rows = vec![notice(1, "A", "X"), notice(1, "B", "Y"), notice(2, "A", "X")];
        let subset: Vec<&Notice> = rows.iter().collect();
        let chart = timeline_chart(&subset, None);
        let ChartKind::Lines(series) = &chart.kind else {
            panic!("expected lines");
        };
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "All");
        assert_eq!(series[0].points.iter().map(|p| p.1).collect::<Vec<_>>(), [2, 1]);
        assert!(!chart.show_legend);
    }

    #[test]
    fn grouped_timeline_has_series_per_company() {
        let rows = vec![notice(1, "B", "Y"), notice(1, "A", "X"), notice(2, "A", "X")];
        let subset: Vec<&Notice> = rows.iter().collect();
        let chart = timeline_chart(&subset, Some(Dimension::Company));
        let ChartKind::Lines(series) = &chart.kind else {
            panic!("expected lines");
        };
        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(series[1].points.len(), 1);
        assert!(chart.show_legend);
    }

    #[test]
    fn product_chart_truncates_and_titles() {
        let rows: Vec<Notice> = (0..15)
            .map(|i| notice(1, "A", &format!("P{i:02}")))
            .collect();
        let subset: Vec<&Notice> = rows.iter().collect();
        let chart = product_chart(&subset, Truncation::Top(TOP_PRODUCTS));
        assert_eq!(chart.title, "Top 10 Products by FSN Count");
        assert!(chart.rotate_x_labels);
        let ChartKind::Bars(bars) = &chart.kind else {
            panic!("expected bars");
        };
        assert_eq!(bars.len(), 10);
    }

    #[test]
    fn company_chart_untruncated_shows_all() {
        let rows: Vec<Notice> = (0..12)
            .map(|i| notice(1, &format!("C{i:02}"), "X"))
            .collect();
        let subset: Vec<&Notice> = rows.iter().collect();
        let chart = company_chart(&subset, Truncation::All);
        assert_eq!(chart.title, "Companies by FSN Count");
        assert_eq!(chart.x_label, "Company");
        let ChartKind::Bars(bars) = &chart.kind else {
            panic!("expected bars");
        };
        assert_eq!(bars.len(), 12);
    }

    #[test]
    fn empty_subset_gives_empty_charts() {
        let subset: Vec<&Notice> = Vec::new();
        assert!(timeline_chart(&subset, None).is_empty());
        assert!(company_chart(&subset, Truncation::All).is_empty());
        assert!(product_chart(&subset, Truncation::Top(TOP_PRODUCTS)).is_empty());
    }

    #[test]
    fn spec_serializes_to_json() {
        let rows = vec![notice(1, "A", "X")];
        let subset: Vec<&Notice> = rows.iter().collect();
        let json = company_chart(&subset, Truncation::All).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kind"]["type"], "bars");
        assert_eq!(value["kind"]["data"][0]["key"], "A");
        assert_eq!(value["kind"]["data"][0]["count"], 1);
    }
}
