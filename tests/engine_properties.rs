use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use fsn_dashboard::data::aggregate::{aggregate_timeline, rank_companies, rank_products};
use fsn_dashboard::data::filter::{filter, filter_rows};
use fsn_dashboard::data::{Dataset, Dimension, FilterCriteria, Notice, RawNotice};
use proptest::prelude::*;

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset as i64)
}

/// A raw row over a small value space so collisions (ties, shared dates)
/// are common. Company and product may be blank.
fn raw_row() -> impl Strategy<Value = RawNotice> {
    (
        0u32..20,
        prop::option::of(prop::sample::select(vec!["A", "B", "C", "D", " ", ""])),
        prop::option::of(prop::sample::select(vec!["X", "Y", "Z", "  "])),
        prop::sample::select(vec!["c1", "c2", ""]),
    )
        .prop_map(|(d, company, product, category)| RawNotice {
            date: day(d),
            company: company.map(str::to_string),
            product: product.map(str::to_string),
            category: category.to_string(),
            ..Default::default()
        })
}

fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(raw_row(), 0..60).prop_map(Dataset::from_records)
}

fn criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        0u32..20,
        0u32..20,
        prop::collection::btree_set(prop::sample::select(vec!["A", "B", "C", "D", "Z"]), 0..3),
        prop::option::of(prop::sample::select(vec!["c1", "c2", "", "c9"])),
    )
        .prop_map(|(a, b, companies, category)| {
            let mut c = FilterCriteria::new(day(a.min(b)), day(a.max(b))).with_companies(companies);
            c.category = category.map(str::to_string);
            c
        })
}

proptest! {
    #[test]
    fn cleaning_leaves_no_blank_company_or_product(ds in dataset()) {
        for n in ds.notices() {
            prop_assert!(!n.company.trim().is_empty());
            prop_assert!(!n.product.trim().is_empty());
            prop_assert_eq!(n.company.trim(), n.company.as_str());
        }
    }

    #[test]
    fn date_only_filter_is_exactly_the_inclusive_range(ds in dataset(), a in 0u32..20, b in 0u32..20) {
        let (start, end) = (day(a.min(b)), day(a.max(b)));
        let out = filter(&ds, &FilterCriteria::new(start, end));
        let expected: Vec<&Notice> = ds
            .notices()
            .iter()
            .filter(|n| n.date >= start && n.date <= end)
            .collect();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn company_filter_has_no_false_positives_or_negatives(ds in dataset(), c in criteria()) {
        let out = filter(&ds, &c);
        for n in &out {
            if !c.companies.is_empty() {
                prop_assert!(c.companies.contains(&n.company));
            }
        }
        let expected = ds
            .notices()
            .iter()
            .filter(|n| n.date >= c.start_date && n.date <= c.end_date)
            .filter(|n| c.companies.is_empty() || c.companies.contains(&n.company))
            .filter(|n| c.category.as_ref().map_or(true, |cat| &n.category == cat))
            .count();
        prop_assert_eq!(out.len(), expected);
    }

    #[test]
    fn filtering_is_idempotent(ds in dataset(), c in criteria()) {
        let once = filter(&ds, &c);
        let twice = filter_rows(once.iter().copied(), &c);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn timeline_counts_sum_to_subset_size(ds in dataset(), c in criteria()) {
        let subset = filter(&ds, &c);
        let timeline = aggregate_timeline(&subset, None);
        prop_assert_eq!(timeline.iter().map(|r| r.count).sum::<usize>(), subset.len());

        let dates: BTreeSet<NaiveDate> = subset.iter().map(|n| n.date).collect();
        prop_assert_eq!(timeline.len(), dates.len());
        prop_assert!(timeline.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn grouped_timeline_sums_to_ungrouped(ds in dataset(), c in criteria()) {
        let subset = filter(&ds, &c);
        let ungrouped = aggregate_timeline(&subset, None);
        let grouped = aggregate_timeline(&subset, Some(Dimension::Company));

        let mut per_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for row in &grouped {
            prop_assert!(row.count > 0);
            *per_date.entry(row.date).or_default() += row.count;
        }
        let flat: BTreeMap<NaiveDate, usize> = ungrouped.iter().map(|r| (r.date, r.count)).collect();
        prop_assert_eq!(per_date, flat);
    }

    #[test]
    fn rankings_are_complete_and_non_increasing(ds in dataset(), c in criteria()) {
        let subset = filter(&ds, &c);
        for (ranking, dim) in [
            (rank_companies(&subset), Dimension::Company),
            (rank_products(&subset), Dimension::Product),
        ] {
            prop_assert_eq!(ranking.iter().map(|r| r.count).sum::<usize>(), subset.len());
            prop_assert!(ranking.windows(2).all(|w| w[0].count >= w[1].count));

            let keys: BTreeSet<&str> = ranking.iter().map(|r| r.key.as_str()).collect();
            prop_assert_eq!(keys.len(), ranking.len());
            let distinct: BTreeSet<&str> = subset.iter().map(|n| n.value(dim)).collect();
            prop_assert_eq!(keys, distinct);
        }
    }
}

// ---------------------------------------------------------------------------
// Worked scenarios
// ---------------------------------------------------------------------------

fn scenario() -> Dataset {
    let row = |d: u32, company: &str, product: &str, category: &str| RawNotice {
        date: day(d),
        company: Some(company.into()),
        product: Some(product.into()),
        category: category.into(),
        ..Default::default()
    };
    Dataset::from_records(vec![
        row(0, "A", "X", "c1"),
        row(0, "B", "Y", "c2"),
        row(1, "A", "X", "c1"),
    ])
}

fn pairs(ranking: &[fsn_dashboard::data::RankedCount]) -> Vec<(&str, usize)> {
    ranking.iter().map(|r| (r.key.as_str(), r.count)).collect()
}

#[test]
fn scenario_unrestricted() {
    let ds = scenario();
    let subset = filter(&ds, &FilterCriteria::new(day(0), day(1)));
    assert_eq!(subset.len(), 3);
    assert_eq!(pairs(&rank_companies(&subset)), [("A", 2), ("B", 1)]);
    let timeline: Vec<(NaiveDate, usize)> = aggregate_timeline(&subset, None)
        .into_iter()
        .map(|r| (r.date, r.count))
        .collect();
    assert_eq!(timeline, [(day(0), 2), (day(1), 1)]);
}

#[test]
fn scenario_category_c2() {
    let ds = scenario();
    let subset = filter(&ds, &FilterCriteria::new(day(0), day(1)).with_category("c2"));
    assert_eq!(subset.len(), 1);
    assert_eq!(subset[0].company, "B");
    assert_eq!(pairs(&rank_companies(&subset)), [("B", 1)]);
    let timeline: Vec<(NaiveDate, usize)> = aggregate_timeline(&subset, None)
        .into_iter()
        .map(|r| (r.date, r.count))
        .collect();
    assert_eq!(timeline, [(day(0), 1)]);
}

#[test]
fn scenario_unknown_company() {
    let ds = scenario();
    let subset = filter(&ds, &FilterCriteria::new(day(0), day(1)).with_companies(["Z"]));
    assert!(subset.is_empty());
    assert!(aggregate_timeline(&subset, None).is_empty());
    assert!(aggregate_timeline(&subset, Some(Dimension::Company)).is_empty());
    assert!(rank_companies(&subset).is_empty());
    assert!(rank_products(&subset).is_empty());
}
