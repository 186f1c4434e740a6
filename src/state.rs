use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use fsn_dashboard::data::cache::DatasetCache;
use fsn_dashboard::data::{loader, Dataset, FilterCriteria, Truncation};

use crate::color::ColorMap;
use crate::config::Cli;
use crate::ui::table::TableSort;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which chart tab is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    Time,
    Company,
    Product,
}

/// The full UI state, independent of rendering.
///
/// Filter widgets write into the selection fields; a fresh
/// [`FilterCriteria`] is built from them every frame.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Source of `dataset`.
    pub data_path: Option<PathBuf>,

    /// Snapshot cache; bumping `load_version` forces a re-read.
    cache: DatasetCache,
    load_version: u64,

    /// Automatic refresh stops after a failed load until the next reload.
    auto_refresh: bool,

    /// Date range selection (inclusive).
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Selected companies; empty means all.
    pub selected_companies: BTreeSet<String>,

    /// Selected category; None means all.
    pub category: Option<String>,

    /// Company chart size policy.
    pub company_truncation: Truncation,

    /// Per-company series colours.
    pub color_map: ColorMap,

    pub tab: ChartTab,
    pub table_sort: TableSort,

    /// Size of the filtered subset from the last frame.
    pub visible_count: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(cli: &Cli) -> Self {
        Self {
            dataset: None,
            data_path: None,
            cache: DatasetCache::new(cli.cache_ttl()),
            load_version: 0,
            auto_refresh: false,
            start_date: NaiveDate::MIN,
            end_date: NaiveDate::MIN,
            selected_companies: BTreeSet::new(),
            category: None,
            company_truncation: cli.company_truncation(),
            color_map: ColorMap::default(),
            tab: ChartTab::default(),
            table_sort: TableSort::default(),
            visible_count: 0,
            status_message: None,
        }
    }

    /// Open a (possibly different) dataset file and reset all filters.
    pub fn open(&mut self, path: &Path) {
        self.load_version += 1;
        match self.cache.get_or_load(path, self.load_version, loader::load_file) {
            Ok(dataset) => {
                self.data_path = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                self.auto_refresh = false;
            }
        }
    }

    /// Re-read the current file now, keeping the filter selections.
    pub fn reload(&mut self) {
        self.load_version += 1;
        self.auto_refresh = true;
        self.refresh();
    }

    /// Pick up a new snapshot once the cached one has expired.
    ///
    /// Company and category selections that no longer exist are dropped.
    /// A date range still covering the old span follows the new span;
    /// a narrowed range is clamped into it.
    pub fn refresh(&mut self) {
        if !self.auto_refresh {
            return;
        }
        let Some(path) = self.data_path.clone() else {
            return;
        };
        match self.cache.get_or_load(&path, self.load_version, loader::load_file) {
            Ok(dataset) => {
                let changed = self
                    .dataset
                    .as_ref()
                    .map_or(true, |current| !Arc::ptr_eq(current, &dataset));
                if changed {
                    log::info!("Refreshed dataset from {}", path.display());
                    let previous_span = self.dataset.as_ref().and_then(|d| d.date_span());
                    self.retain_selection(&dataset, previous_span);
                    self.color_map = ColorMap::new(dataset.companies());
                    self.dataset = Some(dataset);
                    self.status_message = None;
                }
            }
            Err(e) => {
                log::error!("Failed to refresh {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                self.auto_refresh = false;
            }
        }
    }

    /// How long a loaded snapshot is reused before `refresh` reads again.
    pub fn refresh_interval(&self) -> Duration {
        self.cache.ttl()
    }

    /// Date span of the loaded dataset; `None` when nothing is loaded or
    /// every row was dropped.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.dataset.as_ref().and_then(|d| d.date_span())
    }

    /// Ingest a newly loaded dataset and select everything.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.reset_filters_for(&dataset);
        self.color_map = ColorMap::new(dataset.companies());
        self.dataset = Some(dataset);
        self.status_message = None;
        self.auto_refresh = true;
    }

    /// Back to the full date span, all companies, all categories.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = self.dataset.clone() {
            self.reset_filters_for(&ds);
        }
    }

    fn reset_filters_for(&mut self, dataset: &Dataset) {
        let all = FilterCriteria::spanning(dataset);
        self.start_date = all.start_date;
        self.end_date = all.end_date;
        self.selected_companies.clear();
        self.category = None;
    }

    fn retain_selection(
        &mut self,
        dataset: &Dataset,
        previous_span: Option<(NaiveDate, NaiveDate)>,
    ) {
        if let Some((lo, hi)) = dataset.date_span() {
            let range = (self.start_date, self.end_date);
            if previous_span.map_or(true, |span| span == range) {
                self.start_date = lo;
                self.end_date = hi;
            } else {
                self.start_date = self.start_date.clamp(lo, hi);
                self.end_date = self.end_date.clamp(lo, hi);
            }
        }

        let companies = dataset.companies();
        self.selected_companies
            .retain(|c| companies.binary_search(c).is_ok());
        if let Some(cat) = &self.category {
            if dataset.categories().binary_search(cat).is_err() {
                self.category = None;
            }
        }
    }

    /// The filter for the current selections.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            start_date: self.start_date,
            end_date: self.end_date,
            companies: self.selected_companies.clone(),
            category: self.category.clone(),
        }
    }

    /// Toggle a single company in the selection.
    pub fn toggle_company(&mut self, company: &str) {
        if !self.selected_companies.remove(company) {
            self.selected_companies.insert(company.to_string());
        }
    }

    /// Clear the company selection (show all companies).
    pub fn clear_companies(&mut self) {
        self.selected_companies.clear();
    }
}
