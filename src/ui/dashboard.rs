use eframe::egui::{self, Color32, ScrollArea, Ui};
use fsn_dashboard::chart::{self, ChartSpec, TOP_PRODUCTS};
use fsn_dashboard::data::{aggregate, filter, Dimension, DimensionMetrics, Truncation};

use crate::state::{AppState, ChartTab};
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// Central panel: KPIs, chart tabs, detail table
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view notices  (File → Open…)");
        });
        return;
    };

    let criteria = state.criteria();
    let subset = filter::filter(&dataset, &criteria);
    state.visible_count = subset.len();

    ui.heading("Field Safety Notice (FSN) KPI Dashboard");
    panels::kpi_row(ui, &aggregate::summarize(&subset));
    ui.separator();

    if subset.is_empty() {
        ui.colored_label(Color32::YELLOW, "No data for the selected filters.");
        return;
    }

    let spec = match state.tab {
        // One line per company once the user has picked companies to compare.
        ChartTab::Time => {
            let group_by = (!criteria.companies.is_empty()).then_some(Dimension::Company);
            chart::timeline_chart(&subset, group_by)
        }
        ChartTab::Company => chart::company_chart(&subset, state.company_truncation),
        ChartTab::Product => chart::product_chart(&subset, Truncation::Top(TOP_PRODUCTS)),
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, ChartTab::Time, "Time Analysis");
        ui.selectable_value(&mut state.tab, ChartTab::Company, "Company Analysis");
        ui.selectable_value(&mut state.tab, ChartTab::Product, "Product Analysis");
        ui.separator();
        if ui.button("Export chart…").clicked() {
            export_chart(state, &spec);
        }
    });
    charts::chart_view(ui, &spec, &state.color_map);
    match state.tab {
        ChartTab::Time => {}
        ChartTab::Company => metrics_grid(ui, "Company", &aggregate::company_metrics(&subset)),
        ChartTab::Product => metrics_grid(ui, "Product", &aggregate::product_metrics(&subset)),
    }
    ui.separator();

    ui.heading("FSN Details");
    let mut rows = subset;
    table::sort_rows(&mut rows, state.table_sort);
    table::detail_table(ui, &rows, &mut state.table_sort);
}

fn metrics_grid(ui: &mut Ui, noun: &str, rows: &[DimensionMetrics]) {
    egui::CollapsingHeader::new(format!("{noun} metrics"))
        .id_salt(noun)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::vertical().max_height(200.0).show(ui, |ui: &mut Ui| {
                egui::Grid::new((noun, "metrics")).striped(true).show(ui, |ui: &mut Ui| {
                    ui.strong(noun);
                    ui.strong("FSNs");
                    ui.strong("Categories");
                    ui.end_row();
                    for row in rows {
                        ui.label(row.key.as_str());
                        ui.label(row.notice_count.to_string());
                        ui.label(row.distinct_categories.to_string());
                        ui.end_row();
                    }
                });
            });
        });
}

fn export_chart(state: &mut AppState, spec: &ChartSpec) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export chart specification")
        .add_filter("JSON", &["json"])
        .set_file_name("chart.json")
        .save_file()
    else {
        return;
    };

    let result = spec
        .to_json()
        .map_err(anyhow::Error::from)
        .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));
    match result {
        Ok(()) => log::info!("Exported '{}' to {}", spec.title, path.display()),
        Err(e) => {
            log::error!("Failed to export chart: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
