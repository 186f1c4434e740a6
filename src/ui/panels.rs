use std::collections::HashMap;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use fsn_dashboard::data::aggregate::rank_categories;
use fsn_dashboard::data::Summary;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Select Date Range");
            if state.date_span().is_none() {
                ui.weak("No notices");
            } else {
                egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
                    ui.label("From");
                    ui.add(DatePickerButton::new(&mut state.start_date).id_salt("start_date"));
                    ui.end_row();
                    ui.label("To");
                    ui.add(DatePickerButton::new(&mut state.end_date).id_salt("end_date"));
                    ui.end_row();
                });
                if let Err(e) = state.criteria().validate() {
                    ui.colored_label(Color32::YELLOW, format!("⚠ {e}"));
                }
            }
            ui.separator();

            // ---- Category selector ----
            ui.strong("Select Category");
            let counts: HashMap<String, usize> = rank_categories(&dataset.all())
                .into_iter()
                .map(|r| (r.key, r.count))
                .collect();
            let selected_text = match &state.category {
                Some(cat) => category_label(cat).to_string(),
                None => "All".to_string(),
            };
            egui::ComboBox::from_id_salt("category")
                .selected_text(selected_text)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut state.category, None, "All");
                    for cat in dataset.categories() {
                        let count = counts.get(cat).copied().unwrap_or(0);
                        ui.selectable_value(
                            &mut state.category,
                            Some(cat.clone()),
                            format!("{}  ({count})", category_label(cat)),
                        );
                    }
                });
            ui.separator();

            // ---- Company multi-select (collapsible) ----
            let companies = dataset.companies();
            let header_text = format!(
                "Select Companies  ({}/{})",
                state.selected_companies.len(),
                companies.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("companies")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("Clear").clicked() {
                            state.clear_companies();
                        }
                        ui.weak("none selected = all companies");
                    });

                    for company in companies {
                        let mut checked = state.selected_companies.contains(company);
                        let text = RichText::new(company.as_str())
                            .color(state.color_map.color_for(company));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_company(company);
                        }
                    }
                });
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

fn category_label(cat: &str) -> &str {
    if cat.is_empty() {
        "(uncategorised)"
    } else {
        cat
    }
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

/// Headline counts for the filtered subset.
pub fn kpi_row(ui: &mut Ui, summary: &Summary) {
    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total FSNs", summary.total);
        metric(&mut cols[1], "Companies", summary.companies);
        metric(&mut cols[2], "Products", summary.products);
        metric(&mut cols[3], "Categories", summary.categories);
    });
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.group(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(label);
            ui.heading(RichText::new(value.to_string()).strong());
        });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_reload = state.data_path.is_some();
            if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} notices loaded, {} visible",
                ds.len(),
                state.visible_count
            ));
            if ds.dropped() > 0 {
                ui.weak(format!("({} rows without company/product skipped)", ds.dropped()));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open notice data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
