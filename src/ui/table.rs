use std::cmp::Ordering;

use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};
use fsn_dashboard::data::Notice;

// ---------------------------------------------------------------------------
// Detail table sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Date,
    Company,
    Product,
    Title,
    Category,
    ReferenceNumber,
}

impl TableColumn {
    pub const ALL: [TableColumn; 6] = [
        TableColumn::Date,
        TableColumn::Company,
        TableColumn::Product,
        TableColumn::Title,
        TableColumn::Category,
        TableColumn::ReferenceNumber,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TableColumn::Date => "Date",
            TableColumn::Company => "Company",
            TableColumn::Product => "Product",
            TableColumn::Title => "Title",
            TableColumn::Category => "Category",
            TableColumn::ReferenceNumber => "Reference",
        }
    }

    fn compare(self, a: &Notice, b: &Notice) -> Ordering {
        match self {
            TableColumn::Date => a.date.cmp(&b.date),
            TableColumn::Company => a.company.cmp(&b.company),
            TableColumn::Product => a.product.cmp(&b.product),
            TableColumn::Title => a.title.cmp(&b.title),
            TableColumn::Category => a.category.cmp(&b.category),
            TableColumn::ReferenceNumber => a.reference_number.cmp(&b.reference_number),
        }
    }
}

/// Sort order of the detail table. Newest notices first by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub column: TableColumn,
    pub descending: bool,
}

impl Default for TableSort {
    fn default() -> Self {
        Self {
            column: TableColumn::Date,
            descending: true,
        }
    }
}

impl TableSort {
    /// Header click: flip direction on the active column, otherwise switch
    /// to `column` (dates descending, text ascending).
    pub fn click(&mut self, column: TableColumn) {
        if self.column == column {
            self.descending = !self.descending;
        } else {
            self.column = column;
            self.descending = column == TableColumn::Date;
        }
    }
}

/// Stable sort for display; equal keys keep their filtered order.
pub fn sort_rows(rows: &mut [&Notice], sort: TableSort) {
    rows.sort_by(|a, b| {
        let ord = sort.column.compare(a, b);
        if sort.descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

// ---------------------------------------------------------------------------
// Detail table widget
// ---------------------------------------------------------------------------

/// Render the notice table. Header buttons update `sort` for the next frame.
pub fn detail_table(ui: &mut Ui, rows: &[&Notice], sort: &mut TableSort) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .min_scrolled_height(0.0)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto())
        .columns(Column::initial(160.0).at_least(60.0).clip(true), 2)
        .column(Column::initial(280.0).at_least(80.0).clip(true))
        .columns(Column::initial(120.0).at_least(60.0).clip(true), 2)
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for column in TableColumn::ALL {
                header.col(|ui| {
                    let marker = match (sort.column == column, sort.descending) {
                        (true, true) => " ⏷",
                        (true, false) => " ⏶",
                        (false, _) => "",
                    };
                    if ui.button(format!("{}{marker}", column.label())).clicked() {
                        sort.click(column);
                    }
                });
            }
            header.col(|ui| {
                ui.strong("PDF Link");
            });
        })
        .body(|body| {
            body.rows(20.0, rows.len(), |mut row| {
                let n = rows[row.index()];
                row.col(|ui| {
                    ui.label(n.date.format("%Y-%m-%d").to_string());
                });
                row.col(|ui| {
                    ui.label(n.company.as_str());
                });
                row.col(|ui| {
                    ui.label(n.product.as_str());
                });
                row.col(|ui| {
                    ui.label(n.title.as_str()).on_hover_text(n.title.as_str());
                });
                row.col(|ui| {
                    ui.label(n.category.as_str());
                });
                row.col(|ui| {
                    ui.label(n.reference_number.as_str());
                });
                row.col(|ui| {
                    if !n.link.is_empty() {
                        ui.hyperlink_to("Open PDF", &n.link);
                    }
                });
            });
        });
}
