use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{uniform_grid_spacer, Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use fsn_dashboard::chart::{ChartKind, ChartSpec, Series};
use fsn_dashboard::data::RankedCount;

use crate::color::ColorMap;

/// Longest category label drawn under a slanted-label bar chart.
const SHORT_LABEL_CHARS: usize = 14;

// ---------------------------------------------------------------------------
// Chart rendering (central panel)
// ---------------------------------------------------------------------------

/// Draw a chart spec with egui_plot.
pub fn chart_view(ui: &mut Ui, spec: &ChartSpec, colors: &ColorMap) {
    ui.label(RichText::new(&spec.title).strong().size(16.0));

    if spec.is_empty() {
        ui.colored_label(Color32::YELLOW, "Nothing to plot.");
        return;
    }

    match &spec.kind {
        ChartKind::Lines(series) => line_chart(ui, spec, series, colors),
        ChartKind::Bars(bars) => bar_chart(ui, spec, bars),
    }
}

fn line_chart(ui: &mut Ui, spec: &ChartSpec, series: &[Series], colors: &ColorMap) {
    let mut plot = Plot::new("timeline_chart")
        .height(spec.height)
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .x_axis_formatter(|mark, _range| date_label(mark.value))
        .label_formatter(|name, value| {
            let date = date_label(value.x);
            if name.is_empty() {
                format!("{date}\n{:.0}", value.y)
            } else {
                format!("{name}\n{date}\n{:.0}", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if spec.show_legend {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for s in series {
            let color = colors.color_for(&s.name);
            let xy: Vec<[f64; 2]> = s
                .points
                .iter()
                .map(|&(date, count)| [day_number(date), count as f64])
                .collect();

            plot_ui.line(
                Line::new(PlotPoints::from(xy.clone()))
                    .name(&s.name)
                    .color(color)
                    .width(1.5),
            );
            // Sparse dates read better with markers on each point.
            plot_ui.points(Points::new(PlotPoints::from(xy)).name(&s.name).color(color).radius(2.5));
        }
    });
}

fn bar_chart(ui: &mut Ui, spec: &ChartSpec, bars: &[RankedCount]) {
    let labels: Vec<String> = bars
        .iter()
        .map(|b| axis_label(&b.key, spec.rotate_x_labels))
        .collect();

    let chart = BarChart::new(
        bars.iter()
            .enumerate()
            .map(|(i, b)| Bar::new(i as f64, b.count as f64).name(&b.key).width(0.7))
            .collect(),
    )
    .color(Color32::LIGHT_BLUE);

    Plot::new(spec.title.as_str())
        .height(spec.height)
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if i < 0.0 || (mark.value - i).abs() > 1e-6 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

/// Plot x coordinate of a date.
fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn date_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// egui_plot cannot slant tick labels, so long labels are shortened
/// instead; the full name shows on hover.
fn axis_label(key: &str, shorten: bool) -> String {
    if !shorten || key.chars().count() <= SHORT_LABEL_CHARS {
        return key.to_string();
    }
    let mut short: String = key.chars().take(SHORT_LABEL_CHARS - 1).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_axis_round_trips_days() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(date_label(day_number(d)), "2024-02-29");
        assert_eq!(date_label(day_number(d) + 0.2), "2024-02-29");
    }

    #[test]
    fn long_labels_are_shortened_only_when_slanted() {
        let long = "Very Long Medical Device Manufacturer GmbH";
        assert_eq!(axis_label(long, false), long);
        let short = axis_label(long, true);
        assert_eq!(short.chars().count(), SHORT_LABEL_CHARS);
        assert!(short.ends_with('…'));
        assert_eq!(axis_label("Acme", true), "Acme");
    }
}
