/*
A tool for pretty printing what was plotted: one row per series.
*/
use crate::plotter::assembler::{ChartData, Series};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, PartialEq, Tabled)]
pub struct SeriesSummary {
    #[tabled(rename = "series")]
    label: String,
    color: String,
    points: usize,
    gaps: usize,
    #[tabled(rename = "y min")]
    y_min: String,
    #[tabled(rename = "y max")]
    y_max: String,
}

fn format_bound(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "-".to_string())
}

impl From<&Series> for SeriesSummary {
    fn from(series: &Series) -> Self {
        let bounds = series.y_bounds();
        SeriesSummary {
            label: series.label.clone(),
            color: series.color.to_string(),
            points: series.values.len(),
            gaps: series.gap_count(),
            y_min: format_bound(bounds.map(|(lo, _)| lo)),
            y_max: format_bound(bounds.map(|(_, hi)| hi)),
        }
    }
}

pub fn chart_summary(chart_data: &ChartData) -> Vec<SeriesSummary> {
    chart_data.series.iter().map(SeriesSummary::from).collect()
}

pub fn summary_table(chart_data: &ChartData) -> String {
    let mut table = Table::new(chart_summary(chart_data));
    table.with(Style::modern_rounded());
    table.to_string()
}
