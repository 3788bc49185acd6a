use crate::plotter::assembler::{format_domain_label, ChartData};
use crate::plotter::error::{PlotError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Look of the drawn chart. Defaults mirror a plain 2D line plot.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub caption: Option<String>,
    pub x_desc: String,
    pub y_desc: String,
    pub margin: u32,
    pub line_width: u32,
    pub nticks_x: usize,
    pub nticks_y: usize,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            caption: None,
            x_desc: "x".to_string(),
            y_desc: "y".to_string(),
            margin: 10,
            line_width: 2,
            nticks_x: 10,
            nticks_y: 10,
        }
    }
}

fn render_error<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

/// Splits a curve at its gaps: every run of consecutive finite samples becomes one polyline.
pub fn contiguous_runs(xs: &[f64], values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&x, y) in xs.iter().zip(values) {
        match y {
            Some(y) => current.push((x, *y)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Smallest padding added around the y range; keeps the axis in normal floats.
const MIN_Y_PAD: f64 = 1e-300;

/// Rejects an axis whose width does not fit in an `f64`; plotters cannot place ticks on it.
fn checked_span(axis: &str, lo: f64, hi: f64) -> Result<(f64, f64)> {
    if lo.is_finite() && hi.is_finite() && (hi - lo).is_finite() && lo < hi {
        Ok((lo, hi))
    } else {
        Err(PlotError::Render(format!(
            "{} values span too wide a range to draw ({:e} to {:e})",
            axis, lo, hi
        )))
    }
}

/// y range over all finite samples, padded so flat curves stay visible.
/// The padding never overflows; a span wider than `f64::MAX` is a render error.
pub fn y_range(chart_data: &ChartData) -> Result<(f64, f64)> {
    let bounds = chart_data
        .series
        .iter()
        .filter_map(|s| s.y_bounds())
        .reduce(|(lo1, hi1), (lo2, hi2)| (lo1.min(lo2), hi1.max(hi2)));
    let (lo, hi) = match bounds {
        None => return Ok((-1.0, 1.0)),
        Some(bounds) => bounds,
    };
    let magnitude = lo.abs().max(hi.abs());
    let pad = if lo == hi {
        (magnitude * 0.05).max(1.0)
    } else {
        (hi * 0.05 - lo * 0.05).max(magnitude * 1e-9).max(MIN_Y_PAD)
    };
    checked_span("y", (lo - pad).max(f64::MIN), (hi + pad).min(f64::MAX))
}

/// Draws all series of `chart_data` on `root`: one coloured line per curve, broken at gaps,
/// filled circles for constant curves, and a legend.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart_data: &ChartData,
    style: &PlotStyle,
) -> Result<()> {
    let (x_min, x_max) = chart_data.x_range().unwrap_or((0.0, 1.0));
    let (x_min, x_max) = checked_span("x", x_min, x_max)?;
    let (y_min, y_max) = y_range(chart_data)?;
    root.fill(&WHITE).map_err(render_error)?;

    let mut builder = ChartBuilder::on(root);
    if let Some(caption) = &style.caption {
        builder.caption(caption, ("sans-serif", 30));
    }
    let mut chart = builder
        .margin(style.margin)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc(style.x_desc.as_str())
        .y_desc(style.y_desc.as_str())
        .x_labels(style.nticks_x)
        .y_labels(style.nticks_y)
        .x_label_formatter(&|x| format_domain_label(*x))
        .draw()
        .map_err(render_error)?;

    for series in &chart_data.series {
        let color = series.color.to_rgb();
        let line_width = style.line_width;
        let mut runs = contiguous_runs(&chart_data.x_values, &series.values).into_iter();
        // the first run carries the legend entry, even when the curve is all gaps
        let first = runs.next().unwrap_or_default();
        chart
            .draw_series(LineSeries::new(first, color.stroke_width(line_width)))
            .map_err(render_error)?
            .label(series.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(line_width))
            });
        for run in runs {
            chart
                .draw_series(LineSeries::new(run, color.stroke_width(line_width)))
                .map_err(render_error)?;
        }
        if series.point_radius > 0 {
            let radius = series.point_radius;
            chart
                .draw_series(
                    chart_data
                        .x_values
                        .iter()
                        .zip(&series.values)
                        .filter_map(|(&x, y)| y.map(|y| Circle::new((x, y), radius, color.filled()))),
                )
                .map_err(render_error)?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_error)?;
    root.present().map_err(render_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotter::assembler::{PlotColor, Series};
    use approx::assert_relative_eq;

    fn chart(values: Vec<Vec<Option<f64>>>) -> ChartData {
        let n = values.first().map(|v| v.len()).unwrap_or(0);
        ChartData {
            labels: Vec::new(),
            x_values: (0..n).map(|i| i as f64).collect(),
            series: values
                .into_iter()
                .enumerate()
                .map(|(i, values)| Series {
                    label: format!("s{}", i),
                    color: PlotColor::for_position(i),
                    point_radius: 0,
                    values,
                })
                .collect(),
        }
    }

    #[test]
    fn test_contiguous_runs_break_at_gaps() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let values = [Some(1.0), Some(2.0), None, None, Some(5.0), Some(6.0)];
        let runs = contiguous_runs(&x, &values);
        assert_eq!(runs, vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(4.0, 5.0), (5.0, 6.0)]]);
    }

    #[test]
    fn test_contiguous_runs_all_gaps() {
        assert!(contiguous_runs(&[0.0, 1.0], &[None, None]).is_empty());
    }

    #[test]
    fn test_y_range() {
        let data = chart(vec![vec![Some(0.0), Some(10.0)], vec![None, Some(-10.0)]]);
        let (lo, hi) = y_range(&data).unwrap();
        assert_relative_eq!(lo, -11.0, epsilon = 1e-12);
        assert_relative_eq!(hi, 11.0, epsilon = 1e-12);
        let flat = chart(vec![vec![Some(2.0), Some(2.0)]]);
        assert_eq!(y_range(&flat).unwrap(), (1.0, 3.0));
        let empty = chart(vec![vec![None, None]]);
        assert_eq!(y_range(&empty).unwrap(), (-1.0, 1.0));
    }

    #[test]
    fn test_y_range_of_huge_values_stays_finite() {
        let flat = chart(vec![vec![Some(1e300), Some(1e300)]]);
        let (lo, hi) = y_range(&flat).unwrap();
        assert!(lo < 1e300 && hi > 1e300 && hi.is_finite());

        let top = chart(vec![vec![Some(f64::MAX), Some(f64::MAX)]]);
        let (lo, hi) = y_range(&top).unwrap();
        assert!(lo < hi);
        assert_eq!(hi, f64::MAX);

        let wide = chart(vec![vec![Some(1e304), Some(1.6e308)]]);
        let (lo, hi) = y_range(&wide).unwrap();
        assert!(lo < 1e304 && hi.is_finite() && (hi - lo).is_finite());
    }

    #[test]
    fn test_y_range_wider_than_f64_is_an_error() {
        let data = chart(vec![vec![Some(1.6e308), Some(1.0)], vec![Some(-1.6e308), Some(-1.0)]]);
        assert!(matches!(y_range(&data), Err(PlotError::Render(_))));
    }

    #[test]
    fn test_nearly_flat_curve_gets_a_visible_range() {
        let data = chart(vec![vec![Some(1e300), Some(1e300 * (1.0 + 1e-15))]]);
        let (lo, hi) = y_range(&data).unwrap();
        assert!((hi - lo) / 1e300 > 1e-9);
    }

    fn svg(data: &ChartData) -> Result<String> {
        let mut document = String::new();
        {
            let root = SVGBackend::with_string(&mut document, (400, 300)).into_drawing_area();
            draw_chart(&root, data, &PlotStyle::default())?;
        }
        Ok(document)
    }

    #[test]
    fn test_draw_chart_writes_svg_with_legend() {
        let mut data = chart(vec![vec![Some(0.0), Some(1.0), Some(4.0)]]);
        data.series[0].label = "y = x^2".to_string();
        let document = svg(&data).unwrap();
        assert!(document.starts_with("<svg"));
        assert!(document.contains("<polyline"));
        assert!(document.contains("y = x^2"));
    }

    #[test]
    fn test_draw_chart_splits_curve_at_gaps() {
        let joined = svg(&chart(vec![vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]]))
            .unwrap();
        let split = svg(&chart(vec![vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)]])).unwrap();
        assert_eq!(
            split.matches("<polyline").count(),
            joined.matches("<polyline").count() + 1
        );
    }

    #[test]
    fn test_draw_chart_all_gap_curve_keeps_legend_entry() {
        let mut data = chart(vec![vec![Some(1.0), Some(2.0)], vec![None, None]]);
        data.series[1].label = "y = ln(-1)".to_string();
        let document = svg(&data).unwrap();
        assert!(document.contains("y = ln(-1)"));
    }

    #[test]
    fn test_draw_chart_marks_constant_points() {
        let plain = svg(&chart(vec![vec![Some(2.0); 3]])).unwrap();
        let mut data = chart(vec![vec![Some(2.0); 3]]);
        data.series[0].point_radius = 3;
        let marked = svg(&data).unwrap();
        assert_eq!(
            marked.matches("<circle").count(),
            plain.matches("<circle").count() + 3
        );
    }

    #[test]
    fn test_draw_chart_refuses_overflowing_range() {
        let data = chart(vec![vec![Some(1.6e308), Some(-1.6e308)]]);
        assert!(matches!(svg(&data), Err(PlotError::Render(_))));
    }
}
