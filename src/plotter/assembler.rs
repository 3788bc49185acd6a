use crate::plotter::error::{PlotError, Result};
use crate::plotter::sampler::SampledCurve;
use log::info;
use plotters::style::RGBColor;
use strum_macros::{Display, EnumIter};

/// Marker radius for curves that do not depend on `x`; curves of `x` draw no markers.
pub const CONSTANT_POINT_RADIUS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum PlotColor {
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    DarkRed,
    DarkGreen,
    DarkBlue,
    Orange,
    Purple,
    Brown,
}

impl PlotColor {
    /// Convert PlotColor enum to the plotters colour type
    pub fn to_rgb(self) -> RGBColor {
        match self {
            PlotColor::Red => RGBColor(255, 0, 0),
            PlotColor::Green => RGBColor(0, 204, 0),
            PlotColor::Blue => RGBColor(0, 0, 255),
            PlotColor::Cyan => RGBColor(0, 191, 191),
            PlotColor::Magenta => RGBColor(255, 0, 255),
            PlotColor::DarkRed => RGBColor(128, 0, 0),
            PlotColor::DarkGreen => RGBColor(0, 128, 0),
            PlotColor::DarkBlue => RGBColor(0, 0, 128),
            PlotColor::Orange => RGBColor(255, 128, 0),
            PlotColor::Purple => RGBColor(128, 0, 128),
            PlotColor::Brown => RGBColor(153, 77, 26),
        }
    }

    /// Returns a default sequence of colors for automatic plot coloring
    pub fn default_sequence() -> Vec<PlotColor> {
        vec![
            PlotColor::Red,
            PlotColor::Blue,
            PlotColor::Green,
            PlotColor::Orange,
            PlotColor::Purple,
            PlotColor::Cyan,
            PlotColor::Magenta,
            PlotColor::Brown,
            PlotColor::DarkRed,
            PlotColor::DarkGreen,
            PlotColor::DarkBlue,
        ]
    }

    /// palette colour for the curve at `position` among the plotted curves
    pub fn for_position(position: usize) -> PlotColor {
        let palette = PlotColor::default_sequence();
        palette[position % palette.len()]
    }
}

/// One drawable curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: PlotColor,
    pub point_radius: u32,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied()
    }

    pub fn gap_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// smallest and largest finite value, `None` if the curve is all gaps
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        self.finite_values().fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }
}

/// Everything a renderer needs for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub x_values: Vec<f64>,
    pub series: Vec<Series>,
}

impl ChartData {
    pub fn x_range(&self) -> Option<(f64, f64)> {
        Some((*self.x_values.first()?, *self.x_values.last()?))
    }
}

pub fn format_domain_label(x: f64) -> String {
    format!("{:.2}", x)
}

/// Turns sampled curves into chart data. Colours follow the curve's position, not its id.
pub fn assemble(curves: &[SampledCurve]) -> Result<ChartData> {
    let first = curves.first().ok_or(PlotError::NoValidExpressions)?;
    let x_values: Vec<f64> = first.points.iter().map(|p| p.x).collect();
    let labels = x_values.iter().map(|&x| format_domain_label(x)).collect();
    let series: Vec<Series> = curves
        .iter()
        .enumerate()
        .map(|(position, curve)| Series {
            label: format!("y = {}", curve.expression),
            color: PlotColor::for_position(position),
            point_radius: if curve.depends_on_x {
                0
            } else {
                CONSTANT_POINT_RADIUS
            },
            values: curve.values(),
        })
        .collect();
    info!("assembled {} series over {} points", series.len(), x_values.len());
    Ok(ChartData {
        labels,
        x_values,
        series,
    })
}
