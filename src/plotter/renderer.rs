use crate::plotter::assembler::ChartData;
use crate::plotter::error::{PlotError, Result};
use crate::Utils::plots::{PlotStyle, draw_chart};
use log::{debug, info};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// A drawn chart that holds on to some resource until it is destroyed.
pub trait ChartHandle {
    fn destroy(&mut self);
}

/// Draws assembled chart data and hands back the resulting chart.
pub trait ChartRenderer {
    type Chart: ChartHandle;

    fn render(&mut self, chart_data: &ChartData) -> Result<Self::Chart>;
}

/// Owns at most one live chart. The previous chart is destroyed before a new one is stored,
/// and the current one when the slot is dropped.
pub struct ChartSlot<C: ChartHandle> {
    current: Option<C>,
}

impl<C: ChartHandle> Default for ChartSlot<C> {
    fn default() -> Self {
        ChartSlot { current: None }
    }
}

impl<C: ChartHandle> ChartSlot<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, chart: C) {
        self.clear();
        self.current = Some(chart);
    }

    pub fn clear(&mut self) {
        if let Some(mut chart) = self.current.take() {
            chart.destroy();
        }
    }

    pub fn get(&self) -> Option<&C> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

impl<C: ChartHandle> Drop for ChartSlot<C> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// PNG file written by [`BitmapRenderer`].
#[derive(Debug)]
pub struct BitmapChart {
    path: PathBuf,
    series_count: usize,
    live: bool,
}

impl BitmapChart {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn series_count(&self) -> usize {
        self.series_count
    }

    pub fn is_live(&self) -> bool {
        self.live
    }
}

impl ChartHandle for BitmapChart {
    fn destroy(&mut self) {
        debug!("releasing chart {}", self.path.display());
        self.live = false;
    }
}

/// Draws into a bitmap file; the format follows the file extension.
pub struct BitmapRenderer {
    pub path: PathBuf,
    pub size: (u32, u32),
    pub style: PlotStyle,
}

impl BitmapRenderer {
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        BitmapRenderer {
            path: path.into(),
            size,
            style: PlotStyle::default(),
        }
    }
}

impl ChartRenderer for BitmapRenderer {
    type Chart = BitmapChart;

    fn render(&mut self, chart_data: &ChartData) -> Result<BitmapChart> {
        {
            let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
            draw_chart(&root, chart_data, &self.style)?;
        }
        info!(
            "chart with {} series written to {}",
            chart_data.series.len(),
            self.path.display()
        );
        Ok(BitmapChart {
            path: self.path.clone(),
            series_count: chart_data.series.len(),
            live: true,
        })
    }
}

/// SVG document kept in memory by [`SvgRenderer`]. Destroying it drops the markup.
#[derive(Debug, Default)]
pub struct SvgChart {
    document: String,
}

impl SvgChart {
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.document)
            .map_err(|e| PlotError::Render(format!("{}: {}", path.display(), e)))
    }
}

impl ChartHandle for SvgChart {
    fn destroy(&mut self) {
        self.document.clear();
    }
}

pub struct SvgRenderer {
    pub size: (u32, u32),
    pub style: PlotStyle,
}

impl SvgRenderer {
    pub fn new(size: (u32, u32)) -> Self {
        SvgRenderer {
            size,
            style: PlotStyle::default(),
        }
    }
}

impl ChartRenderer for SvgRenderer {
    type Chart = SvgChart;

    fn render(&mut self, chart_data: &ChartData) -> Result<SvgChart> {
        let mut document = String::new();
        {
            let root = SVGBackend::with_string(&mut document, self.size).into_drawing_area();
            draw_chart(&root, chart_data, &self.style)?;
        }
        debug!("svg chart of {} bytes", document.len());
        Ok(SvgChart { document })
    }
}
