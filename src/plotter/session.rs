use crate::plotter::assembler::{ChartData, assemble};
use crate::plotter::error::{PlotError, Result};
use crate::plotter::input::{DomainInput, ExpressionList, validate};
use crate::plotter::renderer::{ChartRenderer, ChartSlot};
use crate::plotter::sampler::sample_all;
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotStatus {
    Idle,
    Plotting,
}

/// State of one plotting form: the expression rows, the raw domain fields, the status,
/// the single error banner and the chart currently shown.
pub struct PlotSession<R: ChartRenderer> {
    expressions: ExpressionList,
    domain: DomainInput,
    status: PlotStatus,
    error: Option<PlotError>,
    chart_data: Option<ChartData>,
    chart: ChartSlot<R::Chart>,
    renderer: R,
}

impl<R: ChartRenderer> PlotSession<R> {
    /// A session with the default expression and domain.
    pub fn new(renderer: R) -> Self {
        Self::with_inputs(renderer, ExpressionList::default(), DomainInput::default())
    }

    pub fn with_inputs(renderer: R, expressions: ExpressionList, domain: DomainInput) -> Self {
        PlotSession {
            expressions,
            domain,
            status: PlotStatus::Idle,
            error: None,
            chart_data: None,
            chart: ChartSlot::new(),
            renderer,
        }
    }

    /// Plots the initial inputs, as a freshly shown form does.
    pub fn mount(&mut self) -> Result<()> {
        info!("plot session mounted");
        self.submit()
    }

    pub fn add_expression(&mut self) -> u64 {
        self.expressions.add()
    }

    pub fn remove_expression(&mut self, id: u64) -> bool {
        self.expressions.remove(id)
    }

    pub fn set_expression(&mut self, id: u64, text: impl Into<String>) -> bool {
        self.expressions.set_text(id, text)
    }

    pub fn expressions(&self) -> &ExpressionList {
        &self.expressions
    }

    pub fn set_min_x(&mut self, text: impl Into<String>) {
        self.domain.min_x = text.into();
    }

    pub fn set_max_x(&mut self, text: impl Into<String>) {
        self.domain.max_x = text.into();
    }

    pub fn set_sample_count(&mut self, text: impl Into<String>) {
        self.domain.sample_count = text.into();
    }

    pub fn domain_input(&self) -> &DomainInput {
        &self.domain
    }

    pub fn status(&self) -> PlotStatus {
        self.status
    }

    pub fn can_submit(&self) -> bool {
        self.status == PlotStatus::Idle
    }

    /// The banner text; at most one message is shown at a time.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    pub fn last_error(&self) -> Option<&PlotError> {
        self.error.as_ref()
    }

    pub fn chart(&self) -> Option<&R::Chart> {
        self.chart.get()
    }

    /// Data behind the chart currently shown.
    pub fn chart_data(&self) -> Option<&ChartData> {
        self.chart_data.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Runs validate, sample, assemble and render. Any failure replaces the banner and leaves
    /// the previous chart alone, except `NoValidExpressions`, which clears it. Ignored while
    /// a plot is in progress.
    pub fn submit(&mut self) -> Result<()> {
        if !self.can_submit() {
            debug!("plot already in progress, submit ignored");
            return Ok(());
        }
        self.status = PlotStatus::Plotting;
        info!("plotting started");
        let outcome = self.run_pipeline();
        self.status = PlotStatus::Idle;
        match outcome {
            Ok(()) => {
                info!("plotting finished");
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!("plotting failed: {}", e);
                if e == PlotError::NoValidExpressions {
                    self.clear_chart();
                }
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn run_pipeline(&mut self) -> Result<()> {
        let request = validate(&self.expressions, &self.domain)?;
        let curves = sample_all(&request)?;
        let chart_data = assemble(&curves)?;
        self.clear_chart();
        let chart = self.renderer.render(&chart_data)?;
        self.chart.replace(chart);
        self.chart_data = Some(chart_data);
        Ok(())
    }

    fn clear_chart(&mut self) {
        self.chart.clear();
        self.chart_data = None;
    }
}
