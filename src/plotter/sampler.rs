use crate::plotter::error::{PlotError, Result};
use crate::plotter::input::{Domain, PlotRequest};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::DEFAULT_ARGUMENT;
use log::{debug, info};

/// One evaluation of a curve. `y` is `None` where the value was not a finite number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: Option<f64>,
}

/// Samples of one expression over the whole domain, in x order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    pub expression: String,
    pub depends_on_x: bool,
    pub points: Vec<SamplePoint>,
}

impl SampledCurve {
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|p| p.y.is_none()).count()
    }
}

/// Compiles `text` and evaluates it at every domain point.
pub fn sample_expression(text: &str, domain: &Domain) -> Result<SampledCurve> {
    let expression = text.trim();
    let parsed = Expr::parse_expression(expression).map_err(|e| PlotError::Parse {
        expression: expression.to_string(),
        message: e.to_string(),
    })?;
    let depends_on_x = parsed.contains_variable(DEFAULT_ARGUMENT);
    let func = parsed.lambdify1D();

    let mut points = Vec::with_capacity(domain.sample_count());
    for x in domain.points() {
        let value = func(x).map_err(|e| PlotError::Eval {
            expression: expression.to_string(),
            x,
            message: e.to_string(),
        })?;
        let y = if value.is_finite() { Some(value) } else { None };
        points.push(SamplePoint { x, y });
    }
    let curve = SampledCurve {
        expression: expression.to_string(),
        depends_on_x,
        points,
    };
    debug!(
        "sampled {} at {} points, {} gap(s)",
        curve.expression,
        curve.points.len(),
        curve.gap_count()
    );
    Ok(curve)
}

/// Samples every entry in order; the first failure aborts the whole request.
pub fn sample_all(request: &PlotRequest) -> Result<Vec<SampledCurve>> {
    let curves = request
        .entries
        .iter()
        .map(|entry| sample_expression(&entry.text, &request.domain))
        .collect::<Result<Vec<_>>>()?;
    info!(
        "sampled {} curve(s) on [{}, {}]",
        curves.len(),
        request.domain.min_x(),
        request.domain.max_x()
    );
    Ok(curves)
}
