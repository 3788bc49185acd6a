use std::fmt;

/// Error types for a plot request. Every variant is terminal for the request that raised it.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotError {
    /// every expression entry is blank
    EmptyInput,
    /// a bound is missing, not a number, or `min_x >= max_x`
    Range(RangeIssue),
    /// the sample count is missing, not an integer, or outside the allowed interval
    SampleCount,
    /// the expression text could not be compiled
    Parse { expression: String, message: String },
    /// the compiled expression failed at domain point `x`
    Eval {
        expression: String,
        x: f64,
        message: String,
    },
    /// nothing survived filtering
    NoValidExpressions,
    /// the drawing backend failed
    Render(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeIssue {
    MissingMin,
    MissingMax,
    NotIncreasing,
}

impl fmt::Display for RangeIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RangeIssue::MissingMin => write!(f, "X min must be a number"),
            RangeIssue::MissingMax => write!(f, "X max must be a number"),
            RangeIssue::NotIncreasing => write!(f, "X min must be less than X max"),
        }
    }
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlotError::EmptyInput => write!(f, "Please enter at least one expression"),
            PlotError::Range(issue) => write!(f, "Invalid range: {}", issue),
            PlotError::SampleCount => write!(
                f,
                "Number of points must be an integer between {} and {}",
                super::input::MIN_SAMPLES,
                super::input::MAX_SAMPLES
            ),
            PlotError::Parse {
                expression,
                message,
            } => write!(f, "Error parsing expression \"{}\": {}", expression, message),
            PlotError::Eval {
                expression,
                x,
                message,
            } => write!(
                f,
                "Error evaluating expression \"{}\" at x = {}: {}",
                expression, x, message
            ),
            PlotError::NoValidExpressions => write!(f, "No valid expressions to plot"),
            PlotError::Render(message) => write!(f, "Failed to draw the chart: {}", message),
        }
    }
}

impl std::error::Error for PlotError {}

pub type Result<T> = std::result::Result<T, PlotError>;
