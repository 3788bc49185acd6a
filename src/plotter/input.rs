//! Input collector: the editable list of expression rows and the raw domain fields,
//! plus the validation that turns them into a [`PlotRequest`].
use crate::plotter::error::{PlotError, RangeIssue, Result};
use crate::symbolic::utils::linspace;
use log::debug;

pub const MIN_SAMPLES: usize = 2;
pub const MAX_SAMPLES: usize = 1000;
pub const DEFAULT_EXPRESSION: &str = "x^2";

/// One user-authored row: function-of-x text plus a stable identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionEntry {
    pub id: u64,
    pub text: String,
}

impl ExpressionEntry {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Ordered expression rows. Never empty; ids are handed out by a counter and never reused.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionList {
    entries: Vec<ExpressionEntry>,
    next_id: u64,
}

impl Default for ExpressionList {
    fn default() -> Self {
        ExpressionList::from_texts([DEFAULT_EXPRESSION])
    }
}

impl ExpressionList {
    /// Builds a list from row texts; an empty iterator still yields one blank row.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = ExpressionList {
            entries: Vec::new(),
            next_id: 0,
        };
        for text in texts {
            list.add_with_text(text);
        }
        if list.entries.is_empty() {
            list.add();
        }
        list
    }

    /// Appends a blank row and returns its id.
    pub fn add(&mut self) -> u64 {
        self.add_with_text(String::new())
    }

    pub fn add_with_text(&mut self, text: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ExpressionEntry {
            id,
            text: text.into(),
        });
        id
    }

    /// Removes the row with `id`. The last remaining row is never removed.
    pub fn remove(&mut self, id: u64) -> bool {
        if self.entries.len() <= 1 {
            debug!("refusing to remove the last expression row {}", id);
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Replaces the text of the row with `id`; false if there is no such row.
    pub fn set_text(&mut self, id: u64, text: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: u64) -> Option<&ExpressionEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> &[ExpressionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// rows with non-blank text, in input order
    pub fn non_blank(&self) -> Vec<ExpressionEntry> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_blank())
            .cloned()
            .collect()
    }
}

/// Domain fields exactly as typed into the form.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainInput {
    pub min_x: String,
    pub max_x: String,
    pub sample_count: String,
}

impl Default for DomainInput {
    fn default() -> Self {
        DomainInput {
            min_x: "-10".to_string(),
            max_x: "10".to_string(),
            sample_count: "200".to_string(),
        }
    }
}

impl DomainInput {
    pub fn new(min_x: impl Into<String>, max_x: impl Into<String>, sample_count: impl Into<String>) -> Self {
        DomainInput {
            min_x: min_x.into(),
            max_x: max_x.into(),
            sample_count: sample_count.into(),
        }
    }
}

/// Validated sampling domain: `min_x < max_x`, `MIN_SAMPLES <= sample_count <= MAX_SAMPLES`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    min_x: f64,
    max_x: f64,
    sample_count: usize,
}

impl Domain {
    pub fn new(min_x: f64, max_x: f64, sample_count: usize) -> Result<Domain> {
        if !min_x.is_finite() {
            return Err(PlotError::Range(RangeIssue::MissingMin));
        }
        if !max_x.is_finite() {
            return Err(PlotError::Range(RangeIssue::MissingMax));
        }
        if min_x >= max_x {
            return Err(PlotError::Range(RangeIssue::NotIncreasing));
        }
        if !(MIN_SAMPLES..=MAX_SAMPLES).contains(&sample_count) {
            return Err(PlotError::SampleCount);
        }
        Ok(Domain {
            min_x,
            max_x,
            sample_count,
        })
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn step(&self) -> f64 {
        (self.max_x - self.min_x) / (self.sample_count as f64 - 1.0)
    }

    /// `x_i = min_x + i*step` for `i in 0..sample_count`
    pub fn points(&self) -> Vec<f64> {
        linspace(self.min_x, self.max_x, self.sample_count)
    }
}

/// Everything the sampler needs: the non-blank rows in order and the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub entries: Vec<ExpressionEntry>,
    pub domain: Domain,
}

fn parse_bound(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Checks the form before anything is sampled. The first failing check wins:
/// blank expressions, then the range, then the sample count.
pub fn validate(expressions: &ExpressionList, input: &DomainInput) -> Result<PlotRequest> {
    let entries = expressions.non_blank();
    if entries.is_empty() {
        return Err(PlotError::EmptyInput);
    }
    let min_x = parse_bound(&input.min_x).ok_or(PlotError::Range(RangeIssue::MissingMin))?;
    let max_x = parse_bound(&input.max_x).ok_or(PlotError::Range(RangeIssue::MissingMax))?;
    if min_x >= max_x {
        return Err(PlotError::Range(RangeIssue::NotIncreasing));
    }
    let sample_count = input
        .sample_count
        .trim()
        .parse::<usize>()
        .map_err(|_| PlotError::SampleCount)?;
    let domain = Domain::new(min_x, max_x, sample_count)?;
    debug!(
        "validated {} expression(s) on [{}, {}] with {} points",
        entries.len(),
        min_x,
        max_x,
        sample_count
    );
    Ok(PlotRequest { entries, domain })
}
