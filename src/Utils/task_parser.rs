//! parse a plot task document with structure like
//! ```text
//! plot
//!   expressions: x^2; sin(x) + 1
//!   min_x: -5
//! output
//!   path: chart.svg
//! ```
//! which has titles on their own line and `key: value; value` lines below them.
//! Lines starting with `#` or `//` are comments. Missing keys fall back to defaults.
use crate::plotter::input::{DEFAULT_EXPRESSION, DomainInput};
use itertools::Itertools;
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, line_ending, space0},
    combinator::{eof, map, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, pair},
};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

/// `key: values` lines of one section, values as written (trimmed), in document order
pub type Section = Vec<(String, Vec<String>)>;
/// titled sections in document order; a repeated title appears more than once
pub type Document = Vec<(String, Section)>;

/// sections and the keys each one accepts
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("plot", &["expressions", "min_x", "max_x", "sample_count"]),
    ("output", &["path", "width", "height"]),
    ("log", &["level", "file"]),
];

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// Reads a written value as an integer, a float, a boolean or else a plain string.
    pub fn from_text(text: &str) -> Value {
        let s = text.trim();
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskError {
    Io(String),
    Syntax { line: String },
    UnknownSection(String),
    UnknownKey { section: String, key: String },
    InvalidValue { section: String, key: String, message: String },
}

impl Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Io(message) => write!(f, "cannot read task document: {}", message),
            TaskError::Syntax { line } => write!(f, "cannot parse task line '{}'", line),
            TaskError::UnknownSection(section) => write!(
                f,
                "unknown section '{}', expected one of: {}",
                section,
                KNOWN_KEYS.iter().map(|(s, _)| s).join(", ")
            ),
            TaskError::UnknownKey { section, key } => {
                let known = KNOWN_KEYS
                    .iter()
                    .find(|(s, _)| s == section)
                    .map(|(_, keys)| keys.iter().join(", "))
                    .unwrap_or_default();
                write!(
                    f,
                    "unknown key '{}' in section '{}', expected one of: {}",
                    key, section, known
                )
            }
            TaskError::InvalidValue {
                section,
                key,
                message,
            } => write!(f, "invalid value for {}.{}: {}", section, key, message),
        }
    }
}

impl std::error::Error for TaskError {}

/// word characters without spaces, not starting with a digit
fn parse_identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        String::from,
    )
    .parse(input)
}

/// a title stands alone on its line
fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, title) = delimited(space0, parse_identifier, space0).parse(input)?;
    let (input, _) = alt((line_ending, eof)).parse(input)?;
    Ok((input, title))
}

/// Parses a single value; everything up to `;` or the end of the line, trimmed.
/// An empty value yields `None`.
fn parse_value(input: &str) -> IResult<&str, Option<String>> {
    let (input, raw) = take_while(|c: char| !matches!(c, ';' | '\n' | '\r')).parse(input)?;
    let s = raw.trim();
    let value = if s.is_empty() { None } else { Some(s.to_string()) };
    Ok((input, value))
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<String>> {
    let (input, values) = separated_list1(tag(";"), parse_value).parse(input)?;
    Ok((input, values.into_iter().flatten().collect()))
}

/// Parses a `key: value; value` line
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<String>)> {
    let (input, _) = space0(input)?;
    let (input, key) = parse_identifier(input)?;
    let (input, _) = delimited(space0, tag(":"), space0).parse(input)?;
    let (input, values) = parse_value_list(input)?;
    let (input, _) = alt((line_ending, eof)).parse(input)?;
    Ok((input, (key, values)))
}

/// Parses a section with a title and its key-value lines
fn parse_section(input: &str) -> IResult<&str, (String, Section)> {
    let (input, title) = parse_title(input)?;
    let (input, pairs) = many0(parse_key_value_pair).parse(input)?;
    Ok((input, (title, pairs)))
}

/// Filters out comment lines (starting with // or #) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with('#') && !trimmed.is_empty()
        })
        .join("\n")
}

/// Parses the entire document into its sections, in the order they are written.
pub fn parse_document(input: &str) -> Result<Document, TaskError> {
    let filtered = filter_comments(input);
    let (remaining, sections) = many0(parse_section)
        .parse(filtered.as_str())
        .map_err(|_: nom::Err<nom::error::Error<&str>>| TaskError::Syntax {
            line: filtered.lines().next().unwrap_or_default().to_string(),
        })?;
    if !remaining.trim().is_empty() {
        return Err(TaskError::Syntax {
            line: remaining.lines().next().unwrap_or_default().trim().to_string(),
        });
    }
    Ok(sections)
}

/// Where and how large the picture is written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            path: PathBuf::from("plot.png"),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: String,
    /// file name, or `auto` for a time-stamped one; `None` logs to the terminal only
    pub file: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// A complete plot job. Domain values stay as text so the session validates them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotTask {
    pub expressions: Vec<String>,
    pub domain: DomainInput,
    pub output: OutputSettings,
    pub log: LogSettings,
}

impl Default for PlotTask {
    fn default() -> Self {
        PlotTask {
            expressions: vec![DEFAULT_EXPRESSION.to_string()],
            domain: DomainInput::default(),
            output: OutputSettings::default(),
            log: LogSettings::default(),
        }
    }
}

fn single_value<'a>(section: &str, key: &str, values: &'a [String]) -> Result<&'a str, TaskError> {
    match values {
        [value] => Ok(value.as_str()),
        _ => Err(TaskError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message: format!("expected exactly one value, found {}", values.len()),
        }),
    }
}

fn dimension(section: &str, key: &str, values: &[String]) -> Result<u32, TaskError> {
    let text = single_value(section, key, values)?;
    Value::from_text(text)
        .as_integer()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|&v| v > 0)
        .ok_or_else(|| TaskError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message: format!("'{}' is not a positive integer", text),
        })
}

impl PlotTask {
    /// Parses a task document; keys it does not mention keep their defaults.
    /// Sections and keys are checked in document order, so the first bad one is reported,
    /// and a key given twice keeps its last value.
    pub fn parse(input: &str) -> Result<PlotTask, TaskError> {
        let document = parse_document(input)?;
        let mut task = PlotTask::default();
        for (section, pairs) in &document {
            let keys = KNOWN_KEYS
                .iter()
                .find(|(name, _)| name == section)
                .map(|(_, keys)| *keys)
                .ok_or_else(|| TaskError::UnknownSection(section.clone()))?;
            for (key, values) in pairs {
                if !keys.contains(&key.as_str()) {
                    return Err(TaskError::UnknownKey {
                        section: section.clone(),
                        key: key.clone(),
                    });
                }
                task.apply(section, key, values)?;
            }
        }
        debug!("parsed plot task {:?}", task);
        Ok(task)
    }

    pub fn from_file(path: &Path) -> Result<PlotTask, TaskError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| TaskError::Io(format!("{}: {}", path.display(), e)))?;
        PlotTask::parse(&text)
    }

    /// Plot values keep the text as written; the session validates them like form input.
    fn apply(&mut self, section: &str, key: &str, values: &[String]) -> Result<(), TaskError> {
        let text = || single_value(section, key, values).map(str::to_string);
        match (section, key) {
            ("plot", "expressions") => self.expressions = values.to_vec(),
            ("plot", "min_x") => self.domain.min_x = text()?,
            ("plot", "max_x") => self.domain.max_x = text()?,
            ("plot", "sample_count") => self.domain.sample_count = text()?,
            ("output", "path") => self.output.path = PathBuf::from(text()?),
            ("output", "width") => self.output.width = dimension(section, key, values)?,
            ("output", "height") => self.output.height = dimension(section, key, values)?,
            ("log", "level") => self.log.level = text()?,
            ("log", "file") => self.log.file = Some(text()?),
            _ => {
                return Err(TaskError::UnknownKey {
                    section: section.to_string(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("plot\n  min_x: 1").unwrap();
        assert_eq!(title, "plot");
        assert_eq!(remaining, "  min_x: 1");

        let (remaining, title) = parse_title("  output_2  ").unwrap();
        assert_eq!(title, "output_2");
        assert_eq!(remaining, "");

        assert!(parse_title("min_x: 1").is_err());
    }

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value(" x^2 + 1 ; next").unwrap();
        assert_eq!(value.as_deref(), Some("x^2 + 1"));
        assert_eq!(remaining, "; next");

        let (_, value) = parse_value(" 0.10 ").unwrap();
        assert_eq!(value.as_deref(), Some("0.10"));
        let (_, value) = parse_value("   ").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_value_from_text() {
        assert_eq!(Value::from_text("-5"), Value::Integer(-5));
        assert_eq!(Value::from_text("2.5"), Value::Float(2.5));
        assert_eq!(Value::from_text("true"), Value::Boolean(true));
        assert_eq!(Value::from_text(" sin(x) "), Value::String("sin(x)".to_string()));
        assert_eq!(Value::from_text("1024").as_integer(), Some(1024));
        assert_eq!(Value::from_text("2.0").as_integer(), None);
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) =
            parse_key_value_pair("  expressions : log(x, 2); sin(x)\nnext").unwrap();
        assert_eq!(key, "expressions");
        assert_eq!(values, vec!["log(x, 2)", "sin(x)"]);
        assert_eq!(remaining, "next");

        let (_, (key, values)) = parse_key_value_pair("expressions:").unwrap();
        assert_eq!(key, "expressions");
        assert!(values.is_empty());
    }

    #[test]
    fn test_parse_section() {
        let (remaining, (title, pairs)) =
            parse_section("plot\nmin_x: -1\nmax_x: 1\noutput\npath: a.png").unwrap();
        assert_eq!(title, "plot");
        assert_eq!(
            pairs,
            vec![
                ("min_x".to_string(), vec!["-1".to_string()]),
                ("max_x".to_string(), vec!["1".to_string()])
            ]
        );
        assert_eq!(remaining, "output\npath: a.png");
    }

    #[test]
    fn test_parse_document_with_comments() {
        let input = "# plot job\nplot\n  // the curves\n  expressions: x; x^2\n\nlog\n  level: debug\n";
        let document = parse_document(input).unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(document[0].0, "plot");
        assert_eq!(document[0].1[0].1, vec!["x", "x^2"]);
        assert_eq!(document[1].0, "log");
        assert_eq!(document[1].1[0].1, vec!["debug"]);
    }

    #[test]
    fn test_parse_document_windows_line_endings() {
        let document = parse_document("plot\r\n  min_x: 0\r\n  max_x: 3\r\n").unwrap();
        assert_eq!(document[0].1[1], ("max_x".to_string(), vec!["3".to_string()]));
    }

    #[test]
    fn test_parse_document_malformed() {
        let err = parse_document("plot\n  min_x -5\n").unwrap_err();
        assert_eq!(
            err,
            TaskError::Syntax {
                line: "min_x -5".to_string()
            }
        );
    }

    #[test]
    fn test_parse_document_empty() {
        assert!(parse_document("").unwrap().is_empty());
        assert!(parse_document("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_plot_task_defaults() {
        let task = PlotTask::parse("").unwrap();
        assert_eq!(task, PlotTask::default());
        assert_eq!(task.expressions, vec!["x^2".to_string()]);
        assert_eq!(task.domain.min_x, "-10");
        assert_eq!(task.domain.sample_count, "200");
        assert_eq!(task.output.width, 800);
        assert_eq!(task.log.level, "info");
    }

    #[test]
    fn test_plot_task_full() {
        let input = r#"
plot
  expressions: sin(x); cos(x) + 1
  min_x: -3.5
  max_x: 3.5
  sample_count: 50
output
  path: out/chart.svg
  width: 1024
  height: 768
log
  level: warn
  file: auto
"#;
        let task = PlotTask::parse(input).unwrap();
        assert_eq!(task.expressions, vec!["sin(x)", "cos(x) + 1"]);
        assert_eq!(task.domain, DomainInput::new("-3.5", "3.5", "50"));
        assert_eq!(task.output.path, PathBuf::from("out/chart.svg"));
        assert_eq!((task.output.width, task.output.height), (1024, 768));
        assert_eq!(task.log.file.as_deref(), Some("auto"));
    }

    #[test]
    fn test_plot_task_rejects_unknown_names() {
        let err = PlotTask::parse("plots\n  min_x: 1\n").unwrap_err();
        assert_eq!(err, TaskError::UnknownSection("plots".to_string()));
        assert!(err.to_string().contains("plot, output, log"));

        let err = PlotTask::parse("plot\n  xmin: 1\n").unwrap_err();
        assert!(matches!(err, TaskError::UnknownKey { .. }));
    }

    #[test]
    fn test_plot_task_invalid_values() {
        let err = PlotTask::parse("output\n  width: -20\n").unwrap_err();
        assert!(matches!(err, TaskError::InvalidValue { .. }));
        let err = PlotTask::parse("plot\n  min_x: 1; 2\n").unwrap_err();
        assert!(matches!(err, TaskError::InvalidValue { .. }));
        let err = PlotTask::parse("output\n  width: 2.0\n").unwrap_err();
        assert!(matches!(err, TaskError::InvalidValue { .. }));
    }

    #[test]
    fn test_plot_values_keep_their_text() {
        let input = "plot\n  expressions: 0.10; 1e400\n  min_x: -1.50\n  sample_count: 2.0\n";
        let task = PlotTask::parse(input).unwrap();
        assert_eq!(task.expressions, vec!["0.10", "1e400"]);
        assert_eq!(task.domain, DomainInput::new("-1.50", "10", "2.0"));
    }

    #[test]
    fn test_first_bad_entry_in_document_order_is_reported() {
        let input = "plot\n  min_x: 1\n  first_bad: 2\n  second_bad: 3\nzeta\n  a: 1\nalpha\n  b: 2\n";
        for _ in 0..10 {
            assert_eq!(
                PlotTask::parse(input).unwrap_err(),
                TaskError::UnknownKey {
                    section: "plot".to_string(),
                    key: "first_bad".to_string()
                }
            );
        }
        let input = "zeta\n  a: 1\nalpha\n  b: 2\n";
        assert_eq!(
            PlotTask::parse(input).unwrap_err(),
            TaskError::UnknownSection("zeta".to_string())
        );
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let task = PlotTask::parse("plot\n  min_x: 1\nplot\n  min_x: 2\n").unwrap();
        assert_eq!(task.domain.min_x, "2");
    }
}
