#![allow(non_snake_case)]
use RustedPlotter::Utils::logger::{init_logger, parse_level, resolve_log_file};
use RustedPlotter::Utils::summary::summary_table;
use RustedPlotter::Utils::task_parser::PlotTask;
use RustedPlotter::plotter::assembler::ChartData;
use RustedPlotter::plotter::input::ExpressionList;
use RustedPlotter::plotter::renderer::{BitmapRenderer, ChartRenderer, SvgRenderer};
use RustedPlotter::plotter::session::PlotSession;
use clap::{ArgAction, Parser};
use log::info;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "rusted-plotter",
    about = "Plot functions of x and write the chart to PNG or SVG",
    version
)]
struct PlotterCli {
    /// Plot task document; flags below override its values
    #[arg(long = "task", value_name = "FILE")]
    task: Option<PathBuf>,

    /// Expression in x, repeat for several curves
    #[arg(short = 'e', long = "expr", value_name = "EXPR", allow_hyphen_values = true)]
    expressions: Vec<String>,

    #[arg(long = "min-x", value_name = "X", allow_hyphen_values = true)]
    min_x: Option<String>,

    #[arg(long = "max-x", value_name = "X", allow_hyphen_values = true)]
    max_x: Option<String>,

    /// Number of points (2..=1000)
    #[arg(short = 'n', long = "samples", value_name = "N", allow_hyphen_values = true)]
    samples: Option<String>,

    /// Output picture; a .svg extension selects the SVG backend
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    #[arg(long = "width")]
    width: Option<u32>,

    #[arg(long = "height")]
    height: Option<u32>,

    /// debug, info, warn, error or off
    #[arg(long = "log-level", value_name = "LEVEL")]
    log_level: Option<String>,

    /// Also log to FILE (`auto` for a time-stamped name)
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<String>,

    /// Do not print the series table
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,
}

impl PlotterCli {
    /// the task document, if any, with command-line values on top
    fn into_task(self) -> Result<PlotTask, Box<dyn Error>> {
        let mut task = match &self.task {
            Some(path) => PlotTask::from_file(path)?,
            None => PlotTask::default(),
        };
        if !self.expressions.is_empty() {
            task.expressions = self.expressions;
        }
        if let Some(min_x) = self.min_x {
            task.domain.min_x = min_x;
        }
        if let Some(max_x) = self.max_x {
            task.domain.max_x = max_x;
        }
        if let Some(samples) = self.samples {
            task.domain.sample_count = samples;
        }
        if let Some(output) = self.output {
            task.output.path = output;
        }
        if let Some(width) = self.width {
            task.output.width = width;
        }
        if let Some(height) = self.height {
            task.output.height = height;
        }
        if let Some(level) = self.log_level {
            task.log.level = level;
        }
        if self.log_file.is_some() {
            task.log.file = self.log_file;
        }
        Ok(task)
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Mounts a session over the task inputs and returns it once the first plot is drawn.
fn plot_task<R: ChartRenderer>(renderer: R, task: &PlotTask) -> Result<PlotSession<R>, Box<dyn Error>> {
    let expressions = ExpressionList::from_texts(task.expressions.iter().cloned());
    let mut session = PlotSession::with_inputs(renderer, expressions, task.domain.clone());
    session.mount()?;
    Ok(session)
}

fn run(cli: PlotterCli) -> Result<(), Box<dyn Error>> {
    let quiet = cli.quiet;
    let task = cli.into_task()?;
    let level = parse_level(&task.log.level)?;
    let log_file = task.log.file.as_deref().map(resolve_log_file);
    init_logger(level, log_file.as_deref())?;
    info!("plotting {} expression(s) into {}", task.expressions.len(), task.output.path.display());

    let size = (task.output.width, task.output.height);
    let chart_data: Option<ChartData> = if is_svg(&task.output.path) {
        let session = plot_task(SvgRenderer::new(size), &task)?;
        if let Some(chart) = session.chart() {
            chart.save(&task.output.path)?;
        }
        session.chart_data().cloned()
    } else {
        let session = plot_task(BitmapRenderer::new(task.output.path.clone(), size), &task)?;
        session.chart_data().cloned()
    };

    if let Some(chart_data) = chart_data {
        if !quiet {
            println!("{}", summary_table(&chart_data));
        }
        println!("chart saved to {}", task.output.path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = PlotterCli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        // the logger may not be installed yet, plot failures are already logged as warnings
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
