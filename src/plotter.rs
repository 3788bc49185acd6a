/// Plotting pipeline: expression rows and domain text in, a rendered chart out.
///
///# Example
/// ```
/// use RustedPlotter::plotter::input::{validate, DomainInput, ExpressionList};
/// use RustedPlotter::plotter::sampler::sample_all;
/// use RustedPlotter::plotter::assembler::assemble;
/// let rows = ExpressionList::from_texts(["x^2", ""]);
/// let request = validate(&rows, &DomainInput::new("-2", "2", "5")).unwrap();
/// let chart = assemble(&sample_all(&request).unwrap()).unwrap();
/// assert_eq!(chart.series[0].values[0], Some(4.0));
/// ```
pub mod assembler;
pub mod error;
/// expression rows, domain text and their validation
pub mod input;
pub mod renderer;
///________________________________________________________________________________________________________________________________
/// compiles each expression and evaluates it over the domain; non-finite values become gaps
pub mod sampler;
/// instance state of one plotting form, chart lifetime included
pub mod session;
mod plotter_tests;
