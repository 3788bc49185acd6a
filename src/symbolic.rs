#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedPlotter::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2.3 * log(x + 1)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D();
/// println!("Rust function: {:?}", parsed_function(1.0));
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// 1) the expression tree produced by the parser
/// 2) pretty printing of expressions
/// 3) variable inspection (does a curve depend on x at all)
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
///________________________________________________________________________________________________________________________________________________
/// turns a symbolic expression into a Rust closure
/// Example#
/// ```
/// use RustedPlotter::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("log(x)").unwrap().lambdify1D();
/// assert_eq!(f(1.0), Ok(0.0));
/// let g = Expr::parse_expression("x + y").unwrap().lambdify1D();
/// assert!(g(1.0).is_err());
/// ```
pub mod symbolic_lambdify;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
