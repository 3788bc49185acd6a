//! turns a String expression into a symbolic expression
//!# Example
//! ```
//! use RustedPlotter::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("x^2 + 1").unwrap();
//! let f = parsed_expression.lambdify1D();
//! assert_eq!(f(2.0).unwrap(), 5.0);
//! ```
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{cut, opt, recognize},
    error::{ErrorKind, ParseError},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded},
};
use std::f64::consts::{E, PI, TAU};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};
//                  precedence ladder
//                |  expression := term (('+'|'-') term)*             |
//                |  term       := unary (('*'|'/') unary | power)*   |
//                |  unary      := ('+'|'-') unary | power            |
//                |  power      := primary ('^' unary)?               |
//                |  primary    := number | call | symbol | '(' expr ')'|
//
// the bare `power` alternative of `term` is implicit multiplication: `2x`, `3(x+1)`, `2 sin(x)`

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Deepest expression tree the parser hands out. Compiling and evaluating recurse once per level.
pub const MAX_EXPRESSION_DEPTH: usize = 256;
/// Deepest nesting of brackets, signs, powers and call arguments.
pub const MAX_NESTING: usize = 64;

/// Error returned when a string can not be turned into an expression.
/// `position` is the byte offset in the input string where parsing stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprParseError {
    pub position: usize,
    pub message: String,
}

impl fmt::Display for ExprParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (char {})", self.message, self.position + 1)
    }
}

impl std::error::Error for ExprParseError {}

/// nom error carrying the length of the unparsed tail, so the offset can be recovered later
#[derive(Debug, Clone, PartialEq)]
struct SyntaxError {
    remaining: usize,
    message: Option<String>,
}

impl SyntaxError {
    fn at(input: &str, message: impl Into<String>) -> Self {
        SyntaxError {
            remaining: input.len(),
            message: Some(message.into()),
        }
    }

    fn into_parse_error(self, source: &str) -> ExprParseError {
        let position = source.len().saturating_sub(self.remaining);
        let message = match self.message {
            Some(message) => message,
            None if self.remaining == 0 => "Unexpected end of expression".to_string(),
            None => match source[position..].chars().next() {
                Some(c) => format!("Unexpected character '{}'", c),
                None => "Unexpected end of expression".to_string(),
            },
        };
        ExprParseError { position, message }
    }
}

impl<'a> ParseError<&'a str> for SyntaxError {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        SyntaxError {
            remaining: input.len(),
            message: None,
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, T> = IResult<&'a str, T, SyntaxError>;

/// Functions callable from an expression string. Several spellings map to the same function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
pub enum Function {
    #[strum(serialize = "exp")]
    Exp,
    #[strum(to_string = "ln", serialize = "log")]
    Ln,
    #[strum(serialize = "log10")]
    Log10,
    #[strum(serialize = "log2")]
    Log2,
    #[strum(serialize = "sqrt")]
    Sqrt,
    #[strum(serialize = "abs")]
    Abs,
    #[strum(serialize = "sin")]
    Sin,
    #[strum(serialize = "cos")]
    Cos,
    #[strum(to_string = "tan", serialize = "tg")]
    Tan,
    #[strum(to_string = "cot", serialize = "ctg")]
    Cot,
    #[strum(to_string = "asin", serialize = "arcsin")]
    Asin,
    #[strum(to_string = "acos", serialize = "arccos")]
    Acos,
    #[strum(to_string = "atan", serialize = "arctan", serialize = "arctg")]
    Atan,
    #[strum(to_string = "acot", serialize = "arccot", serialize = "arcctg")]
    Acot,
    #[strum(serialize = "sinh")]
    Sinh,
    #[strum(serialize = "cosh")]
    Cosh,
    #[strum(serialize = "tanh")]
    Tanh,
    #[strum(serialize = "pow")]
    Pow,
}

impl Function {
    /// allowed number of arguments
    pub fn arity(self) -> RangeInclusive<usize> {
        match self {
            Function::Ln => 1..=2,
            Function::Pow => 2..=2,
            _ => 1..=1,
        }
    }

    fn arity_error(self, provided: usize) -> String {
        let arity = self.arity();
        let expected = if arity.start() == arity.end() {
            arity.start().to_string()
        } else {
            format!("{}-{}", arity.start(), arity.end())
        };
        format!(
            "Wrong number of arguments in function {} ({} provided, {} expected)",
            self, provided, expected
        )
    }

    fn single(self, args: Vec<Expr>) -> Result<Box<Expr>, String> {
        let [arg]: [Expr; 1] = args
            .try_into()
            .map_err(|args: Vec<Expr>| self.arity_error(args.len()))?;
        Ok(arg.boxed())
    }

    fn pair(self, args: Vec<Expr>) -> Result<(Expr, Expr), String> {
        let [lhs, rhs]: [Expr; 2] = args
            .try_into()
            .map_err(|args: Vec<Expr>| self.arity_error(args.len()))?;
        Ok((lhs, rhs))
    }

    /// Builds the expression node for a call of this function.
    pub fn apply(self, args: Vec<Expr>) -> Result<Expr, String> {
        if !self.arity().contains(&args.len()) {
            return Err(self.arity_error(args.len()));
        }
        let expr = match self {
            Function::Exp => Expr::Exp(self.single(args)?),
            Function::Ln if args.len() == 2 => {
                let (value, base) = self.pair(args)?;
                Expr::Ln(value.boxed()) / Expr::Ln(base.boxed())
            }
            Function::Ln => Expr::Ln(self.single(args)?),
            Function::Log10 => Expr::Ln(self.single(args)?) / Expr::Ln(Expr::Const(10.0).boxed()),
            Function::Log2 => Expr::Ln(self.single(args)?) / Expr::Ln(Expr::Const(2.0).boxed()),
            Function::Sqrt => Expr::sqrt(self.single(args)?),
            Function::Abs => Expr::abs(self.single(args)?),
            Function::Sin => Expr::sin(self.single(args)?),
            Function::Cos => Expr::cos(self.single(args)?),
            Function::Tan => Expr::tg(self.single(args)?),
            Function::Cot => Expr::ctg(self.single(args)?),
            Function::Asin => Expr::arcsin(self.single(args)?),
            Function::Acos => Expr::arccos(self.single(args)?),
            Function::Atan => Expr::arctg(self.single(args)?),
            Function::Acot => Expr::arcctg(self.single(args)?),
            Function::Sinh => Expr::sinh(self.single(args)?),
            Function::Cosh => Expr::cosh(self.single(args)?),
            Function::Tanh => Expr::tanh(self.single(args)?),
            Function::Pow => {
                let (base, exponent) = self.pair(args)?;
                base.pow(exponent)
            }
        };
        Ok(expr)
    }
}

/// value of a named constant, None for an ordinary variable
pub fn named_constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "PI" => Some(PI),
        "e" | "E" => Some(E),
        "tau" => Some(TAU),
        "phi" => Some(GOLDEN_RATIO),
        _ => None,
    }
}

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = SyntaxError>
where
    F: Parser<&'a str, Output = O, Error = SyntaxError>,
{
    delimited(multispace0, inner, multispace0)
}

fn operator<'a>(ops: &'static str) -> impl Parser<&'a str, Output = char, Error = SyntaxError> {
    ws(one_of(ops))
}

/// Parses an identifier (letters, digits and underscores, not starting with a digit)
fn identifier(input: &str) -> PResult<&str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Recognizes an unsigned number: `2`, `2.`, `2.5`, `.5`, `1e-3`
fn number_text(input: &str) -> PResult<&str> {
    let mantissa = alt((
        recognize((digit1, opt((char('.'), digit0)))),
        recognize((char('.'), digit1)),
    ));
    let exponent = opt((one_of("eE"), opt(one_of("+-")), digit1));
    recognize((mantissa, exponent)).parse(input)
}

fn number(input: &str) -> PResult<Expr> {
    let (rest, text) = number_text(input)?;
    let value = text.parse::<f64>().map_err(|_| {
        nom::Err::Failure(SyntaxError::at(input, format!("Invalid number '{}'", text)))
    })?;
    Ok((rest, Expr::Const(value)))
}

fn call_arguments(input: &str, depth: usize) -> PResult<Vec<Expr>> {
    let (rest, _) = ws(char('(')).parse(input)?;
    let (rest, args) =
        separated_list0(operator(","), |i| expression(i, depth)).parse(rest)?;
    let (rest, _) = ws(char(')')).parse(rest).map_err(|_: nom::Err<SyntaxError>| {
        nom::Err::Failure(SyntaxError::at(rest, "Expected ',' or ')' in argument list"))
    })?;
    Ok((rest, args))
}

/// function call, named constant or variable
fn call_or_symbol(input: &str, depth: usize) -> PResult<Expr> {
    let (rest, name) = identifier(input)?;
    let is_call = rest.trim_start().starts_with('(');
    if is_call && named_constant(name).is_none() {
        let function = Function::from_str(name).map_err(|_| {
            nom::Err::Failure(SyntaxError::at(input, format!("Unknown function {}", name)))
        })?;
        let (rest, args) = call_arguments(rest, depth)?;
        let expr = function
            .apply(args)
            .map_err(|message| nom::Err::Failure(SyntaxError::at(input, message)))?;
        return Ok((rest, expr));
    }
    let expr = match named_constant(name) {
        Some(value) => Expr::Const(value),
        None => Expr::Var(name.to_string()),
    };
    Ok((rest, expr))
}

fn parenthesized(input: &str, depth: usize) -> PResult<Expr> {
    let (rest, _) = ws(char('(')).parse(input)?;
    let (rest, inner) = cut(|i| expression(i, depth)).parse(rest)?;
    let (rest, _) = ws(char(')')).parse(rest).map_err(|_: nom::Err<SyntaxError>| {
        nom::Err::Failure(SyntaxError::at(rest, "Expected ')'"))
    })?;
    Ok((rest, inner))
}

fn primary(input: &str, depth: usize) -> PResult<Expr> {
    alt((
        number,
        |i| call_or_symbol(i, depth),
        |i| parenthesized(i, depth),
    ))
    .parse(input)
}

/// `^` is right associative and binds tighter than unary minus: `-x^2 = -(x^2)`, `2^-1 = 0.5`
fn power(input: &str, depth: usize) -> PResult<Expr> {
    let (rest, base) = ws(|i| primary(i, depth)).parse(input)?;
    let (rest, exponent) = opt(preceded(operator("^"), cut(|i| unary(i, depth)))).parse(rest)?;
    let expr = match exponent {
        Some(exponent) => base.pow(exponent),
        None => base,
    };
    Ok((rest, expr))
}

fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Const(value) => Expr::Const(-value),
        other => -other,
    }
}

/// Every recursive descent passes through here, so this is where nesting is counted.
fn unary(input: &str, depth: usize) -> PResult<Expr> {
    if depth >= MAX_NESTING {
        return Err(nom::Err::Failure(SyntaxError::at(
            input,
            "Expression is nested too deeply",
        )));
    }
    let depth = depth + 1;
    let (rest, sign) = opt(operator("+-")).parse(input)?;
    match sign {
        Some('-') => {
            let (rest, operand) = cut(|i| unary(i, depth)).parse(rest)?;
            Ok((rest, negate(operand)))
        }
        Some(_) => cut(|i| unary(i, depth)).parse(rest),
        None => power(rest, depth),
    }
}

/// factor written right after another one without an operator
fn implicit_factor(input: &str, depth: usize) -> PResult<Expr> {
    match input.trim_start().chars().next() {
        Some(c) if c == '(' || c == '_' || c.is_ascii_alphabetic() => power(input, depth),
        _ => Err(nom::Err::Error(SyntaxError::from_error_kind(
            input,
            ErrorKind::Alt,
        ))),
    }
}

/// depth of `lhs op rhs` given the depth of `lhs`, failing once the chain gets too long
fn chained_depth(
    input: &str,
    lhs_depth: usize,
    rhs: &Expr,
) -> Result<usize, nom::Err<SyntaxError>> {
    let depth = lhs_depth.max(rhs.depth()) + 1;
    if depth > MAX_EXPRESSION_DEPTH {
        return Err(nom::Err::Failure(SyntaxError::at(input, "Expression is too long")));
    }
    Ok(depth)
}

fn term(input: &str, depth: usize) -> PResult<Expr> {
    let (mut rest, mut acc) = unary(input, depth)?;
    let mut acc_depth = acc.depth();
    loop {
        match operator("*/").parse(rest) {
            Ok((next, op)) => {
                let (next, rhs) = cut(|i| unary(i, depth)).parse(next)?;
                acc_depth = chained_depth(rest, acc_depth, &rhs)?;
                acc = if op == '*' { acc * rhs } else { acc / rhs };
                rest = next;
                continue;
            }
            Err(nom::Err::Error(_)) => {}
            Err(e) => return Err(e),
        }
        match implicit_factor(rest, depth) {
            Ok((next, rhs)) => {
                acc_depth = chained_depth(rest, acc_depth, &rhs)?;
                acc = acc * rhs;
                rest = next;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok((rest, acc))
}

fn expression(input: &str, depth: usize) -> PResult<Expr> {
    let (mut rest, mut acc) = term(input, depth)?;
    let mut acc_depth = acc.depth();
    loop {
        match operator("+-").parse(rest) {
            Ok((next, op)) => {
                let (next, rhs) = cut(|i| term(i, depth)).parse(next)?;
                acc_depth = chained_depth(rest, acc_depth, &rhs)?;
                acc = if op == '+' { acc + rhs } else { acc - rhs };
                rest = next;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok((rest, acc))
}

/// Parses the whole input into an expression; trailing garbage is an error.
/// Trees deeper than [`MAX_EXPRESSION_DEPTH`] are rejected, as is nesting
/// (brackets, signs, powers, calls) deeper than [`MAX_NESTING`].
pub fn parse_expression_func(input: &str) -> Result<Expr, ExprParseError> {
    if input.trim().is_empty() {
        return Err(ExprParseError {
            position: 0,
            message: "Empty expression".to_string(),
        });
    }
    match expression(input, 0) {
        Ok((rest, expr)) => {
            let rest = rest.trim_start();
            if let Some(c) = rest.chars().next() {
                return Err(ExprParseError {
                    position: input.len() - rest.len(),
                    message: format!("Unexpected character '{}'", c),
                });
            }
            if expr.depth() > MAX_EXPRESSION_DEPTH {
                return Err(ExprParseError {
                    position: 0,
                    message: "Expression is too long".to_string(),
                });
            }
            debug!("found expression {} in '{}'", expr, input);
            Ok(expr)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e.into_parse_error(input)),
        Err(nom::Err::Incomplete(_)) => Err(ExprParseError {
            position: input.len(),
            message: "Unexpected end of expression".to_string(),
        }),
    }
}
