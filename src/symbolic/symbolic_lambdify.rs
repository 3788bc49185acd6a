use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;
use std::fmt;

/// Name of the independent variable every 1D function is compiled against.
pub const DEFAULT_ARGUMENT: &str = "x";

/// Evaluation failure: the expression refers to a symbol that has no value.
#[derive(Debug, Clone, PartialEq)]
pub struct UndefinedSymbol(pub String);

impl fmt::Display for UndefinedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Undefined symbol {}", self.0)
    }
}

impl std::error::Error for UndefinedSymbol {}

pub type EvalResult = Result<f64, UndefinedSymbol>;

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts a function of `x` into an executable closure.
    ///
    /// Symbols other than `x` (and the named constants resolved by the parser) make the
    /// closure return `Err(UndefinedSymbol)` when called.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x^2")?.lambdify1D();
    /// assert_eq!(f(3.0), Ok(9.0));
    /// ```
    pub fn lambdify1D(&self) -> Box<dyn Fn(f64) -> EvalResult + Send + Sync> {
        let compiled_func = self.compile(&[DEFAULT_ARGUMENT]);
        Box::new(move |x| compiled_func.eval(&[x]))
    } // end of lambdify1D

    #[inline(always)]
    pub fn lambdify_borrowed_thread_safe(
        &self,
        vars: &[&str],
    ) -> Box<dyn Fn(&[f64]) -> EvalResult + Send + Sync> {
        let compiled = self.compile(vars);
        Box::new(compiled.as_closure())
    }

    /// Resolves variable names to argument positions once, so evaluation never touches strings.
    pub fn compile(&self, vars: &[&str]) -> Lambda {
        match self {
            Expr::Var(name) => match vars.iter().position(|&v| v == name) {
                Some(idx) => Lambda::Var(idx),
                None => Lambda::Unbound(name.clone()),
            },
            Expr::Const(v) => Lambda::Const(*v),
            Expr::Add(a, b) => Lambda::Add(Box::new(a.compile(vars)), Box::new(b.compile(vars))),
            Expr::Sub(a, b) => Lambda::Sub(Box::new(a.compile(vars)), Box::new(b.compile(vars))),
            Expr::Mul(a, b) => Lambda::Mul(Box::new(a.compile(vars)), Box::new(b.compile(vars))),
            Expr::Div(a, b) => Lambda::Div(Box::new(a.compile(vars)), Box::new(b.compile(vars))),
            Expr::Pow(a, b) => Lambda::Pow(Box::new(a.compile(vars)), Box::new(b.compile(vars))),
            Expr::Exp(e) => Lambda::Exp(Box::new(e.compile(vars))),
            Expr::Ln(e) => Lambda::Ln(Box::new(e.compile(vars))),
            Expr::sqrt(e) => Lambda::Sqrt(Box::new(e.compile(vars))),
            Expr::abs(e) => Lambda::Abs(Box::new(e.compile(vars))),
            Expr::sin(e) => Lambda::Sin(Box::new(e.compile(vars))),
            Expr::cos(e) => Lambda::Cos(Box::new(e.compile(vars))),
            Expr::tg(e) => Lambda::Tg(Box::new(e.compile(vars))),
            Expr::ctg(e) => Lambda::Ctg(Box::new(e.compile(vars))),
            Expr::arcsin(e) => Lambda::ArcSin(Box::new(e.compile(vars))),
            Expr::arccos(e) => Lambda::ArcCos(Box::new(e.compile(vars))),
            Expr::arctg(e) => Lambda::ArcTg(Box::new(e.compile(vars))),
            Expr::arcctg(e) => Lambda::ArcCtg(Box::new(e.compile(vars))),
            Expr::sinh(e) => Lambda::Sinh(Box::new(e.compile(vars))),
            Expr::cosh(e) => Lambda::Cosh(Box::new(e.compile(vars))),
            Expr::tanh(e) => Lambda::Tanh(Box::new(e.compile(vars))),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Lambda {
    Var(usize),
    Unbound(String),
    Const(f64),
    Add(Box<Lambda>, Box<Lambda>),
    Sub(Box<Lambda>, Box<Lambda>),
    Mul(Box<Lambda>, Box<Lambda>),
    Div(Box<Lambda>, Box<Lambda>),
    Pow(Box<Lambda>, Box<Lambda>),
    Exp(Box<Lambda>),
    Ln(Box<Lambda>),
    Sqrt(Box<Lambda>),
    Abs(Box<Lambda>),
    Sin(Box<Lambda>),
    Cos(Box<Lambda>),
    Tg(Box<Lambda>),
    Ctg(Box<Lambda>),
    ArcSin(Box<Lambda>),
    ArcCos(Box<Lambda>),
    ArcTg(Box<Lambda>),
    ArcCtg(Box<Lambda>),
    Sinh(Box<Lambda>),
    Cosh(Box<Lambda>),
    Tanh(Box<Lambda>),
}

impl Lambda {
    /// IEEE semantics: `ln(-1)` is NaN and `1/0` is infinite, neither is an error here.
    /// Fewer `args` than compiled variables is an `UndefinedSymbol` error.
    #[inline(always)]
    pub fn eval(&self, args: &[f64]) -> EvalResult {
        let value = match self {
            Lambda::Var(i) => match args.get(*i) {
                Some(value) => *value,
                None => return Err(UndefinedSymbol(format!("argument #{}", i))),
            },
            Lambda::Unbound(name) => return Err(UndefinedSymbol(name.clone())),
            Lambda::Const(v) => *v,
            Lambda::Add(a, b) => a.eval(args)? + b.eval(args)?,
            Lambda::Sub(a, b) => a.eval(args)? - b.eval(args)?,
            Lambda::Mul(a, b) => a.eval(args)? * b.eval(args)?,
            Lambda::Div(a, b) => a.eval(args)? / b.eval(args)?,
            Lambda::Pow(a, b) => a.eval(args)?.powf(b.eval(args)?),
            Lambda::Exp(e) => e.eval(args)?.exp(),
            Lambda::Ln(e) => e.eval(args)?.ln(),
            Lambda::Sqrt(e) => e.eval(args)?.sqrt(),
            Lambda::Abs(e) => e.eval(args)?.abs(),
            Lambda::Sin(e) => e.eval(args)?.sin(),
            Lambda::Cos(e) => e.eval(args)?.cos(),
            Lambda::Tg(e) => e.eval(args)?.tan(),
            Lambda::Ctg(e) => 1.0 / e.eval(args)?.tan(),
            Lambda::ArcSin(e) => e.eval(args)?.asin(),
            Lambda::ArcCos(e) => e.eval(args)?.acos(),
            Lambda::ArcTg(e) => e.eval(args)?.atan(),
            Lambda::ArcCtg(e) => (PI / 2.0) - e.eval(args)?.atan(),
            Lambda::Sinh(e) => e.eval(args)?.sinh(),
            Lambda::Cosh(e) => e.eval(args)?.cosh(),
            Lambda::Tanh(e) => e.eval(args)?.tanh(),
        };
        Ok(value)
    }

    pub fn as_closure(self) -> impl Fn(&[f64]) -> EvalResult + Send + Sync {
        move |args| self.eval(args)
    }
}
