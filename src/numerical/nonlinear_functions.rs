use crate::symbolic::symbolic_engine::{Expr, ExprError};
use nalgebra::Vector2;
use thiserror::Error;

/// Failure to produce a usable number at some point.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EvalError {
    #[error("function value is not finite ({value})")]
    NonFinite { value: f64 },
    #[error("derivative is not available for this function")]
    DerivativeUnavailable,
}

/// NaN and infinities are reported as errors, everything else passes through
pub fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite { value })
    }
}

/// One equation f(x) = 0 as seen by the scalar root finders
pub trait NonlinearFunction {
    fn evaluate(&self, x: f64) -> Result<f64, EvalError>;

    /// f'(x); only Newton's method asks for it
    fn derivative(&self, _x: f64) -> Result<f64, EvalError> {
        Err(EvalError::DerivativeUnavailable)
    }

    /// shown in logs and plot captions
    fn name(&self) -> &str {
        "unnamed_function"
    }
}

/// Trait for a pair of equations F(x, y) = (f1, f2) = 0
pub trait NonlinearSystem {
    fn evaluate(&self, point: &Vector2<f64>) -> Result<Vector2<f64>, EvalError>;

    fn name(&self) -> &str {
        "unnamed_system"
    }
}

/// Simple function wrapper for closures, with an optional analytical derivative
pub struct ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    func: F,
    derivative_func: Option<Box<dyn Fn(f64) -> f64>>,
    name: String,
}

impl<F> ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(func: F, name: &str) -> Self {
        Self {
            func,
            derivative_func: None,
            name: name.to_string(),
        }
    }

    pub fn with_derivative<D>(mut self, derivative: D) -> Self
    where
        D: Fn(f64) -> f64 + 'static,
    {
        self.derivative_func = Some(Box::new(derivative));
        self
    }
}

impl<F> NonlinearFunction for ClosureFunction<F>
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> Result<f64, EvalError> {
        finite((self.func)(x))
    }

    fn derivative(&self, x: f64) -> Result<f64, EvalError> {
        match &self.derivative_func {
            Some(derivative) => finite(derivative(x)),
            None => Err(EvalError::DerivativeUnavailable),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Closure pair wrapper, `func(x, y)` returns `(f1, f2)`
pub struct ClosureSystem<F>
where
    F: Fn(f64, f64) -> (f64, f64),
{
    func: F,
    name: String,
}

impl<F> ClosureSystem<F>
where
    F: Fn(f64, f64) -> (f64, f64),
{
    pub fn new(func: F, name: &str) -> Self {
        Self {
            func,
            name: name.to_string(),
        }
    }
}

impl<F> NonlinearSystem for ClosureSystem<F>
where
    F: Fn(f64, f64) -> (f64, f64),
{
    fn evaluate(&self, point: &Vector2<f64>) -> Result<Vector2<f64>, EvalError> {
        let (f1, f2) = (self.func)(point[0], point[1]);
        Ok(Vector2::new(finite(f1)?, finite(f2)?))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

//////////////////////////////////////BACKED BY Expr//////////////////////////////////////

/// Equation of one variable `x` backed by the symbolic engine; the exact derivative is
/// computed once at construction.
pub struct SymbolicFunction {
    expr: Expr,
    derivative_expr: Expr,
    name: String,
    func: Box<dyn Fn(f64) -> f64 + Send + Sync>,
    derivative_func: Box<dyn Fn(f64) -> f64 + Send + Sync>,
}

impl SymbolicFunction {
    pub const VARIABLE: &'static str = "x";

    /// Create a function from an equation string such as `"x^2 - 5 = 0"`
    pub fn from_equation(equation: &str) -> Result<Self, ExprError> {
        let expr = Expr::parse_equation(equation)?;
        Self::from_expr(expr, Some(equation.trim().to_string()))
    }

    /// Create a function from an Expr; any variable other than `x` is rejected
    pub fn from_expr(expr: Expr, name: Option<String>) -> Result<Self, ExprError> {
        let func_name = name.unwrap_or_else(|| expr.to_string());
        let derivative_expr = expr.diff(Self::VARIABLE).simplify_();
        let func = expr.lambdify1D(Self::VARIABLE)?;
        let derivative_func = derivative_expr.lambdify1D(Self::VARIABLE)?;
        Ok(Self {
            expr,
            derivative_expr,
            name: func_name,
            func,
            derivative_func,
        })
    }

    pub fn expression(&self) -> &Expr {
        &self.expr
    }

    pub fn derivative_expression(&self) -> &Expr {
        &self.derivative_expr
    }
}

impl NonlinearFunction for SymbolicFunction {
    fn evaluate(&self, x: f64) -> Result<f64, EvalError> {
        finite((self.func)(x))
    }

    fn derivative(&self, x: f64) -> Result<f64, EvalError> {
        finite((self.derivative_func)(x))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Pair of equations in `x, y` backed by the symbolic engine
pub struct SymbolicSystem {
    exprs: [Expr; 2],
    name: String,
    funcs: [Box<dyn Fn(f64, f64) -> f64 + Send + Sync>; 2],
}

impl SymbolicSystem {
    pub const VARIABLES: [&'static str; 2] = ["x", "y"];

    pub fn from_equations(first: &str, second: &str) -> Result<Self, ExprError> {
        let exprs = [Expr::parse_equation(first)?, Expr::parse_equation(second)?];
        let name = format!("{}; {}", first.trim(), second.trim());
        Self::from_exprs(exprs, name)
    }

    pub fn from_exprs(exprs: [Expr; 2], name: String) -> Result<Self, ExprError> {
        let [x, y] = Self::VARIABLES;
        let funcs = [exprs[0].lambdify2D(x, y)?, exprs[1].lambdify2D(x, y)?];
        Ok(Self { exprs, name, funcs })
    }

    pub fn expressions(&self) -> &[Expr; 2] {
        &self.exprs
    }

    /// value of a single equation, used by the contour plot
    pub fn evaluate_component(&self, index: usize, x: f64, y: f64) -> Option<f64> {
        self.funcs.get(index).map(|f| f(x, y)).filter(|v| v.is_finite())
    }
}

impl NonlinearSystem for SymbolicSystem {
    fn evaluate(&self, point: &Vector2<f64>) -> Result<Vector2<f64>, EvalError> {
        let (x, y) = (point[0], point[1]);
        Ok(Vector2::new(
            finite((self.funcs[0])(x, y))?,
            finite((self.funcs[1])(x, y))?,
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
