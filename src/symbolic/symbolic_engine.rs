//! Expression tree of the crate. An equation typed by the user (`"x^2 - 5 = 0"`,
//! `"sin(x) + cos(y) = 0"`) is parsed into an [`Expr`], differentiated analytically
//! and finally compiled ("lambdified") into a Rust closure that the root finders call
//! on every iteration.
//!
//! Leaves are `Var` and `Const`; inner nodes are the four arithmetic operations, `Pow`
//! and the functions `Exp`, `Ln`, `sin`, `cos`, `tg`. Differentiation and simplification
//! live in `symbolic_engine_derivatives`, compilation in `symbolic_lambdify`, the string
//! grammar in `parse_expr`.
//!
//! The tangent is called `tg`; the parser accepts both `tan` and `tg`.

#![allow(non_camel_case_types)]

use std::fmt;
use thiserror::Error;

/// Expression tree over `f64` constants and named variables.
///
/// ```rust, ignore
/// use RustedRoots::symbolic::symbolic_engine::Expr;
/// let shifted = Expr::Var("x".to_string()) + Expr::Const(2.0);
/// assert_eq!(shifted.to_string(), "(x + 2)");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Var(String),
    Const(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    Exp(Box<Expr>),
    /// natural logarithm
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// tangent
    tg(Box<Expr>),
}

/// Everything that can go wrong while turning a string into a compiled function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("syntax error in '{input}': {reason}")]
    Syntax { input: String, reason: String },
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },
    #[error("unknown variable '{name}', allowed variables: {allowed:?}")]
    UnknownVariable { name: String, allowed: Vec<String> },
    #[error("malformed equation '{input}': {reason}")]
    MalformedEquation { input: String, reason: &'static str },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Expr::Const(val) => Expr::Const(-val),
            other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
        }
    }
}

impl Expr {
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr) => expr.contains_variable(var_name),
        }
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// true if expression is Const(0.0)
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// true if expression is Const(1.0)
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 1.0)
    }
}
