//! # Symbolic Module
//!
//! A small symbolic engine: parse an equation string into an [`Expr`] tree, take exact
//! derivatives, simplify them a bit and compile the result into a Rust closure.
//!
//! ## Example
//! ```
//! use RustedRoots::symbolic::symbolic_engine::Expr;
//! let f = Expr::parse_equation("sin(x) - x/2 = 0").unwrap();
//! let df = f.diff("x").simplify_();
//! let df_fn = df.lambdify1D("x").unwrap();
//! assert!((df_fn(0.0) - 0.5).abs() < 1e-12);
//! ```
//!
//! [`Expr`]: symbolic_engine::Expr
pub mod parse_expr;
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
#[cfg(test)]
mod symbolic_engine_tests;
pub mod symbolic_lambdify;
