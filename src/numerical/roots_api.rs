//! General api for all root finders: an equation (or a pair of them) plus a tagged
//! parameter bag is dispatched to the matching solver.
//!
//! # Example
//! ```
//! use RustedRoots::numerical::roots_api::{Equation, MethodParams, solve};
//! let params = MethodParams::Chord {
//!     a: 2.0,
//!     b: 3.0,
//!     eps: 1e-8,
//!     max_iter: 100,
//! };
//! let result = solve(&Equation::single("x^2 - 5 = 0"), &params).unwrap();
//! assert!(result.is_converged());
//! ```
use crate::numerical::nonlinear_functions::{SymbolicFunction, SymbolicSystem};
use crate::numerical::root_result::{RootResult, SolverError};
use crate::numerical::scalar_roots::{RootFindingConfig, ScalarRootFinder};
use crate::numerical::system_roots::SystemRootFinder;
use nalgebra::Vector2;
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Method {
    Chord,
    Newton,
    ScalarFixedPoint,
    SystemFixedPoint,
}

impl Method {
    /// number of equations the method works on
    pub fn arity(&self) -> usize {
        match self {
            Method::SystemFixedPoint => 2,
            _ => 1,
        }
    }

    /// parameter names in the order of the parameter file, `maxIter` is always last
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            Method::Chord => &["a", "b", "eps", "maxIter"],
            Method::Newton => &["x0", "eps", "maxIter"],
            Method::ScalarFixedPoint => &["alpha", "x0", "eps", "maxIter"],
            Method::SystemFixedPoint => &["alpha", "x0", "y0", "eps", "maxIter"],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Method::Chord => "Chord method",
            Method::Newton => "Newton's method",
            Method::ScalarFixedPoint => "Fixed-point iteration",
            Method::SystemFixedPoint => "Damped fixed-point iteration for systems",
        }
    }
}

/// Parameters of every method
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MethodParams {
    Chord {
        a: f64,
        b: f64,
        eps: f64,
        max_iter: usize,
    },
    Newton {
        x0: f64,
        eps: f64,
        max_iter: usize,
    },
    ScalarFixedPoint {
        alpha: f64,
        x0: f64,
        eps: f64,
        max_iter: usize,
    },
    SystemFixedPoint {
        alpha: f64,
        x0: f64,
        y0: f64,
        eps: f64,
        max_iter: usize,
    },
}

impl MethodParams {
    /// Builds the bag from the real-valued fields in file order (everything except
    /// `maxIter`). Returns None when the number of reals does not fit the method.
    pub fn from_values(method: Method, reals: &[f64], max_iter: usize) -> Option<Self> {
        let params = match (method, reals) {
            (Method::Chord, &[a, b, eps]) => MethodParams::Chord {
                a,
                b,
                eps,
                max_iter,
            },
            (Method::Newton, &[x0, eps]) => MethodParams::Newton { x0, eps, max_iter },
            (Method::ScalarFixedPoint, &[alpha, x0, eps]) => MethodParams::ScalarFixedPoint {
                alpha,
                x0,
                eps,
                max_iter,
            },
            (Method::SystemFixedPoint, &[alpha, x0, y0, eps]) => MethodParams::SystemFixedPoint {
                alpha,
                x0,
                y0,
                eps,
                max_iter,
            },
            _ => return None,
        };
        Some(params)
    }

    pub fn method(&self) -> Method {
        match self {
            MethodParams::Chord { .. } => Method::Chord,
            MethodParams::Newton { .. } => Method::Newton,
            MethodParams::ScalarFixedPoint { .. } => Method::ScalarFixedPoint,
            MethodParams::SystemFixedPoint { .. } => Method::SystemFixedPoint,
        }
    }

    pub fn config(&self) -> RootFindingConfig {
        let (tolerance, max_iterations) = match *self {
            MethodParams::Chord { eps, max_iter, .. }
            | MethodParams::Newton { eps, max_iter, .. }
            | MethodParams::ScalarFixedPoint { eps, max_iter, .. }
            | MethodParams::SystemFixedPoint { eps, max_iter, .. } => (eps, max_iter),
        };
        RootFindingConfig {
            tolerance,
            max_iterations,
        }
    }

    /// (name, value) pairs in file order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let values: Vec<String> = match *self {
            MethodParams::Chord { a, b, eps, max_iter } => {
                vec![a.to_string(), b.to_string(), eps.to_string(), max_iter.to_string()]
            }
            MethodParams::Newton { x0, eps, max_iter } => {
                vec![x0.to_string(), eps.to_string(), max_iter.to_string()]
            }
            MethodParams::ScalarFixedPoint {
                alpha,
                x0,
                eps,
                max_iter,
            } => vec![
                alpha.to_string(),
                x0.to_string(),
                eps.to_string(),
                max_iter.to_string(),
            ],
            MethodParams::SystemFixedPoint {
                alpha,
                x0,
                y0,
                eps,
                max_iter,
            } => vec![
                alpha.to_string(),
                x0.to_string(),
                y0.to_string(),
                eps.to_string(),
                max_iter.to_string(),
            ],
        };
        self.method()
            .parameter_names()
            .iter()
            .copied()
            .zip(values)
            .collect()
    }
}

impl fmt::Display for MethodParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fields: Vec<String> = self
            .fields()
            .into_iter()
            .map(|(name, value)| format!("{} = {}", name, value))
            .collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// One equation in `x` or a pair of equations in `x, y`
#[derive(Debug, Clone, PartialEq)]
pub enum Equation {
    Single(String),
    Pair(String, String),
}

impl Equation {
    pub fn single(equation: &str) -> Self {
        Equation::Single(equation.to_string())
    }

    pub fn pair(first: &str, second: &str) -> Self {
        Equation::Pair(first.to_string(), second.to_string())
    }

    pub fn arity(&self) -> usize {
        match self {
            Equation::Single(_) => 1,
            Equation::Pair(..) => 2,
        }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Equation::Single(equation) => write!(f, "{}", equation),
            Equation::Pair(first, second) => write!(f, "{}; {}", first, second),
        }
    }
}

/// Parses the equation(s), compiles them once and runs the method the parameters belong to.
pub fn solve(equation: &Equation, params: &MethodParams) -> Result<RootResult, SolverError> {
    let method = params.method();
    let config = params.config();
    config.validate()?;
    match (equation, *params) {
        (Equation::Single(equation), MethodParams::Chord { a, b, .. }) => {
            let function = SymbolicFunction::from_equation(equation)?;
            ScalarRootFinder::with_config(config).chord(&function, a, b)
        }
        (Equation::Single(equation), MethodParams::Newton { x0, .. }) => {
            let function = SymbolicFunction::from_equation(equation)?;
            ScalarRootFinder::with_config(config).newton(&function, x0)
        }
        (Equation::Single(equation), MethodParams::ScalarFixedPoint { alpha, x0, .. }) => {
            let function = SymbolicFunction::from_equation(equation)?;
            ScalarRootFinder::with_config(config).fixed_point(&function, alpha, x0)
        }
        (
            Equation::Pair(first, second),
            MethodParams::SystemFixedPoint { alpha, x0, y0, .. },
        ) => {
            let system = SymbolicSystem::from_equations(first, second)?;
            SystemRootFinder::with_config(config).damped_fixed_point(
                &system,
                alpha,
                Vector2::new(x0, y0),
            )
        }
        (equation, _) => Err(SolverError::ArityMismatch {
            method,
            expected: method.arity(),
            got: equation.arity(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::root_result::RootStatus;
    use crate::symbolic::symbolic_engine::ExprError;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_method_names() {
        assert_eq!(Method::from_str("newton").unwrap(), Method::Newton);
        assert_eq!(
            Method::from_str("system_fixed_point").unwrap(),
            Method::SystemFixedPoint
        );
        assert_eq!(Method::ScalarFixedPoint.to_string(), "scalar_fixed_point");
        assert!(Method::from_str("bisection").is_err());
        assert_eq!(Method::iter().count(), 4);
        assert_eq!(Method::iter().filter(|m| m.arity() == 1).count(), 3);
        for method in Method::iter() {
            assert_eq!(method.parameter_names().last(), Some(&"maxIter"));
        }
    }

    #[test]
    fn test_from_values() {
        let params = MethodParams::from_values(Method::Newton, &[2.0, 1e-10], 50).unwrap();
        assert_eq!(
            params,
            MethodParams::Newton {
                x0: 2.0,
                eps: 1e-10,
                max_iter: 50
            }
        );
        assert!(MethodParams::from_values(Method::Chord, &[1.0, 2.0], 10).is_none());
        assert_eq!(params.to_string(), "x0 = 2, eps = 0.0000000001, maxIter = 50");
    }

    #[test]
    fn test_solve_every_method() {
        let equation = Equation::single("x^2 - 5 = 0");
        let scalar_params = [
            MethodParams::Chord {
                a: 2.0,
                b: 3.0,
                eps: 1e-8,
                max_iter: 100,
            },
            MethodParams::Newton {
                x0: 2.0,
                eps: 1e-10,
                max_iter: 50,
            },
            MethodParams::ScalarFixedPoint {
                alpha: 0.1,
                x0: 2.0,
                eps: 1e-8,
                max_iter: 100,
            },
        ];
        for params in scalar_params {
            let result = solve(&equation, &params).unwrap();
            assert!(result.is_converged(), "{}", result);
            assert_eq!(result.method, params.method());
            assert!((result.value.as_scalar().unwrap() - 5f64.sqrt()).abs() < 1e-6);
        }
        let system = Equation::pair("x^2 + y^2 -1 = 0", "x^3 - y = 0");
        let params = MethodParams::SystemFixedPoint {
            alpha: -0.3,
            x0: -1.0,
            y0: -1.0,
            eps: 1e-6,
            max_iter: 200,
        };
        let result = solve(&system, &params).unwrap();
        assert!(result.is_converged());
        assert_eq!(result.method, Method::SystemFixedPoint);
    }

    #[test]
    fn test_arity_mismatch() {
        let params = MethodParams::Newton {
            x0: 1.0,
            eps: 1e-8,
            max_iter: 10,
        };
        assert_eq!(
            solve(&Equation::pair("x = 0", "y = 0"), &params),
            Err(SolverError::ArityMismatch {
                method: Method::Newton,
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn test_parse_failure_and_bad_parameters() {
        let params = MethodParams::Newton {
            x0: 1.0,
            eps: 1e-8,
            max_iter: 10,
        };
        assert!(matches!(
            solve(&Equation::single("x^2 +"), &params),
            Err(SolverError::ParseFailure(ExprError::Syntax { .. }))
        ));
        assert!(matches!(
            solve(&Equation::single("x + y"), &params),
            Err(SolverError::ParseFailure(ExprError::UnknownVariable { .. }))
        ));
        let bad = MethodParams::Newton {
            x0: 1.0,
            eps: -1.0,
            max_iter: 10,
        };
        assert!(matches!(
            solve(&Equation::single("x - 1"), &bad),
            Err(SolverError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_degenerate_bracket_through_api() {
        let params = MethodParams::Chord {
            a: 1.0,
            b: 1.0,
            eps: 1e-8,
            max_iter: 100,
        };
        let result = solve(&Equation::single("x^2 - 5 = 0"), &params).unwrap();
        assert!(matches!(result.status, RootStatus::Failed(_)));
        assert_eq!(result.iterations, 0);
    }
}
