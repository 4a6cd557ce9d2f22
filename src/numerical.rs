//! Numerical part of the crate: root finders for one nonlinear equation and for a pair
//! of coupled equations.
//!
//! ```
//! use RustedRoots::numerical::roots_api::{Equation, MethodParams, solve};
//! let system = Equation::pair("x^2 + y^2 -1 = 0", "x^3 - y = 0");
//! let params = MethodParams::SystemFixedPoint {
//!     alpha: -0.3,
//!     x0: -1.0,
//!     y0: -1.0,
//!     eps: 1e-6,
//!     max_iter: 200,
//! };
//! let result = solve(&system, &params).unwrap();
//! println!("{}", result);
//! ```

/// iteration counter, stopping rules and per-iteration trace
pub mod convergence;
/// NonlinearFunction / NonlinearSystem traits with closure and symbolic implementations
pub mod nonlinear_functions;
/// RootResult, statuses and solver errors
pub mod root_result;
/// Method / MethodParams dispatch from equation strings
pub mod roots_api;
/// chord, Newton and fixed-point iterations for one equation
pub mod scalar_roots;
/// damped fixed-point iteration with backtracking for two equations
pub mod system_roots;
