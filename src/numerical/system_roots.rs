//! Damped fixed-point iteration for a pair of equations F(x, y) = 0.
//!
//! Every outer iteration proposes `(x, y) - alpha F(x, y)` and halves the relaxation
//! factor until the residual norm `||F||` strictly decreases. The iteration stops on
//! a small residual, a small step, divergence (`|x|` or `|y|` above 1e15), when no step
//! size improves the residual or when the budget is spent.
//!
//! # Example
//! ```
//! use nalgebra::Vector2;
//! use RustedRoots::numerical::nonlinear_functions::SymbolicSystem;
//! use RustedRoots::numerical::scalar_roots::RootFindingConfig;
//! use RustedRoots::numerical::system_roots::SystemRootFinder;
//! let system = SymbolicSystem::from_equations("x^2 + y^2 -1 = 0", "x^3 - y = 0").unwrap();
//! let finder = SystemRootFinder::with_config(RootFindingConfig {
//!     tolerance: 1e-6,
//!     max_iterations: 200,
//! });
//! let result = finder
//!     .damped_fixed_point(&system, -0.3, Vector2::new(-1.0, -1.0))
//!     .unwrap();
//! assert!(result.is_converged());
//! ```
use crate::numerical::convergence::{
    ConvergenceMonitor, IterationRecord, LineSearchRecord, Progress, require_finite,
};
use crate::numerical::nonlinear_functions::{EvalError, NonlinearSystem};
use crate::numerical::root_result::{
    ConvergenceCriterion, FailureReason, RootResult, RootStatus, RootValue, SolverError,
};
use crate::numerical::roots_api::Method;
use crate::numerical::scalar_roots::{RootFindingConfig, log_outcome};
use log::{debug, info};
use nalgebra::Vector2;

/// candidate step sizes tried per iteration: alpha, alpha/2, ..., alpha/2^19
pub const STEP_SIZE_CANDIDATES: usize = 20;

fn pair(point: &Vector2<f64>) -> RootValue {
    RootValue::Pair {
        x: point[0],
        y: point[1],
    }
}

fn residual_norm<S: NonlinearSystem + ?Sized>(system: &S, point: &Vector2<f64>) -> f64 {
    match system.evaluate(point) {
        Ok(value) => value.norm(),
        Err(EvalError::NonFinite { value }) => value.abs(),
        Err(EvalError::DerivativeUnavailable) => f64::NAN,
    }
}

#[derive(Debug, Clone)]
pub struct SystemRootFinder {
    config: RootFindingConfig,
    step_size_candidates: usize,
}

impl Default for SystemRootFinder {
    fn default() -> Self {
        Self {
            config: RootFindingConfig::default(),
            step_size_candidates: STEP_SIZE_CANDIDATES,
        }
    }
}

impl SystemRootFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RootFindingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RootFindingConfig {
        &self.config
    }

    /// Backtracking: the first candidate `point - step_size * value` with a smaller residual
    /// norm wins. Candidates that cannot be evaluated count as not improving.
    fn line_search<S>(
        &self,
        system: &S,
        point: &Vector2<f64>,
        value: &Vector2<f64>,
        residual: f64,
        alpha: f64,
    ) -> Option<(Vector2<f64>, LineSearchRecord)>
    where
        S: NonlinearSystem + ?Sized,
    {
        let mut step_size = alpha;
        for halvings in 0..self.step_size_candidates {
            let candidate = point - value * step_size;
            if let Ok(trial) = system.evaluate(&candidate) {
                let trial_residual = trial.norm();
                if trial_residual < residual {
                    let record = LineSearchRecord {
                        step_size,
                        halvings,
                        trial_residual,
                    };
                    return Some((candidate, record));
                }
            }
            step_size /= 2.0;
        }
        None
    }

    fn finished<S>(
        &self,
        system: &S,
        point: &Vector2<f64>,
        status: RootStatus,
        monitor: ConvergenceMonitor,
    ) -> RootResult
    where
        S: NonlinearSystem + ?Sized,
    {
        let result = RootResult::new(
            Method::SystemFixedPoint,
            pair(point),
            monitor.iteration(),
            residual_norm(system, point),
            status,
        )
        .with_trace(monitor.into_trace());
        log_outcome(&result);
        result
    }

    /// Damped fixed-point iteration with backtracking line search, starting at `initial`
    pub fn damped_fixed_point<S>(
        &self,
        system: &S,
        alpha: f64,
        initial: Vector2<f64>,
    ) -> Result<RootResult, SolverError>
    where
        S: NonlinearSystem + ?Sized,
    {
        let mut monitor =
            ConvergenceMonitor::new(self.config.tolerance, self.config.max_iterations)?;
        require_finite("alpha", alpha)?;
        require_finite("x0", initial[0])?;
        require_finite("y0", initial[1])?;
        info!(
            "damped fixed-point iteration for {} from ({}, {}) with alpha = {}",
            system.name(),
            initial[0],
            initial[1],
            alpha
        );

        let mut point = initial;
        let mut criterion = ConvergenceCriterion::Step;
        while monitor.has_budget() {
            let value = match system.evaluate(&point) {
                Ok(value) => value,
                Err(_) => {
                    let reason = FailureReason::NonFiniteEvaluation { at: pair(&point) };
                    let status = RootStatus::Failed(reason);
                    return Ok(self.finished(system, &point, status, monitor));
                }
            };
            let residual = value.norm();
            if monitor.residual_reached(residual) {
                criterion = ConvergenceCriterion::Residual;
                break;
            }
            let Some((next, search)) = self.line_search(system, &point, &value, residual, alpha)
            else {
                let reason = FailureReason::NoImprovingStep {
                    attempts: self.step_size_candidates,
                    residual,
                };
                let status = RootStatus::Failed(reason);
                return Ok(self.finished(system, &point, status, monitor));
            };
            let step = (next - point).norm();
            monitor.record(IterationRecord {
                iteration: monitor.iteration() + 1,
                point: pair(&next),
                step,
                residual,
                line_search: Some(search),
            });
            debug!(
                "iteration {}: ({}, {}), step = {:e}, ||F|| {:e} -> {:e}, step size {} after {} halvings",
                monitor.iteration(),
                next[0],
                next[1],
                step,
                residual,
                search.trial_residual,
                search.step_size,
                search.halvings
            );
            point = next;
            if monitor.step_reached(step) {
                break;
            }
            if monitor.check_divergence(&[point[0], point[1]]) {
                break;
            }
        }
        let status = match monitor.finish() {
            Progress::Converged => RootStatus::Converged(criterion),
            Progress::Diverged => RootStatus::Diverged,
            Progress::Running | Progress::Exhausted => RootStatus::MaxIterationsReached,
        };
        Ok(self.finished(system, &point, status, monitor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::nonlinear_functions::{ClosureSystem, SymbolicSystem};

    fn finder(tolerance: f64, max_iterations: usize) -> SystemRootFinder {
        SystemRootFinder::with_config(RootFindingConfig {
            tolerance,
            max_iterations,
        })
    }

    fn circle_and_cubic() -> SymbolicSystem {
        SymbolicSystem::from_equations("x^2 + y^2 -1 = 0", "x^3 - y = 0").unwrap()
    }

    #[test]
    fn test_circle_and_cubic_converges() {
        let system = circle_and_cubic();
        let result = finder(1e-6, 200)
            .damped_fixed_point(&system, -0.3, Vector2::new(-1.0, -1.0))
            .unwrap();
        assert_eq!(result.status, RootStatus::Converged(ConvergenceCriterion::Step));
        let (x, y) = result.value.as_pair().unwrap();
        let value = system.evaluate(&Vector2::new(x, y)).unwrap();
        assert!(value[0].abs() < 1e-5);
        assert!(value[1].abs() < 1e-5);
        assert!((x + 0.826031).abs() < 1e-5);
        assert!((y + 0.563624).abs() < 1e-5);
        assert_eq!(result.iterations, result.trace.len());
        assert_eq!(result.final_residual, value.norm());
    }

    #[test]
    fn test_accepted_steps_are_first_improving_candidates() {
        let system = circle_and_cubic();
        let alpha = -2.0;
        let initial = Vector2::new(-1.0, -1.0);
        let result = finder(1e-6, 200)
            .damped_fixed_point(&system, alpha, initial)
            .unwrap();
        assert!(result.is_converged());

        let mut previous = initial;
        let mut halved_somewhere = false;
        for record in &result.trace {
            let search = record.line_search.unwrap();
            assert!(search.trial_residual < record.residual);
            let value = system.evaluate(&previous).unwrap();
            assert_eq!(value.norm(), record.residual);
            // all larger step sizes were rejected
            for rejected in 0..search.halvings {
                let step_size = alpha / 2f64.powi(rejected as i32);
                let candidate = previous - value * step_size;
                let trial = system.evaluate(&candidate).map(|v| v.norm());
                assert!(!matches!(trial, Ok(norm) if norm < record.residual));
            }
            assert_eq!(search.step_size, alpha / 2f64.powi(search.halvings as i32));
            halved_somewhere |= search.halvings > 0;
            let (x, y) = record.point.as_pair().unwrap();
            previous = Vector2::new(x, y);
        }
        assert!(halved_somewhere);
        // residual norm strictly decreases along the trace
        for pair in result.trace.windows(2) {
            assert!(pair[1].residual < pair[0].residual);
        }
    }

    #[test]
    fn test_no_improving_step() {
        let system = circle_and_cubic();
        let result = finder(1e-6, 200)
            .damped_fixed_point(&system, 0.5, Vector2::new(1.0, 1.0))
            .unwrap();
        assert!(matches!(
            result.status,
            RootStatus::Failed(FailureReason::NoImprovingStep { attempts: 20, .. })
        ));
        assert_eq!(result.iterations, 1);
        assert_eq!(result.value, RootValue::Pair { x: 0.5, y: 1.0 });
    }

    #[test]
    fn test_budget_exhausted() {
        let system = circle_and_cubic();
        let result = finder(1e-6, 5)
            .damped_fixed_point(&system, -0.3, Vector2::new(-1.0, -1.0))
            .unwrap();
        assert_eq!(result.status, RootStatus::MaxIterationsReached);
        assert_eq!(result.iterations, 5);
    }

    #[test]
    fn test_start_at_root() {
        let system = ClosureSystem::new(|x, y| (x + y - 3.0, x - y - 1.0), "linear");
        let result = finder(1e-10, 100)
            .damped_fixed_point(&system, 0.5, Vector2::new(2.0, 1.0))
            .unwrap();
        assert_eq!(
            result.status,
            RootStatus::Converged(ConvergenceCriterion::Residual)
        );
        assert_eq!(result.iterations, 0);
        assert_eq!(result.final_residual, 0.0);
    }

    #[test]
    fn test_divergence() {
        // the residual keeps shrinking while the iterate runs away
        let system = ClosureSystem::new(|x: f64, y: f64| (1.0 / x.sqrt(), 1.0 / y.sqrt()), "tail");
        let result = finder(1e-12, 100)
            .damped_fixed_point(&system, -1e16, Vector2::new(1.0, 1.0))
            .unwrap();
        assert_eq!(result.status, RootStatus::Diverged);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_non_finite_start() {
        let system = SymbolicSystem::from_equations("ln(x) + y = 0", "y = 0").unwrap();
        let result = finder(1e-6, 100)
            .damped_fixed_point(&system, 0.5, Vector2::new(-1.0, 0.0))
            .unwrap();
        assert!(matches!(
            result.status,
            RootStatus::Failed(FailureReason::NonFiniteEvaluation { .. })
        ));
        assert!(result.final_residual.is_nan());

        let pole = ClosureSystem::new(|x: f64, y: f64| (1.0 / x, y), "pole");
        let result = finder(1e-6, 100)
            .damped_fixed_point(&pole, 0.5, Vector2::new(0.0, 1.0))
            .unwrap();
        assert_eq!(result.final_residual, f64::INFINITY);
    }

    #[test]
    fn test_invalid_parameters() {
        let system = circle_and_cubic();
        assert!(matches!(
            finder(-1.0, 100).damped_fixed_point(&system, 0.5, Vector2::new(1.0, 1.0)),
            Err(SolverError::InvalidParameters(_))
        ));
        assert!(matches!(
            finder(1e-6, 100).damped_fixed_point(&system, 0.5, Vector2::new(f64::INFINITY, 1.0)),
            Err(SolverError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_identical_inputs_identical_results() {
        let system = circle_and_cubic();
        let solver = finder(1e-6, 200);
        let first = solver
            .damped_fixed_point(&system, -0.3, Vector2::new(0.0, 0.0))
            .unwrap();
        let second = solver
            .damped_fixed_point(&system, -0.3, Vector2::new(0.0, 0.0))
            .unwrap();
        assert_eq!(first, second);
    }
}
