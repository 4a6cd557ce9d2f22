//! Chord, Newton and relaxation (fixed-point) iterations for one equation f(x) = 0.
//!
//! # Example
//! ```
//! use RustedRoots::numerical::nonlinear_functions::SymbolicFunction;
//! use RustedRoots::numerical::scalar_roots::{RootFindingConfig, ScalarRootFinder};
//! let f = SymbolicFunction::from_equation("x^2 - 5 = 0").unwrap();
//! let finder = ScalarRootFinder::with_config(RootFindingConfig {
//!     tolerance: 1e-10,
//!     max_iterations: 50,
//! });
//! let result = finder.newton(&f, 2.0).unwrap();
//! assert!(result.is_converged());
//! ```
use crate::numerical::convergence::{
    ConvergenceMonitor, IterationRecord, Progress, require_finite, validate_tolerance,
};
use crate::numerical::nonlinear_functions::{EvalError, NonlinearFunction};
use crate::numerical::root_result::{
    ConvergenceCriterion, FailureReason, RootResult, RootStatus, RootValue, SolverError,
};
use crate::numerical::roots_api::Method;
use log::{debug, error, info, warn};

/// differences of function values below this are treated as zero
pub const DENOMINATOR_FLOOR: f64 = 1e-15;
/// number of equal steps of the bracket sign-change scan
pub const BRACKET_STEPS: usize = 100;

/// Sign-change scan of the chord bracket. Advisory only, the solve goes on regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketDiagnostics {
    pub sign_changes: usize,
    /// f(a) * f(b) > 0
    pub endpoints_same_sign: bool,
    /// samples where f could not be evaluated
    pub unevaluated_samples: usize,
}

impl BracketDiagnostics {
    pub fn may_hold_several_roots(&self) -> bool {
        self.sign_changes > 1
    }
}

fn sign(value: Option<f64>) -> i8 {
    match value {
        Some(v) if v > 0.0 => 1,
        Some(v) if v < 0.0 => -1,
        _ => 0,
    }
}

/// Samples `f` at `BRACKET_STEPS + 1` equally spaced points of `[a, b]` and counts sign
/// changes between neighbours. Zero or unevaluable samples have no sign and break the chain.
pub fn bracket_diagnostics<F>(function: &F, a: f64, b: f64) -> BracketDiagnostics
where
    F: NonlinearFunction + ?Sized,
{
    let step = (b - a) / BRACKET_STEPS as f64;
    let mut unevaluated_samples = 0;
    let signs: Vec<i8> = (0..=BRACKET_STEPS)
        .map(|i| {
            let x = if i == BRACKET_STEPS { b } else { a + i as f64 * step };
            let value = function.evaluate(x).ok();
            if value.is_none() {
                unevaluated_samples += 1;
            }
            sign(value)
        })
        .collect();
    let sign_changes = signs
        .windows(2)
        .filter(|pair| pair[0] != 0 && pair[1] != 0 && pair[0] != pair[1])
        .count();
    let endpoints_same_sign = match (function.evaluate(a), function.evaluate(b)) {
        (Ok(fa), Ok(fb)) => fa * fb > 0.0,
        _ => false,
    };
    BracketDiagnostics {
        sign_changes,
        endpoints_same_sign,
        unevaluated_samples,
    }
}

/// Tolerance and iteration budget shared by all methods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootFindingConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RootFindingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl RootFindingConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        validate_tolerance(self.tolerance, self.max_iterations)
    }
}

/// |f(x)|; an overflowed value keeps its infinite magnitude, anything else unevaluable is NaN
fn residual_at<F: NonlinearFunction + ?Sized>(function: &F, x: f64) -> f64 {
    match function.evaluate(x) {
        Ok(value) => value.abs(),
        Err(EvalError::NonFinite { value }) => value.abs(),
        Err(EvalError::DerivativeUnavailable) => f64::NAN,
    }
}

/// Logs the terminal status of a solve at the level it deserves
pub(crate) fn log_outcome(result: &RootResult) {
    match result.status {
        RootStatus::Converged(_) => info!("{}", result),
        RootStatus::MaxIterationsReached => warn!("{}", result),
        RootStatus::Diverged | RootStatus::Failed(_) => error!("{}", result),
    }
}

/// Root finder for one equation. Parameters other than tolerance and budget are passed per call.
#[derive(Debug, Clone, Default)]
pub struct ScalarRootFinder {
    config: RootFindingConfig,
}

impl ScalarRootFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RootFindingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RootFindingConfig {
        &self.config
    }

    fn failed<F>(
        &self,
        function: &F,
        method: Method,
        x: f64,
        reason: FailureReason,
        monitor: ConvergenceMonitor,
    ) -> RootResult
    where
        F: NonlinearFunction + ?Sized,
    {
        let result = RootResult::new(
            method,
            RootValue::Scalar(x),
            monitor.iteration(),
            residual_at(function, x),
            RootStatus::Failed(reason),
        )
        .with_trace(monitor.into_trace());
        log_outcome(&result);
        result
    }

    fn concluded<F>(
        &self,
        function: &F,
        method: Method,
        x: f64,
        criterion: ConvergenceCriterion,
        mut monitor: ConvergenceMonitor,
    ) -> RootResult
    where
        F: NonlinearFunction + ?Sized,
    {
        let status = match monitor.finish() {
            Progress::Converged => RootStatus::Converged(criterion),
            Progress::Diverged => RootStatus::Diverged,
            Progress::Running | Progress::Exhausted => RootStatus::MaxIterationsReached,
        };
        let result = RootResult::new(
            method,
            RootValue::Scalar(x),
            monitor.iteration(),
            residual_at(function, x),
            status,
        )
        .with_trace(monitor.into_trace());
        log_outcome(&result);
        result
    }

    /// Chord method: the secant line is anchored at `a`, iterations start from `b`.
    /// `x_{n+1} = x_n - f(x_n) (x_n - a) / (f(x_n) - f(a))`
    pub fn chord<F>(&self, function: &F, a: f64, b: f64) -> Result<RootResult, SolverError>
    where
        F: NonlinearFunction + ?Sized,
    {
        let monitor = ConvergenceMonitor::new(self.config.tolerance, self.config.max_iterations)?;
        require_finite("a", a)?;
        require_finite("b", b)?;
        let method = Method::Chord;
        info!("chord method for {} on [{}, {}]", function.name(), a, b);

        let fa = match function.evaluate(a) {
            Ok(fa) => fa,
            Err(_) => {
                let reason = FailureReason::NonFiniteEvaluation {
                    at: RootValue::Scalar(a),
                };
                return Ok(self.failed(function, method, a, reason, monitor));
            }
        };
        let fb = match function.evaluate(b) {
            Ok(fb) => fb,
            Err(_) => {
                let reason = FailureReason::NonFiniteEvaluation {
                    at: RootValue::Scalar(b),
                };
                return Ok(self.failed(function, method, b, reason, monitor));
            }
        };
        if (fa - fb).abs() < DENOMINATOR_FLOOR {
            let reason = FailureReason::DegenerateBracket { fa, fb };
            return Ok(self.failed(function, method, b, reason, monitor));
        }

        let diagnostics = bracket_diagnostics(function, a, b);
        if diagnostics.may_hold_several_roots() {
            warn!(
                "{} sign changes on [{}, {}]: the bracket may hold several roots",
                diagnostics.sign_changes, a, b
            );
        }
        if diagnostics.endpoints_same_sign {
            warn!("f(a) = {} and f(b) = {} have the same sign", fa, fb);
        }
        let result = self.chord_loop(function, a, fa, b, monitor)?;
        Ok(result.with_bracket(diagnostics))
    }

    fn chord_loop<F>(
        &self,
        function: &F,
        a: f64,
        fa: f64,
        b: f64,
        mut monitor: ConvergenceMonitor,
    ) -> Result<RootResult, SolverError>
    where
        F: NonlinearFunction + ?Sized,
    {
        let method = Method::Chord;
        let mut x = b;
        while monitor.has_budget() {
            let fx = match function.evaluate(x) {
                Ok(fx) => fx,
                Err(_) => {
                    let reason = FailureReason::NonFiniteEvaluation {
                        at: RootValue::Scalar(x),
                    };
                    return Ok(self.failed(function, method, x, reason, monitor));
                }
            };
            let denominator = fx - fa;
            if denominator.abs() < DENOMINATOR_FLOOR {
                let reason = FailureReason::NearZeroDenominator { x, denominator };
                return Ok(self.failed(function, method, x, reason, monitor));
            }
            let x_next = x - fx * (x - a) / denominator;
            let step = (x_next - x).abs();
            monitor.record(IterationRecord::scalar(
                monitor.iteration() + 1,
                x_next,
                step,
                fx.abs(),
            ));
            debug!("chord iteration {}: x = {}, step = {:e}", monitor.iteration(), x_next, step);
            x = x_next;
            if monitor.step_reached(step) {
                break;
            }
        }
        Ok(self.concluded(function, method, x, ConvergenceCriterion::Step, monitor))
    }

    /// Newton's method with the exact derivative. There is no divergence guard: the
    /// iteration only stops on the step test, a zero derivative or the budget.
    pub fn newton<F>(&self, function: &F, x0: f64) -> Result<RootResult, SolverError>
    where
        F: NonlinearFunction + ?Sized,
    {
        let mut monitor =
            ConvergenceMonitor::new(self.config.tolerance, self.config.max_iterations)?;
        require_finite("x0", x0)?;
        let method = Method::Newton;
        info!("Newton method for {} from x0 = {}", function.name(), x0);

        let mut x = x0;
        while monitor.has_budget() {
            let evaluated = function
                .evaluate(x)
                .and_then(|fx| function.derivative(x).map(|dfx| (fx, dfx)));
            let (fx, dfx) = match evaluated {
                Ok(values) => values,
                Err(EvalError::DerivativeUnavailable) => {
                    return Err(SolverError::InvalidParameters(format!(
                        "Newton method needs the derivative of {}",
                        function.name()
                    )));
                }
                Err(EvalError::NonFinite { .. }) => {
                    let reason = FailureReason::NonFiniteEvaluation {
                        at: RootValue::Scalar(x),
                    };
                    return Ok(self.failed(function, method, x, reason, monitor));
                }
            };
            if dfx == 0.0 {
                let reason = FailureReason::ZeroDerivative { x };
                return Ok(self.failed(function, method, x, reason, monitor));
            }
            let x_next = x - fx / dfx;
            let step = (x_next - x).abs();
            monitor.record(IterationRecord::scalar(
                monitor.iteration() + 1,
                x_next,
                step,
                fx.abs(),
            ));
            debug!("Newton iteration {}: x = {}, step = {:e}", monitor.iteration(), x_next, step);
            x = x_next;
            if monitor.step_reached(step) {
                break;
            }
        }
        Ok(self.concluded(function, method, x, ConvergenceCriterion::Step, monitor))
    }

    /// Relaxation iteration `x_{n+1} = x_n - alpha f(x_n)`.
    ///
    /// Per step: residual test at `x_n`, then step test, then the divergence test
    /// `|x_{n+1}| > 1e15`.
    pub fn fixed_point<F>(&self, function: &F, alpha: f64, x0: f64) -> Result<RootResult, SolverError>
    where
        F: NonlinearFunction + ?Sized,
    {
        let mut monitor =
            ConvergenceMonitor::new(self.config.tolerance, self.config.max_iterations)?;
        require_finite("alpha", alpha)?;
        require_finite("x0", x0)?;
        let method = Method::ScalarFixedPoint;
        info!(
            "fixed-point iteration for {} from x0 = {} with alpha = {}",
            function.name(),
            x0,
            alpha
        );

        let mut x = x0;
        let mut criterion = ConvergenceCriterion::Step;
        while monitor.has_budget() {
            let fx = match function.evaluate(x) {
                Ok(fx) => fx,
                Err(_) => {
                    let reason = FailureReason::NonFiniteEvaluation {
                        at: RootValue::Scalar(x),
                    };
                    return Ok(self.failed(function, method, x, reason, monitor));
                }
            };
            if monitor.residual_reached(fx.abs()) {
                criterion = ConvergenceCriterion::Residual;
                break;
            }
            let x_next = x - alpha * fx;
            let step = (x_next - x).abs();
            monitor.record(IterationRecord::scalar(
                monitor.iteration() + 1,
                x_next,
                step,
                fx.abs(),
            ));
            debug!(
                "fixed-point iteration {}: x = {}, step = {:e}",
                monitor.iteration(),
                x_next,
                step
            );
            x = x_next;
            if monitor.step_reached(step) {
                break;
            }
            if monitor.check_divergence(&[x]) {
                break;
            }
        }
        Ok(self.concluded(function, method, x, criterion, monitor))
    }
}
