use crate::numerical::convergence::IterationRecord;
use crate::numerical::roots_api::Method;
use crate::numerical::scalar_roots::BracketDiagnostics;
use crate::symbolic::symbolic_engine::ExprError;
use std::fmt;
use strum_macros::Display;
use thiserror::Error;

/// Errors that stop a solve before the first iteration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("failed to parse equation: {0}")]
    ParseFailure(#[from] ExprError),
    #[error("invalid solver parameters: {0}")]
    InvalidParameters(String),
    #[error("method {method} expects {expected} equation(s), got {got}")]
    ArityMismatch {
        method: Method,
        expected: usize,
        got: usize,
    },
}

/// Found value: a number for one equation, a point for a system
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootValue {
    Scalar(f64),
    Pair { x: f64, y: f64 },
}

impl RootValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            RootValue::Scalar(x) => Some(*x),
            RootValue::Pair { .. } => None,
        }
    }

    pub fn as_pair(&self) -> Option<(f64, f64)> {
        match self {
            RootValue::Scalar(_) => None,
            RootValue::Pair { x, y } => Some((*x, *y)),
        }
    }
}

impl fmt::Display for RootValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootValue::Scalar(x) => write!(f, "x = {}", x),
            RootValue::Pair { x, y } => write!(f, "x = {}, y = {}", x, y),
        }
    }
}

/// Which stopping rule fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConvergenceCriterion {
    #[strum(serialize = "residual below tolerance")]
    Residual,
    #[strum(serialize = "step below tolerance")]
    Step,
}

/// Why a method gave up without converging
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FailureReason {
    #[error("degenerate bracket: f(a) = {fa} and f(b) = {fb} are numerically equal")]
    DegenerateBracket { fa: f64, fb: f64 },
    #[error("chord denominator f(x) - f(a) = {denominator} is too close to zero at x = {x}")]
    NearZeroDenominator { x: f64, denominator: f64 },
    #[error("derivative is exactly zero at x = {x}")]
    ZeroDerivative { x: f64 },
    #[error("no improving step after {attempts} step sizes, residual {residual}")]
    NoImprovingStep { attempts: usize, residual: f64 },
    #[error("function value is not finite at {at}")]
    NonFiniteEvaluation { at: RootValue },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootStatus {
    Converged(ConvergenceCriterion),
    MaxIterationsReached,
    Diverged,
    Failed(FailureReason),
}

impl RootStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, RootStatus::Converged(_))
    }
}

impl fmt::Display for RootStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootStatus::Converged(criterion) => write!(f, "converged ({})", criterion),
            RootStatus::MaxIterationsReached => write!(f, "maximum number of iterations reached"),
            RootStatus::Diverged => write!(f, "diverged"),
            RootStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome of one solve. Produced once, never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RootResult {
    pub method: Method,
    pub value: RootValue,
    /// number of completed updates
    pub iterations: usize,
    /// |f| or ||F|| re-evaluated at `value`, NaN if it cannot be evaluated there
    pub final_residual: f64,
    pub status: RootStatus,
    /// sign-change diagnostics, chord method only
    pub bracket: Option<BracketDiagnostics>,
    pub trace: Vec<IterationRecord>,
}

impl RootResult {
    pub fn new(
        method: Method,
        value: RootValue,
        iterations: usize,
        final_residual: f64,
        status: RootStatus,
    ) -> Self {
        Self {
            method,
            value,
            iterations,
            final_residual,
            status,
            bracket: None,
            trace: Vec::new(),
        }
    }

    pub fn with_bracket(mut self, bracket: BracketDiagnostics) -> Self {
        self.bracket = Some(bracket);
        self
    }

    pub fn with_trace(mut self, trace: Vec<IterationRecord>) -> Self {
        self.trace = trace;
        self
    }

    pub fn is_converged(&self) -> bool {
        self.status.is_converged()
    }
}

impl fmt::Display for RootResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} after {} iterations, residual {:e}, {}",
            self.method, self.value, self.iterations, self.final_residual, self.status
        )
    }
}
