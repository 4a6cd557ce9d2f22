//! Iteration bookkeeping shared by all root finders: counts completed updates, applies
//! the residual, step and divergence tests and keeps the per-iteration trace.
use crate::numerical::root_result::{RootValue, SolverError};

/// |x| above this is treated as divergence by the fixed-point methods
pub const DIVERGENCE_THRESHOLD: f64 = 1e15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    Converged,
    Diverged,
    Exhausted,
}

/// Step size search outcome of one damped fixed-point iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSearchRecord {
    /// accepted relaxation factor
    pub step_size: f64,
    /// number of halvings before acceptance
    pub halvings: usize,
    /// ||F|| at the accepted point
    pub trial_residual: f64,
}

/// One completed update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord {
    /// 1-based
    pub iteration: usize,
    /// the new iterate
    pub point: RootValue,
    /// magnitude of the update
    pub step: f64,
    /// residual at the iterate the update started from
    pub residual: f64,
    pub line_search: Option<LineSearchRecord>,
}

impl IterationRecord {
    pub fn scalar(iteration: usize, x: f64, step: f64, residual: f64) -> Self {
        Self {
            iteration,
            point: RootValue::Scalar(x),
            step,
            residual,
            line_search: None,
        }
    }
}

pub fn validate_tolerance(tolerance: f64, max_iterations: usize) -> Result<(), SolverError> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(SolverError::InvalidParameters(format!(
            "tolerance must be a positive finite number, got {}",
            tolerance
        )));
    }
    if max_iterations == 0 {
        return Err(SolverError::InvalidParameters(
            "maximum number of iterations must be positive".to_string(),
        ));
    }
    Ok(())
}

/// starting points, bracket ends and relaxation factors must be ordinary numbers
pub fn require_finite(name: &str, value: f64) -> Result<(), SolverError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SolverError::InvalidParameters(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}

#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    tolerance: f64,
    max_iterations: usize,
    iteration: usize,
    last_step: Option<f64>,
    last_residual: Option<f64>,
    progress: Progress,
    trace: Vec<IterationRecord>,
}

impl ConvergenceMonitor {
    pub fn new(tolerance: f64, max_iterations: usize) -> Result<Self, SolverError> {
        validate_tolerance(tolerance, max_iterations)?;
        Ok(Self {
            tolerance,
            max_iterations,
            iteration: 0,
            last_step: None,
            last_residual: None,
            progress: Progress::Running,
            trace: Vec::with_capacity(max_iterations.min(1024)),
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// number of completed updates so far
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn last_step(&self) -> Option<f64> {
        self.last_step
    }

    pub fn last_residual(&self) -> Option<f64> {
        self.last_residual
    }

    /// true while nothing terminal happened and updates are left in the budget
    pub fn has_budget(&self) -> bool {
        self.progress == Progress::Running && self.iteration < self.max_iterations
    }

    /// residual test before an update; marks convergence when `residual < tolerance`
    pub fn residual_reached(&mut self, residual: f64) -> bool {
        self.last_residual = Some(residual);
        if residual < self.tolerance {
            self.progress = Progress::Converged;
        }
        self.progress == Progress::Converged
    }

    /// registers a completed update
    pub fn record(&mut self, record: IterationRecord) {
        self.iteration += 1;
        self.last_step = Some(record.step);
        self.trace.push(record);
    }

    /// step test after an update; marks convergence when `step < tolerance`
    pub fn step_reached(&mut self, step: f64) -> bool {
        if step < self.tolerance {
            self.progress = Progress::Converged;
        }
        self.progress == Progress::Converged
    }

    /// marks divergence when any coordinate magnitude exceeds the threshold
    pub fn check_divergence(&mut self, coordinates: &[f64]) -> bool {
        if coordinates.iter().any(|c| c.abs() > DIVERGENCE_THRESHOLD) {
            self.progress = Progress::Diverged;
        }
        self.progress == Progress::Diverged
    }

    /// closes the loop: a still running monitor becomes Exhausted
    pub fn finish(&mut self) -> Progress {
        if self.progress == Progress::Running {
            self.progress = Progress::Exhausted;
        }
        self.progress
    }

    pub fn into_trace(self) -> Vec<IterationRecord> {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(ConvergenceMonitor::new(0.0, 10).is_err());
        assert!(ConvergenceMonitor::new(-1e-6, 10).is_err());
        assert!(ConvergenceMonitor::new(f64::NAN, 10).is_err());
        assert!(ConvergenceMonitor::new(1e-6, 0).is_err());
        assert!(ConvergenceMonitor::new(1e-6, 1).is_ok());
    }

    #[test]
    fn test_budget_and_exhaustion() {
        let mut monitor = ConvergenceMonitor::new(1e-6, 2).unwrap();
        let mut updates = 0;
        while monitor.has_budget() {
            updates += 1;
            monitor.record(IterationRecord::scalar(updates, 1.0, 1.0, 1.0));
            assert!(!monitor.step_reached(1.0));
        }
        assert_eq!(updates, 2);
        assert_eq!(monitor.finish(), Progress::Exhausted);
        assert_eq!(monitor.into_trace().len(), 2);
    }

    #[test]
    fn test_residual_and_step_tests_are_strict() {
        let mut monitor = ConvergenceMonitor::new(1e-3, 10).unwrap();
        assert!(!monitor.residual_reached(1e-3));
        assert!(!monitor.step_reached(1e-3));
        assert!(monitor.step_reached(9e-4));
        assert!(!monitor.has_budget());
        assert_eq!(monitor.finish(), Progress::Converged);
    }

    #[test]
    fn test_divergence() {
        let mut monitor = ConvergenceMonitor::new(1e-3, 10).unwrap();
        assert!(!monitor.check_divergence(&[1e15, -1e15]));
        assert!(monitor.check_divergence(&[0.0, -2e15]));
        assert_eq!(monitor.progress(), Progress::Diverged);
        assert_eq!(monitor.finish(), Progress::Diverged);
    }
}
