//! Damped Gauss-Newton (Levenberg-Marquardt) solver over scalar residuals.
//!
//! The system is a flat variable buffer plus a list of residual functions
//! `r_i(vars)` that are all driven toward zero. Each iteration builds a
//! numeric Jacobian by forward differences and solves the damped normal
//! equations `(J^T J + lambda * I) * delta = -J^T r` via Cholesky.

use nalgebra::{Cholesky, DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A scalar residual equation over the variable buffer. Zero when satisfied.
pub type Residual = Box<dyn Fn(&[f64]) -> f64>;

/// Tuning knobs for the solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Outer iteration cap.
    pub max_iterations: usize,
    /// Damping retries per outer iteration.
    pub max_inner_iterations: usize,
    /// Stop when the residual L2 norm drops below this.
    pub tolerance: f64,
    /// Initial damping weight.
    pub lambda: f64,
    /// Finite-difference step scale.
    pub epsilon: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iterations: 80,
            max_inner_iterations: 12,
            tolerance: 1e-8,
            lambda: 1e-2,
            epsilon: 1e-6,
        }
    }
}

/// Outcome of a solve. Non-convergence is a normal, reportable outcome
/// (over-constrained or ill-posed systems), never a panic or error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolveResult {
    pub iterations: usize,
    pub converged: bool,
    pub final_error: f64,
}

fn eval_residuals(vars: &[f64], fns: &[Residual]) -> DVector<f64> {
    DVector::from_iterator(fns.len(), fns.iter().map(|f| f(vars)))
}

/// Minimize the residual L2 norm in place.
///
/// Each accepted step strictly reduces the residual norm. Iteration halts at
/// a tolerance-satisfying point, an unimprovable point, or the iteration cap.
pub fn solve(vars: &mut [f64], residuals: &[Residual], options: &SolveOptions) -> SolveResult {
    let n = vars.len();
    let m = residuals.len();

    if m == 0 || n == 0 {
        return SolveResult {
            iterations: 0,
            converged: true,
            final_error: 0.0,
        };
    }

    debug!(variables = n, residuals = m, "starting solve");

    let mut lambda = options.lambda;
    let mut r = eval_residuals(vars, residuals);
    let mut err = r.norm();

    for iter in 0..options.max_iterations {
        if err < options.tolerance {
            debug!(iterations = iter, final_error = err, "converged");
            return SolveResult {
                iterations: iter,
                converged: true,
                final_error: err,
            };
        }

        // Numeric Jacobian, one column per variable. Each perturbation is
        // restored before the next so every column sees the same base point.
        let mut jac = DMatrix::zeros(m, n);
        for j in 0..n {
            let v0 = vars[j];
            // Relative step with a floor of 1 to stay well-scaled near zero.
            let h = options.epsilon * (v0.abs() + 1.0);

            vars[j] = v0 + h;
            let r_plus = eval_residuals(vars, residuals);
            vars[j] = v0;

            let inv_h = 1.0 / h;
            for i in 0..m {
                jac[(i, j)] = (r_plus[i] - r[i]) * inv_h;
            }
        }

        // Gauss-Newton normal equations.
        let a = jac.transpose() * &jac;
        let g = jac.transpose() * &r;

        // Try damped steps, growing lambda until one improves the error.
        let mut accepted = false;
        for _ in 0..options.max_inner_iterations {
            let mut damped = a.clone();
            for d in 0..n {
                damped[(d, d)] += lambda;
            }

            // A non-positive pivot means the damped matrix is not positive
            // definite yet; this is a failed step, not a fatal condition.
            let Some(factor) = Cholesky::new(damped) else {
                lambda *= 10.0;
                continue;
            };

            let delta = factor.solve(&(-&g));
            let mut trial = vars.to_vec();
            for i in 0..n {
                trial[i] += delta[i];
            }

            let r_trial = eval_residuals(&trial, residuals);
            let err_trial = r_trial.norm();

            if err_trial < err {
                vars.copy_from_slice(&trial);
                r = r_trial;
                err = err_trial;
                lambda *= 0.3;
                accepted = true;
                break;
            }

            lambda *= 10.0;
        }

        if !accepted {
            // No damped step improved the error; report the best point found.
            debug!(iterations = iter + 1, final_error = err, "stalled");
            return SolveResult {
                iterations: iter + 1,
                converged: false,
                final_error: err,
            };
        }

        trace!(iteration = iter, error = err, lambda, "accepted step");
    }

    SolveResult {
        iterations: options.max_iterations,
        converged: err < options.tolerance,
        final_error: err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn res(f: impl Fn(&[f64]) -> f64 + 'static) -> Residual {
        Box::new(f)
    }

    #[test]
    fn empty_system_converges_immediately() {
        let mut vars: Vec<f64> = vec![];
        let result = solve(&mut vars, &[], &SolveOptions::default());
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.final_error, 0.0);
    }

    #[test]
    fn already_satisfied_system_takes_zero_iterations() {
        let mut vars = vec![1.0];
        let residuals = vec![res(|v| v[0] - 1.0)];
        let result = solve(&mut vars, &residuals, &SolveOptions::default());
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn linear_anchors_converge() {
        let mut vars = vec![0.0, 0.0];
        let residuals = vec![res(|v| v[0] - 3.0), res(|v| v[1] + 2.0)];
        let result = solve(&mut vars, &residuals, &SolveOptions::default());
        assert!(result.converged, "final error {}", result.final_error);
        assert_relative_eq!(vars[0], 3.0, epsilon = 1e-6);
        assert_relative_eq!(vars[1], -2.0, epsilon = 1e-6);
    }

    #[test]
    fn squared_distance_residual_converges() {
        // Pin (v0, v1) to the origin and push (v2, v3) out to distance 10.
        let mut vars = vec![0.0, 0.0, 3.0, 4.0];
        let residuals = vec![
            res(|v| v[0]),
            res(|v| v[1]),
            res(|v| {
                let dx = v[2] - v[0];
                let dy = v[3] - v[1];
                dx * dx + dy * dy - 100.0
            }),
        ];
        let result = solve(&mut vars, &residuals, &SolveOptions::default());
        assert!(result.converged, "final error {}", result.final_error);
        let dist = (vars[2] * vars[2] + vars[3] * vars[3]).sqrt();
        assert_relative_eq!(dist, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn contradictory_residuals_stall_without_converging() {
        // v0 = 0 and v0 = 10 cannot both hold; the solver settles near the
        // least-squares compromise and reports non-convergence.
        let mut vars = vec![0.0];
        let residuals = vec![res(|v| v[0]), res(|v| v[0] - 10.0)];
        let result = solve(&mut vars, &residuals, &SolveOptions::default());
        assert!(!result.converged);
        assert!(result.final_error > 1.0);
        assert_relative_eq!(vars[0], 5.0, epsilon = 1e-3);
    }

    #[test]
    fn stall_leaves_best_point_in_buffer() {
        let mut vars = vec![0.0];
        let residuals = vec![res(|v| v[0] - 1.0), res(|v| v[0] + 1.0)];
        let before = solve(&mut vars, &residuals, &SolveOptions::default());
        assert!(!before.converged);
        // Re-solving from the stalled point must not make the error worse.
        let after = solve(&mut vars, &residuals, &SolveOptions::default());
        assert!(after.final_error <= before.final_error + 1e-12);
    }

    proptest! {
        #[test]
        fn anchor_targets_are_always_reached(
            a in -100.0f64..100.0,
            b in -100.0f64..100.0,
            x0 in -100.0f64..100.0,
            y0 in -100.0f64..100.0,
        ) {
            let mut vars = vec![x0, y0];
            let residuals = vec![
                res(move |v| v[0] - a),
                res(move |v| v[1] - b),
            ];
            let result = solve(&mut vars, &residuals, &SolveOptions::default());
            prop_assert!(result.converged);
            prop_assert!((vars[0] - a).abs() < 1e-6);
            prop_assert!((vars[1] - b).abs() < 1e-6);
        }
    }
}
