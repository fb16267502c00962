//! Levenberg–Marquardt for small dense least-squares systems.
//!
//! Minimizes `0.5 * ‖r(x)‖²` with a forward-difference Jacobian and
//! Marquardt-scaled damping `(JᵀJ + λ diag(JᵀJ)) δ = -Jᵀr`. Systems here
//! have a handful of unknowns, so the normal equations are solved by
//! Gaussian elimination with partial pivoting.
//!
//! # References
//!
//! - Levenberg (1944), "A method for the solution of certain non-linear
//!   problems in least squares"
//! - Marquardt (1963), "An algorithm for least-squares estimation of
//!   nonlinear parameters"

use thiserror::Error;

use super::config::LmSettings;

/// Why a least-squares solve was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolverError {
    #[error("maximum iterations ({0}) exceeded")]
    MaxIterations(usize),

    #[error("normal equations are singular")]
    Singular,

    #[error("residual evaluated to NaN or infinity")]
    NotFinite,

    #[error("residuals stalled above tolerance (max |r| = {max_residual:e})")]
    ResidualTooLarge { max_residual: f64 },

    #[error("{residuals} residuals cannot determine {unknowns} unknowns")]
    Underdetermined { residuals: usize, unknowns: usize },
}

/// Outcome of a converged solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeastSquaresReport {
    /// Minimizer.
    pub x: Vec<f64>,
    /// `0.5 * ‖r(x)‖²`.
    pub cost: f64,
    /// `max |r_i|`.
    pub max_residual: f64,
    pub iterations: usize,
    pub residual_evals: usize,
    pub jacobian_evals: usize,
}

/// Solves `min 0.5 * ‖r(x)‖²` starting from `x0`.
///
/// `residuals(x, out)` writes `residual_count` values into `out`. The run
/// is deterministic for identical inputs.
///
/// # Errors
///
/// Any [`SolverError`]; in particular a fit that stops improving while
/// some `|r_i|` still exceeds `settings.residual_tolerance` is an error,
/// not a result.
pub fn least_squares_lm<F>(
    mut residuals: F,
    residual_count: usize,
    x0: &[f64],
    settings: &LmSettings,
) -> Result<LeastSquaresReport, SolverError>
where
    F: FnMut(&[f64], &mut [f64]),
{
    let n = x0.len();
    let m = residual_count;
    if m < n || n == 0 {
        return Err(SolverError::Underdetermined {
            residuals: m,
            unknowns: n,
        });
    }

    let mut x = x0.to_vec();
    let mut r = vec![0.0; m];
    let mut residual_evals = 0usize;
    let mut jacobian_evals = 0usize;

    let mut eval = |x: &[f64], out: &mut [f64], count: &mut usize| -> Result<f64, SolverError> {
        residuals(x, out);
        *count += 1;
        if out.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NotFinite);
        }
        Ok(0.5 * out.iter().map(|v| v * v).sum::<f64>())
    };

    let mut cost = eval(&x, &mut r, &mut residual_evals)?;
    let mut lambda = settings.initial_damping;
    let mut jacobian = vec![0.0; m * n];
    let mut probe = vec![0.0; m];
    let mut candidate = vec![0.0; n];
    let mut trial = vec![0.0; m];
    let mut converged = false;
    let mut iterations = 0usize;

    while iterations < settings.max_iterations {
        iterations += 1;

        // Forward differences, column by column.
        for j in 0..n {
            let h = f64::EPSILON.sqrt() * x[j].abs().max(1.0);
            let saved = x[j];
            x[j] = saved + h;
            eval(&x, &mut probe, &mut residual_evals)?;
            x[j] = saved;
            for i in 0..m {
                jacobian[i * n + j] = (probe[i] - r[i]) / h;
            }
        }
        jacobian_evals += 1;

        let (jtj, gradient) = normal_equations(&jacobian, &r, m, n);
        if gradient.iter().all(|g| g.abs() <= settings.gradient_tolerance) {
            converged = true;
            break;
        }

        let mut accepted = false;
        while lambda <= settings.max_damping {
            let mut a = jtj.clone();
            for k in 0..n {
                a[k * n + k] += lambda * jtj[k * n + k].max(1e-12);
            }
            let rhs: Vec<f64> = gradient.iter().map(|g| -g).collect();
            let Some(step) = solve_dense(a, rhs, n) else {
                lambda = (lambda * 10.0).max(1e-12);
                continue;
            };

            for k in 0..n {
                candidate[k] = x[k] + step[k];
            }
            let trial_cost = match eval(&candidate, &mut trial, &mut residual_evals) {
                Ok(c) => c,
                Err(_) => f64::INFINITY,
            };

            if trial_cost < cost {
                let step_norm = norm(&step);
                let x_norm = norm(&x);
                x.copy_from_slice(&candidate);
                r.copy_from_slice(&trial);
                cost = trial_cost;
                lambda = (lambda / 10.0).max(1e-15);
                accepted = true;
                if step_norm <= settings.step_tolerance * (x_norm + settings.step_tolerance) {
                    converged = true;
                }
                break;
            }
            lambda = (lambda * 10.0).max(1e-12);
        }

        if !accepted {
            // No damping level decreases the cost: a stationary point.
            converged = true;
        }
        if converged {
            break;
        }
    }

    if !converged {
        return Err(SolverError::MaxIterations(settings.max_iterations));
    }

    let max_residual = r.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if max_residual > settings.residual_tolerance {
        return Err(SolverError::ResidualTooLarge { max_residual });
    }

    Ok(LeastSquaresReport {
        x,
        cost,
        max_residual,
        iterations,
        residual_evals,
        jacobian_evals,
    })
}

/// `(JᵀJ, Jᵀr)` for a row-major `m × n` Jacobian.
fn normal_equations(jacobian: &[f64], r: &[f64], m: usize, n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut jtj = vec![0.0; n * n];
    let mut gradient = vec![0.0; n];
    for i in 0..m {
        let row = &jacobian[i * n..(i + 1) * n];
        for a in 0..n {
            gradient[a] += row[a] * r[i];
            for b in 0..n {
                jtj[a * n + b] += row[a] * row[b];
            }
        }
    }
    (jtj, gradient)
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Solves `a x = b` for a row-major `n × n` matrix; `None` if singular.
fn solve_dense(mut a: Vec<f64>, mut b: Vec<f64>, n: usize) -> Option<Vec<f64>> {
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i * n + col]
                .abs()
                .partial_cmp(&a[j * n + col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        let p = a[pivot * n + col];
        if !(p.abs() > 1e-300) || !p.is_finite() {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap(col * n + k, pivot * n + k);
            }
            b.swap(col, pivot);
        }
        for row in col + 1..n {
            let factor = a[row * n + col] / a[col * n + col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row * n + k] -= factor * a[col * n + k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row * n + k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row * n + row];
        if !x[row].is_finite() {
            return None;
        }
    }
    Some(x)
}
