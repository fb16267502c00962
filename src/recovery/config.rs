//! Levenberg–Marquardt settings.

/// Termination and damping parameters for [`least_squares_lm`](super::least_squares_lm).
///
/// # Examples
///
/// ```
/// use corp_optim::recovery::LmSettings;
///
/// let settings = LmSettings::default()
///     .with_max_iterations(200)
///     .with_residual_tolerance(1e-8);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LmSettings {
    /// Maximum accepted-or-rejected outer iterations.
    pub max_iterations: usize,

    /// Starting damping factor λ.
    pub initial_damping: f64,

    /// Damping beyond which the solver gives up on further decrease.
    pub max_damping: f64,

    /// Stop when `‖Jᵀr‖∞` drops below this.
    pub gradient_tolerance: f64,

    /// Stop when `‖δ‖ <= step_tolerance * (‖x‖ + step_tolerance)`.
    pub step_tolerance: f64,

    /// Largest acceptable `|r_i|` at the solution.
    ///
    /// A run that stalls above it is reported as non-converged rather than
    /// returning a poor fit.
    pub residual_tolerance: f64,
}

impl Default for LmSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            initial_damping: 1e-3,
            max_damping: 1e16,
            gradient_tolerance: 1e-12,
            step_tolerance: 1e-10,
            residual_tolerance: 1e-6,
        }
    }
}

impl LmSettings {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_initial_damping(mut self, lambda: f64) -> Self {
        self.initial_damping = lambda.max(0.0);
        self
    }

    pub fn with_gradient_tolerance(mut self, tol: f64) -> Self {
        self.gradient_tolerance = tol.max(0.0);
        self
    }

    pub fn with_step_tolerance(mut self, tol: f64) -> Self {
        self.step_tolerance = tol.max(0.0);
        self
    }

    pub fn with_residual_tolerance(mut self, tol: f64) -> Self {
        self.residual_tolerance = tol.max(0.0);
        self
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".into());
        }
        if !(self.max_damping > self.initial_damping) {
            return Err("max_damping must exceed initial_damping".into());
        }
        if !self.residual_tolerance.is_finite() {
            return Err("residual_tolerance must be finite".into());
        }
        Ok(())
    }
}
