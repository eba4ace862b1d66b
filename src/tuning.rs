//! Optimizer tuning parameters (spec.md §6).
//!
//! A plain `Copy` struct with a `Default` impl carrying the documented
//! defaults, following the `RLConfig`/`Default` convention in
//! `algorithms/rl/config.rs` of the teacher crate. Validated at construction
//! rather than scattering `assert!`s through the STUN core, matching the
//! teacher's practice of pushing validation to the data model's edges.

use crate::error::ValidationError;

/// Tuning knobs for [`crate::optimizer::Optimizer`] and
/// [`crate::optimizer_job::OptimizerJob`]. All fields are positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningParams {
    /// STUN iterations per job `update` call.
    pub batch_size: u32,
    /// Convergence threshold: idle iterations before `has_converged()`.
    pub max_idle_iters: u64,
    /// Temperature inertia.
    pub beta_scale: f32,
    /// β-adjustment averaging window.
    pub stun_window: u32,
    /// STUN tunneling parameter.
    pub gamma: f32,
    /// Volatility period; must be a power of 2.
    pub restart_period: u64,
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            batch_size: 5,
            max_idle_iters: 200_000,
            beta_scale: 1e-4,
            stun_window: 10_000,
            gamma: 0.5,
            restart_period: 1 << 20,
        }
    }
}

impl TuningParams {
    /// Validates all fields are positive and `restart_period` is a power of
    /// two, per spec.md §6.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.batch_size == 0 {
            return Err(ValidationError::InvalidTuning("batch_size".into()));
        }
        if self.max_idle_iters == 0 {
            return Err(ValidationError::InvalidTuning("max_idle_iters".into()));
        }
        if self.beta_scale <= 0.0 {
            return Err(ValidationError::InvalidTuning("beta_scale".into()));
        }
        if self.stun_window == 0 {
            return Err(ValidationError::InvalidTuning("stun_window".into()));
        }
        if self.gamma <= 0.0 {
            return Err(ValidationError::InvalidTuning("gamma".into()));
        }
        if self.restart_period == 0 || !self.restart_period.is_power_of_two() {
            return Err(ValidationError::RestartPeriodNotPowerOfTwo(self.restart_period));
        }
        Ok(())
    }
}
