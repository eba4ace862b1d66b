//! Adaptive inverse-temperature (β) driver (C6).
//!
//! Grounded on `examples/original_source/src/stun_dag/beta_driver.h`
//! (`BetaDriver`) and spec.md §4.5: keeps the mean STUN-energy near 0.03 as
//! recommended by Wenzel & Hamacher 1999. The growing-window mean used while
//! `stun_window` samples haven't accumulated yet is an Open Question the
//! source left unresolved (SPEC_FULL.md "Open Questions — decisions", #1):
//! a Welford-style incremental mean, `avg_s += (s - avg_s) / count`, reset
//! every `stun_window` samples.

/// Clamp bounds for β, matching spec.md §4.5's suggested defaults.
pub const BETA_MIN: f32 = 1e-6;
pub const BETA_MAX: f32 = 1e6;

/// Multiplier applied to β on a `restart_period` boundary (spec.md §4.5:
/// "implementation chooses a constant > 1, e.g. `exp(1)`").
const RESTART_BOOST: f32 = std::f32::consts::E;

/// Target mean STUN-energy the driver tries to hold β at (Wenzel & Hamacher).
const TARGET_AVG_S: f32 = 0.03;

#[derive(Debug, Clone)]
pub struct Temperature {
    beta: f32,
    beta_scale: f32,
    stun_window: u32,
    restart_period: u64,
    avg_s: f32,
    count_in_window: u32,
    last_average: f32,
}

impl Temperature {
    /// `restart_period` must be a power of two (spec.md §6); checked by
    /// [`crate::tuning::TuningParams::validate`], not re-checked here.
    pub fn new(initial_beta: f32, beta_scale: f32, stun_window: u32, restart_period: u64) -> Self {
        debug_assert!(initial_beta > 0.0);
        debug_assert!(beta_scale > 0.0 && beta_scale < 1.0);
        debug_assert!(stun_window > 0);
        Self {
            beta: initial_beta.clamp(BETA_MIN, BETA_MAX),
            beta_scale,
            stun_window,
            restart_period,
            avg_s: 0.0,
            count_in_window: 0,
            last_average: 0.0,
        }
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }

    /// The last completed window's average STUN-energy, for diagnostics
    /// (SPEC_FULL.md supplemented feature #1, mirroring the original's
    /// `last_average_stun()`).
    pub fn last_average_stun(&self) -> f32 {
        self.last_average
    }

    /// Incorporates one STUN-transformed energy sample and, on window and
    /// restart-period boundaries, adjusts β.
    pub fn update(&mut self, s: f32, iter: u64) {
        debug_assert!((0.0..=1.0).contains(&s));

        self.count_in_window += 1;
        self.avg_s += (s - self.avg_s) / self.count_in_window as f32;

        if self.count_in_window >= self.stun_window {
            self.last_average = self.avg_s;
            if self.avg_s > TARGET_AVG_S {
                self.beta *= 1.0 + self.beta_scale;
            } else {
                self.beta /= 1.0 + self.beta_scale;
            }
            self.avg_s = 0.0;
            self.count_in_window = 0;
        }

        // Open Question #2: iter == 0 never boosts, even though it is a
        // multiple of every restart_period.
        if iter > 0 && iter % self.restart_period == 0 {
            self.beta *= RESTART_BOOST;
        }

        self.beta = self.beta.clamp(BETA_MIN, BETA_MAX);
        debug_assert!(self.beta > 0.0);
    }
}
