//! Per-neighborhood STUN acceptance loop (C7).
//!
//! Grounded on `examples/original_source/src/stun_dag/stochastic_tunneling.cpp`
//! (`StochasticTunnelingOp`: `get_new_neighbor`/`neighbor_is_better`/
//! `perform_stun`) and the newer `src/stun/stochastic_tunneling.h` interface,
//! restated per spec.md §4.6. Buffer swapping uses `std::mem::swap` on owned
//! `Schedule`s, replacing the original's raw `MutState` span swap over one
//! shared allocation — the three schedules here are independent heap
//! buffers, which is simpler and the per-job cost is negligible next to the
//! mutation/makespan work each iteration already does.

use crate::makespan::Makespan;
use crate::mutator::Mutator;
use crate::random_source::RandomSource;
use crate::schedule::Schedule;
use crate::schedule_params::ScheduleParams;
use crate::temperature::Temperature;

/// STUN energy transform: `s(e) = 1 - exp(-gamma * (e - best_e))`.
/// Monotone in `e` for `e >= best_e`; always in `[0, 1]`.
fn stun_transform(best_e: f32, e: f32, gamma: f32) -> f32 {
    debug_assert!(e >= best_e - 1e-4, "target energy below best: {e} < {best_e}");
    let s = 1.0 - (-gamma * (e - best_e).max(0.0)).exp();
    s.clamp(0.0, 1.0)
}

/// Combines [`Mutator`], [`Makespan`], and [`Temperature`] into the STUN
/// acceptance loop. Owns three fixed-size schedule buffers (best/current/
/// target) and the running iteration counter used by the restart-period
/// boost in [`Temperature`].
#[derive(Debug, Clone)]
pub struct StunCore {
    gamma: f32,
    iteration: u64,

    best_state: Schedule,
    best_e: f32,

    current_state: Schedule,
    current_e: f32,
    current_s: f32,

    target_state: Schedule,
    target_e: f32,
    target_s: f32,
}

impl StunCore {
    pub fn new(params: &ScheduleParams, makespan: &mut Makespan, initial: Schedule, gamma: f32) -> Self {
        let current_e = makespan.evaluate(params, &initial);
        let current_s = stun_transform(current_e, current_e, gamma);
        Self {
            gamma,
            iteration: 0,
            best_state: initial.clone(),
            best_e: current_e,
            current_state: initial.clone(),
            current_e,
            current_s,
            target_state: initial,
            target_e: current_e,
            target_s: current_s,
        }
    }

    pub fn best_schedule(&self) -> &Schedule {
        &self.best_state
    }

    pub fn best_energy(&self) -> f32 {
        self.best_e
    }

    pub fn current_energy(&self) -> f32 {
        self.current_e
    }

    /// One STUN iteration, per spec.md §4.6.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        params: &ScheduleParams,
        random: &mut RandomSource,
        mutator: &Mutator,
        makespan: &mut Makespan,
        temperature: &mut Temperature,
    ) {
        self.target_state.copy_from(&self.current_state);
        mutator.mutate(params, random, &mut self.target_state);
        self.target_e = makespan.evaluate(params, &self.target_state);

        if self.target_e < self.current_e {
            if self.target_e < self.best_e {
                self.best_e = self.target_e;
                self.best_state.copy_from(&self.target_state);
                self.current_s = stun_transform(self.best_e, self.current_e, self.gamma);
            }
            std::mem::swap(&mut self.current_state, &mut self.target_state);
            self.current_e = self.target_e;
            // Uphill sampler only: an improving move is never a Temperature
            // sample (spec.md §4.6 step 3).
        } else {
            self.target_s = stun_transform(self.best_e, self.target_e, self.gamma);
            let delta_s = self.target_s - self.current_s;
            let p = (-temperature.beta() * delta_s).exp().min(1.0);
            let u = random.uniform01();
            if p >= u {
                std::mem::swap(&mut self.current_state, &mut self.target_state);
                self.current_e = self.target_e;
                self.current_s = self.target_s;
            }
            // Paper convention: sampling occurred regardless of acceptance.
            temperature.update(self.current_s, self.iteration);
        }

        self.iteration += 1;
    }
}
