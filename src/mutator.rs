//! Neighbor-generation operator (C5).
//!
//! Grounded on `examples/original_source/src/stun/utils.h`/`utils.cpp`'s
//! `Mutator` class (`try_swap`/`is_swappable`/`update_agent`) and spec.md
//! §4.4. Random draws styled on the teacher's `rand::Rng::gen_range` usage in
//! `algorithms/rl/policy/random.rs`, routed through [`crate::random_source::RandomSource`]
//! rather than a bare `rand::Rng` so every job's entropy stays private
//! (spec.md §5).

use crate::random_source::RandomSource;
use crate::schedule::Schedule;
use crate::schedule_params::ScheduleParams;

/// Produces a neighboring valid schedule in place via two independent moves:
/// an adjacent task swap (topological-order-preserving) and an agent
/// reassignment.
#[derive(Debug, Clone, Copy)]
pub struct Mutator;

impl Mutator {
    pub fn new() -> Self {
        Self
    }

    /// Mutates `schedule` in place. Single-task schedules skip the swap
    /// (spec.md §4.4).
    pub fn mutate(&self, params: &ScheduleParams, random: &mut RandomSource, schedule: &mut Schedule) {
        self.try_swap(params, random, schedule);
        self.reassign_agent(params, random, schedule);
    }

    fn try_swap(&self, params: &ScheduleParams, random: &mut RandomSource, schedule: &mut Schedule) {
        let len = schedule.len();
        if len < 2 {
            return;
        }
        let i = 1 + random.uniform_int(len - 2);
        let task_a = schedule.as_slice()[i].task_id;
        let task_b = schedule.as_slice()[i - 1].task_id;
        if !self.is_swappable(params, task_a, task_b) {
            return;
        }
        schedule.as_mut_slice().swap(i, i - 1);
    }

    /// `task` may swap with the item directly ahead of it (`predecessor`)
    /// only if `predecessor` is not one of `task`'s dependencies — otherwise
    /// the swap would push a dependency after its dependant.
    fn is_swappable(&self, params: &ScheduleParams, task: u32, predecessor: u32) -> bool {
        params
            .dependencies
            .row(task as usize)
            .binary_search(&predecessor)
            .is_err()
    }

    fn reassign_agent(&self, params: &ScheduleParams, random: &mut RandomSource, schedule: &mut Schedule) {
        let i = random.uniform_int(schedule.len() - 1);
        let task = schedule.as_slice()[i].task_id as usize;
        let eligible = params.available_agents.row(task);
        let k = random.uniform_int(eligible.len() - 1);
        schedule.as_mut_slice()[i].agent_id = eligible[k];
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new()
    }
}
