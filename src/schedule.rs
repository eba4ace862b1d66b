//! Discrete task-to-agent schedule (spec.md §3 "Schedule").
//!
//! Grounded on `examples/original_source/src/stun/schedule.h`/`common.h`'s
//! `StateItem` / ordered-vector-of-pairs shape, and `stun/common.h`'s
//! `int16 task_id, agent_id` fields — widened to `u32` here since nothing in
//! this port constrains task/agent counts to `i16::MAX`.

/// One entry in a [`Schedule`]: a task bound to the agent executing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleItem {
    pub task_id: u32,
    pub agent_id: u32,
}

/// An ordered sequence of [`ScheduleItem`]s. Order is significant — it is the
/// dispatch order a simulation would use (spec.md §3).
///
/// **Validity invariant** (checked only in debug builds, per spec §7.2): for
/// every item, every predecessor of `task_id` occupies an earlier position,
/// and `agent_id` is in `available_agents[task_id]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    items: Vec<ScheduleItem>,
}

impl Schedule {
    pub fn new(items: Vec<ScheduleItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[ScheduleItem] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [ScheduleItem] {
        &mut self.items
    }

    pub fn copy_from(&mut self, other: &Schedule) {
        self.items.clear();
        self.items.extend_from_slice(&other.items);
    }

    /// Debug-only check of the topological-validity invariant (spec §8,
    /// property 1) against the given dependency table. Intended for tests
    /// and `debug_assert!` call sites, not release-build enforcement.
    #[cfg(any(test, debug_assertions))]
    pub fn is_topologically_valid(&self, dependencies: &crate::schedule_params::PackedTable) -> bool {
        let mut position = vec![usize::MAX; self.items.len()];
        for (i, item) in self.items.iter().enumerate() {
            position[item.task_id as usize] = i;
        }
        for (i, item) in self.items.iter().enumerate() {
            for &dep in dependencies.row(item.task_id as usize) {
                if position[dep as usize] >= i {
                    return false;
                }
            }
        }
        true
    }
}

impl std::ops::Index<usize> for Schedule {
    type Output = ScheduleItem;
    fn index(&self, index: usize) -> &ScheduleItem {
        &self.items[index]
    }
}

impl std::ops::IndexMut<usize> for Schedule {
    fn index_mut(&mut self, index: usize) -> &mut ScheduleItem {
        &mut self.items[index]
    }
}
