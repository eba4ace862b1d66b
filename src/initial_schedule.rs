//! Dependency-respecting seed schedule (C3).
//!
//! Grounded on `examples/original_source/src/stun/schedule_params.cpp`'s
//! `push_task`/`initial_schedule`: depth-first visit of predecessors before
//! emitting a task, starting from the smallest-indexed unvisited task each
//! time. Restated iteratively here (an explicit stack) rather than with the
//! original's recursion, matching the teacher's own DAG-traversal idiom in
//! `scheduling_block/block.rs` (iterative, not recursive, graph walks).

use crate::schedule::{Schedule, ScheduleItem};
use crate::schedule_params::ScheduleParams;

/// Builds the one deterministic, valid seed schedule for `params`: a
/// topological order (DFS, predecessors first) with every task assigned to
/// its first eligible agent (`available_agents[t][0]`).
pub fn initial_schedule(params: &ScheduleParams) -> Schedule {
    let n = params.num_tasks();
    let mut visited = vec![false; n];
    let mut items = Vec::with_capacity(n);

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visit(start, params, &mut visited, &mut items);
    }

    debug_assert_eq!(items.len(), n);
    Schedule::new(items)
}

/// Iterative post-order DFS: a task is only pushed once every predecessor of
/// every task on the path back to `start` has been pushed.
fn visit(
    start: usize,
    params: &ScheduleParams,
    visited: &mut [bool],
    items: &mut Vec<ScheduleItem>,
) {
    // (task, next dependency index to examine) — standard iterative DFS
    // with explicit "resume point" per frame, since Rust has no native TCO
    // for the original's recursive `push_task`.
    let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
    visited[start] = true;

    while let Some(&mut (task, ref mut next_dep)) = stack.last_mut() {
        let deps = params.dependencies.row(task);
        if *next_dep < deps.len() {
            let dep = deps[*next_dep] as usize;
            *next_dep += 1;
            if !visited[dep] {
                visited[dep] = true;
                stack.push((dep, 0));
            }
            continue;
        }
        let agent_id = params.available_agents.row(task)[0];
        items.push(ScheduleItem {
            task_id: task as u32,
            agent_id,
        });
        stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Agent, Assignment, ProjectBuilder};
    use std::collections::BTreeSet;

    fn universal(name: &str) -> Agent {
        Agent {
            name: name.to_string(),
            groups: BTreeSet::new(),
            performance_min: 1.0,
            performance_max: 1.0,
        }
    }

    #[test]
    fn result_length_equals_task_count() {
        let mut b = ProjectBuilder::new();
        b.add_agent(universal("A"));
        for i in 0..5 {
            b.add_task(format!("T{i}"), None, 1.0, 1.0, Assignment::None, &[])
                .unwrap();
        }
        let project = b.build().unwrap();
        let params = ScheduleParams::from_project(&project).unwrap();
        let schedule = initial_schedule(&params);
        assert_eq!(schedule.len(), 5);
    }

    #[test]
    fn deterministic_given_same_params() {
        let mut b = ProjectBuilder::new();
        b.add_agent(universal("A"));
        b.add_agent(universal("B"));
        let t1 = b
            .add_task("T1", Some("t1".into()), 1.0, 1.0, Assignment::None, &[])
            .unwrap();
        b.add_task(
            "T2",
            Some("t2".into()),
            1.0,
            1.0,
            Assignment::None,
            &["t1"],
        )
        .unwrap();
        let _ = t1;
        let project = b.build().unwrap();
        let params = ScheduleParams::from_project(&project).unwrap();
        let a = initial_schedule(&params);
        let b = initial_schedule(&params);
        assert_eq!(a, b);
    }

    #[test]
    fn s2_linear_chain_is_the_only_valid_order() {
        // S2: T1 -> T2 -> T3, one universal agent.
        let mut b = ProjectBuilder::new();
        b.add_agent(universal("A"));
        b.add_task("T1", Some("t1".into()), 3600.0, 3600.0, Assignment::None, &[])
            .unwrap();
        b.add_task(
            "T2",
            Some("t2".into()),
            3600.0,
            3600.0,
            Assignment::None,
            &["t1"],
        )
        .unwrap();
        b.add_task(
            "T3",
            Some("t3".into()),
            3600.0,
            3600.0,
            Assignment::None,
            &["t2"],
        )
        .unwrap();
        let project = b.build().unwrap();
        let params = ScheduleParams::from_project(&project).unwrap();
        let schedule = initial_schedule(&params);
        let order: Vec<u32> = schedule.as_slice().iter().map(|i| i.task_id).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert!(schedule.is_topologically_valid(&params.dependencies));
    }

    #[test]
    fn respects_topological_order_on_a_diamond() {
        let mut b = ProjectBuilder::new();
        b.add_agent(universal("A"));
        b.add_task("T0", Some("t0".into()), 1.0, 1.0, Assignment::None, &[])
            .unwrap();
        b.add_task(
            "T1",
            Some("t1".into()),
            1.0,
            1.0,
            Assignment::None,
            &["t0"],
        )
        .unwrap();
        b.add_task(
            "T2",
            Some("t2".into()),
            1.0,
            1.0,
            Assignment::None,
            &["t0"],
        )
        .unwrap();
        b.add_task(
            "T3",
            Some("t3".into()),
            1.0,
            1.0,
            Assignment::None,
            &["t1", "t2"],
        )
        .unwrap();
        let project = b.build().unwrap();
        let params = ScheduleParams::from_project(&project).unwrap();
        let schedule = initial_schedule(&params);
        assert!(schedule.is_topologically_valid(&params.dependencies));
    }
}
