//! Immutable, cache-packed view of a [`Project`] for the optimizer (C2).
//!
//! Built once from a validated `Project` and never mutated afterwards — every
//! `OptimizerJob` holds a shared, read-only reference to the same
//! `ScheduleParams` for the life of an optimization run.

use std::sync::Arc;

use crate::error::ValidationError;
use crate::project::{Agent, Assignment, Project, Task};

/// A ragged 2-D table of `u32` rows packed into one flat buffer plus
/// per-row offsets, replacing the original `Vector2D` span-of-spans
/// (`examples/original_source/src/stun/schedule_params.h`) without the
/// raw-pointer arithmetic its C++ constructor used.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedTable {
    data: Vec<u32>,
    offsets: Vec<usize>,
}

impl PackedTable {
    fn from_rows(rows: Vec<Vec<u32>>) -> Self {
        let mut data = Vec::with_capacity(rows.iter().map(Vec::len).sum());
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        offsets.push(0);
        for row in rows {
            data.extend(row);
            offsets.push(data.len());
        }
        Self { data, offsets }
    }

    pub fn row(&self, index: usize) -> &[u32] {
        &self.data[self.offsets[index]..self.offsets[index + 1]]
    }

    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }
}

/// The optimizer's entire view of the problem. Everything in here is a
/// plain, finite `f32`/`u32` — no `Option`, no error path past construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleParams {
    pub agent_performance: Vec<f32>,
    pub task_duration: Vec<f32>,
    pub available_agents: PackedTable,
    pub dependencies: PackedTable,
    /// Divisor applied to raw durations so the ideal makespan is ~1.0.
    /// Multiply a normalized makespan by this to recover wall-seconds.
    pub duration_multiplier: f32,
}

fn can_work_on(task: &Task, agent: &Agent, agent_index: usize) -> bool {
    match &task.assignment {
        Assignment::Agent(required) => *required == agent_index,
        // No explicit routing: spec.md §3 reserves this case for universal
        // agents, even though a literal "superset of the empty set" reading
        // of §4.1 would admit everyone.
        Assignment::None => agent.is_universal(),
        Assignment::Group(g) => agent.is_universal() || agent.groups.contains(g),
        Assignment::Groups(required) => agent.is_universal() || required.is_subset(&agent.groups),
    }
}

impl ScheduleParams {
    pub fn from_project(project: &Project) -> Result<Arc<Self>, ValidationError> {
        project.validate()?;

        let agent_performance: Vec<f32> = project
            .agents
            .iter()
            .map(Agent::average_performance)
            .collect();

        let num_agents = project.agents.len().max(1) as f32;
        let sum_durations: f32 = project.tasks.iter().map(Task::average_duration).sum();
        let duration_multiplier = (sum_durations / num_agents).max(f32::MIN_POSITIVE);

        let task_duration: Vec<f32> = project
            .tasks
            .iter()
            .map(|t| t.average_duration() / duration_multiplier)
            .collect();

        let mut available_rows = Vec::with_capacity(project.tasks.len());
        for task in &project.tasks {
            let mut eligible: Vec<u32> = project
                .agents
                .iter()
                .enumerate()
                .filter(|(i, agent)| can_work_on(task, agent, *i))
                .map(|(i, _)| i as u32)
                .collect();
            if eligible.is_empty() {
                return Err(ValidationError::NoSuitableAgent(task.name.clone()));
            }
            eligible.sort_unstable();
            available_rows.push(eligible);
        }
        let available_agents = PackedTable::from_rows(available_rows);

        let dependency_rows: Vec<Vec<u32>> = project
            .tasks
            .iter()
            .map(|t| {
                let mut deps: Vec<u32> = t.dependencies.iter().map(|&d| d as u32).collect();
                deps.sort_unstable();
                deps
            })
            .collect();
        let dependencies = PackedTable::from_rows(dependency_rows);

        Ok(Arc::new(Self {
            agent_performance,
            task_duration,
            available_agents,
            dependencies,
            duration_multiplier,
        }))
    }

    pub fn num_tasks(&self) -> usize {
        self.task_duration.len()
    }

    pub fn num_agents(&self) -> usize {
        self.agent_performance.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectBuilder;
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
    fn s1_two_tasks_two_universal_agents() {
        let mut b = ProjectBuilder::new();
        b.add_agent(universal("Bob"));
        b.add_agent(universal("Jack"));
        b.add_task("T1", None, 3600.0, 3600.0, Assignment::None, &[])
            .unwrap();
        b.add_task("T2", None, 3600.0, 3600.0, Assignment::None, &[])
            .unwrap();
        let project = b.build().unwrap();
        let params = ScheduleParams::from_project(&project).unwrap();

        assert_eq!(params.num_tasks(), 2);
        assert_eq!(params.num_agents(), 2);
        assert_eq!(params.available_agents.row(0), &[0, 1]);
        // duration_multiplier = sum(1h,1h)/2 agents = 1h, so normalized
        // duration per task is 1.0.
        assert!((params.task_duration[0] - 1.0).abs() < 1e-6);
        assert!((params.duration_multiplier - 3600.0).abs() < 1e-3);
    }

    #[test]
    fn s4_group_routing_excludes_non_member() {
        let mut b = ProjectBuilder::new();
        let x = b.group("X");
        let y = b.group("Y");
        b.add_agent(Agent {
            name: "A".into(),
            groups: [x].into_iter().collect(),
            performance_min: 1.0,
            performance_max: 1.0,
        });
        b.add_agent(Agent {
            name: "B".into(),
            groups: [y].into_iter().collect(),
            performance_min: 1.0,
            performance_max: 1.0,
        });
        b.add_agent(universal("C"));
        b.add_task("T", None, 1.0, 1.0, Assignment::Group(x), &[])
            .unwrap();
        let project = b.build().unwrap();
        let params = ScheduleParams::from_project(&project).unwrap();

        assert_eq!(params.available_agents.row(0), &[0, 2]);
    }

    #[test]
    fn task_with_no_eligible_agent_is_rejected() {
        let mut b = ProjectBuilder::new();
        let x = b.group("X");
        b.add_agent(universal("Universal-free agent placeholder"));
        // Force a non-universal-only world: agent carries an unrelated group,
        // task demands group X which nobody but a dedicated agent could have.
        b.agents_mut()[0].groups = [b.group("Y")].into_iter().collect();
        b.add_task("T", None, 1.0, 1.0, Assignment::Group(x), &[])
            .unwrap();
        let project = b.build().unwrap();
        assert_eq!(
            ScheduleParams::from_project(&project).unwrap_err(),
            ValidationError::NoSuitableAgent("T".into())
        );
    }
}
