//! In-memory project description: agents, tasks, and capability groups.
//!
//! A [`Project`] is what the (out-of-scope) configuration loader builds from
//! the textual project description (spec.md §6 — `load_project`). This
//! module owns the data model and the structural invariants from spec.md §3;
//! it does not parse text.

use std::collections::BTreeSet;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;

use crate::error::ValidationError;

/// How a task is restricted to a subset of agents.
///
/// The enum shape makes "at most one of {agent, group, groups}" structurally
/// impossible to violate (spec.md §3 invariant 4), unlike the original
/// `angonoka` schema which allowed a schema error to be detected after the
/// fact (`InvalidTaskAssignment` in `examples/original_source/src/exceptions.h`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Assignment {
    /// Only universal agents (or, once resolved, any agent) may run this task.
    #[default]
    None,
    /// Agents that carry this single capability group.
    Group(usize),
    /// Agents that carry every one of these capability groups.
    Groups(BTreeSet<usize>),
    /// This exact agent, by index, must run the task.
    Agent(usize),
}

/// A heterogeneous worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub name: String,
    /// Capability group indices this agent carries. Empty means *universal*.
    pub groups: BTreeSet<usize>,
    pub performance_min: f32,
    pub performance_max: f32,
}

impl Agent {
    pub fn is_universal(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn average_performance(&self) -> f32 {
        (self.performance_min + self.performance_max) / 2.0
    }
}

/// A unit of work with a duration range and precedence constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub name: String,
    /// Stable string id used for dependency references. Not required to be
    /// set — tasks with no id can still be depended upon by index during
    /// construction, but cannot be referenced by a later-declared task's
    /// textual dependency list (that's the loader's concern).
    pub id: Option<String>,
    pub duration_min: f32,
    pub duration_max: f32,
    pub assignment: Assignment,
    /// Indices of predecessor tasks (resolved).
    pub dependencies: Vec<usize>,
}

impl Task {
    pub fn average_duration(&self) -> f32 {
        (self.duration_min + self.duration_max) / 2.0
    }
}

/// A validated project: agents, tasks, and the capability groups they refer
/// to. Construct via [`ProjectBuilder`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Project {
    group_names: Vec<String>,
    pub agents: Vec<Agent>,
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn groups(&self) -> &[String] {
        &self.group_names
    }

    /// Structural invariants from spec.md §3, invariants 1-2 (uniqueness,
    /// acyclic dependency graph). Invariant 3 (agent availability) is
    /// checked while building `ScheduleParams`, since that's where the
    /// spec places `NoSuitableAgent` (§4.1). Invariant 4 (assignment
    /// exclusivity) is enforced structurally by the `Assignment` enum.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tasks.is_empty() {
            return Err(ValidationError::EmptySection("tasks".into()));
        }
        if self.agents.is_empty() {
            return Err(ValidationError::EmptySection("agents".into()));
        }

        let mut seen_agents = BTreeSet::new();
        for agent in &self.agents {
            if !seen_agents.insert(agent.name.as_str()) {
                return Err(ValidationError::DuplicateAgent(agent.name.clone()));
            }
            if agent.performance_min <= 0.0 {
                return Err(ValidationError::NegativePerformance(agent.name.clone()));
            }
            if agent.performance_min > agent.performance_max {
                return Err(ValidationError::PerformanceMinMax(agent.name.clone()));
            }
        }

        let mut seen_ids = BTreeSet::new();
        for task in &self.tasks {
            if let Some(id) = &task.id {
                if !seen_ids.insert(id.as_str()) {
                    return Err(ValidationError::DuplicateTaskId(id.clone()));
                }
            }
            if task.duration_min <= 0.0 || task.duration_max <= 0.0 {
                return Err(ValidationError::InvalidDuration(task.name.clone()));
            }
            if task.duration_min > task.duration_max {
                return Err(ValidationError::DurationMinMax(task.name.clone()));
            }
        }

        self.check_acyclic()?;

        Ok(())
    }

    fn check_acyclic(&self) -> Result<(), ValidationError> {
        let mut graph = DiGraph::<(), ()>::with_capacity(self.tasks.len(), 0);
        let nodes: Vec<_> = (0..self.tasks.len()).map(|_| graph.add_node(())).collect();
        for (t, task) in self.tasks.iter().enumerate() {
            for &dep in &task.dependencies {
                graph.add_edge(nodes[dep], nodes[t], ());
            }
        }
        toposort(&graph, None)
            .map(|_| ())
            .map_err(|_| ValidationError::DependencyCycle)
    }
}

/// Incrementally constructs a [`Project`], resolving group names and
/// dependency ids to indices as it goes.
///
/// Mirrors the DAG-building idiom in the teacher crate's
/// `scheduling_block::SchedulingBlock` (`add_task` / index-by-id maps), but
/// resolves everything eagerly rather than keeping a live graph, since the
/// STUN core only ever needs the final packed arrays.
#[derive(Debug, Clone, Default)]
pub struct ProjectBuilder {
    group_names: Vec<String>,
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    id_to_index: std::collections::HashMap<String, usize>,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a capability group name, returning its stable index.
    pub fn group(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(i) = self.group_names.iter().position(|g| *g == name) {
            return i;
        }
        self.group_names.push(name);
        self.group_names.len() - 1
    }

    pub fn add_agent(&mut self, agent: Agent) -> usize {
        self.agents.push(agent);
        self.agents.len() - 1
    }

    pub fn agents_mut(&mut self) -> &mut Vec<Agent> {
        &mut self.agents
    }

    /// Adds a task. `dependency_ids` are resolved against tasks already
    /// added (by `id`, falling back to `name`); an id that the loader hasn't
    /// seen yet returns `UnknownDependency`.
    pub fn add_task(
        &mut self,
        name: impl Into<String>,
        id: Option<String>,
        duration_min: f32,
        duration_max: f32,
        assignment: Assignment,
        dependency_ids: &[&str],
    ) -> Result<usize, ValidationError> {
        let name = name.into();
        let mut dependencies = Vec::with_capacity(dependency_ids.len());
        for dep_ref in dependency_ids {
            let idx = self.id_to_index.get(*dep_ref).copied().ok_or_else(|| {
                ValidationError::UnknownDependency {
                    task: name.clone(),
                    dependency: (*dep_ref).to_string(),
                }
            })?;
            dependencies.push(idx);
        }

        let index = self.tasks.len();
        if let Some(id) = &id {
            self.id_to_index.insert(id.clone(), index);
        }
        self.id_to_index.insert(name.clone(), index);

        self.tasks.push(Task {
            name,
            id,
            duration_min,
            duration_max,
            assignment,
            dependencies,
        });
        Ok(index)
    }

    /// Adds a subtask of `parent`, implicitly depending on it — spec.md §3:
    /// "children inherit the parent as a dependency implicitly by order of
    /// parsing".
    pub fn add_subtask(
        &mut self,
        parent: usize,
        name: impl Into<String>,
        id: Option<String>,
        duration_min: f32,
        duration_max: f32,
        assignment: Assignment,
        dependency_ids: &[&str],
    ) -> Result<usize, ValidationError> {
        let index = self.add_task(
            name,
            id,
            duration_min,
            duration_max,
            assignment,
            dependency_ids,
        )?;
        self.tasks[index].dependencies.push(parent);
        Ok(index)
    }

    pub fn build(self) -> Result<Project, ValidationError> {
        let project = Project {
            group_names: self.group_names,
            agents: self.agents,
            tasks: self.tasks,
        };
        project.validate()?;
        Ok(project)
    }
}
