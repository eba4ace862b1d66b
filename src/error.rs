//! Validation errors raised while building a [`crate::project::Project`] or
//! its derived [`crate::schedule_params::ScheduleParams`].
//!
//! These are the only errors the crate produces. The STUN optimizer itself
//! cannot fail: by the time a `ScheduleParams` exists, every value it
//! contains has already been checked here, so the optimizer's internal
//! invariants (non-negative durations, in-range indices) are `debug_assert!`s
//! rather than `Result`s.

use thiserror::Error;

/// Everything that can go wrong turning a [`crate::project::Project`] into a
/// valid, schedulable [`crate::schedule_params::ScheduleParams`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Agent \"{0}\" is specified more than once.")]
    DuplicateAgent(String),

    #[error("Duplicate task id \"{0}\".")]
    DuplicateTaskId(String),

    #[error("Agent \"{0}\" can't have a negative or zero performance value.")]
    NegativePerformance(String),

    #[error("The minimum performance of agent \"{0}\" is greater than its maximum.")]
    PerformanceMinMax(String),

    #[error("Task \"{0}\" has an invalid (zero or negative) duration.")]
    InvalidDuration(String),

    #[error("Task \"{0}\" has a min duration that is greater than its max duration.")]
    DurationMinMax(String),

    #[error("Task \"{task}\" depends on unknown task id \"{dependency}\".")]
    UnknownDependency { task: String, dependency: String },

    #[error("No suitable agent for task \"{0}\".")]
    NoSuitableAgent(String),

    #[error("Dependency cycle detected.")]
    DependencyCycle,

    #[error("Task \"{0}\" must have at most one of: agent, group, groups.")]
    AmbiguousAssignment(String),

    #[error("{0} can't be empty.")]
    EmptySection(String),

    #[error("Tuning parameter \"{0}\" must be positive.")]
    InvalidTuning(String),

    #[error("Tuning parameter \"restart_period\" ({0}) must be a power of two.")]
    RestartPeriodNotPowerOfTwo(u64),
}

/// Marker type for the duration-string lexer's error, which lives outside
/// this crate's scope (spec.md §1 — "Duration-string lexer ... external
/// collaborator"). Kept here only so front-ends can name the type in a
/// `match` without inventing their own.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid duration string: {0:?}")]
pub struct DurationParseError(pub String);
