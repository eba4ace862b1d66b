//! stun-scheduler — a Stochastic Tunneling (STUN) project schedule optimizer.
//!
//! Multi-restart Monte-Carlo search over the space of valid task-to-agent
//! schedules: it respects precedence and agent-capability constraints by
//! construction, adapts its temperature on-line, coordinates parallel jobs
//! with a shared best-so-far and convergence detector, and streams progress
//! events to an asynchronous consumer.
//!
//! Configuration loading, duration-string parsing, CLI rendering, and
//! histogram/quantile reporting are out of scope — external collaborators.

pub mod error;
pub mod event;
pub mod exp_curve_fitter;
pub mod initial_schedule;
pub mod makespan;
pub mod mutator;
pub mod optimizer;
pub mod optimizer_job;
pub mod predict_driver;
pub mod project;
pub mod random_source;
pub mod schedule;
pub mod schedule_params;
pub mod stun_core;
pub mod temperature;
pub mod tuning;

pub use error::{DurationParseError, ValidationError};
pub use event::{event_bus, EventConsumer, EventProducer, ProgressEvent, SimpleEvent};
pub use optimizer::Optimizer;
pub use predict_driver::{
    start_prediction, start_schedule_optimization, OptimizedSchedule, OptimizedScheduleItem,
    PredictionHandle, PredictionResult,
};
pub use project::{Agent, Assignment, Project, ProjectBuilder, Task};
pub use schedule::{Schedule, ScheduleItem};
pub use schedule_params::ScheduleParams;
pub use tuning::TuningParams;
