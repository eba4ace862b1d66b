//! Orchestrates a full prediction run on a background thread (C11).
//!
//! Grounded on `examples/original_source/src/predict.h`'s `predict()`
//! function signature (`std::tuple<std::future<Prediction>,
//! shared_ptr<Queue<ProgressEvent>>>`). SPEC_FULL.md Open Question #4:
//! the crate carries no async runtime (none of the corpus's CPU-bound
//! Monte-Carlo optimizers pull in `tokio`/`async-std`; the closest analog,
//! the `frcw` short-bursts optimizer, uses plain OS threads and
//! `crossbeam_channel`), so `std::future<T>` becomes a `std::thread::JoinHandle`
//! behind [`PredictionHandle`] with a blocking `.join()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::error::ValidationError;
use crate::event::{event_bus, EventConsumer, EventProducer, ProgressEvent, SimpleEvent};
use crate::optimizer::Optimizer;
use crate::project::Project;
use crate::random_source::RandomSource;
use crate::schedule::Schedule;
use crate::schedule_params::ScheduleParams;
use crate::tuning::TuningParams;

/// One item of an [`OptimizedSchedule`] (spec.md §6).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizedScheduleItem {
    pub task: String,
    pub agent: String,
    /// 0-based position in the emitted sequence.
    pub priority: i32,
    pub expected_start_seconds: i64,
    pub expected_duration_seconds: i64,
}

/// `start_schedule_optimization`'s result type (spec.md §6).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizedSchedule {
    pub makespan_seconds: i64,
    pub items: Vec<OptimizedScheduleItem>,
}

/// `start_prediction`'s result type — deliberately thinner than
/// [`OptimizedSchedule`]: the histogram/quantile layer that would consume
/// many of these is out of scope (spec.md §1), so only the makespan survives.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionResult {
    pub makespan_seconds: i64,
}

/// A background prediction run. Blocking `.join()` stands in for
/// `std::future<T>::get()`; `.cancel()` sets the cooperative cancellation
/// flag the run checks between `Optimizer::update()` calls.
pub struct PredictionHandle<T> {
    join_handle: std::thread::JoinHandle<T>,
    cancel_flag: Arc<AtomicBool>,
}

impl<T> PredictionHandle<T> {
    /// Requests cancellation. The run finishes its current batch, then
    /// promptly emits `Finished` and returns (spec.md §5).
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Blocks until the run completes (or panics), returning its result.
    pub fn join(self) -> std::thread::Result<T> {
        self.join_handle.join()
    }
}

/// Walks `schedule` in dispatch order, converting normalized per-task/agent
/// assignment into wall-clock start/duration seconds, and pairs each item
/// with its task/agent name from `project`.
fn build_optimized_schedule(
    project: &Project,
    params: &ScheduleParams,
    schedule: &Schedule,
) -> OptimizedSchedule {
    let mut task_done = vec![0.0_f64; params.num_tasks()];
    let mut work_done = vec![0.0_f64; params.num_agents()];
    let multiplier = params.duration_multiplier as f64;

    let mut items = Vec::with_capacity(schedule.len());
    for (priority, item) in schedule.as_slice().iter().enumerate() {
        let task = item.task_id as usize;
        let agent = item.agent_id as usize;

        let dep_finish = params
            .dependencies
            .row(task)
            .iter()
            .map(|&d| task_done[d as usize])
            .fold(0.0_f64, f64::max);

        let duration_seconds =
            (params.task_duration[task] as f64 * multiplier) / params.agent_performance[agent] as f64;
        let start = dep_finish.max(work_done[agent]);
        let finish = start + duration_seconds;

        task_done[task] = finish;
        work_done[agent] = finish;

        items.push(OptimizedScheduleItem {
            task: project.tasks[task].name.clone(),
            agent: project.agents[agent].name.clone(),
            priority: priority as i32,
            expected_start_seconds: start.round() as i64,
            expected_duration_seconds: duration_seconds.round() as i64,
        });
    }

    let makespan_seconds = work_done.iter().copied().fold(0.0_f64, f64::max).round() as i64;
    OptimizedSchedule {
        makespan_seconds,
        items,
    }
}

fn run_optimization(
    params: Arc<ScheduleParams>,
    tuning: TuningParams,
    base_seed: u64,
    events: &EventProducer,
    cancel_flag: &AtomicBool,
) -> Optimizer {
    events.send(ProgressEvent::Simple(SimpleEvent::ScheduleOptimizationStart));

    let mut optimizer = Optimizer::with_default_jobs(params, tuning, base_seed);
    while !optimizer.has_converged() && !cancel_flag.load(Ordering::Relaxed) {
        optimizer.update();
        events.send(ProgressEvent::ScheduleProgress {
            progress: optimizer.estimated_progress(),
            makespan_seconds: optimizer.best_makespan_seconds().round() as i64,
            epoch: optimizer.epochs() as i32,
        });
    }

    events.send(ProgressEvent::Simple(SimpleEvent::ScheduleOptimizationDone));
    let makespan_seconds = optimizer.best_makespan_seconds().round() as i64;
    events.send(ProgressEvent::ScheduleComplete { makespan_seconds });
    events.send(ProgressEvent::Simple(SimpleEvent::Finished));
    info!(makespan_seconds, epochs = optimizer.epochs(), "prediction run finished");
    optimizer
}

/// Runs schedule optimization on a background thread, returning a handle and
/// an [`EventConsumer`] for progress (spec.md §6, §4.11).
pub fn start_schedule_optimization(
    project: Project,
    tuning: TuningParams,
) -> Result<(PredictionHandle<OptimizedSchedule>, EventConsumer), ValidationError> {
    tuning.validate()?;
    let params = ScheduleParams::from_project(&project)?;
    let (producer, consumer) = event_bus();
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let thread_cancel_flag = Arc::clone(&cancel_flag);
    let seed = RandomSource::from_entropy().seed();

    let join_handle = std::thread::spawn(move || {
        let optimizer = run_optimization(params.clone(), tuning, seed, &producer, &thread_cancel_flag);
        build_optimized_schedule(&project, &params, optimizer.best_schedule())
    });

    Ok((
        PredictionHandle {
            join_handle,
            cancel_flag,
        },
        consumer,
    ))
}

/// Runs schedule optimization on a background thread, returning only the
/// makespan (spec.md §6 `start_prediction`) — the thinner of the two
/// external entry points, for callers that only want a likelihood sample
/// (e.g. the out-of-scope histogram layer).
pub fn start_prediction(
    project: Project,
    tuning: TuningParams,
) -> Result<(PredictionHandle<PredictionResult>, EventConsumer), ValidationError> {
    tuning.validate()?;
    let params = ScheduleParams::from_project(&project)?;
    let (producer, consumer) = event_bus();
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let thread_cancel_flag = Arc::clone(&cancel_flag);
    let seed = RandomSource::from_entropy().seed();

    let join_handle = std::thread::spawn(move || {
        let optimizer = run_optimization(params, tuning, seed, &producer, &thread_cancel_flag);
        PredictionResult {
            makespan_seconds: optimizer.best_makespan_seconds().round() as i64,
        }
    });

    Ok((
        PredictionHandle {
            join_handle,
            cancel_flag,
        },
        consumer,
    ))
}
