/*
SPDX-FileCopyrightText: Copyright 2026 finsched contributors
SPDX-License-Identifier: MIT
*/

//! The scheduling-policy engine.
//!
//! Six policies, each a pure transformation from a task set to a simulated
//! execution timeline plus the average-waiting-time metric:
//!
//! | Policy | Preemptive | Selection key | Tie-break |
//! |---|---|---|---|
//! | [`Policy::Fcfs`] | no | arrival time | input order (stable sort) |
//! | [`Policy::Sjf`] | no | smallest burst | earlier arrival, then input order |
//! | [`Policy::Srtf`] | at arrivals | smallest remaining | input order |
//! | [`Policy::RoundRobin`] | every quantum | FIFO queue | the queue itself |
//! | [`Policy::Priority`] | no | largest priority | input order |
//! | [`Policy::Pbpm`] | every 2.0 units | largest score | input order |
//!
//! All simulated time is a plain `f64` clock advanced by the algorithms, not
//! by any timer.  Each run owns its private working state (queue, clock,
//! completion log), so [`simulate`] is freely callable from concurrent
//! threads as long as every call gets its own task list.
//!
//! # Example
//! ```rust,ignore
//! let result = simulate(tasks, Policy::RoundRobin { time_quantum: 2.0 })?;
//! println!("{:.2}", result.average_waiting_time);
//! ```

pub mod error;
mod runqueue;

pub use error::SimulationError;

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::task::{ScheduleEntry, ScheduleResult, Task};

use runqueue::{CompletionLog, PendingTask, RunQueue};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Fixed execution slice used by the PBPM policy, in simulated time units.
///
/// PBPM re-scores the whole pending set after every slice, so this bounds
/// how long the scheduler can go without reacting to a newly arrived
/// high-impact task.
const PBPM_TIME_SLICE: f64 = 2.0;

// ── Policy selection ──────────────────────────────────────────────────────────

/// Scheduling policy for one simulation run, carrying its per-run parameter
/// where one exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    /// First-come-first-served: non-preemptive, arrival order.
    Fcfs,

    /// Shortest-job-first: non-preemptive, smallest burst among arrived
    /// tasks.
    Sjf,

    /// Shortest-remaining-time-first: the preemptive variant of SJF,
    /// re-evaluated at every arrival.
    Srtf,

    /// Round robin over a FIFO queue with a fixed time quantum.
    RoundRobin { time_quantum: f64 },

    /// Non-preemptive priority scheduling; the largest `priority` value
    /// wins.
    Priority,

    /// Portfolio-based priority management: preemptive with fixed
    /// [`PBPM_TIME_SLICE`] slices, scored as
    /// `priority * (1 + impact_weight) * (1 + market_volatility)`.
    Pbpm { market_volatility: f64 },
}

impl Policy {
    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Policy::Fcfs => "fcfs",
            Policy::Sjf => "sjf",
            Policy::Srtf => "srtf",
            Policy::RoundRobin { .. } => "round_robin",
            Policy::Priority => "priority",
            Policy::Pbpm { .. } => "pbpm",
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run one simulation of `tasks` under `policy`.
///
/// The task list is consumed; the engine mutates only its own working copies
/// and retains nothing after returning.  Identical inputs always produce
/// identical results.
///
/// # Errors
/// All validation happens here, before any simulation state is built; see
/// [`SimulationError`] for the exact conditions.  Past validation the policy
/// routines cannot fail.
pub fn simulate(tasks: Vec<Task>, policy: Policy) -> Result<ScheduleResult, SimulationError> {
    validate(&tasks, policy)?;

    info!(
        policy = policy.name(),
        task_count = tasks.len(),
        "simulation start"
    );

    let result = match policy {
        Policy::Fcfs => fcfs(tasks),
        Policy::Sjf => sjf(tasks),
        Policy::Srtf => srtf(tasks),
        Policy::RoundRobin { time_quantum } => round_robin(tasks, time_quantum),
        Policy::Priority => priority_scheduling(tasks),
        Policy::Pbpm { market_volatility } => pbpm(tasks, market_volatility),
    };

    info!(
        policy = policy.name(),
        slices = result.schedule.len(),
        average_waiting_time = result.average_waiting_time,
        "simulation complete"
    );

    Ok(result)
}

// ── Validation boundary ───────────────────────────────────────────────────────

/// Reject malformed input before any simulation state exists.
///
/// Comparisons are written so NaN fields fail them: `!(x > 0.0)` holds for
/// NaN.
fn validate(tasks: &[Task], policy: Policy) -> Result<(), SimulationError> {
    if tasks.is_empty() {
        return Err(SimulationError::NoTasks);
    }

    for task in tasks {
        if !(task.burst_time > 0.0) {
            return Err(SimulationError::NonPositiveBurst {
                task: task.name.clone(),
                burst_time: task.burst_time,
            });
        }
        if !(task.arrival_time >= 0.0) {
            return Err(SimulationError::NegativeArrival {
                task: task.name.clone(),
                arrival_time: task.arrival_time,
            });
        }
    }

    match policy {
        Policy::RoundRobin { time_quantum } if !(time_quantum > 0.0) => {
            Err(SimulationError::NonPositiveQuantum(time_quantum))
        }
        Policy::Pbpm { market_volatility } if !(0.0..=1.0).contains(&market_volatility) => {
            Err(SimulationError::VolatilityOutOfRange(market_volatility))
        }
        _ => Ok(()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// First-come-first-served
// ─────────────────────────────────────────────────────────────────────────────

/// Non-preemptive arrival-order execution.
///
/// The sort is stable, so tasks sharing an arrival time keep their input
/// order.  Each task runs to completion in one slice; the clock jumps
/// forward over idle gaps.
fn fcfs(mut tasks: Vec<Task>) -> ScheduleResult {
    tasks.sort_by(|a, b| a.arrival_time.total_cmp(&b.arrival_time));

    let mut now = 0.0_f64;
    let mut schedule = Vec::with_capacity(tasks.len());
    let mut log = CompletionLog::new();

    for task in tasks {
        if now < task.arrival_time {
            now = task.arrival_time;
        }
        schedule.push(ScheduleEntry {
            task_name: task.name.clone(),
            start_time: now,
            duration: task.burst_time,
        });
        now += task.burst_time;
        log.record(&task, now);
    }

    ScheduleResult {
        schedule,
        average_waiting_time: log.average(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shortest-job-first
// ─────────────────────────────────────────────────────────────────────────────

/// Non-preemptive shortest-burst selection among arrived tasks.
///
/// Tie-break on equal bursts: earlier arrival, then input order.
fn sjf(tasks: Vec<Task>) -> ScheduleResult {
    let mut queue = RunQueue::new(tasks);
    let mut now = 0.0_f64;
    let mut schedule = Vec::new();
    let mut log = CompletionLog::new();

    while !queue.is_empty() {
        let Some(index) = queue.select_available(now, |cand, best| {
            cand.task
                .burst_time
                .total_cmp(&best.task.burst_time)
                .then(cand.task.arrival_time.total_cmp(&best.task.arrival_time))
                .is_lt()
        }) else {
            now = queue.idle_advance(now);
            continue;
        };

        let picked = queue.remove(index);
        schedule.push(ScheduleEntry {
            task_name: picked.task.name.clone(),
            start_time: now,
            duration: picked.task.burst_time,
        });
        now += picked.task.burst_time;
        log.record(&picked.task, now);
    }

    ScheduleResult {
        schedule,
        average_waiting_time: log.average(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shortest-remaining-time-first
// ─────────────────────────────────────────────────────────────────────────────

/// Preemptive shortest-remaining-time selection.
///
/// A run slice never crosses the next future arrival, so a newly arrived
/// shorter job preempts at exactly its eligibility time.  One entry is
/// emitted per slice; a preempted task therefore appears multiple times in
/// the timeline.
fn srtf(tasks: Vec<Task>) -> ScheduleResult {
    let mut queue = RunQueue::new(tasks);
    let mut now = 0.0_f64;
    let mut schedule = Vec::new();
    let mut log = CompletionLog::new();

    while !queue.is_empty() {
        let Some(index) = queue
            .select_available(now, |cand, best| cand.remaining.total_cmp(&best.remaining).is_lt())
        else {
            now = queue.idle_advance(now);
            continue;
        };

        // Run until the task finishes or the next arrival forces a
        // re-evaluation, whichever comes first.
        let slice = match queue.next_arrival_after(now) {
            Some(arrival) => queue.get(index).remaining.min(arrival - now),
            None => queue.get(index).remaining,
        };

        debug!(
            task = %queue.get(index).task.name,
            start = now,
            slice = slice,
            "srtf: run slice"
        );
        schedule.push(ScheduleEntry {
            task_name: queue.get(index).task.name.clone(),
            start_time: now,
            duration: slice,
        });
        now += slice;
        queue.get_mut(index).remaining -= slice;

        if queue.get(index).remaining <= 0.0 {
            let done = queue.remove(index);
            log.record(&done.task, now);
        }
    }

    ScheduleResult {
        schedule,
        average_waiting_time: log.average(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Round robin
// ─────────────────────────────────────────────────────────────────────────────

/// Quantum-driven round robin over a FIFO queue.
///
/// The queue starts in input order and is never sorted; fairness comes only
/// from the back-of-queue re-insertion after a partial run.  Two
/// consequences are part of this policy's contract: tasks that arrive while
/// a slice is running are not pulled ahead of the current queue head, and
/// the clock jumps forward when the head has not arrived yet, even if a task
/// further back already has.
fn round_robin(tasks: Vec<Task>, time_quantum: f64) -> ScheduleResult {
    let mut ready: VecDeque<PendingTask> = tasks.into_iter().map(PendingTask::new).collect();
    let mut now = 0.0_f64;
    let mut schedule = Vec::new();
    let mut log = CompletionLog::new();

    while let Some(mut current) = ready.pop_front() {
        if now < current.task.arrival_time {
            now = current.task.arrival_time;
        }

        let slice = current.remaining.min(time_quantum);
        schedule.push(ScheduleEntry {
            task_name: current.task.name.clone(),
            start_time: now,
            duration: slice,
        });
        now += slice;
        current.remaining -= slice;

        if current.remaining <= 0.0 {
            log.record(&current.task, now);
        } else {
            ready.push_back(current);
        }
    }

    ScheduleResult {
        schedule,
        average_waiting_time: log.average(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Priority scheduling
// ─────────────────────────────────────────────────────────────────────────────

/// Non-preemptive largest-priority-first selection among arrived tasks.
///
/// Ties keep the first task in input order.  The selected task runs to
/// completion in a single slice, so its waiting time is fully accumulated
/// before it starts.
fn priority_scheduling(tasks: Vec<Task>) -> ScheduleResult {
    let mut queue = RunQueue::new(tasks);
    let mut now = 0.0_f64;
    let mut schedule = Vec::new();
    let mut log = CompletionLog::new();

    while !queue.is_empty() {
        let Some(index) = queue.select_available(now, |cand, best| {
            cand.task.priority.total_cmp(&best.task.priority).is_gt()
        }) else {
            now = queue.idle_advance(now);
            continue;
        };

        let picked = queue.remove(index);
        schedule.push(ScheduleEntry {
            task_name: picked.task.name.clone(),
            start_time: now,
            duration: picked.task.burst_time,
        });
        now += picked.task.burst_time;
        log.record(&picked.task, now);
    }

    ScheduleResult {
        schedule,
        average_waiting_time: log.average(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Portfolio-based priority management
// ─────────────────────────────────────────────────────────────────────────────

/// Preemptive weighted-priority scheduling in fixed slices.
///
/// Each cycle re-scores every arrived task as
/// `priority * (1 + impact_weight) * (1 + market_volatility)` and runs the
/// maximum for one [`PBPM_TIME_SLICE`].  The volatility factor is constant
/// for the whole run and scales every score equally, so it never reorders
/// two tasks relative to each other; `impact_weight` does.  An unfinished
/// task stays in the pending set and competes again on the next cycle.
fn pbpm(tasks: Vec<Task>, market_volatility: f64) -> ScheduleResult {
    let score = |p: &PendingTask| {
        p.task.priority * (1.0 + p.task.impact_weight) * (1.0 + market_volatility)
    };

    let mut queue = RunQueue::new(tasks);
    let mut now = 0.0_f64;
    let mut schedule = Vec::new();
    let mut log = CompletionLog::new();

    while !queue.is_empty() {
        let Some(index) =
            queue.select_available(now, |cand, best| score(cand).total_cmp(&score(best)).is_gt())
        else {
            now = queue.idle_advance(now);
            continue;
        };

        let slice = queue.get(index).remaining.min(PBPM_TIME_SLICE);
        debug!(
            task = %queue.get(index).task.name,
            score = score(queue.get(index)),
            start = now,
            slice = slice,
            "pbpm: run slice"
        );
        schedule.push(ScheduleEntry {
            task_name: queue.get(index).task.name.clone(),
            start_time: now,
            duration: slice,
        });
        now += slice;
        queue.get_mut(index).remaining -= slice;

        if queue.get(index).remaining <= 0.0 {
            let done = queue.remove(index);
            log.record(&done.task, now);
        }
    }

    ScheduleResult {
        schedule,
        average_waiting_time: log.average(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
