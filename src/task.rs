/*
SPDX-FileCopyrightText: Copyright 2026 finsched contributors
SPDX-License-Identifier: MIT
*/

//! Core data types for the scheduling simulator.
//!
//! Two types model the two sides of one simulation run:
//!
//! ```text
//! caller ──(Vec<Task>)──► policy engine ──(ScheduleResult)──► caller
//!              ↑ immutable input              ↑ timeline + metric
//! ```
//!
//! # Ownership model
//! `Task` values are **moved** into [`simulate`](crate::policy::simulate) for
//! the duration of one run.  The engine builds its own mutable working state
//! (pending tasks carrying remaining service time) and retains nothing after
//! the call; callers that want to re-run a workload keep their own list and
//! pass fresh clones.

use serde::{Deserialize, Serialize};

// ── Task (input) ──────────────────────────────────────────────────────────────

/// One schedulable unit of work, as supplied by the caller.
///
/// All time values share one simulated unit; the clock is advanced purely by
/// the policy algorithms, never by a timer.
///
/// # Lifecycle
/// Created by the caller (the CLI builds these from a workload file), moved
/// into [`simulate`](crate::policy::simulate), and never mutated by the
/// engine.  Preemptive policies track remaining service time on their own
/// working copies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    /// Row label in the output timeline.  Not required to be unique.
    pub name: String,

    /// Simulated time at which the task becomes eligible to run.
    /// Must be finite and non-negative.
    pub arrival_time: f64,

    /// Total service time required.  Must be strictly positive: every policy
    /// runs a task until its remaining service time reaches zero.
    pub burst_time: f64,

    /// Scheduling weight; larger values win.  Read only by the Priority and
    /// PBPM policies.
    pub priority: f64,

    /// Portfolio-impact weight in `[0.0, 1.0]`, a multiplicative score boost
    /// read only by PBPM.
    pub impact_weight: f64,
}

// ── ScheduleEntry (output) ────────────────────────────────────────────────────

/// One contiguous execution slice in the simulated timeline.
///
/// A preempted task appears in several entries; the slice durations for one
/// task always sum to its full burst time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    /// Name of the task this slice belongs to.
    pub task_name: String,

    /// Simulated time at which the slice starts.
    pub start_time: f64,

    /// Length of the slice.
    pub duration: f64,
}

impl ScheduleEntry {
    /// End of this slice on the simulated clock.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

// ── ScheduleResult (output) ───────────────────────────────────────────────────

/// Complete outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleResult {
    /// Execution slices in the order they were simulated (not grouped by
    /// task).
    pub schedule: Vec<ScheduleEntry>,

    /// Mean of `completion − arrival − burst` over all completed tasks: the
    /// average time spent eligible but not running.
    pub average_waiting_time: f64,
}

impl ScheduleResult {
    /// Simulated time at which all work is done.
    ///
    /// Slices are emitted in clock order, so this is the end of the last
    /// slice.  Returns `0.0` for an empty timeline.
    pub fn makespan(&self) -> f64 {
        self.schedule.last().map(ScheduleEntry::end_time).unwrap_or(0.0)
    }

    /// Total simulated service time the timeline grants to `name`: the sum
    /// of every slice duration carrying that task name.
    pub fn total_service_time(&self, name: &str) -> f64 {
        self.schedule
            .iter()
            .filter(|e| e.task_name == name)
            .map(|e| e.duration)
            .sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
