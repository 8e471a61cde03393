/*
SPDX-FileCopyrightText: Copyright 2026 finsched contributors
SPDX-License-Identifier: MIT
*/

//! Structured error type for the policy engine.
//!
//! [`SimulationError`] is returned from [`simulate`](super::simulate) when
//! the input fails the validation boundary.  Detection happens before any
//! simulation state is built; the engine never attempts partial recovery and
//! never logs a failure itself.  Reporting is the caller's concern, so every
//! variant carries the offending values ready to render.

use thiserror::Error;

/// Input validation failure detected before a simulation run starts.
///
/// Once `simulate()` gets past validation, the policy routines cannot fail:
/// each one is a deterministic pass over finite input whose total remaining
/// work strictly decreases every iteration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The task list is empty.  The average-waiting metric is a mean over
    /// completed tasks and is undefined for zero of them.
    #[error("no tasks provided: task list is empty")]
    NoTasks,

    /// A task carried a zero, negative, or NaN burst time.  Every policy
    /// runs a task until its remaining service time reaches zero, which
    /// assumes a strictly positive burst.
    #[error("task '{task}' has non-positive burst time {burst_time}")]
    NonPositiveBurst { task: String, burst_time: f64 },

    /// A task carried a negative or NaN arrival time.
    #[error("task '{task}' has negative arrival time {arrival_time}")]
    NegativeArrival { task: String, arrival_time: f64 },

    /// Round Robin was requested with a quantum that cannot make progress.
    #[error("time quantum must be strictly positive, got {0}")]
    NonPositiveQuantum(f64),

    /// PBPM was requested with a market volatility outside its defined
    /// domain.  Out-of-range values are rejected, not clamped.
    #[error("market volatility {0} is outside [0.0, 1.0]")]
    VolatilityOutOfRange(f64),
}
