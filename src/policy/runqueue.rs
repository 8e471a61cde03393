/*
SPDX-FileCopyrightText: Copyright 2026 finsched contributors
SPDX-License-Identifier: MIT
*/

//! Shared simulation primitives: the pending-task set and completion
//! bookkeeping.
//!
//! Every arrival-aware policy works the same inner loop: filter the pending
//! set down to tasks that have arrived, pick one by a policy-specific rule,
//! run it for some slice, and either remove it on completion or leave it
//! pending.  [`RunQueue`] owns that pending set; [`CompletionLog`]
//! accumulates waiting times for the final metric.
//!
//! The pending set is an index-addressed `Vec` with order-preserving
//! removal, so selection scans always see the surviving tasks in original
//! input order.  Tie-breaking falls out of that: scans replace the incumbent
//! only on strict improvement, which keeps the first-encountered task on
//! equal keys.

use crate::task::Task;

// ── PendingTask ───────────────────────────────────────────────────────────────

/// Mutable working copy of a [`Task`] inside one simulation run.
///
/// The wrapped input task is never mutated; only `remaining` changes as the
/// task is serviced.
#[derive(Debug, Clone)]
pub(crate) struct PendingTask {
    pub task: Task,

    /// Service time still owed.  Initialised to `burst_time`, decremented
    /// per slice.  The final slice is always `min(remaining, …) ==
    /// remaining`, so the subtraction lands on exactly `0.0`.
    pub remaining: f64,
}

impl PendingTask {
    pub fn new(task: Task) -> Self {
        let remaining = task.burst_time;
        Self { task, remaining }
    }
}

// ── RunQueue ──────────────────────────────────────────────────────────────────

/// Pending-task set shared by the availability-driven policies.
#[derive(Debug)]
pub(crate) struct RunQueue {
    pending: Vec<PendingTask>,
}

impl RunQueue {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            pending: tasks.into_iter().map(PendingTask::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn get(&self, index: usize) -> &PendingTask {
        &self.pending[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut PendingTask {
        &mut self.pending[index]
    }

    /// Order-preserving removal: the relative order of the survivors is
    /// unchanged, so later selection scans still see input order.
    pub fn remove(&mut self, index: usize) -> PendingTask {
        self.pending.remove(index)
    }

    /// Idle-advance target: the earliest arrival among all pending tasks.
    ///
    /// Called when nothing has arrived yet (`select_available` returned
    /// `None` on a non-empty queue).  An empty queue is the terminal
    /// condition, not an idle one; `now` is returned unchanged so callers
    /// looping on [`is_empty`](Self::is_empty) never spin.
    pub fn idle_advance(&self, now: f64) -> f64 {
        self.pending
            .iter()
            .map(|p| p.task.arrival_time)
            .reduce(f64::min)
            .unwrap_or(now)
    }

    /// Earliest pending arrival strictly after `now`: the next point at
    /// which the availability filter can change.  `None` when every pending
    /// task has already arrived.
    pub fn next_arrival_after(&self, now: f64) -> Option<f64> {
        self.pending
            .iter()
            .map(|p| p.task.arrival_time)
            .filter(|&a| a > now)
            .reduce(f64::min)
    }

    /// Scan the available subset (`arrival_time <= now`) in pending order
    /// and return the index of the best task under `prefer`.
    ///
    /// `prefer(candidate, incumbent)` must return `true` only on a strict
    /// improvement; ties then keep the first-encountered task.  The subset
    /// is recomputed on every call, never cached, since arrivals change it
    /// as the clock advances.
    ///
    /// Returns `None` when nothing has arrived yet.
    pub fn select_available<F>(&self, now: f64, prefer: F) -> Option<usize>
    where
        F: Fn(&PendingTask, &PendingTask) -> bool,
    {
        let mut best: Option<usize> = None;
        for (index, candidate) in self.pending.iter().enumerate() {
            if candidate.task.arrival_time > now {
                continue;
            }
            match best {
                Some(b) if !prefer(candidate, &self.pending[b]) => {}
                _ => best = Some(index),
            }
        }
        best
    }
}

// ── CompletionLog ─────────────────────────────────────────────────────────────

/// Accumulates per-task waiting times as tasks finish.
#[derive(Debug, Default)]
pub(crate) struct CompletionLog {
    waiting_times: Vec<f64>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the completion of `task` at simulated time `completion`.
    ///
    /// The waiting time is `completion − arrival − burst`: total time the
    /// task spent eligible but not running, including any time spent waiting
    /// again after a preemption.
    pub fn record(&mut self, task: &Task, completion: f64) {
        self.waiting_times
            .push(completion - task.arrival_time - task.burst_time);
    }

    /// Mean waiting time over all recorded completions.
    ///
    /// An empty log is a precondition violation: the empty-input case is
    /// rejected at the validation boundary before any policy runs.
    pub fn average(&self) -> f64 {
        debug_assert!(
            !self.waiting_times.is_empty(),
            "average over zero completed tasks"
        );
        self.waiting_times.iter().sum::<f64>() / self.waiting_times.len() as f64
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, arrival: f64, burst: f64) -> Task {
        Task {
            name: name.to_string(),
            arrival_time: arrival,
            burst_time: burst,
            priority: 1.0,
            impact_weight: 0.0,
        }
    }

    // ── PendingTask ───────────────────────────────────────────────────────────

    #[test]
    fn pending_task_starts_with_full_burst_remaining() {
        let p = PendingTask::new(task("a", 0.0, 4.0));
        assert_eq!(p.remaining, 4.0);
    }

    // ── RunQueue: availability filter ─────────────────────────────────────────

    #[test]
    fn select_available_ignores_future_arrivals() {
        let queue = RunQueue::new(vec![task("late", 5.0, 1.0), task("early", 0.0, 1.0)]);
        // Only "early" has arrived at t=0; it sits at index 1.
        let idx = queue.select_available(0.0, |_, _| false).unwrap();
        assert_eq!(queue.get(idx).task.name, "early");
    }

    #[test]
    fn select_available_returns_none_before_first_arrival() {
        let queue = RunQueue::new(vec![task("a", 3.0, 1.0)]);
        assert_eq!(queue.select_available(2.9, |_, _| false), None);
    }

    #[test]
    fn select_available_keeps_first_encountered_on_ties() {
        let queue = RunQueue::new(vec![
            task("first", 0.0, 2.0),
            task("second", 0.0, 2.0),
            task("third", 0.0, 2.0),
        ]);
        // Strict burst comparison: all equal, so the scan keeps index 0.
        let idx = queue
            .select_available(0.0, |c, b| c.task.burst_time < b.task.burst_time)
            .unwrap();
        assert_eq!(queue.get(idx).task.name, "first");
    }

    #[test]
    fn select_available_prefers_strict_improvement() {
        let queue = RunQueue::new(vec![task("long", 0.0, 5.0), task("short", 0.0, 2.0)]);
        let idx = queue
            .select_available(0.0, |c, b| c.task.burst_time < b.task.burst_time)
            .unwrap();
        assert_eq!(queue.get(idx).task.name, "short");
    }

    // ── RunQueue: clock queries ───────────────────────────────────────────────

    #[test]
    fn idle_advance_jumps_to_earliest_pending_arrival() {
        let queue = RunQueue::new(vec![task("a", 7.0, 1.0), task("b", 4.0, 1.0)]);
        assert_eq!(queue.idle_advance(1.0), 4.0);
    }

    #[test]
    fn idle_advance_on_empty_queue_leaves_clock_unchanged() {
        let queue = RunQueue::new(vec![]);
        assert_eq!(queue.idle_advance(3.0), 3.0);
    }

    #[test]
    fn next_arrival_after_excludes_now_and_earlier() {
        let queue = RunQueue::new(vec![
            task("a", 0.0, 1.0),
            task("b", 2.0, 1.0),
            task("c", 5.0, 1.0),
        ]);
        assert_eq!(queue.next_arrival_after(2.0), Some(5.0));
        assert_eq!(queue.next_arrival_after(0.0), Some(2.0));
        assert_eq!(queue.next_arrival_after(5.0), None);
    }

    // ── RunQueue: removal ─────────────────────────────────────────────────────

    #[test]
    fn remove_preserves_relative_order_of_survivors() {
        let mut queue = RunQueue::new(vec![
            task("a", 0.0, 1.0),
            task("b", 0.0, 1.0),
            task("c", 0.0, 1.0),
        ]);
        let removed = queue.remove(1);
        assert_eq!(removed.task.name, "b");
        assert_eq!(queue.get(0).task.name, "a");
        assert_eq!(queue.get(1).task.name, "c");
    }

    // ── CompletionLog ─────────────────────────────────────────────────────────

    #[test]
    fn record_computes_waiting_time_from_completion() {
        let mut log = CompletionLog::new();
        // Arrived at 1, needed 3 units, finished at 7 → waited 3.
        log.record(&task("a", 1.0, 3.0), 7.0);
        assert_eq!(log.average(), 3.0);
    }

    #[test]
    fn average_is_mean_over_all_completions() {
        let mut log = CompletionLog::new();
        log.record(&task("a", 0.0, 3.0), 3.0); // waited 0
        log.record(&task("b", 1.0, 2.0), 5.0); // waited 2
        log.record(&task("c", 2.0, 1.0), 6.0); // waited 3
        assert!((log.average() - 5.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn waiting_time_counts_post_preemption_waits() {
        let mut log = CompletionLog::new();
        // Arrived at 0, burst 4, but finished only at 9: 5 units were spent
        // waiting across one or more preemptions.
        log.record(&task("a", 0.0, 4.0), 9.0);
        assert_eq!(log.average(), 5.0);
    }
}
