//! Workload file loading.
//!
//! A workload file is the YAML task list handed to the simulator:
//!
//! ```yaml
//! tasks:
//!   - name: trade_exec
//!     arrival_time: 0
//!     burst_time: 3
//!     priority: 2
//!     impact_weight: 0.5
//!     kind: trade_execution
//! ```
//!
//! `priority`, `impact_weight`, and `kind` are optional.  `kind` is an
//! informational label (the class of financial work the task represents); it
//! is logged on load and never reaches the policy engine.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::task::Task;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the file layout.
#[derive(Debug, Deserialize)]
struct WorkloadFile {
    tasks: Vec<TaskEntry>,
}

/// Per-task fields as they appear in the YAML file.
#[derive(Debug, Deserialize)]
struct TaskEntry {
    name: String,
    arrival_time: f64,
    burst_time: f64,
    /// Scheduling weight; defaults to the lowest meaningful value.
    #[serde(default = "default_priority")]
    priority: f64,
    /// Portfolio-impact boost; defaults to none.
    #[serde(default)]
    impact_weight: f64,
    /// Informational label, e.g. "trade_execution" or "risk_assessment".
    kind: Option<String>,
}

/// Serde default for `priority`.
fn default_priority() -> f64 {
    1.0
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parse `path` into the task list for one simulation run.
///
/// Value validation (positive bursts, non-negative arrivals) does not happen
/// here; the policy engine rejects malformed tasks at its own boundary.  An
/// empty `tasks:` list parses successfully with a warning and is likewise
/// rejected at simulation time.
///
/// # Errors
/// Returns an error if the file cannot be read or the YAML is structurally
/// invalid.
pub fn load_from_file(path: &Path) -> Result<Vec<Task>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot open workload file: {}", path.display()))?;

    let file: WorkloadFile = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse workload YAML: {}", path.display()))?;

    if file.tasks.is_empty() {
        warn!("workload file {} contains no tasks", path.display());
    }

    let tasks: Vec<Task> = file
        .tasks
        .into_iter()
        .map(|entry| {
            debug!(
                task = %entry.name,
                arrival = entry.arrival_time,
                burst = entry.burst_time,
                priority = entry.priority,
                impact = entry.impact_weight,
                kind = entry.kind.as_deref().unwrap_or("unspecified"),
                "task loaded"
            );
            Task {
                name: entry.name,
                arrival_time: entry.arrival_time,
                burst_time: entry.burst_time,
                priority: entry.priority,
                impact_weight: entry.impact_weight,
            }
        })
        .collect();

    info!(
        task_count = tasks.len(),
        workload = %path.display(),
        "workload loaded"
    );

    Ok(tasks)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn load_full_workload() {
        let yaml = r#"
tasks:
  - name: trade_exec
    arrival_time: 0
    burst_time: 3
    priority: 2
    impact_weight: 0.5
    kind: trade_execution
  - name: risk_check
    arrival_time: 1.5
    burst_time: 2
    priority: 1
    impact_weight: 0.4
    kind: risk_assessment
"#;
        let f = yaml_tempfile(yaml);
        let tasks = load_from_file(f.path()).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name, "trade_exec");
        assert_eq!(tasks[0].arrival_time, 0.0);
        assert_eq!(tasks[0].burst_time, 3.0);
        assert_eq!(tasks[0].priority, 2.0);
        assert_eq!(tasks[0].impact_weight, 0.5);
        assert_eq!(tasks[1].name, "risk_check");
        assert_eq!(tasks[1].arrival_time, 1.5);
    }

    #[test]
    fn optional_fields_use_defaults_when_absent() {
        let yaml = r#"
tasks:
  - name: minimal
    arrival_time: 0
    burst_time: 1
"#;
        let f = yaml_tempfile(yaml);
        let tasks = load_from_file(f.path()).unwrap();

        assert_eq!(tasks[0].priority, 1.0);
        assert_eq!(tasks[0].impact_weight, 0.0);
    }

    #[test]
    fn input_order_is_preserved() {
        // The policies tie-break on input order, so the loader must not
        // reorder anything.
        let yaml = r#"
tasks:
  - name: z_last_alphabetically
    arrival_time: 3
    burst_time: 1
  - name: a_first_alphabetically
    arrival_time: 0
    burst_time: 1
"#;
        let f = yaml_tempfile(yaml);
        let tasks = load_from_file(f.path()).unwrap();
        assert_eq!(tasks[0].name, "z_last_alphabetically");
        assert_eq!(tasks[1].name, "a_first_alphabetically");
    }

    #[test]
    fn empty_task_list_parses_to_empty_vec() {
        let f = yaml_tempfile("tasks: []\n");
        let tasks = load_from_file(f.path()).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = load_from_file(Path::new("/nonexistent/path/workload.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(load_from_file(f.path()).is_err());
    }

    #[test]
    fn missing_required_field_returns_error() {
        // burst_time is mandatory.
        let yaml = r#"
tasks:
  - name: incomplete
    arrival_time: 0
"#;
        let f = yaml_tempfile(yaml);
        assert!(load_from_file(f.path()).is_err());
    }
}
