// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::record::parser::split_tokens;

/// Job state as reported by Slurm
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Suspended,
    Completing,
    Completed,
    Cancelled,
    Failed,
    Timeout,
    NodeFail,
    OutOfMemory,
    Unknown(String),
}

impl From<&str> for JobState {
    fn from(s: &str) -> Self {
        // sacct writes e.g. "CANCELLED by 1234"
        let word = s.split_whitespace().next().unwrap_or("");
        match word.to_uppercase().as_str() {
            "PENDING" | "PD" => JobState::Pending,
            "RUNNING" | "R" => JobState::Running,
            "SUSPENDED" | "S" => JobState::Suspended,
            "COMPLETING" | "CG" => JobState::Completing,
            "COMPLETED" | "CD" => JobState::Completed,
            "CANCELLED" | "CA" => JobState::Cancelled,
            "FAILED" | "F" => JobState::Failed,
            "TIMEOUT" | "TO" => JobState::Timeout,
            "NODE_FAIL" | "NF" => JobState::NodeFail,
            "OUT_OF_MEMORY" | "OOM" => JobState::OutOfMemory,
            other => JobState::Unknown(other.to_string()),
        }
    }
}

/// All states in a comma-joined reconciled `State` field
pub fn job_states(text: &str) -> Vec<JobState> {
    split_tokens(text).into_iter().map(JobState::from).collect()
}

/// Output of the queue-status query for a pending job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStatus {
    pub dependencies: String,
    pub reason: String,
}

impl QueueStatus {
    /// Parse the single `dependencies;reason` line squeue prints.
    ///
    /// `(null)` means no dependencies.
    pub fn parse(output: &str) -> Self {
        let line = output.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        let (dependencies, reason) = line.split_once(';').unwrap_or((line, ""));
        let clean = |s: &str| {
            let s = s.trim();
            if s == "(null)" { String::new() } else { s.to_string() }
        };
        Self {
            dependencies: clean(dependencies),
            reason: clean(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_from_str() {
        assert_eq!(JobState::from("RUNNING"), JobState::Running);
        assert_eq!(JobState::from("R"), JobState::Running);
        assert_eq!(JobState::from("PENDING"), JobState::Pending);
        assert_eq!(JobState::from("CANCELLED by 1234"), JobState::Cancelled);
        assert!(matches!(JobState::from("WEIRD"), JobState::Unknown(_)));
    }

    #[test]
    fn test_job_states_joined() {
        assert_eq!(job_states("COMPLETED,RUNNING"), vec![JobState::Completed, JobState::Running]);
        assert!(job_states("").is_empty());
    }

    #[test]
    fn test_queue_status_parse() {
        let status = QueueStatus::parse("afterok:123(unfulfilled);Dependency\n");
        assert_eq!(status.dependencies, "afterok:123(unfulfilled)");
        assert_eq!(status.reason, "Dependency");

        let none = QueueStatus::parse("(null);Priority");
        assert_eq!(none.dependencies, "");
        assert_eq!(none.reason, "Priority");

        assert_eq!(QueueStatus::parse(""), QueueStatus::default());
    }
}
