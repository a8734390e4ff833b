// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Slurm integration: the accounting, live-stats and queue-status sources.

pub mod slurm;
pub mod types;

pub use slurm::{Scheduler, SlurmCli, DELIMITER};
pub use types::{job_states, JobState, QueueStatus};
