// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod gpu;
mod hints;
mod record;
mod report;
mod slurm;

use config::{
    split_list, Config, DEFAULT_DOCS_URL, DEFAULT_GPU_PARTITIONS, DEFAULT_GPU_QUERY, DEFAULT_GPU_STEP,
    DEFAULT_MIN_MEMORY, DEFAULT_MIN_WALLTIME, DEFAULT_NODE_CORES, DEFAULT_PROMETHEUS_URL,
};
use gpu::Prometheus;
use record::parser::parse_byte_size;
use slurm::SlurmCli;

#[derive(Parser, Debug)]
#[command(name = "jobinfo")]
#[command(about = "Show status and resource usage of a Slurm job")]
#[command(version)]
struct Args {
    /// Slurm job ID
    #[arg(value_parser = parse_jobid)]
    jobid: String,

    /// Jobs shorter than this (seconds) get no hints
    #[arg(long, env = "JOBINFO_MIN_WALLTIME", default_value_t = DEFAULT_MIN_WALLTIME, hide = true)]
    min_walltime: u64,

    /// Memory requests up to this size get no memory hint
    #[arg(long, env = "JOBINFO_MIN_MEMORY", default_value = DEFAULT_MIN_MEMORY, hide = true)]
    min_memory: String,

    /// Partitions exempt from hints (comma separated)
    #[arg(long, env = "JOBINFO_IGNORE_PARTITIONS", default_value = DEFAULT_GPU_PARTITIONS, hide = true)]
    ignore_partitions: String,

    /// Partitions with GPU metrics (comma separated)
    #[arg(long, env = "JOBINFO_GPU_PARTITIONS", default_value = DEFAULT_GPU_PARTITIONS, hide = true)]
    gpu_partitions: String,

    /// Cores of a full node
    #[arg(long, env = "JOBINFO_NODE_CORES", default_value_t = DEFAULT_NODE_CORES, hide = true)]
    node_cores: u64,

    #[arg(long, env = "JOBINFO_PROMETHEUS_URL", default_value = DEFAULT_PROMETHEUS_URL, hide = true)]
    prometheus_url: String,

    /// GPU utilization query; `{host}` is replaced by the node name
    #[arg(long, env = "JOBINFO_GPU_QUERY", default_value = DEFAULT_GPU_QUERY, hide = true)]
    gpu_query: String,

    /// Range query step in seconds
    #[arg(long, env = "JOBINFO_GPU_STEP", default_value_t = DEFAULT_GPU_STEP, hide = true)]
    gpu_step: u64,

    #[arg(long, env = "JOBINFO_DOCS_URL", default_value = DEFAULT_DOCS_URL, hide = true)]
    docs_url: String,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            min_walltime: self.min_walltime as f64,
            min_memory: parse_byte_size(&self.min_memory),
            ignore_partitions: split_list(&self.ignore_partitions),
            gpu_partitions: split_list(&self.gpu_partitions),
            node_cores: self.node_cores,
            prometheus_url: self.prometheus_url.clone(),
            gpu_query: self.gpu_query.clone(),
            gpu_step: self.gpu_step,
            docs_url: self.docs_url.clone(),
        }
    }
}

/// Job IDs consist of digits, `_` (array jobs) and `.` (steps)
fn parse_jobid(s: &str) -> Result<String, String> {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '_' || c == '.') {
        Ok(s.to_string())
    } else {
        Err(format!("'{}' is not a job ID (digits, '_' and '.' only)", s))
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help/--version go to stdout and succeed, everything else is a usage error
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.config();
    let caller = whoami::username();
    let metrics = Prometheus::new(config.prometheus_url.clone());

    let report = report::build(&args.jobid, &SlurmCli, &metrics, &caller, &config)?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    report::render(&report, &config, &mut stdout.lock(), &mut stderr.lock())?;
    Ok(())
}
