// src/main.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line interface for logsynth
//!
//! ```bash
//! # 1000 Apache common log lines on stdout
//! logsynth
//!
//! # 250 RFC 5424 records split 100 per file: app.log, app1.log, app2.log
//! logsynth -f rfc5424 -t log -o app.log -n 250 -p 100
//!
//! # gzip-compressed JSON, one simulated second between records
//! logsynth -f json -t gz -o access.log.gz -n 100000 -s 1s
//!
//! # 500 records per second for 60 seconds
//! logsynth -l -r 500 -n 30000 -t log -o live.log --diagnostic-path ./logsynth.tlog
//! ```

use anyhow::Context;
use clap::Parser;
use logsynth::{generate, Options};

#[derive(Parser)]
#[command(name = "logsynth", version, about = "Generate synthetic log records")]
struct Cli {
    #[command(flatten)]
    options: Options,
}

fn main() -> anyhow::Result<()> {
    // stdout carries records, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = cli.options.validate().context("Invalid options")?;
    let summary = generate(config).context("Log generation failed")?;

    if summary.records_dropped > 0 {
        tracing::warn!(
            "{} of {} records could not be written",
            summary.records_dropped,
            summary.records_emitted
        );
    }
    Ok(())
}
