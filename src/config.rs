// src/config.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run configuration
//!
//! [`Options`] is the raw command-line surface. [`Options::validate`] turns it
//! into an immutable [`GenerationConfig`], rejecting unknown formats and
//! destination kinds before any file is touched.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local};
use clap::Args;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::format::LogFormat;
use crate::sink::SinkKind;

/// Command-line options for a generation run
#[derive(Args, Clone, Debug)]
pub struct Options {
    /// Log format: apache_common, apache_combined, apache_error, rfc3164,
    /// rfc5424, common_log, json, spring_boot
    #[arg(long, short = 'f', default_value = "apache_common")]
    pub format: String,

    /// Output file path (ignored for stdout)
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Output type: stdout, log, gz
    #[arg(long = "type", short = 't', default_value = "stdout")]
    pub sink_type: String,

    /// Number of records to generate
    #[arg(long, short = 'n', default_value_t = DEFAULT_NUMBER)]
    pub number: u64,

    /// Message length in bytes for formats with a free-text message (0 = one phrase)
    #[arg(long, short = 'b', default_value_t = 0)]
    pub bytes: usize,

    /// Simulated time step between records, also waited out before exit (e.g. 500ms, 1s)
    #[arg(long, short = 's', default_value = "0s", value_parser = parse_duration)]
    pub sleep: Duration,

    /// Wall-clock delay before each record in bounded mode (e.g. 100ms)
    #[arg(long, short = 'd', default_value = "0s", value_parser = parse_duration)]
    pub delay: Duration,

    /// Records per file before rotating to a numbered file (0 = no splitting)
    #[arg(long, short = 'p', default_value_t = 0)]
    pub split_by: u64,

    /// Continuous mode: emit `rate` records per window for number / rate windows.
    /// Throughput lines go to --diagnostic-path, which must be writable
    #[arg(long = "loop", short = 'l')]
    pub forever: bool,

    /// Records per window in continuous mode
    #[arg(long, short = 'r', default_value_t = 0)]
    pub rate: u64,

    /// RNG seed for reproducible output
    #[arg(long, env = "LOGSYNTH_SEED")]
    pub seed: Option<u64>,

    /// Starting simulated timestamp, RFC 3339 (default: now)
    #[arg(long)]
    pub start: Option<String>,

    /// Side-channel file for continuous-mode throughput lines
    #[arg(long, default_value = DEFAULT_DIAGNOSTIC_PATH)]
    pub diagnostic_path: PathBuf,

    /// Continuous-mode pacing window in milliseconds
    #[arg(long, default_value_t = DEFAULT_RATE_WINDOW.as_millis() as u64)]
    pub window_ms: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format: LogFormat::default().to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            sink_type: SinkKind::default().to_string(),
            number: DEFAULT_NUMBER,
            bytes: 0,
            sleep: Duration::ZERO,
            delay: Duration::ZERO,
            split_by: 0,
            forever: false,
            rate: 0,
            seed: None,
            start: None,
            diagnostic_path: PathBuf::from(DEFAULT_DIAGNOSTIC_PATH),
            window_ms: DEFAULT_RATE_WINDOW.as_millis() as u64,
        }
    }
}

impl Options {
    /// Check the options and resolve them into a [`GenerationConfig`]
    pub fn validate(&self) -> Result<GenerationConfig> {
        let format: LogFormat = self.format.parse()?;
        let sink: SinkKind = self.sink_type.parse()?;

        let mode = if self.forever {
            if self.rate == 0 {
                return Err(Error::InvalidConfig(
                    "continuous mode (--loop) requires --rate > 0".to_string(),
                ));
            }
            if self.window_ms == 0 {
                return Err(Error::InvalidConfig(
                    "--window-ms must be greater than zero".to_string(),
                ));
            }
            if self.number < self.rate {
                tracing::warn!(
                    "--number {} is below --rate {}, continuous mode will emit nothing",
                    self.number,
                    self.rate
                );
            }
            RunMode::Continuous {
                rate: self.rate,
                window: Duration::from_millis(self.window_ms),
            }
        } else {
            RunMode::Bounded
        };

        if self.split_by > 0 && sink.is_console() {
            tracing::warn!("--split-by has no effect when writing to stdout");
        }
        if self.bytes > 0 && !format.uses_length() {
            tracing::debug!("--bytes is ignored by format {}", format);
        }

        let start = match &self.start {
            Some(value) => {
                DateTime::parse_from_rfc3339(value).map_err(|source| Error::InvalidTimestamp {
                    value: value.clone(),
                    source,
                })?
            }
            None => Local::now().fixed_offset(),
        };

        // the clock steps by --sleep when given, otherwise by --delay
        let interval = if self.sleep.is_zero() {
            self.delay
        } else {
            self.sleep
        };

        Ok(GenerationConfig {
            format,
            sink,
            output: self.output.clone(),
            number: self.number,
            length: self.bytes,
            mode,
            split_by: self.split_by,
            delay: self.delay,
            interval,
            drain: self.sleep,
            start,
            seed: self.seed,
            diagnostic_path: self.diagnostic_path.clone(),
        })
    }
}

/// How the generation loop paces itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Emit `number` records as fast as `delay` allows
    Bounded,
    /// Emit `rate` records per `window`, `number / rate` times
    Continuous { rate: u64, window: Duration },
}

/// Validated, immutable configuration for one run
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub format: LogFormat,
    pub sink: SinkKind,
    /// Primary output path, also the base name for split files
    pub output: PathBuf,
    /// Total records
    pub number: u64,
    /// Payload length hint passed to the format
    pub length: usize,
    pub mode: RunMode,
    /// Records per file (0 = no splitting)
    pub split_by: u64,
    /// Wall-clock pause before each bounded-mode record
    pub delay: Duration,
    /// Simulated time added after each record
    pub interval: Duration,
    /// Wall-clock wait between the last record and closing the sink
    pub drain: Duration,
    /// Simulated timestamp of the first record
    pub start: DateTime<FixedOffset>,
    /// RNG seed (None = time + OS entropy)
    pub seed: Option<u64>,
    pub diagnostic_path: PathBuf,
}

impl GenerationConfig {
    /// Bounded run with no delays, mostly useful for tests and benchmarks
    pub fn bounded(format: LogFormat, sink: SinkKind, output: impl Into<PathBuf>, number: u64) -> Self {
        Self {
            format,
            sink,
            output: output.into(),
            number,
            length: 0,
            mode: RunMode::Bounded,
            split_by: 0,
            delay: Duration::ZERO,
            interval: Duration::ZERO,
            drain: Duration::ZERO,
            start: Local::now().fixed_offset(),
            seed: None,
            diagnostic_path: PathBuf::from(DEFAULT_DIAGNOSTIC_PATH),
        }
    }

    /// Whether output rotates to numbered files
    pub fn splits(&self) -> bool {
        self.split_by > 0 && !self.sink.is_console() && self.mode == RunMode::Bounded
    }
}

/// Parse a duration like "250ms", "2s", "1m", "1h", "500us", "10ns", or "3" (seconds)
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidConfig("empty duration".to_string()));
    }

    let (num_str, nanos_per_unit) = if let Some(stripped) = s.strip_suffix("ns") {
        (stripped, 1)
    } else if let Some(stripped) = s.strip_suffix("us") {
        (stripped, 1_000)
    } else if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, 1_000_000)
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, 1_000_000_000)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 60 * 1_000_000_000)
    } else if let Some(stripped) = s.strip_suffix('h') {
        (stripped, 3600 * 1_000_000_000)
    } else {
        (s, 1_000_000_000)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("invalid duration: {s}")))?;

    num.checked_mul(nanos_per_unit)
        .map(Duration::from_nanos)
        .ok_or_else(|| Error::InvalidConfig(format!("duration out of range: {s}")))
}
