// src/generator.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record generation loop
//!
//! [`LogGenerator`] renders records, writes them through the active [`Sink`],
//! advances the simulated clock, rotates split files, and paces continuous
//! runs to a fixed number of records per window.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::{GenerationConfig, RunMode};
use crate::constants::FLUSH_EVERY_RECORDS;
use crate::error::{Error, Result};
use crate::sink::{Sink, SinkKind};

/// Lifecycle of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Rotating,
    Draining,
    Terminated,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records rendered and handed to a sink, including dropped ones
    pub records_emitted: u64,
    /// Records whose append failed
    pub records_dropped: u64,
    /// Primary files created, in rotation order (empty for stdout)
    pub files: Vec<PathBuf>,
    /// Files whose close failed; a compressed one is likely truncated
    pub files_failed: Vec<PathBuf>,
}

impl RunSummary {
    /// Records that reached a sink
    pub fn records_written(&self) -> u64 {
        self.records_emitted - self.records_dropped
    }
}

/// Name of the `count`-th split file: `name.ext` becomes `name{count}.ext`
pub fn split_file_name(path: &Path, count: u64) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}{count}.{}", ext.to_string_lossy()),
        None => format!("{stem}{count}"),
    };
    path.with_file_name(file_name)
}

/// Generate logs with full configuration
pub fn generate(config: GenerationConfig) -> Result<RunSummary> {
    LogGenerator::new(config).run()
}

/// Stateful driver for one generation run
pub struct LogGenerator {
    config: GenerationConfig,
    rng: Xoshiro256PlusPlus,
    /// Simulated timestamp of the next record
    clock: DateTime<FixedOffset>,
    state: RunState,
}

impl LogGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        let seed = config.seed.unwrap_or_else(generate_call_entropy);
        tracing::info!(
            "Creating LogGenerator: format={}, type={}, number={}, mode={:?}, split_by={}",
            config.format,
            config.sink,
            config.number,
            config.mode,
            config.split_by
        );
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            clock: config.start,
            config,
            state: RunState::Idle,
        }
    }

    /// Reseed the record content RNG (None = time + urandom)
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed.unwrap_or_else(generate_call_entropy));
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Simulated timestamp the next record will carry
    pub fn clock(&self) -> DateTime<FixedOffset> {
        self.clock
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Render the next record and step the simulated clock
    pub fn next_record(&mut self) -> String {
        let record = self
            .config
            .format
            .render(&mut self.rng, &self.clock, self.config.length);
        self.advance_clock();
        record
    }

    fn advance_clock(&mut self) {
        match chrono::Duration::from_std(self.config.interval) {
            Ok(step) => self.clock += step,
            Err(e) => tracing::warn!("Simulated interval out of range, clock not advanced: {}", e),
        }
    }

    /// Run to completion
    ///
    /// Sink-open failures abort the run. Failed appends, flushes, and closes
    /// are counted in [`RunSummary::records_dropped`] and the run continues.
    pub fn run(&mut self) -> Result<RunSummary> {
        let started = Instant::now();
        let summary = match self.config.mode {
            RunMode::Bounded => self.run_bounded(),
            RunMode::Continuous { rate, window } => self.run_continuous(rate, window),
        };
        self.state = RunState::Terminated;

        if let Ok(summary) = &summary {
            if !summary.files_failed.is_empty() {
                tracing::warn!("{} file(s) failed to close cleanly", summary.files_failed.len());
            }
            tracing::info!(
                "Generation complete: {} records ({} dropped) across {} file(s) in {:?}",
                summary.records_emitted,
                summary.records_dropped,
                summary.files.len(),
                started.elapsed()
            );
        }
        summary
    }

    fn run_bounded(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut primary = self.open_primary(&self.config.output, &mut summary)?;
        let mut split_count: u64 = 1;
        let mut in_file: u64 = 0;

        self.state = RunState::Running;
        for line in 0..self.config.number {
            if !self.config.delay.is_zero() {
                thread::sleep(self.config.delay);
            }

            let record = self
                .config
                .format
                .render(&mut self.rng, &self.clock, self.config.length);
            primary.emit(record, &mut summary);
            in_file += 1;
            if in_file % FLUSH_EVERY_RECORDS == 0 {
                primary.checkpoint(&mut summary);
            }

            // rotate only while records remain, so no trailing empty file
            let remaining = self.config.number - (line + 1);
            if self.config.splits() && in_file >= self.config.split_by && remaining > 0 {
                self.state = RunState::Rotating;
                primary.close(&mut summary);
                let next = split_file_name(&self.config.output, split_count);
                tracing::debug!(
                    "Rotating after {} records to {}",
                    summary.records_emitted,
                    next.display()
                );
                primary = self.open_primary(&next, &mut summary)?;
                split_count += 1;
                in_file = 0;
                self.state = RunState::Running;
            }

            self.advance_clock();
        }

        self.drain(primary, &mut summary);
        Ok(summary)
    }

    fn run_continuous(&mut self, rate: u64, window: Duration) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut primary = self.open_primary(&self.config.output, &mut summary)?;
        let mut diagnostic =
            Sink::open(SinkKind::Plain, &self.config.diagnostic_path).map_err(|e| match e {
                Error::OpenSink { path, source } => Error::OpenDiagnostic { path, source },
                other => other,
            })?;

        let created = Local::now();
        diagnostic_line(
            &mut diagnostic,
            format!(
                "logsynth started at {}\n",
                created.to_rfc3339_opts(SecondsFormat::Secs, false)
            ),
        );

        let iterations = self.config.number / rate;
        self.state = RunState::Running;
        for counter in 0..iterations {
            let start = Instant::now();
            for _ in 0..rate {
                let record = self.next_record();
                primary.emit(record, &mut summary);
            }
            primary.checkpoint(&mut summary);
            let elapsed = start.elapsed();

            diagnostic_line(
                &mut diagnostic,
                format!(
                    "{} wrote {} logs in {:?} iteration: {}\n",
                    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
                    rate,
                    elapsed,
                    counter
                ),
            );
            tracing::debug!(
                "Batch {}/{}: {} records in {:?}",
                counter + 1,
                iterations,
                rate,
                elapsed
            );

            // no catch-up: a slow batch just skips its sleep
            match window.checked_sub(elapsed) {
                Some(rest) => thread::sleep(rest),
                None => tracing::debug!("Batch {} overran the {:?} window", counter, window),
            }
        }

        diagnostic_line(
            &mut diagnostic,
            format!(
                "logsynth finished at {}\n",
                Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
            ),
        );
        diagnostic_line(
            &mut diagnostic,
            format!("will wait for {:?} before exiting\n", self.config.drain),
        );
        if let Err(e) = diagnostic.close() {
            tracing::warn!("Diagnostic sink: {}", e);
        }

        self.drain(primary, &mut summary);
        Ok(summary)
    }

    fn open_primary(&self, path: &Path, summary: &mut RunSummary) -> Result<Primary> {
        let sink = Sink::open(self.config.sink, path)?;
        if !self.config.sink.is_console() {
            summary.files.push(path.to_path_buf());
        }
        Ok(Primary { sink, pending: 0 })
    }

    fn drain(&mut self, primary: Primary, summary: &mut RunSummary) {
        self.state = RunState::Draining;
        if !self.config.drain.is_zero() {
            tracing::info!("Waiting {:?} before exiting", self.config.drain);
            thread::sleep(self.config.drain);
        }
        primary.close(summary);
    }
}

/// The active primary sink and its records not yet confirmed by a flush
struct Primary {
    sink: Sink,
    pending: u64,
}

impl Primary {
    /// Append one record plus terminator, counting rather than propagating failures
    fn emit(&mut self, mut record: String, summary: &mut RunSummary) {
        record.push('\n');
        summary.records_emitted += 1;
        match self.sink.append(record.as_bytes()) {
            Ok(()) => {
                self.pending += 1;
                tracing::trace!("Wrote record {}", summary.records_emitted);
            }
            Err(e) => {
                summary.records_dropped += 1;
                tracing::warn!(
                    "Dropped record {} ({} dropped so far): {}",
                    summary.records_emitted,
                    summary.records_dropped,
                    e
                );
            }
        }
    }

    /// Flush buffered records; on failure everything since the last
    /// checkpoint counts as dropped
    fn checkpoint(&mut self, summary: &mut RunSummary) {
        let pending = std::mem::take(&mut self.pending);
        if let Err(e) = self.sink.flush() {
            summary.records_dropped += pending;
            tracing::warn!("Flush failed, {} buffered records dropped: {}", pending, e);
        }
    }

    /// Close the sink; a failed close drops the unconfirmed records and marks
    /// the file as failed, but never stops the run
    fn close(self, summary: &mut RunSummary) {
        let Primary { sink, pending } = self;
        let path = sink.path().map(Path::to_path_buf);
        match sink.close() {
            Ok(()) => {
                if let Some(path) = path {
                    tracing::info!("{} is created", path.display());
                }
            }
            Err(e) => {
                summary.records_dropped += pending;
                tracing::warn!("{} ({} buffered records dropped)", e, pending);
                if let Some(path) = path {
                    summary.files_failed.push(path);
                }
            }
        }
    }
}

fn diagnostic_line(sink: &mut Sink, line: String) {
    if let Err(e) = sink.append(line.as_bytes()) {
        tracing::warn!("Diagnostic sink: {}", e);
    }
}

/// Generate per-run entropy from time + urandom
fn generate_call_entropy() -> u64 {
    let time_entropy = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;

    let urandom_entropy: u64 = {
        let mut rng = rand::rng();
        rng.next_u64()
    };

    time_entropy.wrapping_add(urandom_entropy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LogFormat;
    use chrono::TimeZone;
    use flate2::read::MultiGzDecoder;
    use std::fs::File;
    use std::io::Read;

    fn init_tracing() {
        use tracing_subscriber::{fmt, EnvFilter};
        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    fn start() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2021, 5, 18, 9, 58, 24)
            .unwrap()
    }

    fn file_config(sink: SinkKind, output: &Path, number: u64) -> GenerationConfig {
        GenerationConfig {
            seed: Some(1234),
            start: start(),
            interval: Duration::from_secs(1),
            ..GenerationConfig::bounded(LogFormat::ApacheCommon, sink, output, number)
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn read_gz(path: &Path) -> String {
        let mut text = String::new();
        MultiGzDecoder::new(File::open(path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name(Path::new("out.log"), 1), PathBuf::from("out1.log"));
        assert_eq!(
            split_file_name(Path::new("/var/log/app.tar.gz"), 12),
            PathBuf::from("/var/log/app.tar12.gz")
        );
        assert_eq!(split_file_name(Path::new("logs/out"), 3), PathBuf::from("logs/out3"));
    }

    #[test]
    fn test_bounded_plain_run() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.log");

        let summary = generate(file_config(SinkKind::Plain, &output, 50)).unwrap();

        assert_eq!(summary.records_emitted, 50);
        assert_eq!(summary.records_dropped, 0);
        assert_eq!(summary.records_written(), 50);
        assert_eq!(summary.files, vec![output.clone()]);
        assert!(summary.files_failed.is_empty());
        assert_eq!(read_lines(&output).len(), 50);
    }

    #[test]
    fn test_split_partitions_records() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.log");
        let config = GenerationConfig {
            split_by: 100,
            ..file_config(SinkKind::Plain, &output, 250)
        };

        let summary = generate(config).unwrap();

        let expected = vec![
            dir.path().join("out.log"),
            dir.path().join("out1.log"),
            dir.path().join("out2.log"),
        ];
        assert_eq!(summary.files, expected);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);

        // records carry consecutive one-second timestamps, so emission order
        // is visible across the file boundaries
        let mut all = Vec::new();
        for path in &expected {
            all.extend(read_lines(path));
        }
        assert_eq!(all.len(), 250);
        assert_eq!(read_lines(&expected[0]).len(), 100);
        assert_eq!(read_lines(&expected[1]).len(), 100);
        assert_eq!(read_lines(&expected[2]).len(), 50);

        let stamps: Vec<DateTime<FixedOffset>> = all
            .iter()
            .map(|line| {
                let open = line.find('[').unwrap() + 1;
                let close = line.find(']').unwrap();
                DateTime::parse_from_str(&line[open..close], crate::constants::COMMON_LOG_TIME)
                    .unwrap()
            })
            .collect();
        for (i, stamp) in stamps.iter().enumerate() {
            assert_eq!(*stamp, start() + chrono::Duration::seconds(i as i64));
        }
    }

    #[test]
    fn test_split_exact_multiple_leaves_no_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.log");
        let config = GenerationConfig {
            split_by: 100,
            ..file_config(SinkKind::Plain, &output, 200)
        };

        let summary = generate(config).unwrap();

        assert_eq!(summary.files.len(), 2);
        assert!(!dir.path().join("out2.log").exists());
    }

    #[test]
    fn test_compressed_matches_plain() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.log");
        let gz = dir.path().join("compressed.log");

        for format in LogFormat::ALL {
            let plain_config = GenerationConfig {
                format,
                length: 80,
                ..file_config(SinkKind::Plain, &plain, 300)
            };
            let gz_config = GenerationConfig {
                sink: SinkKind::Compressed,
                output: gz.clone(),
                ..plain_config.clone()
            };
            generate(plain_config).unwrap();
            generate(gz_config).unwrap();

            assert_eq!(read_gz(&gz), std::fs::read_to_string(&plain).unwrap());
        }
    }

    #[test]
    fn test_compressed_split_files_are_valid_archives() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.gz");
        let config = GenerationConfig {
            split_by: 40,
            ..file_config(SinkKind::Compressed, &output, 100)
        };

        let summary = generate(config).unwrap();

        assert_eq!(summary.files.len(), 3);
        let total: usize = summary.files.iter().map(|p| read_gz(p).lines().count()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_zero_records_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("empty.log");

        let summary = generate(file_config(SinkKind::Plain, &output, 0)).unwrap();

        assert_eq!(summary.records_emitted, 0);
        assert_eq!(summary.files, vec![output.clone()]);
        assert_eq!(std::fs::metadata(&output).unwrap().len(), 0);
    }

    #[test]
    fn test_console_run_creates_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("never.log");
        let config = GenerationConfig {
            split_by: 2,
            ..file_config(SinkKind::Console, &output, 5)
        };

        let summary = generate(config).unwrap();

        assert_eq!(summary.records_emitted, 5);
        assert!(summary.files.is_empty());
        assert!(!output.exists());
    }

    #[test]
    fn test_unknown_format_opens_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let options = crate::config::Options {
            format: "bogus".to_string(),
            sink_type: "log".to_string(),
            output: dir.path().join("out.log"),
            ..Default::default()
        };

        let err = options.validate().unwrap_err();

        assert!(err.is_config());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_open_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("no-such-dir").join("out.log");

        let err = generate(file_config(SinkKind::Plain, &output, 10)).unwrap_err();

        assert!(matches!(err, crate::Error::OpenSink { .. }));
    }

    #[test]
    fn test_continuous_batches() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.log");
        let diagnostic = dir.path().join("run.tlog");
        let config = GenerationConfig {
            mode: RunMode::Continuous {
                rate: 10,
                window: Duration::from_millis(5),
            },
            diagnostic_path: diagnostic.clone(),
            ..file_config(SinkKind::Plain, &output, 100)
        };

        let mut generator = LogGenerator::new(config);
        let summary = generator.run().unwrap();

        assert_eq!(generator.state(), RunState::Terminated);
        assert_eq!(summary.records_emitted, 100);
        assert_eq!(read_lines(&output).len(), 100);

        let diag = read_lines(&diagnostic);
        assert!(diag[0].starts_with("logsynth started at "));
        let batches: Vec<_> = diag.iter().filter(|l| l.contains(" wrote 10 logs in ")).collect();
        assert_eq!(batches.len(), 10);
        assert!(batches[9].ends_with("iteration: 9"));
        assert!(diag.iter().any(|l| l.starts_with("logsynth finished at ")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_append_failures_are_counted() {
        init_tracing();
        let config = GenerationConfig {
            seed: Some(1234),
            ..GenerationConfig::bounded(LogFormat::ApacheCommon, SinkKind::Plain, "/dev/full", 2000)
        };

        let summary = generate(config).unwrap();

        assert_eq!(summary.records_emitted, 2000);
        assert_eq!(summary.records_dropped, 2000);
        assert_eq!(summary.records_written(), 0);
        assert_eq!(summary.files_failed, vec![PathBuf::from("/dev/full")]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_rotation_continues_after_failed_close() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.log");
        // first file lands on a full device, the split files do not
        std::os::unix::fs::symlink("/dev/full", &output).unwrap();
        let config = GenerationConfig {
            split_by: 100,
            ..file_config(SinkKind::Plain, &output, 250)
        };

        let summary = generate(config).unwrap();

        assert_eq!(summary.records_emitted, 250);
        assert_eq!(summary.records_dropped, 100);
        assert_eq!(summary.records_written(), 150);
        assert_eq!(summary.files.len(), 3);
        assert_eq!(summary.files_failed, vec![output.clone()]);
        assert_eq!(read_lines(&dir.path().join("out1.log")).len(), 100);
        assert_eq!(read_lines(&dir.path().join("out2.log")).len(), 50);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_continuous_flush_failures_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig {
            mode: RunMode::Continuous {
                rate: 10,
                window: Duration::from_millis(1),
            },
            diagnostic_path: dir.path().join("run.tlog"),
            ..file_config(SinkKind::Plain, Path::new("/dev/full"), 100)
        };

        let summary = generate(config).unwrap();

        assert_eq!(summary.records_emitted, 100);
        assert_eq!(summary.records_dropped, 100);
        let diag = read_lines(&dir.path().join("run.tlog"));
        assert_eq!(diag.iter().filter(|l| l.contains(" wrote 10 logs in ")).count(), 10);
    }

    #[test]
    fn test_unwritable_diagnostic_path_names_the_flag() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig {
            mode: RunMode::Continuous {
                rate: 10,
                window: Duration::from_millis(1),
            },
            diagnostic_path: dir.path().join("missing").join("run.tlog"),
            ..file_config(SinkKind::Plain, &dir.path().join("out.log"), 100)
        };

        let err = generate(config).unwrap_err();

        assert!(matches!(err, Error::OpenDiagnostic { .. }));
        assert!(err.to_string().contains("--diagnostic-path"));
    }

    #[test]
    fn test_continuous_truncates_to_whole_batches() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.log");
        let config = GenerationConfig {
            mode: RunMode::Continuous {
                rate: 30,
                window: Duration::from_millis(1),
            },
            diagnostic_path: dir.path().join("run.tlog"),
            ..file_config(SinkKind::Plain, &output, 100)
        };

        let summary = generate(config).unwrap();

        assert_eq!(summary.records_emitted, 90);
        assert_eq!(read_lines(&output).len(), 90);
    }

    #[test]
    fn test_clock_advances_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(SinkKind::Plain, &dir.path().join("unused.log"), 0);
        let mut generator = LogGenerator::new(config);

        assert_eq!(generator.state(), RunState::Idle);
        assert_eq!(generator.clock(), start());
        generator.next_record();
        generator.next_record();
        assert_eq!(generator.clock(), start() + chrono::Duration::seconds(2));
    }

    #[test]
    fn test_same_seed_same_output() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.log");
        let b = dir.path().join("b.log");

        generate(file_config(SinkKind::Plain, &a, 64)).unwrap();
        generate(file_config(SinkKind::Plain, &b, 64)).unwrap();

        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn test_set_seed_resets_stream() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(SinkKind::Plain, &dir.path().join("unused.log"), 0);
        let mut generator = LogGenerator::new(config.clone());
        let first = generator.next_record();

        let mut other = LogGenerator::new(GenerationConfig {
            seed: Some(999),
            interval: Duration::ZERO,
            ..config
        });
        other.set_seed(Some(1234));
        // clock did not move, so only the seed decides the content
        assert_eq!(other.next_record(), first);
    }
}
