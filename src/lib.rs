// src/lib.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synthetic log generation for exercising log pipelines
//!
//! This library provides:
//! - Eight record layouts (Apache access/error, RFC 3164/5424 syslog, common log, JSON, Spring Boot)
//! - Console, plain-file, and gzip destinations behind one append/close contract
//! - Count-based file splitting (`out.log`, `out1.log`, `out2.log`, ...)
//! - Continuous mode paced to a fixed number of records per second
//! - Seeded Xoshiro256++ content for reproducible output
//!
//! # Example
//! ```rust,no_run
//! use logsynth::{generate, GenerationConfig, LogFormat, SinkKind};
//!
//! let config = GenerationConfig::bounded(LogFormat::Rfc5424, SinkKind::Plain, "syslog.log", 1000);
//! let summary = generate(config)?;
//! assert_eq!(summary.records_emitted, 1000);
//! # Ok::<(), logsynth::Error>(())
//! ```

// Core modules
pub mod config;
pub mod constants;
pub mod error;
pub mod fake;
pub mod format;
pub mod generator;
pub mod sink;

// Re-export main API
pub use config::{GenerationConfig, Options, RunMode};
pub use error::{Error, Result};
pub use format::LogFormat;
pub use generator::{generate, split_file_name, LogGenerator, RunState, RunSummary};
pub use sink::{Sink, SinkKind};
