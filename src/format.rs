// src/format.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record formats
//!
//! [`LogFormat`] is the closed set of record layouts the generator can emit.
//! Each variant renders one single-line record from a simulated timestamp, a
//! payload length hint, and an RNG for field values. Rendering holds no state
//! between calls.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use rand::Rng;
use serde_json::json;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::fake;

/// Supported record layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogFormat {
    /// Apache Common Log Format
    #[default]
    ApacheCommon,
    /// Apache Combined Log Format (common + referer + user agent)
    ApacheCombined,
    /// Apache error log
    ApacheError,
    /// BSD syslog, RFC 3164
    Rfc3164,
    /// IETF syslog, RFC 5424
    Rfc5424,
    /// NCSA common log
    CommonLog,
    /// One JSON object per line
    Json,
    /// Spring Boot default console layout
    SpringBoot,
}

impl LogFormat {
    pub const ALL: [LogFormat; 8] = [
        LogFormat::ApacheCommon,
        LogFormat::ApacheCombined,
        LogFormat::ApacheError,
        LogFormat::Rfc3164,
        LogFormat::Rfc5424,
        LogFormat::CommonLog,
        LogFormat::Json,
        LogFormat::SpringBoot,
    ];

    /// Identifiers accepted on the command line, in [`LogFormat::ALL`] order
    pub const NAMES: [&'static str; 8] = [
        "apache_common",
        "apache_combined",
        "apache_error",
        "rfc3164",
        "rfc5424",
        "common_log",
        "json",
        "spring_boot",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::ApacheCommon => "apache_common",
            LogFormat::ApacheCombined => "apache_combined",
            LogFormat::ApacheError => "apache_error",
            LogFormat::Rfc3164 => "rfc3164",
            LogFormat::Rfc5424 => "rfc5424",
            LogFormat::CommonLog => "common_log",
            LogFormat::Json => "json",
            LogFormat::SpringBoot => "spring_boot",
        }
    }

    /// Whether the payload length hint changes this format's output
    pub fn uses_length(&self) -> bool {
        matches!(
            self,
            LogFormat::ApacheError
                | LogFormat::Rfc3164
                | LogFormat::Rfc5424
                | LogFormat::SpringBoot
        )
    }

    /// Render one record stamped with `timestamp`
    ///
    /// `length` sizes the free-text message of formats that carry one; other
    /// formats ignore it. The returned line never contains a terminator.
    pub fn render<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        timestamp: &DateTime<FixedOffset>,
        length: usize,
    ) -> String {
        match self {
            LogFormat::ApacheCommon | LogFormat::CommonLog => common_log(rng, timestamp),
            LogFormat::ApacheCombined => apache_combined(rng, timestamp),
            LogFormat::ApacheError => apache_error(rng, timestamp, length),
            LogFormat::Rfc3164 => rfc3164(rng, timestamp, length),
            LogFormat::Rfc5424 => rfc5424(rng, timestamp, length),
            LogFormat::Json => json_log(rng, timestamp),
            LogFormat::SpringBoot => spring_boot(rng, timestamp, length),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LogFormat::NAMES
            .iter()
            .position(|name| *name == s)
            .map(|idx| LogFormat::ALL[idx])
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

fn common_log<R: Rng + ?Sized>(rng: &mut R, t: &DateTime<FixedOffset>) -> String {
    format!(
        "{} - {} [{}] \"{} {} {}\" {} {}",
        fake::ipv4(rng),
        fake::user_identifier(rng),
        t.format(COMMON_LOG_TIME),
        fake::http_method(rng),
        fake::request_path(rng),
        fake::http_version(rng),
        fake::http_status(rng),
        fake::response_bytes(rng),
    )
}

fn apache_combined<R: Rng + ?Sized>(rng: &mut R, t: &DateTime<FixedOffset>) -> String {
    let common = common_log(rng, t);
    format!(
        "{} \"{}\" \"{}\"",
        common,
        fake::url(rng),
        fake::user_agent(rng)
    )
}

fn apache_error<R: Rng + ?Sized>(rng: &mut R, t: &DateTime<FixedOffset>, length: usize) -> String {
    const LEVELS: &[&str] = &[
        "emerg", "alert", "crit", "error", "warn", "notice", "info", "debug",
    ];
    let level = LEVELS[rng.random_range(0..LEVELS.len())];
    format!(
        "[{}] [{}:{}] [pid {}:tid {}] [client {}:{}] {}",
        t.format(APACHE_ERROR_TIME),
        fake::word(rng),
        level,
        fake::pid(rng),
        fake::pid(rng),
        fake::ipv4(rng),
        fake::port(rng),
        fake::message(rng, length),
    )
}

/// `<PRI>` header value: facility * 8 + severity
fn priority<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.random_range(0..=23u8) * 8 + rng.random_range(0..=7u8)
}

fn rfc3164<R: Rng + ?Sized>(rng: &mut R, t: &DateTime<FixedOffset>, length: usize) -> String {
    format!(
        "<{}>{} {} {}[{}]: {}",
        priority(rng),
        t.format(RFC3164_TIME),
        fake::domain(rng),
        fake::word(rng),
        fake::pid(rng),
        fake::message(rng, length),
    )
}

fn rfc5424<R: Rng + ?Sized>(rng: &mut R, t: &DateTime<FixedOffset>, length: usize) -> String {
    // VERSION is always 1; STRUCTURED-DATA is the NILVALUE
    format!(
        "<{}>1 {} {} {} {} ID{} - {}",
        priority(rng),
        t.to_rfc3339_opts(SecondsFormat::Millis, false),
        fake::domain(rng),
        fake::word(rng),
        fake::pid(rng),
        rng.random_range(0..1000u16),
        fake::message(rng, length),
    )
}

fn json_log<R: Rng + ?Sized>(rng: &mut R, t: &DateTime<FixedOffset>) -> String {
    json!({
        "host": fake::ipv4(rng),
        "user-identifier": fake::user_identifier(rng),
        "datetime": t.format(COMMON_LOG_TIME).to_string(),
        "method": fake::http_method(rng),
        "request": fake::request_path(rng),
        "protocol": fake::http_version(rng),
        "status": fake::http_status(rng),
        "bytes": fake::response_bytes(rng),
        "referer": fake::url(rng),
    })
    .to_string()
}

fn spring_boot<R: Rng + ?Sized>(rng: &mut R, t: &DateTime<FixedOffset>, length: usize) -> String {
    const LEVELS: &[&str] = &["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
    const THREADS: &[&str] = &[
        "main",
        "http-nio-8080-exec-1",
        "http-nio-8080-exec-7",
        "scheduling-1",
        "task-3",
    ];
    let level = LEVELS[rng.random_range(0..LEVELS.len())];
    let thread = THREADS[rng.random_range(0..THREADS.len())];
    let pid = fake::pid(rng);
    let logger = format!("com.{}.{}.Service", fake::word(rng), fake::word(rng));
    format!(
        "{} {:>5} {} --- [{:>15}] {:<40} : {}",
        t.format(SPRING_BOOT_TIME),
        level,
        pid,
        thread,
        logger,
        fake::message(rng, length),
    )
}
