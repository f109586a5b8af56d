// src/constants.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

/// Default number of records for a bounded run
pub const DEFAULT_NUMBER: u64 = 1000;

/// Default primary output path when writing to a file
pub const DEFAULT_OUTPUT: &str = "generated.log";

/// Side-channel file receiving continuous-mode throughput lines
pub const DEFAULT_DIAGNOSTIC_PATH: &str = "/var/log/logsynth.tlog";

/// Wall-clock window one continuous-mode batch is paced to
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_secs(1);

/// Buffer in front of file-backed sinks (64 KiB)
pub const SINK_BUFFER_SIZE: usize = 64 * 1024;

/// Bounded-mode records between explicit flushes of the primary sink
pub const FLUSH_EVERY_RECORDS: u64 = 1024;

/// Apache access-log / common log timestamp: `02/Jan/2006:15:04:05 -0700`
pub const COMMON_LOG_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Apache error-log timestamp: `Mon Jan 02 15:04:05 2006`
pub const APACHE_ERROR_TIME: &str = "%a %b %d %H:%M:%S %Y";

/// BSD syslog timestamp: `Jan 02 15:04:05`
pub const RFC3164_TIME: &str = "%b %d %H:%M:%S";

/// Spring Boot console timestamp: `2006-01-02 15:04:05.000`
pub const SPRING_BOOT_TIME: &str = "%Y-%m-%d %H:%M:%S%.3f";
