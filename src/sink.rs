// src/sink.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output destinations for generated records
//!
//! A [`Sink`] hides the difference between standard output, a plain file, and
//! a gzip-compressed file behind `append` + `close`. `close` consumes the sink,
//! so a sink can be closed at most once.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::constants::SINK_BUFFER_SIZE;
use crate::error::{Error, Result};

/// Destination kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SinkKind {
    /// Process standard output
    #[default]
    Console,
    /// Uncompressed file, truncated on open
    Plain,
    /// Gzip stream over a file, truncated on open
    Compressed,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Console => "stdout",
            SinkKind::Plain => "log",
            SinkKind::Compressed => "gz",
        }
    }

    pub fn is_console(&self) -> bool {
        *self == SinkKind::Console
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stdout" | "console" => Ok(SinkKind::Console),
            "log" | "plain" => Ok(SinkKind::Plain),
            "gz" | "gzip" => Ok(SinkKind::Compressed),
            other => Err(Error::UnknownSinkKind(other.to_string())),
        }
    }
}

/// An open destination
pub enum Sink {
    Console(io::Stdout),
    Plain {
        path: PathBuf,
        file: BufWriter<File>,
    },
    Compressed {
        path: PathBuf,
        encoder: GzEncoder<BufWriter<File>>,
    },
}

impl Sink {
    /// Open a sink of `kind`; `path` is ignored for the console
    pub fn open(kind: SinkKind, path: &Path) -> Result<Sink> {
        let create = || {
            File::create(path)
                .map(|file| BufWriter::with_capacity(SINK_BUFFER_SIZE, file))
                .map_err(|source| Error::OpenSink {
                    path: path.to_path_buf(),
                    source,
                })
        };

        let sink = match kind {
            SinkKind::Console => Sink::Console(io::stdout()),
            SinkKind::Plain => Sink::Plain {
                path: path.to_path_buf(),
                file: create()?,
            },
            SinkKind::Compressed => Sink::Compressed {
                path: path.to_path_buf(),
                encoder: GzEncoder::new(create()?, Compression::default()),
            },
        };

        tracing::debug!("Opened {} sink at {}", kind, path.display());
        Ok(sink)
    }

    pub fn kind(&self) -> SinkKind {
        match self {
            Sink::Console(_) => SinkKind::Console,
            Sink::Plain { .. } => SinkKind::Plain,
            Sink::Compressed { .. } => SinkKind::Compressed,
        }
    }

    /// Backing file, `None` for the console
    pub fn path(&self) -> Option<&Path> {
        match self {
            Sink::Console(_) => None,
            Sink::Plain { path, .. } | Sink::Compressed { path, .. } => Some(path.as_path()),
        }
    }

    /// Append raw bytes
    pub fn append(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write_all(buf)
    }

    /// Flush and release the destination
    ///
    /// The console is flushed but left open. A compressed sink writes its
    /// gzip trailer before the underlying file is flushed and dropped.
    pub fn close(self) -> Result<()> {
        match self {
            Sink::Console(mut stdout) => stdout.flush().map_err(|source| Error::CloseSink {
                path: PathBuf::from("<stdout>"),
                source,
            }),
            Sink::Plain { path, mut file } => {
                file.flush().map_err(|source| Error::CloseSink { path, source })
            }
            Sink::Compressed { path, encoder } => {
                let finished = encoder.finish().and_then(|mut file| file.flush());
                finished.map_err(|source| Error::CloseSink { path, source })
            }
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Console(stdout) => stdout.write(buf),
            Sink::Plain { file, .. } => file.write(buf),
            Sink::Compressed { encoder, .. } => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Console(stdout) => stdout.flush(),
            Sink::Plain { file, .. } => file.flush(),
            Sink::Compressed { encoder, .. } => encoder.flush(),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("kind", &self.kind())
            .field("path", &self.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::MultiGzDecoder;
    use std::io::Read;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("stdout".parse::<SinkKind>().unwrap(), SinkKind::Console);
        assert_eq!("log".parse::<SinkKind>().unwrap(), SinkKind::Plain);
        assert_eq!("gz".parse::<SinkKind>().unwrap(), SinkKind::Compressed);
        let err = "s3".parse::<SinkKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownSinkKind(ref s) if s == "s3"));
        assert!(err.is_config());
    }

    #[test]
    fn test_plain_truncates_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        std::fs::write(&path, "stale contents that must disappear\n").unwrap();

        let mut sink = Sink::open(SinkKind::Plain, &path).unwrap();
        assert_eq!(sink.kind(), SinkKind::Plain);
        assert_eq!(sink.path(), Some(path.as_path()));
        sink.append(b"first\n").unwrap();
        sink.append(b"second\n").unwrap();
        sink.close().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_compressed_close_produces_valid_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log.gz");

        let mut sink = Sink::open(SinkKind::Compressed, &path).unwrap();
        for i in 0..1000 {
            sink.append(format!("line {i}\n").as_bytes()).unwrap();
        }
        sink.close().unwrap();

        let mut decoded = String::new();
        MultiGzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded.lines().count(), 1000);
        assert_eq!(decoded.lines().last(), Some("line 999"));
    }

    #[test]
    fn test_empty_sink_still_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("empty.log");
        let gz = dir.path().join("empty.gz");

        Sink::open(SinkKind::Plain, &plain).unwrap().close().unwrap();
        Sink::open(SinkKind::Compressed, &gz).unwrap().close().unwrap();

        assert_eq!(std::fs::metadata(&plain).unwrap().len(), 0);
        let mut decoded = Vec::new();
        MultiGzDecoder::new(File::open(&gz).unwrap())
            .read_to_end(&mut decoded)
            .unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_console_close_keeps_stdout_open() {
        let mut sink = Sink::open(SinkKind::Console, Path::new("ignored.log")).unwrap();
        assert_eq!(sink.path(), None);
        sink.append(b"").unwrap();
        sink.close().unwrap();

        let mut stdout = io::stdout();
        writeln!(stdout, "stdout still writable after console sink closed").unwrap();
        stdout.flush().unwrap();
        assert!(!Path::new("ignored.log").exists());
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.log");
        let err = Sink::open(SinkKind::Plain, &path).unwrap_err();
        assert!(matches!(err, Error::OpenSink { .. }));
        assert!(!err.is_config());
    }
}
