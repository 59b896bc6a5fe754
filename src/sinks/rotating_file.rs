//! Size-rotated, buffered file sink
//!
//! Lines go to a buffered file named `<prefix>.<YYYYMMDD-HHMMSS>.<seq>.log`.
//! When the next record would push the file past its size limit, the file is
//! flushed and closed and a new one with the next sequence number is opened,
//! all under the same lock that serializes writes. A background thread
//! flushes the buffer on a fixed interval until the sink is shut down.

use crate::core::format::record_header;
use crate::core::{Result, Sink, VlogError};
use chrono::{DateTime, Local};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Size limit and flushing behavior of a [`RotatingFileSink`]
///
/// # Examples
///
/// ```
/// use rust_vlog::RotationConfig;
/// use std::time::Duration;
///
/// let config = RotationConfig::new()
///     .with_max_bytes(64 * 1024 * 1024)
///     .with_flush_interval(Duration::from_secs(5));
/// assert_eq!(config.record_overhead, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Size after which the next record goes to a new file
    pub max_bytes_per_file: u64,
    /// Interval of the background flush
    #[serde(rename = "flush_interval_ms", with = "duration_millis")]
    pub flush_interval: Duration,
    /// Bytes accounted per record on top of the line itself, covering the
    /// timestamp header and newline
    pub record_overhead: u64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_bytes_per_file: 1 << 30, // 1 GiB
            flush_interval: Duration::from_secs(29),
            record_overhead: 50,
        }
    }
}

impl RotationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes_per_file = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_record_overhead(mut self, overhead: u64) -> Self {
        self.record_overhead = overhead;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.flush_interval.is_zero() {
            return Err(VlogError::config(
                format!("{:?}", self.flush_interval),
                "flush interval must be greater than zero",
            ));
        }
        Ok(())
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// The file currently written to
struct ActiveFile {
    prefix: PathBuf,
    path: PathBuf,
    writer: BufWriter<File>,
    sequence: u64,
    bytes_written: u64,
}

impl ActiveFile {
    fn open(prefix: PathBuf) -> Result<Self> {
        if let Some(parent) = prefix.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| VlogError::file_open(parent.display().to_string(), e))?;
        }
        let path = log_file_path(&prefix, &Local::now(), 0);
        let file =
            create_log_file(&path).map_err(|e| VlogError::file_open(path.display().to_string(), e))?;
        Ok(Self {
            prefix,
            path,
            writer: BufWriter::new(file),
            sequence: 0,
            bytes_written: 0,
        })
    }

    /// Switch to the next sequence number. On failure the current file stays
    /// active and untouched.
    fn rotate(&mut self) -> Result<()> {
        let sequence = self.sequence + 1;
        let path = log_file_path(&self.prefix, &Local::now(), sequence);
        let file = create_log_file(&path)
            .map_err(|e| VlogError::file_rotation(path.display().to_string(), e))?;

        if let Err(e) = self.writer.flush() {
            eprintln!(
                "[VLOG WARN] Failed to flush {} before rotation: {}",
                self.path.display(),
                e
            );
        }
        // Replacing the writer drops, and so closes, the previous file
        self.writer = BufWriter::new(file);
        self.path = path;
        self.sequence = sequence;
        self.bytes_written = 0;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| {
            VlogError::io_operation(
                "flushing log file",
                format!("Failed to flush '{}'", self.path.display()),
                e,
            )
        })
    }
}

/// `<prefix>.<YYYYMMDD-HHMMSS>.<sequence:02>.log`
pub fn log_file_path(prefix: &Path, created: &DateTime<Local>, sequence: u64) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(format!(".{}.{:02}.log", created.format("%Y%m%d-%H%M%S"), sequence));
    PathBuf::from(name)
}

fn create_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

struct Flusher {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Flusher {
    fn spawn(active: Weak<Mutex<ActiveFile>>, interval: Duration) -> Result<Self> {
        let (stop, stopped) = bounded::<()>(0);
        let handle = thread::Builder::new()
            .name("vlog-flusher".to_string())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let Some(active) = active.upgrade() else {
                            break;
                        };
                        if let Err(e) = active.lock().flush() {
                            eprintln!("[VLOG ERROR] Periodic flush failed: {}", e);
                        };
                    }
                    // Stop requested or the sink is gone
                    _ => break,
                }
            })
            .map_err(|e| {
                VlogError::io_operation("starting flush thread", "thread spawn failed", e)
            })?;
        Ok(Self { stop, handle })
    }

    fn stop(self) {
        drop(self.stop);
        if let Err(e) = self.handle.join() {
            eprintln!("[VLOG ERROR] Flush thread panicked: {:?}", e);
        }
    }
}

/// Rotating file sink.
///
/// # Examples
///
/// ```no_run
/// use rust_vlog::{RotatingFileSink, RotationConfig, Sink};
///
/// let sink = RotatingFileSink::with_config(
///     "/var/log/app/server",
///     RotationConfig::new().with_max_bytes(100 * 1024 * 1024),
/// )
/// .unwrap();
/// sink.log("server started").unwrap();
/// ```
pub struct RotatingFileSink {
    active: Arc<Mutex<ActiveFile>>,
    config: RotationConfig,
    flusher: Mutex<Option<Flusher>>,
}

impl RotatingFileSink {
    /// Create a sink with the default [`RotationConfig`]
    ///
    /// # Errors
    ///
    /// Returns [`VlogError::FileOpen`] if the first file cannot be created.
    pub fn new<P: AsRef<Path>>(prefix: P) -> Result<Self> {
        Self::with_config(prefix, RotationConfig::default())
    }

    /// # Errors
    ///
    /// Returns [`VlogError::FileOpen`] if the first file cannot be created and
    /// [`VlogError::Config`] for a zero flush interval.
    pub fn with_config<P: AsRef<Path>>(prefix: P, config: RotationConfig) -> Result<Self> {
        config.validate()?;
        let active = Arc::new(Mutex::new(ActiveFile::open(prefix.as_ref().to_path_buf())?));
        let flusher = Flusher::spawn(Arc::downgrade(&active), config.flush_interval)?;
        Ok(Self {
            active,
            config,
            flusher: Mutex::new(Some(flusher)),
        })
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        self.active.lock().path.clone()
    }

    /// Sequence number of the current file, starting at 0
    pub fn sequence(&self) -> u64 {
        self.active.lock().sequence
    }

    /// Bytes accounted to the current file
    pub fn bytes_written(&self) -> u64 {
        self.active.lock().bytes_written
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Stop the background flush and flush what is buffered.
    ///
    /// Further lines are still accepted but only reach the file on an
    /// explicit flush, a rotation or drop.
    pub fn shutdown(&self) -> Result<()> {
        if let Some(flusher) = self.flusher.lock().take() {
            flusher.stop();
        }
        self.flush()
    }
}

impl Sink for RotatingFileSink {
    fn log(&self, line: &str) -> Result<()> {
        let incoming = self.config.record_overhead + line.len() as u64;
        let mut active = self.active.lock();

        if active.bytes_written > 0
            && active.bytes_written + incoming > self.config.max_bytes_per_file
        {
            active.rotate()?;
        }

        let header = record_header(&Local::now());
        let active = &mut *active;
        writeln!(active.writer, "{} {}", header, line).map_err(|e| {
            VlogError::io_operation(
                "writing log file",
                format!("Failed to write to '{}'", active.path.display()),
                e,
            )
        })?;
        active.bytes_written += incoming;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.active.lock().flush()
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            eprintln!("[VLOG ERROR] Failed to flush log file on drop: {}", e);
        }
    }
}
