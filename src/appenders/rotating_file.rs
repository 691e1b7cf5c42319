//! Rotating file destination
//!
//! The appender itself is a thin adapter over a [`RotationSink`]: anything that
//! accepts raw bytes and can be closed. [`RotatingFile`] is the default sink.
//! It rotates on size, keeps a bounded number of timestamped backups, drops
//! backups past a maximum age and can gzip rotated files.

use super::{Appender, Line};
use crate::core::error::{LoggerError, Result};
use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

const MEGABYTE: u64 = 1024 * 1024;
/// Size threshold used when none is configured.
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
/// Timestamp embedded in backup file names.
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const BACKUP_TIME_LEN: usize = 23;
const COMPRESS_SUFFIX: &str = ".gz";

/// A byte sink that owns a closable file resource.
pub trait RotationSink: Write + Send {
    /// Flush and release the underlying handle.
    fn close(&mut self) -> io::Result<()>;

    /// Human readable name used in error messages.
    fn describe(&self) -> String {
        "rotation sink".to_string()
    }
}

/// Sink shared between the fan-out and the logger that closes it.
pub type SharedRotationSink = Arc<Mutex<Box<dyn RotationSink>>>;

/// Configuration for [`RotatingFile`]
///
/// # Examples
///
/// ```
/// use logo::appenders::rotating_file::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(10)
///     .with_max_backups(3)
///     .with_max_age_days(30)
///     .with_compression(true);
/// assert_eq!(policy.max_size_bytes, 10 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate before a write would push the file past this size
    pub max_size_bytes: u64,
    /// Maximum number of backups to keep, 0 keeps all
    pub max_backups: usize,
    /// Backups older than this are removed, `None` keeps all
    pub max_age: Option<Duration>,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backups: 0,
            max_age: None,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size threshold in megabytes; 0 selects the default.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(self, size_mb: u64) -> Self {
        let size_mb = if size_mb == 0 { DEFAULT_MAX_SIZE_MB } else { size_mb };
        self.with_max_size(size_mb.saturating_mul(MEGABYTE))
    }

    /// Set the size threshold in bytes
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_size_bytes = size.max(1);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    /// Set the maximum backup age in days; 0 disables age-based removal.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age = (days > 0).then(|| Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY)));
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Size-rotated log file
///
/// The file is opened lazily on the first write, creating missing parent
/// directories. Writing after [`RotationSink::close`] reopens it.
///
/// # Examples
///
/// ```no_run
/// use logo::appenders::RotatingFile;
/// use std::io::Write;
///
/// // 10 MB files, 3 backups, 30 days, compressed
/// let mut file = RotatingFile::new("/var/log/app.log", 10, 3, 30, true);
/// file.write_all(b"level=INFO msg=started\n").unwrap();
/// ```
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    current_size: u64,
}

impl RotatingFile {
    pub fn new(
        path: impl Into<PathBuf>,
        max_size_mb: u64,
        max_backups: usize,
        max_age_days: u64,
        compress: bool,
    ) -> Self {
        let policy = RotationPolicy::new()
            .with_max_size_mb(max_size_mb)
            .with_max_backups(max_backups)
            .with_max_age_days(max_age_days)
            .with_compression(compress);
        Self::with_policy(path, policy)
    }

    pub fn with_policy(path: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            file: None,
            current_size: 0,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Size of the active file as tracked by this sink
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Open the active file for a write of `incoming` bytes, rotating first
    /// if the existing file has no room left.
    fn open_for_write(&mut self, incoming: u64) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let existing = match fs::metadata(&self.path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.open_new(),
            Err(e) => return Err(e),
        };

        if existing + incoming > self.policy.max_size_bytes {
            return self.rotate();
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        self.file = Some(file);
        self.current_size = existing;
        Ok(())
    }

    fn open_new(&mut self) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.file = Some(file);
        self.current_size = 0;
        Ok(())
    }

    /// Move the active file to a backup, start a fresh one and prune.
    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        if self.path.exists() {
            let backup = self.backup_path();
            fs::rename(&self.path, &backup)?;

            if self.policy.compress {
                if let Err(e) = compress_file(&backup) {
                    eprintln!(
                        "[WARN] Failed to compress rotated log {}: {}",
                        backup.display(),
                        e
                    );
                }
            }
        }

        self.open_new()?;
        self.prune_backups();
        Ok(())
    }

    fn name_parts(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app")
            .to_string();
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        (stem, ext)
    }

    /// Backup path for a rotation happening now: `<stem>-<time><ext>`.
    fn backup_path(&self) -> PathBuf {
        let (stem, ext) = self.name_parts();
        let stamp = Local::now().format(BACKUP_TIME_FORMAT).to_string();

        let mut candidate = self.path.with_file_name(format!("{}-{}{}", stem, stamp, ext));
        let mut n = 1;
        while candidate.exists() || gz_path(&candidate).exists() {
            candidate = self
                .path
                .with_file_name(format!("{}-{}-{}{}", stem, stamp, n, ext));
            n += 1;
        }
        candidate
    }

    /// Backups belonging to this file, newest first.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let (stem, ext) = self.name_parts();
        let prefix = format!("{}-", stem);

        let mut found: Vec<((String, u32), PathBuf)> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let rest = rest.strip_suffix(COMPRESS_SUFFIX).unwrap_or(rest);
            let Some(stamp) = rest.strip_suffix(ext.as_str()) else {
                continue;
            };
            if let Some(order) = parse_backup_stamp(stamp) {
                found.push((order, entry.path()));
            }
        }

        found.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }

    /// Remove backups beyond the configured count or age.
    fn prune_backups(&self) {
        let backups = match self.backups() {
            Ok(backups) => backups,
            Err(e) => {
                eprintln!(
                    "[WARN] Failed to list backups for {}: {}",
                    self.path.display(),
                    e
                );
                return;
            }
        };

        let now = SystemTime::now();
        for (idx, backup) in backups.iter().enumerate() {
            let over_count = self.policy.max_backups > 0 && idx >= self.policy.max_backups;
            let too_old = self.policy.max_age.is_some_and(|max_age| {
                fs::metadata(backup)
                    .and_then(|m| m.modified())
                    .ok()
                    .and_then(|modified| now.duration_since(modified).ok())
                    .is_some_and(|age| age > max_age)
            });

            if over_count || too_old {
                if let Err(e) = fs::remove_file(backup) {
                    eprintln!(
                        "[WARN] Failed to remove old backup {}: {}",
                        backup.display(),
                        e
                    );
                }
            }
        }
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = buf.len() as u64;
        if incoming > self.policy.max_size_bytes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write of {} bytes exceeds maximum file size {}",
                    incoming, self.policy.max_size_bytes
                ),
            ));
        }

        if self.file.is_none() {
            self.open_for_write(incoming)?;
        } else if self.current_size + incoming > self.policy.max_size_bytes {
            self.rotate()?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "log file not open"))?;
        let written = file.write(buf)?;
        self.current_size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl RotationSink for RotatingFile {
    fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl Drop for RotatingFile {
    fn drop(&mut self) {
        // Best effort flush - ignore errors during drop
        let _ = self.close();
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(COMPRESS_SUFFIX);
    PathBuf::from(name)
}

/// Sort key of a backup name: its timestamp and collision counter.
fn parse_backup_stamp(stamp: &str) -> Option<(String, u32)> {
    let ts = stamp.get(..BACKUP_TIME_LEN)?;
    NaiveDateTime::parse_from_str(ts, BACKUP_TIME_FORMAT).ok()?;

    let counter = match &stamp[BACKUP_TIME_LEN..] {
        "" => 0,
        rest => rest.strip_prefix('-')?.parse().ok()?,
    };
    Some((ts.to_string(), counter))
}

/// Compress a rotated file to `<path>.gz`.
///
/// The original is removed only after the compressed copy is complete.
fn compress_file(path: &Path) -> io::Result<()> {
    use std::io::{BufReader, BufWriter};

    let gz = gz_path(path);
    let mut tmp = gz.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = (|| -> io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&tmp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&tmp, &gz)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

/// Appender writing lines into a shared [`RotationSink`].
pub struct RotatingFileWriter {
    sink: SharedRotationSink,
    name: String,
}

impl RotatingFileWriter {
    pub fn new(sink: SharedRotationSink) -> Self {
        let name = sink.lock().describe();
        Self { sink, name }
    }

    /// Wrap a sink, returning the appender and the handle used to close it.
    pub fn shared(sink: impl RotationSink + 'static) -> (Self, SharedRotationSink) {
        let boxed: Box<dyn RotationSink> = Box::new(sink);
        let shared = Arc::new(Mutex::new(boxed));
        (Self::new(Arc::clone(&shared)), shared)
    }
}

impl Appender for RotatingFileWriter {
    fn append(&mut self, line: &Line<'_>) -> Result<usize> {
        self.sink.lock().write_all(line.bytes).map_err(|e| {
            LoggerError::file_appender(&self.name, format!("Failed to write log entry: {}", e))
        })?;
        Ok(line.bytes.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.sink
            .lock()
            .flush()
            .map_err(|e| LoggerError::file_appender(&self.name, format!("Failed to flush: {}", e)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
