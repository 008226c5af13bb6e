//! Size-bounded rotating file writer
//!
//! Rotated files are renamed to `<file>.1 .. <file>.N` (newest first) and
//! optionally gzip compressed. Backups beyond the count limit or older than
//! the age limit are removed on every rotation.

use crate::core::error::{LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const BYTES_PER_MB: u64 = 1024 * 1024;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Rotation limits for one file
///
/// # Examples
///
/// ```
/// use logtee::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(10)
///     .with_max_backups(3)
///     .with_compression(false);
///
/// assert_eq!(policy.max_bytes, 10 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate once the active file would grow past this many bytes
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep
    pub max_backups: usize,
    /// Rotated files older than this are removed
    pub max_age: Duration,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 100 * BYTES_PER_MB,
            max_backups: 50,
            max_age: Duration::from_secs(7 * SECS_PER_DAY),
            compress: true,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, size_mb: u64) -> Self {
        self.max_bytes = size_mb.saturating_mul(BYTES_PER_MB);
        self
    }

    /// Byte-granular size limit, mostly useful in tests
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age = Duration::from_secs(days.saturating_mul(SECS_PER_DAY));
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// File writer that rolls over by size
///
/// Writes go straight to the file without buffering, so every complete record
/// is on disk as soon as `write` returns.
///
/// # Examples
///
/// ```no_run
/// use logtee::appenders::{RotatingFileWriter, RotationPolicy};
/// use std::io::Write;
///
/// let mut writer = RotatingFileWriter::with_policy(
///     "/var/log/orders.log",
///     RotationPolicy::new().with_max_size_mb(10),
/// ).unwrap();
/// writer.write_all(b"started\n").unwrap();
/// ```
pub struct RotatingFileWriter {
    base_path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    current_size: u64,
    /// Consecutive rotations that failed to remove an expired backup
    deletion_failure_count: usize,
}

impl RotatingFileWriter {
    /// Open `path` for appending with the default policy.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Open `path` for appending, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_file(&base_path)?;

        let mut writer = Self {
            base_path,
            policy,
            file: Some(file),
            current_size,
            deletion_failure_count: 0,
        };
        writer.prune_expired();
        Ok(writer)
    }

    fn open_file(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    fn should_rotate(&self, incoming: usize) -> bool {
        self.current_size > 0 && self.current_size + incoming as u64 > self.policy.max_bytes
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        // Drop whatever sits in the last slot so the shift below cannot
        // grow the backup count
        let oldest = self.backup_path(self.policy.max_backups.max(1));
        let oldest_removed = remove_if_exists(&gz_path(&oldest)) & remove_if_exists(&oldest);
        if oldest_removed {
            self.deletion_failure_count = 0;
        } else {
            const MAX_DELETION_FAILURES: usize = 5;
            self.deletion_failure_count += 1;
            eprintln!(
                "[WARN] Failed to remove oldest backup {} (failure #{}/{})",
                oldest.display(),
                self.deletion_failure_count,
                MAX_DELETION_FAILURES
            );
            if self.deletion_failure_count >= MAX_DELETION_FAILURES {
                return Err(LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!(
                        "Rotation aborted: failed to delete old backup files {} consecutive times",
                        self.deletion_failure_count
                    ),
                ));
            }
        }

        for i in (1..self.policy.max_backups).rev() {
            let old_path = self.backup_path(i);
            let new_path = self.backup_path(i + 1);
            let old_compressed = gz_path(&old_path);

            if old_compressed.exists() {
                rename_replacing(&old_compressed, &gz_path(&new_path))?;
            } else if old_path.exists() {
                rename_replacing(&old_path, &new_path)?;
            }
        }

        if self.policy.max_backups > 0 && self.base_path.exists() {
            let backup_path = self.backup_path(1);
            fs::rename(&self.base_path, &backup_path).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                compress_file(&backup_path)?;
            }
        } else if self.base_path.exists() {
            // No backups kept: truncate in place
            remove_if_exists(&self.base_path);
        }

        let (file, size) = Self::open_file(&self.base_path)?;
        self.file = Some(file);
        self.current_size = size;

        self.prune_expired();
        Ok(())
    }

    /// Remove backups whose modification time is older than the age limit
    fn prune_expired(&mut self) {
        let Some(cutoff) = SystemTime::now().checked_sub(self.policy.max_age) else {
            return;
        };

        for i in 1..=self.policy.max_backups {
            let plain = self.backup_path(i);
            for candidate in [gz_path(&plain), plain] {
                let expired = fs::metadata(&candidate)
                    .and_then(|m| m.modified())
                    .map(|modified| modified < cutoff)
                    .unwrap_or(false);
                if expired {
                    remove_if_exists(&candidate);
                }
            }
        }
    }

    /// Backup file path for the given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rotate(buf.len()) {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[WARN] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.file.is_none() {
                    let (file, size) = Self::open_file(&self.base_path)
                        .map_err(|reopen| io::Error::new(io::ErrorKind::Other, reopen))?;
                    self.file = Some(file);
                    self.current_size = size;
                }

                // Let the file outgrow the limit instead of retrying every write
                self.current_size = 0;
            }
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

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Returns false only when the file exists and could not be removed
fn remove_if_exists(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(_) => false,
    }
}

fn rename_replacing(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    // Some platforms refuse to rename over an existing file
    remove_if_exists(to);
    fs::rename(from, to).map_err(|e| {
        LoggerError::file_rotation(
            from.display().to_string(),
            format!("Failed to rotate backup files: {}", e),
        )
    })
}

/// Gzip `path` into `<path>.gz`, removing the original only on success
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let target = gz_path(path);
    let mut temp = target.clone().into_os_string();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    let compress = || -> io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&temp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&temp, &target)
    };

    if let Err(e) = compress() {
        let _ = fs::remove_file(&temp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
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
