//! Logging
//!
//! `tracing` subscriber setup. The TUI owns the terminal, so interactive runs
//! only log to a file (daily rolling under `./.coursewise/logs/` with
//! `--debug`, or the configured `logging.file`). One-shot commands may also
//! log to stderr.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "coursewise.log";

/// Default log directory: `./.coursewise/logs`
pub fn default_log_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".coursewise")
        .join("logs")
}

/// Logging options assembled from CLI flags and config
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug_mode: bool,
    pub console: bool,
    pub level: String,
    pub log_dir: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            debug_mode: false,
            console: false,
            level: "info".to_string(),
            log_dir: default_log_dir(),
            log_file: None,
        }
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    /// Allow logging to stderr (never set while the TUI is running)
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = dir;
        self
    }

    pub fn with_log_file(mut self, file: Option<PathBuf>) -> Self {
        self.log_file = file;
        self
    }

    fn filter(&self) -> EnvFilter {
        let level = if self.debug_mode { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("coursewise={},warn", level)))
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the global subscriber.
///
/// Returns the appender guard when logging to a file; keep it alive for the
/// life of the program or buffered lines are lost.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = config.filter();

    let file_target = if config.debug_mode {
        fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;
        Some(tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX))
    } else if let Some(ref file) = config.log_file {
        let dir = file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let name = file
            .file_name()
            .context("logging.file must name a file")?;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {:?}", dir))?;
        Some(tracing_appender::rolling::never(dir, name))
    } else {
        None
    };

    if let Some(appender) = file_target {
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(Some(guard));
    }

    if config.console {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    Ok(None)
}

/// Newest log file in the default log directory
pub fn get_log_path() -> Option<PathBuf> {
    newest_log_in(&default_log_dir())
}

fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX))
}

fn newest_log_in(dir: &Path) -> Option<PathBuf> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| is_log_file(&entry.path()))
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

/// Count and total size of the log files in a directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogStats {
    pub files: usize,
    pub bytes: u64,
}

impl LogStats {
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

/// `None` when the directory does not exist
pub fn log_stats_in(dir: &Path) -> Result<Option<LogStats>> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut stats = LogStats::default();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !is_log_file(&entry.path()) {
            continue;
        }
        stats.files += 1;
        stats.bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
    }
    Ok(Some(stats))
}

/// Last `count` lines of a log file
pub fn tail_lines(path: &Path, count: usize) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let lines: Vec<&str> = contents.lines().collect();
    let start = lines.len().saturating_sub(count);
    Ok(lines[start..].iter().map(|l| l.to_string()).collect())
}

/// Remove log files older than `max_age_days` from the default directory
pub fn cleanup_old_logs(max_age_days: u64) -> Result<usize> {
    cleanup_old_logs_in(&default_log_dir(), max_age_days)
}

/// Remove log files in `dir` last modified before now minus `max_age_days`
pub fn cleanup_old_logs_in(dir: &Path, max_age_days: u64) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    // an age reaching past the representable range keeps every file
    let Some(cutoff) = i64::try_from(max_age_days)
        .ok()
        .and_then(TimeDelta::try_days)
        .and_then(|age| Utc::now().checked_sub_signed(age))
    else {
        tracing::debug!("Log age of {} days predates any file, nothing to clean", max_age_days);
        return Ok(0);
    };
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !is_log_file(&path) {
            continue;
        }

        let modified: DateTime<Utc> = entry.metadata()?.modified()?.into();
        if modified < cutoff {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove old log: {:?}", path))?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new()
            .with_debug_mode(true)
            .with_console(true)
            .with_level("warn")
            .with_log_dir(PathBuf::from("/tmp/cw-logs"));
        assert!(config.debug_mode);
        assert!(config.console);
        assert_eq!(config.level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/cw-logs"));
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let removed = cleanup_old_logs_in(&dir.path().join("absent"), 7).unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_cleanup_keeps_fresh_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("coursewise.log.2026-10-18"), "fresh").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a log").unwrap();

        let removed = cleanup_old_logs_in(dir.path(), 7).unwrap();
        assert_eq!(removed, 0);
        assert!(dir.path().join("coursewise.log.2026-10-18").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_cleanup_zero_days_removes_logs_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("coursewise.log.2026-10-01"), "old").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a log").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));

        let removed = cleanup_old_logs_in(dir.path(), 0).unwrap();
        assert_eq!(removed, 1);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_cleanup_huge_age_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("coursewise.log.2026-10-01"), "old").unwrap();

        for days in [200_000_000_000_000, i64::MAX as u64 + 1, u64::MAX] {
            assert_eq!(cleanup_old_logs_in(dir.path(), days).unwrap(), 0);
        }
        assert!(dir.path().join("coursewise.log.2026-10-01").exists());
    }

    #[test]
    fn test_log_stats_count_log_files_only() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(log_stats_in(&dir.path().join("absent")).unwrap(), None);

        fs::write(dir.path().join("coursewise.log.2026-10-17"), "abc").unwrap();
        fs::write(dir.path().join("coursewise.log.2026-10-18"), "de").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let stats = log_stats_in(dir.path()).unwrap().unwrap();
        assert_eq!(stats, LogStats { files: 2, bytes: 5 });
    }

    #[test]
    fn test_tail_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursewise.log");
        fs::write(&path, "one\ntwo\nthree\n").unwrap();

        assert_eq!(tail_lines(&path, 2).unwrap(), vec!["two", "three"]);
        assert_eq!(tail_lines(&path, 10).unwrap().len(), 3);
        assert!(tail_lines(&dir.path().join("absent"), 1).is_err());
    }

    #[test]
    fn test_newest_log_in() {
        let dir = tempfile::tempdir().unwrap();
        assert!(newest_log_in(dir.path()).is_none());

        fs::write(dir.path().join("coursewise.log.2026-10-17"), "a").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(dir.path().join("coursewise.log.2026-10-18"), "b").unwrap();

        let newest = newest_log_in(dir.path()).unwrap();
        assert!(newest.ends_with("coursewise.log.2026-10-18"));
    }
}
