use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn log_entry(&self, path: &Path, is_directory: bool, status: &str) -> Result<()>;
    fn log_search_summary(&self, summary: &SearchLogSummary<'_>) -> Result<()>;
}

/// 一次搜索的日志摘要
#[derive(Debug, Clone, Copy)]
pub struct SearchLogSummary<'a> {
    pub query: &'a str,
    pub scanned: u64,
    pub matched: usize,
    pub skipped: u64,
    pub duration: Duration,
    pub cancelled: bool,
}

/// 调试日志记录器（记录搜索参数、匹配项和搜索摘要）
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    log_path: Option<PathBuf>,
    enabled: bool,
}

impl Logger {
    /// 在当前目录创建日志记录器
    pub fn new(enabled: bool) -> Result<Self> {
        Self::in_dir(enabled, Path::new("."))
    }

    /// 不写文件的日志记录器
    pub fn disabled() -> Self {
        Self {
            log_file: Arc::new(Mutex::new(None)),
            log_path: None,
            enabled: false,
        }
    }

    /// 在指定目录创建日志记录器
    pub fn in_dir(enabled: bool, dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self::disabled());
        }

        // 获取当前时间作为文件名的一部分
        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let log_path = dir.join(format!("file_finder_debug_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Cannot create log file: {}", log_path.display()))?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# File Finder debug log")?;
        writeln!(file_clone, "# Started: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# --------------------------------------------")?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            log_path: Some(log_path),
            enabled: true,
        })
    }

    /// 日志文件路径（未启用时为 None）
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    fn write_line(&self, line: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {}", timestamp, line)?;
                file.flush()?;
            }
        }

        Ok(())
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.write_line(message)
    }

    fn log_entry(&self, path: &Path, is_directory: bool, status: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let kind = if is_directory { "dir" } else { "file" };
        self.write_line(&format!("{} | {} | {}", kind, path.display(), status))
    }

    fn log_search_summary(&self, summary: &SearchLogSummary<'_>) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# --------------------------------------------")?;
                writeln!(file, "# Search finished: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
                writeln!(file, "# Query: {:?}", summary.query)?;
                writeln!(file, "# Elapsed: {:.3}s", summary.duration.as_secs_f64())?;
                writeln!(file, "# Entries scanned: {}", summary.scanned)?;
                writeln!(file, "# Matches: {}", summary.matched)?;
                writeln!(file, "# Skipped: {}", summary.skipped)?;
                if summary.cancelled {
                    writeln!(file, "# Cancelled by user")?;
                }
                file.flush()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_logger_creation() {
        let logger = Logger::new(false).unwrap();
        assert!(!logger.is_enabled());
        assert!(logger.log_path().is_none());

        let temp_dir = tempdir().unwrap();
        let logger = Logger::in_dir(true, temp_dir.path()).unwrap();
        assert!(logger.is_enabled());
        assert!(logger.log_path().unwrap().exists());
    }

    #[test]
    fn test_logger_trait() {
        let temp_dir = tempdir().unwrap();
        let logger = Logger::in_dir(true, temp_dir.path()).unwrap();
        let logger_trait: &dyn LoggerTrait = &logger;

        assert!(logger_trait.is_enabled());
        logger_trait.log_message("test message").unwrap();
        logger_trait
            .log_entry(Path::new("/tmp/report.txt"), false, "matched")
            .unwrap();
        logger_trait
            .log_search_summary(&SearchLogSummary {
                query: "report",
                scanned: 12,
                matched: 1,
                skipped: 0,
                duration: Duration::from_millis(40),
                cancelled: false,
            })
            .unwrap();

        let content = fs::read_to_string(logger.log_path().unwrap()).unwrap();
        assert!(content.contains("test message"));
        assert!(content.contains("file | /tmp/report.txt | matched"));
        assert!(content.contains("# Entries scanned: 12"));
    }

    #[test]
    fn test_disabled_logger_is_silent() {
        let logger = Logger::disabled();
        assert!(logger.log_message("ignored").is_ok());
        assert!(logger.log_entry(Path::new("x"), true, "ignored").is_ok());
    }
}
