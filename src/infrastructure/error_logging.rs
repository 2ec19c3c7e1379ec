use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorType {
    /// 匹配到的条目无法读取信息（通常是遍历期间被删除）
    Stat,
    /// 目录无法遍历
    Traversal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Stat => "stat",
            ErrorType::Traversal => "traversal",
        }
    }
}

/// 错误日志记录器
///
/// 计数始终保留；启用时同时写入错误日志文件。
pub struct ErrorLogger {
    error_file: Arc<Mutex<Option<File>>>,
    error_path: Option<PathBuf>,
    error_counts: Arc<Mutex<HashMap<ErrorType, usize>>>,
}

impl ErrorLogger {
    /// 在当前目录创建错误日志记录器
    pub fn new(enabled: bool) -> Result<Self> {
        Self::in_dir(enabled, Path::new("."))
    }

    /// 只计数、不写文件的错误日志记录器
    pub fn disabled() -> Self {
        Self {
            error_file: Arc::new(Mutex::new(None)),
            error_path: None,
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 在指定目录创建错误日志记录器
    pub fn in_dir(enabled: bool, dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self::disabled());
        }

        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let error_path = dir.join(format!("file_finder_errors_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)
            .with_context(|| format!("Cannot create error log: {}", error_path.display()))?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# File Finder error log")?;
        writeln!(file_clone, "# Started: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# ============================================")?;
        writeln!(file_clone)?;

        Ok(Self {
            error_file: Arc::new(Mutex::new(Some(file))),
            error_path: Some(error_path),
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// 记录错误
    pub fn log_error(
        &self,
        error_type: ErrorType,
        file_path: Option<&Path>,
        message: &str,
        details: Option<&str>,
    ) -> Result<()> {
        {
            let mut counts = self
                .error_counts
                .lock()
                .map_err(|_| anyhow::anyhow!("error counter lock poisoned"))?;
            *counts.entry(error_type).or_insert(0) += 1;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), message)?;

                if let Some(path) = file_path {
                    writeln!(file, "  path: {}", path.display())?;
                }

                if let Some(detail) = details {
                    writeln!(file, "  details: {}", detail)?;
                }

                writeln!(file)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    /// 获取错误统计信息
    pub fn get_error_summary(&self) -> HashMap<ErrorType, usize> {
        if let Ok(counts) = self.error_counts.lock() {
            counts.clone()
        } else {
            HashMap::new()
        }
    }

    /// 获取总错误数
    pub fn get_total_errors(&self) -> usize {
        if let Ok(counts) = self.error_counts.lock() {
            counts.values().sum()
        } else {
            0
        }
    }

    pub fn has_errors(&self) -> bool {
        self.get_total_errors() > 0
    }

    /// 清空计数，每次搜索开始前调用
    pub fn reset_counts(&self) {
        if let Ok(mut counts) = self.error_counts.lock() {
            counts.clear();
        }
    }

    /// 输出错误摘要
    pub fn write_error_summary<W: Write>(&self, out: &mut W) -> Result<()> {
        if !self.has_errors() {
            return Ok(());
        }

        writeln!(out, "\n⚠️  Some entries were skipped:")?;
        writeln!(out, "----------------------------")?;

        let mut summary: Vec<_> = self.get_error_summary().into_iter().collect();
        summary.sort();
        for (error_type, count) in &summary {
            writeln!(out, "  {}: {}", error_type.as_str(), count)?;
        }

        writeln!(out, "  total: {}", self.get_total_errors())?;
        if let Some(path) = &self.error_path {
            writeln!(out, "  details: {}", path.display())?;
        }

        Ok(())
    }
}
