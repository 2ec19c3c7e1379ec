use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, SubsecRound};
use thiserror::Error;

/// 时间戳显示格式（精确到秒）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 无法读取条目信息
#[derive(Error, Debug)]
#[error("Cannot stat {path}")]
pub struct StatError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

/// 单条搜索结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultEntry {
    /// 规范化的绝对路径
    pub path: String,
    pub is_directory: bool,
    pub created: DateTime<Local>,
    pub modified: DateTime<Local>,
}

impl SearchResultEntry {
    pub fn created_display(&self) -> String {
        self.created.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn modified_display(&self) -> String {
        self.modified.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for SearchResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// 读取路径的规范化信息
///
/// 平台不支持创建时间时以修改时间代替。
pub fn get_file_info(path: &Path) -> Result<SearchResultEntry, StatError> {
    let stat_error = |source| StatError {
        path: path.display().to_string(),
        source,
    };

    let metadata = fs::metadata(path).map_err(stat_error)?;
    let canonical = path.canonicalize().map_err(stat_error)?;

    let modified = metadata.modified().map_err(stat_error)?;
    let created = metadata.created().unwrap_or(modified);

    Ok(SearchResultEntry {
        path: canonical.to_string_lossy().into_owned(),
        is_directory: metadata.is_dir(),
        created: DateTime::<Local>::from(created).trunc_subsecs(0),
        modified: DateTime::<Local>::from(modified).trunc_subsecs(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_info_for_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("notes.txt");
        fs::write(&file_path, "hello").unwrap();

        let entry = get_file_info(&file_path).unwrap();
        assert!(!entry.is_directory);
        assert_eq!(
            Path::new(&entry.path),
            file_path.canonicalize().unwrap().as_path()
        );
        assert_eq!(entry.modified.nanosecond(), 0);
        assert_eq!(entry.created.nanosecond(), 0);
    }

    #[test]
    fn test_file_info_for_directory() {
        let temp_dir = tempdir().unwrap();
        let dir_path = temp_dir.path().join("nested");
        fs::create_dir(&dir_path).unwrap();

        let entry = get_file_info(&dir_path).unwrap();
        assert!(entry.is_directory);
        assert!(Path::new(&entry.path).is_absolute());
    }

    #[test]
    fn test_file_info_relative_path_is_resolved() {
        let entry = get_file_info(Path::new(".")).unwrap();
        assert!(entry.is_directory);
        assert!(Path::new(&entry.path).is_absolute());
    }

    #[test]
    fn test_file_info_missing_path() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("gone.txt");

        let err = get_file_info(&missing).unwrap_err();
        assert!(err.path.ends_with("gone.txt"));
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_timestamp_format() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("stamp.txt");
        fs::write(&file_path, "x").unwrap();

        let entry = get_file_info(&file_path).unwrap();
        let shown = entry.modified_display();
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(shown.len(), 19);
        assert_eq!(&shown[4..5], "-");
        assert_eq!(&shown[10..11], " ");
        assert_eq!(entry.created_display().len(), 19);
    }
}
