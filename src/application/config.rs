use std::fs;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use serde::Deserialize;
use thiserror::Error;

/// 每页显示条数的下限
pub const MIN_DISPLAY_SIZE: usize = 3;
/// 每页显示条数的上限
pub const MAX_DISPLAY_SIZE: usize = 20;
/// 默认每页显示条数
pub const DEFAULT_DISPLAY_SIZE: usize = 10;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid path: {path} does not exist or is not a directory")]
    InvalidPath { path: String },

    #[error("Display size must be between {min} and {max} (got {size})")]
    DisplaySizeOutOfRange { size: usize, min: usize, max: usize },

    #[error("Cannot read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序配置
///
/// 只能通过带校验的 setter 修改，保证 `display_size` 始终在 [3, 20] 之间，
/// 且 `root_path` 在设置时是一个存在的目录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    root_path: PathBuf,
    case_sensitive: bool,
    display_size: usize,
}

/// 配置文件格式，所有字段均可省略
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// 搜索相关配置
    pub search: SearchSection,
    /// 显示相关配置
    pub display: DisplaySection,
}

/// 搜索配置
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// 搜索根目录
    pub root_path: Option<PathBuf>,
    /// 是否区分大小写
    pub case_sensitive: Option<bool>,
}

/// 显示配置
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// 每页显示条数
    pub display_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            case_sensitive: true,
            display_size: DEFAULT_DISPLAY_SIZE,
        }
    }
}

/// 默认搜索目录：用户主目录，取不到时退回当前目录
fn default_root_path() -> PathBuf {
    let candidate = UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    candidate.canonicalize().unwrap_or(candidate)
}

impl Config {
    /// 以指定根目录创建配置，其余字段取默认值
    pub fn with_root(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.set_root_path(root)?;
        Ok(config)
    }

    /// 从 TOML 文件加载初始配置
    ///
    /// 文件中的每个值都经过与交互式修改相同的校验。文件只读不写。
    pub fn load_from_file(config_path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.display().to_string(),
            source,
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: config_path.display().to_string(),
            source,
        })?;

        let mut config = Self::default();
        config.apply(&file)?;
        Ok(config)
    }

    /// 将配置文件中的值逐项应用到当前配置
    pub fn apply(&mut self, file: &ConfigFile) -> Result<(), ConfigError> {
        if let Some(root) = &file.search.root_path {
            self.set_root_path(root)?;
        }
        if let Some(case_sensitive) = file.search.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
        if let Some(size) = file.display.display_size {
            self.set_display_size(size)?;
        }
        Ok(())
    }

    /// 搜索根目录
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn display_size(&self) -> usize {
        self.display_size
    }

    /// 更新搜索根目录，路径必须存在且为目录，保存为规范化的绝对路径
    pub fn set_root_path(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        let canonical = path.canonicalize().map_err(|_| ConfigError::InvalidPath {
            path: path.display().to_string(),
        })?;

        self.root_path = canonical;
        Ok(())
    }

    /// 切换大小写敏感，返回切换后的值
    pub fn toggle_case_sensitive(&mut self) -> bool {
        self.case_sensitive = !self.case_sensitive;
        self.case_sensitive
    }

    /// 更新每页显示条数
    pub fn set_display_size(&mut self, size: usize) -> Result<(), ConfigError> {
        if !(MIN_DISPLAY_SIZE..=MAX_DISPLAY_SIZE).contains(&size) {
            return Err(ConfigError::DisplaySizeOutOfRange {
                size,
                min: MIN_DISPLAY_SIZE,
                max: MAX_DISPLAY_SIZE,
            });
        }

        self.display_size = size;
        Ok(())
    }
}
