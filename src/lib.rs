// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{get_file_info, search, Paginator, SearchResultEntry, SearchResultSet};
pub use application::{Config, ConfigError};
pub use infrastructure::{Logger, ErrorLogger, ErrorType, SearchInterrupt};
pub use presentation::{App, Console, Prompt};
