use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::Config;
use crate::domain::file_info::{get_file_info, SearchResultEntry};
use crate::infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait, SearchLogSummary};

/// 按遍历顺序排列的搜索结果
pub type SearchResultSet = Vec<SearchResultEntry>;

/// 文件名子串匹配器
#[derive(Debug, Clone)]
pub struct NameMatcher {
    query: String,
    case_sensitive: bool,
}

impl NameMatcher {
    pub fn new(query: &str, case_sensitive: bool) -> Self {
        let query = if case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        Self {
            query,
            case_sensitive,
        }
    }

    /// 名称是否包含查询串；空查询匹配所有名称
    pub fn matches(&self, name: &str) -> bool {
        if self.case_sensitive {
            name.contains(&self.query)
        } else {
            name.to_lowercase().contains(&self.query)
        }
    }
}

/// 一次搜索的结果和统计
#[derive(Debug)]
pub struct SearchReport {
    pub results: SearchResultSet,
    /// 检查过的条目数
    pub scanned: u64,
    /// 匹配但无法读取信息而跳过的条目数
    pub skipped: u64,
    pub duration: Duration,
    /// 被用户取消时结果为空
    pub cancelled: bool,
}

/// 目录中的一个子条目
struct Child {
    path: PathBuf,
    name: String,
    /// 真实目录（不含指向目录的符号链接）
    descend: bool,
}

/// 从根目录递归搜索名称包含查询串的文件和目录
///
/// 同级条目按文件名排序；每个目录先匹配子目录再匹配文件，然后按相同顺序深度优先进入子目录。
/// 不跟随符号链接，不应用任何忽略规则。
pub struct NameSearcher<'a> {
    config: &'a Config,
    logger: Arc<dyn LoggerTrait>,
    error_logger: Arc<ErrorLogger>,
    progress: ProgressBar,
    cancel: Arc<AtomicBool>,
}

impl<'a> NameSearcher<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            logger: Arc::new(Logger::disabled()),
            error_logger: Arc::new(ErrorLogger::disabled()),
            progress: ProgressBar::hidden(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn LoggerTrait>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_error_logger(mut self, error_logger: Arc<ErrorLogger>) -> Self {
        self.error_logger = error_logger;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// 遍历过程中检查的取消标志
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// 执行搜索
    pub fn run(&self, query: &str) -> SearchReport {
        let start_time = Instant::now();
        let root = self.config.root_path();
        let matcher = NameMatcher::new(query, self.config.case_sensitive());

        if self.logger.is_enabled() {
            let _ = self.logger.log_message(&format!(
                "Searching {} for {:?} (case sensitive: {})",
                root.display(),
                query,
                self.config.case_sensitive()
            ));
        }

        let mut results = SearchResultSet::new();
        let mut scanned = 0u64;
        let mut skipped = 0u64;
        let mut cancelled = false;

        // 栈顶是下一个要处理的目录，子目录逆序入栈以保持文件名顺序
        let mut pending = vec![root.to_path_buf()];

        'walk: while let Some(dir) = pending.pop() {
            let (subdirs, files) = self.list_dir(&dir);

            for child in subdirs.iter().chain(files.iter()) {
                if self.cancel.load(Ordering::Relaxed) {
                    cancelled = true;
                    break 'walk;
                }

                scanned += 1;
                if !matcher.matches(&child.name) {
                    continue;
                }

                match get_file_info(&child.path) {
                    Ok(entry) => {
                        if self.logger.is_enabled() {
                            let _ = self.logger.log_entry(&child.path, entry.is_directory, "matched");
                        }
                        results.push(entry);
                    }
                    Err(err) => {
                        skipped += 1;
                        let _ = self.error_logger.log_error(
                            ErrorType::Stat,
                            Some(&child.path),
                            "Matched entry could not be read, skipped",
                            Some(&err.source.to_string()),
                        );
                    }
                }
            }

            self.progress.set_message(format!(
                "Scanned {} entries, {} matches",
                scanned,
                results.len()
            ));
            self.progress.tick();

            pending.extend(
                subdirs
                    .into_iter()
                    .filter(|child| child.descend)
                    .map(|child| child.path)
                    .rev(),
            );
        }

        if cancelled {
            results.clear();
        }

        let duration = start_time.elapsed();
        self.progress.finish_and_clear();

        if self.logger.is_enabled() {
            let _ = self.logger.log_search_summary(&SearchLogSummary {
                query,
                scanned,
                matched: results.len(),
                skipped,
                duration,
                cancelled,
            });
        }

        SearchReport {
            results,
            scanned,
            skipped,
            duration,
            cancelled,
        }
    }

    /// 列出目录的直接子条目，按文件名排序并分为目录和文件两组
    fn list_dir(&self, dir: &Path) -> (Vec<Child>, Vec<Child>) {
        let mut subdirs = Vec::new();
        let mut files = Vec::new();

        let mut walker = WalkBuilder::new(dir);
        walker
            .standard_filters(false) // 包含隐藏文件，不读取任何忽略规则
            .follow_links(false)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b));

        for result in walker.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    // 目录不可读或已被删除
                    let _ = self.error_logger.log_error(
                        ErrorType::Traversal,
                        Some(dir),
                        "Directory could not be read, skipped",
                        Some(&err.to_string()),
                    );
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let file_type = entry.file_type();
            let descend = file_type.map_or(false, |ft| ft.is_dir());
            let is_dir_link =
                file_type.map_or(false, |ft| ft.is_symlink()) && entry.path().is_dir();

            let child = Child {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.into_path(),
                descend,
            };

            if descend || is_dir_link {
                subdirs.push(child);
            } else {
                files.push(child);
            }
        }

        (subdirs, files)
    }
}

/// 使用默认设置（无日志、无进度条）搜索
pub fn search(query: &str, config: &Config) -> SearchResultSet {
    NameSearcher::new(config).run(query).results
}

/// 搜索时显示的进度指示器
pub fn search_spinner() -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        progress.set_style(style);
    }
    progress.set_message("Scanned 0 entries");
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
