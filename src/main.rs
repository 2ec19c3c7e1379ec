use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use file_finder::infrastructure::LoggerTrait;
use file_finder::{App, Config, Console, ErrorLogger, Logger, SearchInterrupt};

/// 按名称交互式查找文件和文件夹
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 启用详细日志记录，日志文件将保存到当前目录下
    #[clap(long)]
    log: bool,

    /// 从 TOML 文件读取初始设置（只读，不会写回）
    #[clap(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Config::default(),
    };

    // 初始化日志记录器
    let logger = Arc::new(Logger::new(args.log)?);
    let error_logger = Arc::new(ErrorLogger::new(args.log)?);
    let interrupt = SearchInterrupt::install()?;

    if let Some(path) = logger.log_path() {
        println!("Debug log: {}", path.display());
    }
    logger.log_message(&format!(
        "Session started (root: {}, case sensitive: {}, display size: {})",
        config.root_path().display(),
        config.case_sensitive(),
        config.display_size()
    ))?;

    println!("\n=== Welcome to the File Finder ===");

    let console = Console::new(io::stdin().lock(), io::stdout());
    let mut app = App::new(config, console)
        .with_logger(logger.clone())
        .with_error_logger(error_logger)
        .with_interrupt(interrupt)
        .with_progress(true);

    app.run()?;

    logger.log_message("Session ended")?;
    Ok(())
}
