use std::io::Write;
use std::time::Duration;

use anyhow::Result;

use crate::application::Config;
use crate::domain::{Paginator, SearchReport, SearchResultEntry};

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 输出单条搜索结果
pub fn print_result_entry<W: Write>(
    out: &mut W,
    index: usize,
    entry: &SearchResultEntry,
) -> Result<()> {
    writeln!(out, "{}. {}", index, entry.path)?;
    writeln!(out, "   Created: {}", entry.created_display())?;
    writeln!(out, "   Modified: {}", entry.modified_display())?;
    writeln!(out, "   Directory: {}\n", entry.is_directory)?;
    Ok(())
}

/// 输出当前页及翻页选项
pub fn print_page<W: Write>(
    out: &mut W,
    paginator: &Paginator,
    results: &[SearchResultEntry],
) -> Result<()> {
    writeln!(
        out,
        "\n--- Results Page {} of {} ---",
        paginator.current_page() + 1,
        paginator.page_count()
    )?;

    for (index, entry) in paginator.page(results) {
        print_result_entry(out, index, entry)?;
    }

    writeln!(out, "Options:")?;
    if paginator.has_next() {
        writeln!(out, "N. Next page")?;
    }
    if paginator.has_previous() {
        writeln!(out, "P. Previous page")?;
    }
    writeln!(out, "M. Return to Main Menu")?;

    Ok(())
}

/// 搜索开始前的提示
pub fn print_search_banner<W: Write>(out: &mut W, config: &Config, query: &str) -> Result<()> {
    writeln!(out, "\nSearching in {} for: {:?}", config.root_path().display(), query)?;
    writeln!(out, "Case sensitive: {}", config.case_sensitive())?;
    writeln!(out, "\n⌚ Large directory trees can take several minutes. Press Ctrl+C to cancel.")?;
    Ok(())
}

/// 搜索摘要
pub fn print_search_summary<W: Write>(out: &mut W, report: &SearchReport) -> Result<()> {
    if report.cancelled {
        writeln!(out, "\n🛑 Search cancelled after {}.", format_duration(report.duration))?;
        return Ok(());
    }

    writeln!(out, "\n✅ Search complete!")?;
    writeln!(
        out,
        "Found {} results in {}.",
        report.results.len(),
        format_duration(report.duration)
    )?;
    writeln!(out, "Entries scanned: {}", report.scanned)?;
    if report.skipped > 0 {
        writeln!(out, "Entries skipped (could not be read): {}", report.skipped)?;
    }

    Ok(())
}
