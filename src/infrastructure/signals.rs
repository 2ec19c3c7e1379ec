use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

/// Ctrl+C 处理：搜索进行中时请求取消，否则退出程序
#[derive(Clone)]
pub struct SearchInterrupt {
    cancel: Arc<AtomicBool>,
    searching: Arc<AtomicBool>,
}

impl SearchInterrupt {
    /// 注册 Ctrl+C 处理函数，每个进程只能调用一次
    pub fn install() -> Result<Self> {
        let interrupt = Self::new();

        let cancel = Arc::clone(&interrupt.cancel);
        let searching = Arc::clone(&interrupt.searching);

        ctrlc::set_handler(move || {
            if searching.load(Ordering::SeqCst) {
                if !cancel.swap(true, Ordering::SeqCst) {
                    eprintln!("\n🛑 Cancelling search...");
                }
            } else {
                eprintln!("\nGoodbye!");
                std::process::exit(130);
            }
        })
        .context("Failed to set Ctrl+C handler")?;

        Ok(interrupt)
    }

    /// 不注册信号处理函数的实例，只能通过 `request_cancel` 取消
    pub fn new() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            searching: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 测试用实例
    pub fn new_for_test() -> Self {
        Self::new()
    }

    /// 遍历过程中检查的取消标志
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// 标记搜索开始，返回的守卫在释放时标记搜索结束
    pub fn begin_search(&self) -> SearchGuard<'_> {
        self.cancel.store(false, Ordering::SeqCst);
        self.searching.store(true, Ordering::SeqCst);
        SearchGuard { interrupt: self }
    }

    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::SeqCst)
    }

    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

impl Default for SearchInterrupt {
    fn default() -> Self {
        Self::new()
    }
}

/// 搜索期间持有
pub struct SearchGuard<'a> {
    interrupt: &'a SearchInterrupt,
}

impl Drop for SearchGuard<'_> {
    fn drop(&mut self) {
        self.interrupt.searching.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_starts_idle() {
        let interrupt = SearchInterrupt::default();
        assert!(!interrupt.is_searching());
        assert!(!interrupt.is_cancelled());
    }

    #[test]
    fn test_guard_tracks_search() {
        let interrupt = SearchInterrupt::new_for_test();
        assert!(!interrupt.is_searching());

        {
            let _guard = interrupt.begin_search();
            assert!(interrupt.is_searching());
        }

        assert!(!interrupt.is_searching());
    }

    #[test]
    fn test_begin_search_clears_previous_cancel() {
        let interrupt = SearchInterrupt::new_for_test();
        interrupt.request_cancel();
        assert!(interrupt.is_cancelled());

        let flag = interrupt.cancel_flag();
        let _guard = interrupt.begin_search();
        assert!(!interrupt.is_cancelled());
        assert!(!flag.load(Ordering::SeqCst));
    }
}
