use std::ops::Range;

use thiserror::Error;

/// 翻页失败
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("Already on the last page")]
    NoNextPage,
    #[error("Already on the first page")]
    NoPreviousPage,
}

/// 结果分页状态
///
/// 页大小和结果总数在创建时固定，翻页不会循环也不会截断。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: usize,
    total: usize,
}

impl Paginator {
    pub fn new(total: usize, page_size: usize) -> Self {
        Self {
            current_page: 0,
            page_size: page_size.max(1),
            total,
        }
    }

    /// 当前页（从 0 开始）
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// 总页数，即 ceil(total / page_size)
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        (self.current_page + 1) * self.page_size < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 0
    }

    pub fn next(&mut self) -> Result<usize, PageError> {
        if !self.has_next() {
            return Err(PageError::NoNextPage);
        }
        self.current_page += 1;
        Ok(self.current_page)
    }

    pub fn previous(&mut self) -> Result<usize, PageError> {
        if !self.has_previous() {
            return Err(PageError::NoPreviousPage);
        }
        self.current_page -= 1;
        Ok(self.current_page)
    }

    /// 当前页在结果列表中的半开区间
    pub fn range(&self) -> Range<usize> {
        let start = (self.current_page * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    /// 当前页的条目，附带跨页连续的 1 基序号
    pub fn page<'a, T>(&self, items: &'a [T]) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        let range = self.range();
        let start = range.start;
        items
            .get(range.start.min(items.len())..range.end.min(items.len()))
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(move |(offset, item)| (start + offset + 1, item))
    }
}
