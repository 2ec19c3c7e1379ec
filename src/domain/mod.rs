pub mod file_info;
pub mod pagination;
pub mod search;

pub use file_info::{get_file_info, SearchResultEntry, StatError};
pub use pagination::{PageError, Paginator};
pub use search::{search, NameMatcher, NameSearcher, SearchReport, SearchResultSet};
