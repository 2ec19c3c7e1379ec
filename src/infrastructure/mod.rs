pub mod error_logging;
pub mod logging;
pub mod signals;

pub use error_logging::{ErrorLogger, ErrorType};
pub use logging::{Logger, LoggerTrait, SearchLogSummary};
pub use signals::{SearchGuard, SearchInterrupt};
