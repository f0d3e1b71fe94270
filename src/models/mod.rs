pub mod log_row;
pub mod service;

// Re-export core models for easy access
pub use log_row::{LogRow, RawLogRow, RowParseError};
pub use service::ServiceId;
