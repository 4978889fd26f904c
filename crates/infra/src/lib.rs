//! Infrastructure layer: report sources, the report service, configuration.

pub mod config;
pub mod reports;
pub mod source;


pub use config::{ConfigError, ReportingConfig};
pub use reports::ReportService;
pub use source::{InMemoryReportSource, ReportSource, SqliteReportSource};
