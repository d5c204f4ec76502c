pub mod config;
pub mod error;
pub mod source;
pub mod table;

pub use config::AppConfig;
pub use error::{DashboardError, DashboardResult, InvalidAmount};
pub use source::SourceKind;
pub use table::{is_null, parse_amount, Table};
