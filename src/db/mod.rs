pub mod connection;
pub mod reports;

pub use connection::{init_db, Database};
pub use reports::{find_report, insert_report, recent_reports, ReportRecord};
