pub mod home;
pub mod report;

pub use home::home_page;
pub use report::report_page;
