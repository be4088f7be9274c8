pub mod errors;
pub mod files;
pub mod html;
pub mod json;

pub use errors::{json_error_response, ResultResp};
pub use files::{file_response, xlsx_file_response};
pub use html::html_response;
pub use json::json_response;
