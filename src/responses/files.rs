// responses/files.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use std::path::Path;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Serves a stored report artifact. A file that has gone missing is a 404.
pub fn file_response(path: &Path, content_type: &str, download_name: Option<&str>) -> ResultResp {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ServerError::NotFound),
        Err(e) => return Err(ServerError::Io(e)),
    };

    let mut builder = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type);
    if let Some(name) = download_name {
        builder = builder.header("Content-Disposition", format!("attachment; filename=\"{name}\""));
    }

    builder
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)
}

pub fn xlsx_file_response(path: &Path, download_name: &str) -> ResultResp {
    file_response(path, XLSX_CONTENT_TYPE, Some(download_name))
}
