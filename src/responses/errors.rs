use crate::errors::ServerError;
use crate::responses::json::json_response;
use astra::Response;
use serde_json::json;

pub type ResultResp = Result<Response, ServerError>;

/// Error body for the JSON endpoints.
pub fn json_error_response(err: ServerError) -> Response {
    let status = err.status_code();
    if status >= 500 {
        tracing::error!("API request failed: {err}");
    } else {
        tracing::info!("API request rejected: {err}");
    }

    let body = match &err {
        ServerError::Lookup(_) => {
            json!({ "error": "API_DATA_NOT_FOUND or API_LIMIT_REACHED" })
        }
        ServerError::NotFound => json!({ "error": "Not Found" }),
        ServerError::BadRequest(msg) => json!({ "error": msg }),
        _ => json!({ "error": "Internal Server Error" }),
    };

    json_response(status, &body).unwrap_or_else(|_| Response::new(astra::Body::from("{}")))
}
