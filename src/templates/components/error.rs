use crate::errors::ServerError;
use crate::templates::desktop_layout;
use astra::{Body, Response, ResponseBuilder};
use maud::html;

/// Convert a ServerError into an HTML error page
pub fn html_error_response(err: ServerError) -> Response {
    let status = err.status_code();
    if status >= 500 {
        tracing::error!("Request failed: {err}");
    }

    let message = match &err {
        ServerError::NotFound => "Not Found".to_string(),
        ServerError::BadRequest(msg) => msg.clone(),
        other => other.to_string(),
    };

    render_error(status, &message)
}

fn render_error(status: u16, message: &str) -> Response {
    let page = desktop_layout(
        &format!("Error {status}"),
        html! {
            h1 { "Error " (status) }
            p { (message) }
            p { a href="/" { "← Back to home" } }
        },
    );

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(page.into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
