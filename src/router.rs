use crate::db::{find_report, insert_report, recent_reports, Database, ReportRecord};
use crate::domain::{ReportKind, SubjectProperty};
use crate::errors::ServerError;
use crate::report::assembler::{GRID_FILE_NAME, HTML_FILE_NAME};
use crate::report::{build_report_data, Collaborators, PipelineSettings, ReportAssembler};
use crate::responses::{
    file_response, html_response, json_error_response, json_response, xlsx_file_response,
    ResultResp,
};
use crate::templates::{self, html_error_response};
use crate::tokens::{generate_report_id, is_valid_report_id};
use astra::{Request, Response};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const MAX_BODY_BYTES: u64 = 1024 * 1024;
const RECENT_REPORTS_LIMIT: u32 = 50;
const REQUIRED_FIELDS: [&str; 3] = ["address", "latitude", "longitude"];

/// Shared by every worker thread.
pub struct AppState {
    pub db: Database,
    pub collab: Collaborators,
    pub assembler: Arc<dyn ReportAssembler>,
    pub reports_dir: PathBuf,
    pub base_url: String,
    pub radius_miles: f64,
}

enum Surface {
    Page,
    Api,
}

pub fn handle(mut req: Request, state: &AppState) -> Response {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = parse_query(&req);

    tracing::debug!(%method, %path, "Request");

    let (surface, result) = match (method.as_str(), path.as_str()) {
        ("GET", "/") => (Surface::Page, html_response(templates::pages::home_page())),
        ("GET", "/property-info") => (Surface::Api, property_info(&query, state)),
        ("POST", "/generate-report") => (Surface::Api, generate_from_body(&mut req, state)),
        ("GET", "/generate-report") => (Surface::Api, generate_from_query(&query, state)),
        ("GET", "/reports") => (Surface::Api, list_reports(state)),
        ("GET", p) if p.starts_with("/download/") => (Surface::Page, download(p, state)),
        _ => (Surface::Page, Err(ServerError::NotFound)),
    };

    match result {
        Ok(resp) => resp,
        Err(err) => match surface {
            Surface::Page => html_error_response(err),
            Surface::Api => json_error_response(err),
        },
    }
}

fn property_info(query: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let address = query
        .get("address")
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ServerError::BadRequest("address is required".into()))?;

    let subject = state.collab.lookup.lookup(address)?;
    json_response(200, &subject)
}

#[derive(Debug, Deserialize)]
struct GenerateReportRequest {
    report_type: String,
    #[serde(default)]
    data: Value,
}

fn generate_from_body(req: &mut Request, state: &AppState) -> ResultResp {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut body)?;

    let request: GenerateReportRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("Invalid request body: {e}")))?;

    generate_report(&request.report_type, request.data, state)
}

fn generate_from_query(query: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let report_type = query.get("report_type").cloned().unwrap_or_default();
    let data: Map<String, Value> = query
        .iter()
        .filter(|(k, _)| k.as_str() != "report_type")
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    generate_report(&report_type, Value::Object(data), state)
}

/// Names of required fields that are absent, null or blank in the raw payload.
pub fn missing_keys(data: &Value, subject: &SubjectProperty) -> Vec<&'static str> {
    let parsed_missing = subject.missing_required_fields();
    REQUIRED_FIELDS
        .into_iter()
        .filter(|key| {
            let raw_missing = match data.get(*key) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            raw_missing || parsed_missing.contains(key)
        })
        .collect()
}

fn generate_report(report_type: &str, data: Value, state: &AppState) -> ResultResp {
    let kind: ReportKind = report_type.parse().map_err(ServerError::BadRequest)?;

    let subject: SubjectProperty = serde_json::from_value(data.clone())
        .map_err(|e| ServerError::BadRequest(format!("Invalid property data: {e}")))?;

    let missing = missing_keys(&data, &subject);
    if !missing.is_empty() {
        return json_response(
            400,
            &json!({
                "missing_keys": missing,
                "status": "Some required values are missing",
            }),
        );
    }

    let settings = PipelineSettings {
        radius_miles: state.radius_miles,
        today: chrono::Local::now().date_naive(),
    };
    let report = build_report_data(kind, subject, &state.collab, settings);

    let report_id = generate_report_id();
    let out_dir = state.reports_dir.join(&report_id);
    let artifacts = state.assembler.assemble(&report, &out_dir)?;

    let record = ReportRecord {
        id: report_id.clone(),
        report_type: kind.as_str().to_string(),
        address: report.subject.address.clone(),
        low: report.band.low,
        mid: report.band.mid,
        high: report.band.high,
        band_basis: report.band.basis.as_str().to_string(),
        sold_count: report.sold.accepted_count() as i64,
        active_count: report.active.accepted_count() as i64,
        html_path: artifacts.html_path.to_string_lossy().into_owned(),
        grid_path: artifacts.grid_path.to_string_lossy().into_owned(),
        created_at: chrono::Local::now().naive_local(),
    };
    state.db.with_conn(|conn| insert_report(conn, &record))?;

    tracing::info!(%report_id, %kind, "Report generated");

    json_response(
        200,
        &json!({
            "message": "Report generated successfully.",
            "report_id": report_id,
            "download_link": format!("{}/download/{report_id}", state.base_url),
            "grid_link": format!("{}/download/{report_id}/{GRID_FILE_NAME}", state.base_url),
        }),
    )
}

fn list_reports(state: &AppState) -> ResultResp {
    let reports = state
        .db
        .with_conn(|conn| recent_reports(conn, RECENT_REPORTS_LIMIT))?;
    json_response(200, &json!({ "reports": reports }))
}

fn download(path: &str, state: &AppState) -> ResultResp {
    let rest = path.trim_start_matches("/download/").trim_end_matches('/');
    let (id, file) = match rest.split_once('/') {
        Some((id, file)) => (id, Some(file)),
        None => (rest, None),
    };

    if !is_valid_report_id(id) {
        return Err(ServerError::NotFound);
    }

    let record = state
        .db
        .with_conn(|conn| find_report(conn, id))?
        .ok_or(ServerError::NotFound)?;

    match file {
        None | Some(HTML_FILE_NAME) => file_response(
            Path::new(&record.html_path),
            "text/html; charset=utf-8",
            None,
        ),
        Some(GRID_FILE_NAME) => {
            xlsx_file_response(Path::new(&record.grid_path), &format!("comparables_{id}.xlsx"))
        }
        Some(_) => Err(ServerError::NotFound),
    }
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}
