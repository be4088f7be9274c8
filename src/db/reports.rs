// src/db/reports.rs
use crate::errors::ServerError;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

/// One row of the `reports` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    pub id: String,
    pub report_type: String,
    pub address: String,
    pub low: f64,
    pub mid: f64,
    pub high: f64,
    pub band_basis: String,
    pub sold_count: i64,
    pub active_count: i64,
    pub html_path: String,
    pub grid_path: String,
    pub created_at: NaiveDateTime,
}

const COLUMNS: &str = "id, report_type, address, low, mid, high, band_basis, \
                       sold_count, active_count, html_path, grid_path, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<ReportRecord> {
    Ok(ReportRecord {
        id: row.get(0)?,
        report_type: row.get(1)?,
        address: row.get(2)?,
        low: row.get(3)?,
        mid: row.get(4)?,
        high: row.get(5)?,
        band_basis: row.get(6)?,
        sold_count: row.get(7)?,
        active_count: row.get(8)?,
        html_path: row.get(9)?,
        grid_path: row.get(10)?,
        created_at: row.get(11)?,
    })
}

pub fn insert_report(conn: &Connection, r: &ReportRecord) -> Result<(), ServerError> {
    conn.execute(
        &format!("INSERT INTO reports ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
        params![
            r.id,
            r.report_type,
            r.address,
            r.low,
            r.mid,
            r.high,
            r.band_basis,
            r.sold_count,
            r.active_count,
            r.html_path,
            r.grid_path,
            r.created_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert report failed: {e}")))?;
    Ok(())
}

pub fn find_report(conn: &Connection, id: &str) -> Result<Option<ReportRecord>, ServerError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM reports WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("find report failed: {e}")))
}

/// Newest first.
pub fn recent_reports(conn: &Connection, limit: u32) -> Result<Vec<ReportRecord>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM reports ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit], from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::SCHEMA_SQL;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA_SQL).unwrap();
        conn
    }

    fn record(id: &str, day: u32) -> ReportRecord {
        ReportRecord {
            id: id.into(),
            report_type: "seller".into(),
            address: "3 Pine Pl, Englewood, NJ 07631".into(),
            low: 500_000.0,
            mid: 525_000.0,
            high: 560_000.0,
            band_basis: "comparables".into(),
            sold_count: 4,
            active_count: 2,
            html_path: format!("reports/{id}/report.html"),
            grid_path: format!("reports/{id}/comparables.xlsx"),
            created_at: NaiveDate::from_ymd_opt(2025, 5, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn insert_then_find() {
        let conn = conn();
        let r = record("abc", 1);
        insert_report(&conn, &r).unwrap();

        assert_eq!(find_report(&conn, "abc").unwrap(), Some(r));
        assert_eq!(find_report(&conn, "missing").unwrap(), None);
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let conn = conn();
        for (id, day) in [("a", 1), ("b", 3), ("c", 2)] {
            insert_report(&conn, &record(id, day)).unwrap();
        }
        let ids: Vec<String> = recent_reports(&conn, 2)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn unknown_report_type_is_rejected() {
        let conn = conn();
        let mut r = record("x", 1);
        r.report_type = "landlord".into();
        assert!(insert_report(&conn, &r).is_err());
    }
}
