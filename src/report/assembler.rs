// src/report/assembler.rs

use crate::errors::ServerError;
use crate::report::ReportData;
use crate::spreadsheets::comparables_workbook;
use crate::templates::pages::report_page;
use std::fs;
use std::path::{Path, PathBuf};

pub const HTML_FILE_NAME: &str = "report.html";
pub const GRID_FILE_NAME: &str = "comparables.xlsx";

/// Files written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub html_path: PathBuf,
    pub grid_path: PathBuf,
}

pub trait ReportAssembler: Send + Sync {
    /// Writes the report into `out_dir`, which belongs to this report alone.
    fn assemble(&self, data: &ReportData, out_dir: &Path) -> Result<ReportArtifacts, ServerError>;
}

/// maud page plus an xlsx copy of both comparable grids.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlReportAssembler;

impl ReportAssembler for HtmlReportAssembler {
    fn assemble(&self, data: &ReportData, out_dir: &Path) -> Result<ReportArtifacts, ServerError> {
        fs::create_dir_all(out_dir)?;

        let html_path = out_dir.join(HTML_FILE_NAME);
        fs::write(&html_path, report_page(data).into_string())?;

        let grid_path = out_dir.join(GRID_FILE_NAME);
        let workbook = comparables_workbook(&[&data.sold.batch.grid, &data.active.batch.grid])?;
        fs::write(&grid_path, workbook)?;

        tracing::info!(dir = %out_dir.display(), "Report assembled");

        Ok(ReportArtifacts {
            html_path,
            grid_path,
        })
    }
}
