// src/spreadsheets/grid_xlsx.rs

use crate::domain::ComparableGrid;
use crate::errors::ServerError;
use rust_xlsxwriter::{Format, Workbook};

/// One sheet per grid, named after its tier ("Past Sales", "On Market").
/// The subject stays in the first data row, as in the report tables.
pub fn comparables_workbook(grids: &[&ComparableGrid]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for grid in grids {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(grid.tier.label())
            .map_err(|e| ServerError::XlsxError(format!("Failed to name sheet: {e}")))?;

        for (col, header) in grid.headers().iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *header, &bold)
                .map_err(|e| {
                    ServerError::XlsxError(format!("Failed to write header '{header}': {e}"))
                })?;
            worksheet
                .set_column_width(col as u16, if col == 0 { 42.0 } else { 16.0 })
                .map_err(|e| ServerError::XlsxError(format!("Failed to size column: {e}")))?;
        }

        for (i, row) in grid.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, cell) in row.cells().iter().enumerate() {
                worksheet
                    .write_string(r, col as u16, *cell)
                    .map_err(|e| {
                        ServerError::XlsxError(format!("Failed to write row {r}: {e}"))
                    })?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SubjectProperty, Tier};

    #[test]
    fn workbook_is_a_zip_with_both_sheets() {
        let subject = SubjectProperty::new("5 Elm Ct, Leonia, NJ 07605");
        let sold = ComparableGrid::for_subject(Tier::Sold, &subject);
        let active = ComparableGrid::for_subject(Tier::Active, &subject);

        let bytes = comparables_workbook(&[&sold, &active]).unwrap();
        assert!(bytes.starts_with(b"PK"));
        assert!(bytes.len() > 1000);
    }
}
