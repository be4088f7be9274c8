pub mod grid_xlsx;

pub use grid_xlsx::comparables_workbook;
