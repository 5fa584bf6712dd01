pub mod csv_export;
pub mod csv_import;

pub use csv_export::{csv_cell, render_csv, HEADER};
pub use csv_import::{import_records, parse_csv, ImportRecord, ImportSummary, ImportedMetric};
