// Downloadable artifacts built from a finished screening: the CSV of top
// recommendations and the ATS summary report.

pub mod export;
pub mod summary;

pub use export::export_csv;
pub use summary::AtsReport;
