pub mod fetcher;
pub mod report_exporter;
pub mod table_exporter;

pub use fetcher::Fetcher;
pub use report_exporter::{ReportSummary, ReportWriter};
pub use table_exporter::{read_table, write_table};
