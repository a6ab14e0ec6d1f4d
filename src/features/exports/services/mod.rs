mod export_service;

pub use export_service::{ExportBundle, ExportService};
