//! Report file rendering (CSV, Excel, PDF)

pub mod csv;
pub mod excel;
pub mod pdf;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use shared::ReportFormat;

/// A rendered report ready to download
#[derive(Debug)]
pub struct ExportFile {
    pub format: ReportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// `stem` gets the extension of `format` appended
    pub fn new(format: ReportFormat, stem: &str, bytes: Vec<u8>) -> Self {
        Self {
            format,
            filename: format!("{}.{}", stem, format.extension()),
            bytes,
        }
    }
}

impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}
