//! Shapes printed by `--json`.

use joinery::domain::FieldReference;
use joinery::features::joins::ValidationReport;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub report: ValidationReport,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.report.is_valid()
    }
}

#[derive(Debug, Serialize)]
pub struct ReferenceResult {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<FieldReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
