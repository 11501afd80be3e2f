use crate::models::output::FileReport;
use crate::services::workspace::output_storage;
use anyhow::{Context, Result};
use joinery::domain::settings::Settings;
use joinery::features::merge::load_domain;
use std::path::PathBuf;
use std::process::ExitCode;

/// Loads and validates domain files; fails when any file has issues.
///
/// # Errors
/// Returns an error if the output directory cannot be listed or a file cannot be read.
pub async fn validate(settings: &Settings, paths: Vec<PathBuf>, json: bool) -> Result<ExitCode> {
    let paths = if paths.is_empty() {
        let storage = output_storage(settings).await?;
        storage
            .list(&settings.generator.extension)
            .await?
            .into_iter()
            .map(|file| settings.generator.output_dir.join(file))
            .collect()
    } else {
        paths
    };

    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        reports.push(FileReport { path, report: load_domain(&text).validate() });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if reports.is_empty() {
        println!("No domain files found in {}", settings.generator.output_dir.display());
    } else {
        reports.iter().for_each(print_report);
    }

    let clean = reports.iter().all(FileReport::is_clean);
    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_report(file: &FileReport) {
    let path = file.path.display();
    if file.report.is_valid() {
        println!("{path}: ok");
        return;
    }
    println!("{path}: {} issue(s)", file.report.issues.len());
    for issue in &file.report.issues {
        println!("  - {issue}");
    }
}
