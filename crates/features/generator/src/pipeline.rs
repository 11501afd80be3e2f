use crate::build::{JoinFailure, build_domain};
use crate::error::GeneratorError;
use crate::facts::SchemaFacts;
use joinery_joins::ValidationReport;
use joinery_merge::{load_domain, merge, render};
use joinery_storage::Storage;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// How [`Generator::regenerate`] treats the existing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationMode {
    /// Skip the merge and persist the generated configuration as-is.
    pub force: bool,
    /// Build, merge and validate, but write nothing.
    pub dry_run: bool,
}

/// What one regeneration did.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub schema: String,
    /// Path of the domain file relative to the output directory.
    pub path: PathBuf,
    pub written: bool,
    /// Entries kept because they carry the customization marker.
    pub preserved: usize,
    pub failures: Vec<JoinFailure>,
    /// Validation of the file as rendered.
    pub report: ValidationReport,
    pub rendered: String,
}

/// Regenerates domain files under one output directory.
#[derive(Debug, Clone)]
pub struct Generator {
    output: Storage,
    extension: String,
}

impl Generator {
    pub fn new(output: Storage, extension: impl Into<String>) -> Self {
        Self { output, extension: extension.into() }
    }

    #[must_use]
    pub fn path_for(&self, schema: &str) -> PathBuf {
        PathBuf::from(format!("{schema}.{}", self.extension))
    }

    /// Build, merge with the existing file, render, validate and write.
    ///
    /// Hand-written text the merge cannot map to an entry is carried over verbatim and shows
    /// up in the report; `--force` discards it along with every customization. Validation
    /// issues do not block the write.
    pub async fn regenerate(
        &self,
        schema: &str,
        facts: &SchemaFacts,
        mode: GenerationMode,
    ) -> Result<GenerationOutcome, GeneratorError> {
        let path = self.path_for(schema);
        let build = build_domain(facts);

        let merged = if mode.force {
            debug!(schema, "Forced regeneration, existing file ignored");
            build.config
        } else {
            let existing = self.output.read(&path).await?;
            merge(build.config, existing.as_deref())
        };

        let rendered = render(&merged);
        let report = load_domain(&rendered).validate();
        if !report.is_valid() {
            warn!(schema, issues = report.issues.len(), "Domain has validation issues");
        }

        let written = !mode.dry_run;
        if written {
            self.output.write(&path, &rendered).await?;
            info!(schema, path = %path.display(), preserved = merged.customized_count(), "Domain written");
        }

        Ok(GenerationOutcome {
            schema: schema.to_owned(),
            path,
            written,
            preserved: merged.customized_count(),
            failures: build.failures,
            report,
            rendered,
        })
    }
}
