use crate::models::args::GenerateArgs;
use crate::services::workspace::{output_storage, schema_storage};
use anyhow::Result;
use joinery::domain::settings::Settings;
use joinery::features::generator::{
    GenerationMode, GenerationOutcome, Generator, GeneratorError, SchemaFacts, discover_schemas,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

/// Regenerates every requested schema, at most `generator.concurrency` at a time.
///
/// A failing schema is reported and does not stop the others.
///
/// # Errors
/// Returns an error if the schema or output directory is unusable.
pub async fn generate(settings: &Settings, args: GenerateArgs) -> Result<ExitCode> {
    let schemas = schema_storage(settings).await?;
    let extension = settings.generator.extension.clone();
    let generator = Generator::new(output_storage(settings).await?, extension.clone());
    let mode = GenerationMode { force: args.force, dry_run: args.dry_run };

    let names = if args.schemas.is_empty() {
        discover_schemas(&schemas, &extension).await?
    } else {
        args.schemas
    };
    if names.is_empty() {
        println!("No schemas found in {}", settings.generator.schema_dir.display());
        return Ok(ExitCode::SUCCESS);
    }

    let permits = Arc::new(Semaphore::new(settings.generator.concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for name in names {
        let (schemas, generator, permits, extension) =
            (schemas.clone(), generator.clone(), permits.clone(), extension.clone());
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let outcome = match SchemaFacts::load(&schemas, &name, &extension).await {
                Ok(facts) => generator.regenerate(&name, &facts, mode).await,
                Err(err) => Err(err),
            };
            anyhow::Ok((name, outcome))
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined??);
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));

    let mut clean = true;
    for (name, outcome) in &results {
        clean &= print_outcome(name, outcome, mode);
    }

    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Prints one schema's result; `false` when something was skipped or failed.
fn print_outcome(
    name: &str,
    outcome: &Result<GenerationOutcome, GeneratorError>,
    mode: GenerationMode,
) -> bool {
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(schema = name, error = %err, "Generation failed");
            println!("{name}: failed: {err}");
            return false;
        },
    };

    let path = outcome.path.display();
    if outcome.written {
        println!("{name}: wrote {path} ({} customized entries preserved)", outcome.preserved);
    } else {
        println!("{name}: dry run, {path} not written ({} customized entries)", outcome.preserved);
    }
    for failure in &outcome.failures {
        println!("  skipped join {}: {}", failure.join, failure.error);
    }
    for issue in &outcome.report.issues {
        println!("  issue: {issue}");
    }
    if mode.dry_run {
        print!("{}", outcome.rendered);
    }

    outcome.failures.is_empty() && outcome.report.is_valid()
}
