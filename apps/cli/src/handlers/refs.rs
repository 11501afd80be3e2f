use crate::models::output::ReferenceResult;
use crate::services::workspace::output_storage;
use anyhow::{Result, bail};
use indexmap::IndexMap;
use joinery::domain::{FieldReference, Symbol};
use joinery::domain::settings::Settings;
use joinery::features::merge::{StoredJoin, load_domain};
use joinery::{parse_field_reference, split_references, validate_reference_arity};
use std::process::ExitCode;

type JoinMap = IndexMap<Symbol, StoredJoin>;

/// Test harness for the reference grammar: one result per comma-separated reference.
///
/// With a domain, every parsed reference is also checked against that domain's joins.
///
/// # Errors
/// Returns an error if the named domain cannot be read or parsed.
pub async fn refs(
    settings: &Settings,
    list: &str,
    domain: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let joins = match domain {
        Some(name) => Some(load_joins(settings, name).await?),
        None => None,
    };

    let results: Vec<ReferenceResult> = split_references(list)
        .into_iter()
        .map(|raw| {
            let checked = parse_field_reference(raw).map_err(|e| e.to_string()).and_then(|r| {
                match &joins {
                    Some(joins) => validate_reference_arity(&r, joins).map(|()| r),
                    None => Ok(r),
                }
            });
            let input = raw.to_owned();
            match checked {
                Ok(reference) => ReferenceResult { input, reference: Some(reference), error: None },
                Err(error) => ReferenceResult { input, reference: None, error: Some(error) },
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            match (&result.reference, &result.error) {
                (Some(reference), _) => println!("{} => {}", result.input, describe(reference)),
                (None, Some(error)) => println!("{} => error: {error}", result.input),
                (None, None) => {},
            }
        }
    }

    let clean = results.iter().all(|r| r.error.is_none());
    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn describe(reference: &FieldReference) -> String {
    match reference {
        FieldReference::DotNotation { join, field } => format!("join={join} field={field}"),
        FieldReference::Parameterized { join, parameters, field } => {
            format!("join={join} parameters={parameters:?} field={field}")
        },
    }
}

async fn load_joins(settings: &Settings, name: &str) -> Result<JoinMap> {
    let storage = output_storage(settings).await?;
    let path = format!("{name}.{}", settings.generator.extension);
    let Some(text) = storage.read(&path).await? else {
        bail!("No domain file {path} in {}", settings.generator.output_dir.display());
    };
    Ok(load_domain(&text).joins)
}
