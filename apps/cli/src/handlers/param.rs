use anyhow::{Context, Result};
use joinery::parse_parameter_spec;

/// Parses one parameter spec and prints the declaration.
///
/// # Errors
/// Returns the grammar error for a malformed spec.
pub fn param(spec: &str, json: bool) -> Result<()> {
    let parameter = parse_parameter_spec(spec).context("Invalid parameter spec")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parameter)?);
        return Ok(());
    }

    println!("name: {}", parameter.name);
    println!("type: {}", parameter.ty);
    println!("required: {}", parameter.required);
    if let Some(default) = &parameter.default {
        println!("default: {default} ({})", default.param_type().map_or("null", |t| t.as_str()));
    }
    if let Some(description) = &parameter.description {
        println!("description: {description}");
    }
    Ok(())
}
