use crate::checks::{conformed_default, duplicate_names, undeclared_placeholders};
use crate::error::ValidationError;
use crate::source::JoinSource;
use indexmap::IndexMap;
use joinery_domain::{FieldReference, Symbol};
use serde::Serialize;
use tracing::debug;

/// Outcome of a static check over a join map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub parameters_valid: bool,
    pub field_types_valid: bool,
    pub join_conditions_valid: bool,
    pub issues: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            parameters_valid: true,
            field_types_valid: true,
            join_conditions_valid: true,
            issues: Vec::new(),
        }
    }
}

impl ValidationReport {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.parameters_valid && self.field_types_valid && self.join_conditions_valid
    }

    /// Folds another report into this one.
    pub fn absorb(&mut self, other: Self) {
        self.parameters_valid &= other.parameters_valid;
        self.field_types_valid &= other.field_types_valid;
        self.join_conditions_valid &= other.join_conditions_valid;
        self.issues.extend(other.issues);
    }

    /// Records an issue and clears the flag of the check it belongs to.
    pub fn record(&mut self, check: Check, issue: impl Into<String>) {
        match check {
            Check::Parameters => self.parameters_valid = false,
            Check::FieldTypes => self.field_types_valid = false,
            Check::JoinConditions => self.join_conditions_valid = false,
        }
        self.issues.push(issue.into());
    }
}

/// The check families a [`ValidationReport`] tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Parameters,
    FieldTypes,
    JoinConditions,
}

/// Runs every static check over `joins`, collecting issues instead of stopping at the first.
///
/// Joins read back from disk bypassed the builder, so the builder's checks run again here
/// alongside type-token recognition.
#[must_use]
pub fn validate<J: JoinSource>(joins: &IndexMap<Symbol, J>) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (key, join) in joins {
        let parameters = join.parameters();

        for view in &parameters {
            let Some(ty) = view.ty.resolve() else {
                report.record(
                    Check::Parameters,
                    format!("join {key}: parameter `{}` has unrecognized type `{}`", view.name, view.ty),
                );
                continue;
            };
            if let Some(Err(found)) = view.default.map(|d| conformed_default(d, ty)) {
                let error = ValidationError::DefaultTypeMismatch {
                    join: key.clone(),
                    parameter: view.name.to_owned(),
                    expected: ty,
                    found: found.to_string(),
                    context: None,
                };
                report.record(Check::Parameters, error.to_string());
            }
        }

        for duplicate in duplicate_names(parameters.iter().map(|p| p.name)) {
            let error = ValidationError::DuplicateParameter {
                join: key.clone(),
                parameter: duplicate.to_owned(),
                context: None,
            };
            report.record(Check::Parameters, error.to_string());
        }

        for (field, ty) in join.fields() {
            if ty.resolve().is_none() {
                report.record(
                    Check::FieldTypes,
                    format!("join {key}: field `{field}` has unrecognized type `{ty}`"),
                );
            }
        }

        if let Some(condition) = join.condition() {
            let declared: Vec<&str> = parameters.iter().map(|p| p.name).collect();
            for placeholder in undeclared_placeholders(condition, &declared) {
                let error = ValidationError::UndeclaredPlaceholder {
                    join: key.clone(),
                    placeholder: placeholder.to_owned(),
                    context: None,
                };
                report.record(Check::JoinConditions, error.to_string());
            }
        }
    }

    debug!(joins = joins.len(), issues = report.issues.len(), "Validation finished");
    report
}

/// Checks that a reference names a declared join and supplies the right number of values.
///
/// A parameterized reference must supply exactly as many values as the join declares; a
/// dot-notation reference is rejected when the join has required parameters.
///
/// # Errors
/// A human-readable reason such as `parameter count mismatch: expected 2, got 1`.
pub fn validate_reference_arity<J: JoinSource>(
    reference: &FieldReference,
    joins: &IndexMap<Symbol, J>,
) -> Result<(), String> {
    let name = reference.join();
    let Some(join) = joins.get(name) else {
        return Err(ValidationError::UnknownJoin { join: name.to_owned(), context: None }.to_string());
    };

    let error = match reference {
        FieldReference::Parameterized { parameters, .. } if parameters.len() != join.arity() => {
            Some(ValidationError::ArityMismatch {
                join: name.to_owned(),
                expected: join.arity(),
                got: parameters.len(),
                context: None,
            })
        },
        FieldReference::DotNotation { .. } if join.required_count() > 0 => {
            Some(ValidationError::MissingParameters {
                join: name.to_owned(),
                required: join.required_count(),
                context: None,
            })
        },
        _ => None,
    };

    error.map_or(Ok(()), |e| Err(e.to_string()))
}
