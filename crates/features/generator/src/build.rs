use crate::error::GeneratorError;
use crate::facts::{JoinFacts, SchemaFacts};
use indexmap::IndexMap;
use joinery_domain::{DomainConfig, FieldSpec, FilterSpec, JoinDefinition, ParamType, Symbol};
use joinery_grammar::parse_parameter_spec;
use joinery_joins::{JoinOptions, build_join_definition};
use tracing::{debug, warn};

/// The generated configuration of one schema plus the joins that could not be built.
#[derive(Debug, Default)]
pub struct DomainBuild {
    pub config: DomainConfig,
    pub failures: Vec<JoinFailure>,
}

/// A join left out of the generated configuration.
#[derive(Debug)]
pub struct JoinFailure {
    pub join: Symbol,
    pub error: GeneratorError,
}

/// Builds fields, one equality filter per field, and joins from schema facts.
///
/// A join that fails to parse or build is recorded in [`DomainBuild::failures`] and
/// skipped; it never aborts the others. A repeated join name keeps the first declaration.
#[must_use]
pub fn build_domain(facts: &SchemaFacts) -> DomainBuild {
    let mut build = DomainBuild::default();

    for (name, token) in &facts.fields {
        let field = FieldSpec::new(name.as_str(), field_type(name, token));
        build.config.insert_filter(FilterSpec::equality(&field));
        build.config.insert_field(field);
    }

    for join in &facts.joins {
        let built = if build.config.joins.contains_key(&join.name) {
            Err(GeneratorError::DuplicateJoin { join: join.name.clone(), context: None })
        } else {
            build_join(join)
        };

        match built {
            Ok(definition) => {
                debug!(join = %definition.key, arity = definition.arity(), "Join built");
                build.config.insert_join(definition);
            },
            Err(error) => {
                warn!(join = %join.name, error = %error, "Join skipped");
                build.failures.push(JoinFailure { join: join.name.clone(), error });
            },
        }
    }

    build
}

fn build_join(facts: &JoinFacts) -> Result<JoinDefinition, GeneratorError> {
    let parameters = facts
        .parameters
        .iter()
        .map(|spec| parse_parameter_spec(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let fields = facts
        .fields
        .iter()
        .map(|(name, token)| (name.clone(), FieldSpec::new(name.as_str(), field_type(name, token))))
        .collect::<IndexMap<_, _>>();

    let mut options = JoinOptions::default().join_kind(facts.kind);
    if let Some(display_name) = &facts.display_name {
        options = options.display_name(display_name);
    }
    if let Some(table) = &facts.source_table {
        options = options.source_table(table);
    }

    Ok(build_join_definition(&facts.name, parameters, fields, facts.condition.as_deref(), options)?)
}

fn field_type(field: &str, token: &str) -> ParamType {
    ParamType::recognize(token).unwrap_or_else(|| {
        warn!(field, token, "Unrecognized field type, using string");
        ParamType::String
    })
}
