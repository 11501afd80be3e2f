use crate::checks::{conformed_default, duplicate_names, undeclared_placeholders};
use crate::error::ValidationError;
use indexmap::IndexMap;
use joinery_domain::{FieldSpec, JoinDefinition, JoinKind, ParameterSpec, Symbol};
use joinery_kernel::naming::title_case;
use tracing::debug;

/// Optional presentation and SQL details of a join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinOptions {
    /// Defaults to the title-cased join key.
    pub display_name: Option<String>,
    pub join_kind: JoinKind,
    /// Defaults to the join key.
    pub source_table: Option<String>,
}

impl JoinOptions {
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn join_kind(mut self, kind: JoinKind) -> Self {
        self.join_kind = kind;
        self
    }

    #[must_use]
    pub fn source_table(mut self, table: impl Into<String>) -> Self {
        self.source_table = Some(table.into());
        self
    }
}

/// Assembles a join definition, rejecting internally inconsistent declarations.
///
/// A built join has unique parameter names, defaults of the declared type (conformed,
/// so an integer default of a float parameter is stored as a float), and a condition whose
/// every `:placeholder` names a declared parameter. A blank condition is treated as none.
///
/// # Errors
/// [`ValidationError::DuplicateParameter`], [`ValidationError::DefaultTypeMismatch`] or
/// [`ValidationError::UndeclaredPlaceholder`], for the first problem found in that order.
pub fn build_join_definition(
    name: &str,
    parameters: Vec<ParameterSpec>,
    fields: IndexMap<Symbol, FieldSpec>,
    condition: Option<&str>,
    options: JoinOptions,
) -> Result<JoinDefinition, ValidationError> {
    if let Some(duplicate) = duplicate_names(parameters.iter().map(|p| p.name.as_str())).first() {
        return Err(ValidationError::DuplicateParameter {
            join: name.to_owned(),
            parameter: (*duplicate).to_owned(),
            context: None,
        });
    }

    let parameters = parameters
        .into_iter()
        .map(|mut parameter| {
            if let Some(default) = parameter.default.take() {
                match conformed_default(&default, parameter.ty) {
                    Ok(conformed) => parameter.default = Some(conformed),
                    Err(found) => {
                        return Err(ValidationError::DefaultTypeMismatch {
                            join: name.to_owned(),
                            parameter: parameter.name,
                            expected: parameter.ty,
                            found: found.to_string(),
                            context: None,
                        });
                    },
                }
            }
            Ok(parameter)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let join_condition = condition.map(str::trim).filter(|c| !c.is_empty()).map(str::to_owned);
    if let Some(condition) = &join_condition {
        let declared: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
        if let Some(placeholder) = undeclared_placeholders(condition, &declared).first() {
            return Err(ValidationError::UndeclaredPlaceholder {
                join: name.to_owned(),
                placeholder: (*placeholder).to_owned(),
                context: None,
            });
        }
    }

    debug!(join = name, parameters = parameters.len(), fields = fields.len(), "Join built");

    Ok(JoinDefinition {
        key: name.to_owned(),
        display_name: options.display_name.unwrap_or_else(|| title_case(name)),
        join_kind: options.join_kind,
        source_table: options.source_table.unwrap_or_else(|| name.to_owned()),
        parameters,
        fields,
        join_condition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use joinery_domain::{Literal, ParamType};
    use joinery_grammar::placeholders;

    fn fields() -> IndexMap<Symbol, FieldSpec> {
        [FieldSpec::new("name", ParamType::String), FieldSpec::new("price", ParamType::Float)]
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect()
    }

    #[test]
    fn builds_with_defaults_from_the_key() {
        let join = build_join_definition(
            "order_items",
            vec![ParameterSpec::new("category", ParamType::String).required()],
            fields(),
            Some("order_items.category = :category"),
            JoinOptions::default(),
        )
        .unwrap();

        assert_eq!(join.display_name, "Order Items");
        assert_eq!(join.source_table, "order_items");
        assert_eq!(join.join_kind, JoinKind::Left);
        assert_eq!(join.arity(), 1);
        for placeholder in placeholders(join.join_condition.as_deref().unwrap()) {
            assert!(join.parameter(placeholder.name).is_some());
        }
    }

    #[test]
    fn options_override_defaults() {
        let options = JoinOptions::default()
            .display_name("Catalog")
            .join_kind(JoinKind::Inner)
            .source_table("catalog_products");
        let join = build_join_definition("products", vec![], fields(), None, options).unwrap();

        assert_eq!(join.display_name, "Catalog");
        assert_eq!(join.join_kind, JoinKind::Inner);
        assert_eq!(join.source_table, "catalog_products");
        assert!(!join.is_parameterized());
    }

    #[test]
    fn rejects_duplicate_parameters() {
        let err = build_join_definition(
            "products",
            vec![
                ParameterSpec::new("category", ParamType::String),
                ParameterSpec::new("category", ParamType::Integer),
            ],
            fields(),
            None,
            JoinOptions::default(),
        )
        .unwrap_err();
        assert!(
            matches!(err, ValidationError::DuplicateParameter { ref parameter, .. } if parameter == "category")
        );
    }

    #[test]
    fn rejects_dangling_placeholders() {
        let err = build_join_definition(
            "products",
            vec![ParameterSpec::new("category", ParamType::String)],
            fields(),
            Some("products.category = :category AND products.active = :active"),
            JoinOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "undeclared placeholder: join products uses `:active` but declares no such parameter"
        );
    }

    #[test]
    fn conforms_or_rejects_defaults() {
        let join = build_join_definition(
            "products",
            vec![ParameterSpec::new("discount", ParamType::Float).with_default(Literal::Integer(2))],
            fields(),
            None,
            JoinOptions::default(),
        )
        .unwrap();
        assert_eq!(join.parameters[0].default, Some(Literal::Float(2.0)));

        let err = build_join_definition(
            "products",
            vec![ParameterSpec::new("limit", ParamType::Integer).with_default(Literal::String("lots".into()))],
            fields(),
            None,
            JoinOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::DefaultTypeMismatch { expected: ParamType::Integer, .. }));
    }

    #[test]
    fn blank_condition_is_none() {
        let join =
            build_join_definition("products", vec![], fields(), Some("  "), JoinOptions::default())
                .unwrap();
        assert_eq!(join.join_condition, None);
    }
}
