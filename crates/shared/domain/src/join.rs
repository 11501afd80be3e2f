use crate::Symbol;
use crate::types::{Literal, ParamType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// A declared join parameter, e.g. `category:string,required`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: Symbol,
    #[serde(rename = "type")]
    pub ty: ParamType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSpec {
    #[must_use]
    pub fn new(name: impl Into<Symbol>, ty: ParamType) -> Self {
        Self { name: name.into(), ty, required: false, default: None, description: None }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A field exposed by the domain or by a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: Symbol,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

impl FieldSpec {
    #[must_use]
    pub fn new(name: impl Into<Symbol>, ty: ParamType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Comparison a filter applies to its field.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterOperator {
    #[default]
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    In,
    IsNull,
}

/// A named filter over one domain field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub name: Symbol,
    pub field: Symbol,
    pub operator: FilterOperator,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

impl FilterSpec {
    /// The default equality filter generated for a scalar field.
    #[must_use]
    pub fn equality(field: &FieldSpec) -> Self {
        Self {
            name: field.name.clone(),
            field: field.name.clone(),
            operator: FilterOperator::Eq,
            ty: field.ty,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JoinKind {
    Inner,
    #[default]
    Left,
    Right,
}

/// A named, optionally parameterized relationship to another source table.
///
/// `parameters` order is the positional binding order of parameterized references
/// (`join:value1:value2.field`). Every `:placeholder` in `join_condition` names one of
/// `parameters`; the join builder is the gate that guarantees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinDefinition {
    pub key: Symbol,
    pub display_name: String,
    pub join_kind: JoinKind,
    pub source_table: String,
    pub parameters: Vec<ParameterSpec>,
    pub fields: IndexMap<Symbol, FieldSpec>,
    pub join_condition: Option<String>,
}

impl JoinDefinition {
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub const fn arity(&self) -> usize {
        self.parameters.len()
    }

    #[must_use]
    pub fn is_parameterized(&self) -> bool {
        !self.parameters.is_empty()
    }
}
