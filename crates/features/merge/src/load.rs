//! Typed reading of persisted entries.
//!
//! On-disk entries keep their type tokens as written so validation can point at a typo
//! instead of silently reading it as a string.

use crate::document::{DomainDocument, EntryBlock};
use crate::error::{MergeError, MergeErrorExt};
use indexmap::IndexMap;
use joinery_domain::{
    FieldSpec, FilterOperator, FilterSpec, JoinDefinition, JoinKind, Literal, ParamType,
    ParameterSpec, SectionKind, Symbol,
};
use joinery_joins::{Check, JoinSource, ParameterView, TypeToken, ValidationReport, validate};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredField {
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredFilter {
    /// Defaults to the filter key.
    pub field: Option<String>,
    #[serde(default)]
    pub operator: FilterOperator,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub required: bool,
    pub default: Option<Literal>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredJoin {
    #[serde(skip)]
    pub key: Symbol,
    pub display_name: Option<String>,
    #[serde(default)]
    pub join_kind: JoinKind,
    pub source_table: Option<String>,
    pub condition: Option<String>,
    #[serde(default)]
    pub parameters: Vec<StoredParameter>,
    #[serde(default)]
    pub fields: IndexMap<Symbol, String>,
}

impl StoredField {
    #[must_use]
    pub fn to_spec(&self, key: &str) -> FieldSpec {
        FieldSpec::new(key, ParamType::from_token(&self.ty))
    }
}

impl StoredFilter {
    #[must_use]
    pub fn to_spec(&self, key: &str) -> FilterSpec {
        FilterSpec {
            name: key.to_owned(),
            field: self.field.clone().unwrap_or_else(|| key.to_owned()),
            operator: self.operator,
            ty: self.ty.as_deref().map(ParamType::from_token).unwrap_or_default(),
        }
    }
}

impl StoredJoin {
    /// Structured reading with unknown tokens falling back to strings and defaults conformed
    /// where possible. Consistency is not checked here; run the validator for that.
    #[must_use]
    pub fn to_definition(&self) -> JoinDefinition {
        let parameters = self
            .parameters
            .iter()
            .map(|p| {
                let ty = ParamType::from_token(&p.ty);
                ParameterSpec {
                    name: p.name.clone(),
                    ty,
                    required: p.required,
                    default: p.default.clone().map(|d| d.conform(ty).unwrap_or_else(|d| d)),
                    description: p.description.clone(),
                }
            })
            .collect();

        JoinDefinition {
            key: self.key.clone(),
            display_name: self.display_name.clone().unwrap_or_else(|| self.key.clone()),
            join_kind: self.join_kind,
            source_table: self.source_table.clone().unwrap_or_else(|| self.key.clone()),
            parameters,
            fields: self
                .fields
                .iter()
                .map(|(name, ty)| (name.clone(), FieldSpec::new(name.as_str(), ParamType::from_token(ty))))
                .collect(),
            join_condition: self.condition.clone(),
        }
    }
}

impl JoinSource for StoredJoin {
    fn key(&self) -> &str {
        &self.key
    }

    fn parameters(&self) -> Vec<ParameterView<'_>> {
        self.parameters
            .iter()
            .map(|p| ParameterView {
                name: &p.name,
                ty: TypeToken::Raw(&p.ty),
                required: p.required,
                default: p.default.as_ref(),
            })
            .collect()
    }

    fn fields(&self) -> Vec<(&str, TypeToken<'_>)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), TypeToken::Raw(ty))).collect()
    }

    fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

/// A persisted domain file read into typed entries.
#[derive(Debug, Clone, Default)]
pub struct LoadedDomain {
    pub document: DomainDocument,
    pub fields: IndexMap<Symbol, StoredField>,
    pub filters: IndexMap<Symbol, StoredFilter>,
    pub joins: IndexMap<Symbol, StoredJoin>,
    /// Entries whose block did not deserialize, with the reason.
    pub unreadable: Vec<(SectionKind, Symbol, String)>,
}

impl LoadedDomain {
    /// Runs the join validator and adds findings for top-level fields, filters, unreadable
    /// entries and headers that map to no entry.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = validate(&self.joins);

        for (key, field) in &self.fields {
            if ParamType::recognize(&field.ty).is_none() {
                report.record(
                    Check::FieldTypes,
                    format!("field {key}: unrecognized type `{}`", field.ty),
                );
            }
        }
        for (key, filter) in &self.filters {
            if let Some(ty) = filter.ty.as_deref().filter(|t| ParamType::recognize(t).is_none()) {
                report.record(Check::FieldTypes, format!("filter {key}: unrecognized type `{ty}`"));
            }
        }
        for (section, key, reason) in &self.unreadable {
            let check = match section {
                SectionKind::Joins => Check::Parameters,
                SectionKind::Fields | SectionKind::Filters => Check::FieldTypes,
            };
            report.record(check, format!("{section} {key}: unreadable entry: {reason}"));
        }
        for notice in &self.document.notices {
            let check = match notice.section {
                Some(SectionKind::Joins) => Check::Parameters,
                Some(SectionKind::Fields | SectionKind::Filters) | None => Check::FieldTypes,
            };
            report.record(check, format!("line {}: {}", notice.line, notice.message));
        }

        report
    }
}

/// Reads a persisted domain file.
///
/// Entries that fail to deserialize are collected in [`LoadedDomain::unreadable`] rather
/// than failing the whole file.
#[must_use]
pub fn load_domain(text: &str) -> LoadedDomain {
    let document = DomainDocument::parse(text);
    let mut loaded = LoadedDomain::default();

    for block in document.entries() {
        let key = block.key.clone();
        let outcome = match block.section {
            SectionKind::Fields => read_block::<StoredField>(block).map(|f| {
                loaded.fields.insert(key.clone(), f);
            }),
            SectionKind::Filters => read_block::<StoredFilter>(block).map(|f| {
                loaded.filters.insert(key.clone(), f);
            }),
            SectionKind::Joins => read_block::<StoredJoin>(block).map(|mut j| {
                j.key.clone_from(&key);
                loaded.joins.insert(key.clone(), j);
            }),
        };
        if let Err(err) = outcome {
            tracing::warn!(section = %block.section, key = %key, error = %err, "Unreadable entry");
            loaded.unreadable.push((block.section, key, err.to_string()));
        }
    }

    loaded.document = document;
    loaded
}

/// Deserializes the entry table of one block.
pub(crate) fn read_block<T: DeserializeOwned>(block: &EntryBlock) -> Result<T, MergeError> {
    let table: toml::Table = toml::from_str(&block.text)
        .context(format!("{}.{} at line {}", block.section, block.key, block.line))?;

    let entry = table
        .get(block.section.as_str())
        .and_then(|section| section.get(&block.key))
        .cloned()
        .unwrap_or_else(|| toml::Value::Table(toml::Table::new()));

    entry.try_into().context(format!("{}.{}", block.section, block.key))
}
