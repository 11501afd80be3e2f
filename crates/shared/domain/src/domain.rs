//! The domain configuration artifact and its per-entry persistence state.

use crate::Symbol;
use crate::join::{FieldSpec, FilterSpec, JoinDefinition};
use indexmap::IndexMap;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// The three top-level sections of a domain file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SectionKind {
    Fields,
    Filters,
    Joins,
}

impl SectionKind {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fields" => Some(Self::Fields),
            "filters" => Some(Self::Filters),
            "joins" => Some(Self::Joins),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// An entry carried over verbatim from a previously persisted file.
#[derive(Debug, Clone, PartialEq)]
pub struct Preserved<T> {
    /// The entry's exact source text, marker line included.
    pub text: String,
    /// The structured reading of `text`, when it still deserializes.
    pub value: Option<T>,
}

/// Where an entry of the merged configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    /// Freshly produced from the schema.
    Generated(T),
    /// Marked as hand-edited in the existing file; never regenerated.
    Customized(Preserved<T>),
    /// Unmarked, present only in the existing file; kept until the schema produces it again.
    Retained(Preserved<T>),
}

impl<T> Entry<T> {
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Generated(value) => Some(value),
            Self::Customized(p) | Self::Retained(p) => p.value.as_ref(),
        }
    }

    #[must_use]
    pub const fn is_customized(&self) -> bool {
        matches!(self, Self::Customized(_))
    }

    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    /// The preserved source text for carried-over entries.
    #[must_use]
    pub fn preserved_text(&self) -> Option<&str> {
        match self {
            Self::Generated(_) => None,
            Self::Customized(p) | Self::Retained(p) => Some(&p.text),
        }
    }
}

pub type Section<T> = IndexMap<Symbol, Entry<T>>;

/// The persisted domain configuration: fields, filters and joins in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainConfig {
    pub fields: Section<FieldSpec>,
    pub filters: Section<FilterSpec>,
    pub joins: Section<JoinDefinition>,
    /// Hand-written text above the first entry, written back below the file banner.
    pub preamble: String,
    /// Tables outside the three sections and trailing comments, written back at the end.
    pub foreign: String,
}

impl DomainConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a generated field, replacing any entry under the same name.
    pub fn insert_field(&mut self, field: FieldSpec) {
        self.fields.insert(field.name.clone(), Entry::Generated(field));
    }

    pub fn insert_filter(&mut self, filter: FilterSpec) {
        self.filters.insert(filter.name.clone(), Entry::Generated(filter));
    }

    pub fn insert_join(&mut self, join: JoinDefinition) {
        self.joins.insert(join.key.clone(), Entry::Generated(join));
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name).and_then(Entry::value)
    }

    #[must_use]
    pub fn filter(&self, name: &str) -> Option<&FilterSpec> {
        self.filters.get(name).and_then(Entry::value)
    }

    #[must_use]
    pub fn join(&self, name: &str) -> Option<&JoinDefinition> {
        self.joins.get(name).and_then(Entry::value)
    }

    /// Joins with a structured reading, keyed by name.
    #[must_use]
    pub fn join_map(&self) -> IndexMap<Symbol, JoinDefinition> {
        self.joins
            .iter()
            .filter_map(|(key, entry)| entry.value().map(|join| (key.clone(), join.clone())))
            .collect()
    }

    /// Keys of a section in output order.
    #[must_use]
    pub fn keys(&self, section: SectionKind) -> Vec<&str> {
        match section {
            SectionKind::Fields => self.fields.keys().map(String::as_str).collect(),
            SectionKind::Filters => self.filters.keys().map(String::as_str).collect(),
            SectionKind::Joins => self.joins.keys().map(String::as_str).collect(),
        }
    }

    /// Number of entries carried over because of a customization marker.
    #[must_use]
    pub fn customized_count(&self) -> usize {
        self.fields.values().filter(|e| e.is_customized()).count()
            + self.filters.values().filter(|e| e.is_customized()).count()
            + self.joins.values().filter(|e| e.is_customized()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.filters.is_empty() && self.joins.is_empty()
    }
}
