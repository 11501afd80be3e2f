//! Schema facts: the introspection input of one domain.
//!
//! ```toml
//! table = "orders"
//!
//! [fields]
//! id = "integer"
//! total = "decimal"
//!
//! [[joins]]
//! name = "products"
//! parameters = ["category:string,required", "active:boolean,default=true"]
//! fields = { name = "string", price = "float" }
//! condition = "products.category = :category AND products.active = :active"
//! ```

use crate::error::{GeneratorError, GeneratorErrorExt};
use indexmap::IndexMap;
use joinery_domain::{JoinKind, Symbol};
use joinery_storage::Storage;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFacts {
    /// Source table of the domain; informational.
    pub table: Option<String>,
    /// Column name to type token, in schema order.
    #[serde(default)]
    pub fields: IndexMap<Symbol, String>,
    #[serde(default)]
    pub joins: Vec<JoinFacts>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinFacts {
    pub name: Symbol,
    pub display_name: Option<String>,
    pub source_table: Option<String>,
    #[serde(default)]
    pub kind: JoinKind,
    /// Parameter specs in positional order, e.g. `"category:string,required"`.
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub fields: IndexMap<Symbol, String>,
    pub condition: Option<String>,
}

impl SchemaFacts {
    pub fn parse(text: &str) -> Result<Self, GeneratorError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads `<name>.<extension>` from the schema directory.
    pub async fn load(
        storage: &Storage,
        name: &str,
        extension: &str,
    ) -> Result<Self, GeneratorError> {
        let path = format!("{name}.{extension}");
        let Some(text) = storage.read(&path).await.context(path.clone())? else {
            return Err(GeneratorError::MissingSchema { schema: name.to_owned(), context: None });
        };
        Self::parse(&text).context(path)
    }
}

/// Names of the schemas in the schema directory, sorted.
pub async fn discover_schemas(
    storage: &Storage,
    extension: &str,
) -> Result<Vec<String>, GeneratorError> {
    let files = storage.list(extension).await.context("Failed to scan schema directory")?;
    Ok(files
        .iter()
        .filter_map(|path| path.file_stem().and_then(|stem| stem.to_str()))
        .map(str::to_owned)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_documented_shape() {
        let facts = SchemaFacts::parse(
            r#"
table = "orders"

[fields]
id = "integer"
total = "decimal"

[[joins]]
name = "products"
kind = "inner"
parameters = ["category:string,required"]
fields = { name = "string" }
condition = "products.category = :category"
"#,
        )
        .unwrap();

        assert_eq!(facts.table.as_deref(), Some("orders"));
        assert_eq!(facts.fields.keys().collect::<Vec<_>>(), ["id", "total"]);
        assert_eq!(facts.joins[0].kind, JoinKind::Inner);
        assert_eq!(facts.joins[0].parameters, ["category:string,required"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SchemaFacts::parse("tabel = \"orders\"\n").unwrap_err();
        assert!(err.to_string().starts_with("Malformed schema facts"), "{err}");
    }
}
