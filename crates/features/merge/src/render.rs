use joinery_domain::{
    DomainConfig, Entry, FieldSpec, FilterSpec, JoinDefinition, Literal, ParameterSpec, Section,
    SectionKind,
};
use std::fmt::{self, Write};

/// First line of every rendered file.
pub(crate) const BANNER: &str =
    "# Generated by joinery. Entries marked with `# @joinery:custom` are preserved on regeneration.";

/// Renders a config as a domain file.
///
/// Output is deterministic: the banner, the preamble, sections in `fields`, `filters`,
/// `joins` order with entries in map order, then foreign text; one blank line between
/// blocks. Preserved entries and hand-written text are written back exactly as they were
/// read.
#[must_use]
pub fn render(config: &DomainConfig) -> String {
    let mut w = String::new();
    // Writing into a `String` cannot fail.
    let _ = write_config(&mut w, config);
    w
}

fn write_config(w: &mut String, config: &DomainConfig) -> fmt::Result {
    writeln!(w, "{BANNER}")?;
    if !config.preamble.is_empty() {
        writeln!(w)?;
        push_verbatim(w, &config.preamble);
    }

    write_section(w, SectionKind::Fields, &config.fields, write_field)?;
    write_section(w, SectionKind::Filters, &config.filters, write_filter)?;
    write_section(w, SectionKind::Joins, &config.joins, write_join)?;

    if !config.foreign.is_empty() {
        writeln!(w)?;
        push_verbatim(w, &config.foreign);
    }
    Ok(())
}

fn push_verbatim(w: &mut String, text: &str) {
    w.push_str(text);
    if !text.ends_with('\n') {
        w.push('\n');
    }
}

fn write_section<T>(
    w: &mut String,
    kind: SectionKind,
    section: &Section<T>,
    write_entry: fn(&mut String, &T) -> fmt::Result,
) -> fmt::Result {
    for (key, entry) in section {
        writeln!(w)?;
        match entry {
            Entry::Generated(value) => {
                writeln!(w, "[{kind}.{}]", key_segment(key))?;
                write_entry(w, value)?;
            },
            Entry::Customized(preserved) | Entry::Retained(preserved) => {
                push_verbatim(w, &preserved.text);
            },
        }
    }
    Ok(())
}

fn write_field(w: &mut String, field: &FieldSpec) -> fmt::Result {
    writeln!(w, "type = {}", quoted(field.ty.as_str()))
}

fn write_filter(w: &mut String, filter: &FilterSpec) -> fmt::Result {
    writeln!(w, "field = {}", quoted(&filter.field))?;
    writeln!(w, "operator = {}", quoted(filter.operator.into()))?;
    writeln!(w, "type = {}", quoted(filter.ty.as_str()))
}

fn write_join(w: &mut String, join: &JoinDefinition) -> fmt::Result {
    writeln!(w, "display_name = {}", quoted(&join.display_name))?;
    writeln!(w, "join_kind = {}", quoted(join.join_kind.into()))?;
    writeln!(w, "source_table = {}", quoted(&join.source_table))?;
    if let Some(condition) = &join.join_condition {
        writeln!(w, "condition = {}", quoted(condition))?;
    }

    if !join.parameters.is_empty() {
        writeln!(w, "parameters = [")?;
        for parameter in &join.parameters {
            writeln!(w, "  {},", inline_parameter(parameter))?;
        }
        writeln!(w, "]")?;
    }

    let fields = join
        .fields
        .iter()
        .map(|(name, field)| format!("{} = {}", key_segment(name), quoted(field.ty.as_str())))
        .collect::<Vec<_>>();
    if fields.is_empty() {
        writeln!(w, "fields = {{}}")
    } else {
        writeln!(w, "fields = {{ {} }}", fields.join(", "))
    }
}

fn inline_parameter(parameter: &ParameterSpec) -> String {
    let mut parts = vec![
        format!("name = {}", quoted(&parameter.name)),
        format!("type = {}", quoted(parameter.ty.as_str())),
    ];
    if parameter.required {
        parts.push("required = true".to_owned());
    }
    if let Some(default) = parameter.default.as_ref().and_then(toml_literal) {
        parts.push(format!("default = {default}"));
    }
    if let Some(description) = &parameter.description {
        parts.push(format!("description = {}", quoted(description)));
    }
    format!("{{ {} }}", parts.join(", "))
}

/// A literal as a TOML value; `None` for null, which TOML cannot express.
fn toml_literal(literal: &Literal) -> Option<String> {
    let value = match literal {
        Literal::Null => return None,
        Literal::Boolean(b) => b.to_string(),
        Literal::Integer(i) => i.to_string(),
        Literal::Float(f) if f.is_nan() => "nan".to_owned(),
        Literal::Float(f) if f.is_infinite() => {
            if f.is_sign_negative() { "-inf".to_owned() } else { "inf".to_owned() }
        },
        Literal::Float(_) => literal.to_string(),
        Literal::String(_) | Literal::Date(_) | Literal::DateTime(_) => quoted(&literal.to_string()),
    };
    Some(value)
}

/// A key as a TOML header/key segment: bare when possible, quoted otherwise.
fn key_segment(key: &str) -> String {
    let bare = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare { key.to_owned() } else { quoted(key) }
}

/// A TOML basic string.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            },
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use joinery_domain::{JoinKind, ParamType, Preserved};

    fn products() -> JoinDefinition {
        JoinDefinition {
            key: "products".into(),
            display_name: "Products".into(),
            join_kind: JoinKind::Left,
            source_table: "products".into(),
            parameters: vec![
                ParameterSpec::new("category", ParamType::String).required(),
                ParameterSpec::new("discount", ParamType::Float)
                    .with_default(Literal::Float(0.15))
                    .with_description("Fraction \"off\""),
            ],
            fields: IndexMap::from([
                ("name".to_owned(), FieldSpec::new("name", ParamType::String)),
                ("price".to_owned(), FieldSpec::new("price", ParamType::Float)),
            ]),
            join_condition: Some("products.category = :category".into()),
        }
    }

    #[test]
    fn renders_generated_entries() {
        let mut config = DomainConfig::new();
        config.insert_field(FieldSpec::new("name", ParamType::String));
        config.insert_filter(FilterSpec::equality(&FieldSpec::new("name", ParamType::String)));
        config.insert_join(products());

        let expected = "\
# Generated by joinery. Entries marked with `# @joinery:custom` are preserved on regeneration.

[fields.name]
type = \"string\"

[filters.name]
field = \"name\"
operator = \"eq\"
type = \"string\"

[joins.products]
display_name = \"Products\"
join_kind = \"left\"
source_table = \"products\"
condition = \"products.category = :category\"
parameters = [
  { name = \"category\", type = \"string\", required = true },
  { name = \"discount\", type = \"float\", default = 0.15, description = \"Fraction \\\"off\\\"\" },
]
fields = { name = \"string\", price = \"float\" }
";
        assert_eq!(render(&config), expected);
    }

    #[test]
    fn output_is_valid_toml() {
        let mut config = DomainConfig::new();
        config.insert_field(FieldSpec::new("legacy sku", ParamType::Date));
        config.insert_join(products());
        let table: toml::Table = toml::from_str(&render(&config)).unwrap();
        assert!(table["fields"].get("legacy sku").is_some());
        assert_eq!(table["joins"]["products"]["parameters"][1]["default"].as_float(), Some(0.15));
    }

    #[test]
    fn preserved_text_is_verbatim() {
        let mut config = DomainConfig::new();
        let text = "# @joinery:custom\n[fields.legacy_sku]\ntype = \"string\"   # odd spacing\n";
        config.fields.insert(
            "legacy_sku".into(),
            Entry::Customized(Preserved { text: text.into(), value: None }),
        );
        assert!(render(&config).ends_with(&format!("\n{text}")));
    }

    #[test]
    fn hand_written_text_frames_the_sections() {
        let mut config = DomainConfig::new();
        config.insert_field(FieldSpec::new("name", ParamType::String));
        config.preamble = "# owned by the catalog team\n".into();
        config.foreign = "[ui]\ntheme = \"dark\"".into();

        let out = render(&config);
        assert!(out.starts_with(&format!("{BANNER}\n\n# owned by the catalog team\n\n[fields.name]\n")));
        assert!(out.ends_with("type = \"string\"\n\n[ui]\ntheme = \"dark\"\n"));
        assert!(BANNER.contains(crate::MARKER));
    }

    #[test]
    fn literals_render_as_toml_values() {
        assert_eq!(toml_literal(&Literal::Null), None);
        assert_eq!(toml_literal(&Literal::Float(2.0)).as_deref(), Some("2.0"));
        assert_eq!(toml_literal(&Literal::Boolean(true)).as_deref(), Some("true"));
        assert_eq!(toml_literal(&Literal::String("a\"b".into())).as_deref(), Some("\"a\\\"b\""));
        let date = Literal::String("2024-03-01".into()).conform(ParamType::Date).unwrap();
        assert_eq!(toml_literal(&date).as_deref(), Some("\"2024-03-01\""));
    }
}
