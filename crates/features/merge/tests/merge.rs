use indexmap::IndexMap;
use joinery_domain::{
    DomainConfig, Entry, FieldSpec, FilterSpec, JoinDefinition, JoinKind, ParamType,
    ParameterSpec, SectionKind,
};
use joinery_merge::{MARKER, load_domain, merge, render};
use proptest::prelude::*;

fn products() -> JoinDefinition {
    JoinDefinition {
        key: "products".into(),
        display_name: "Products".into(),
        join_kind: JoinKind::Left,
        source_table: "products".into(),
        parameters: vec![ParameterSpec::new("category", ParamType::String).required()],
        fields: IndexMap::from([
            ("name".to_owned(), FieldSpec::new("name", ParamType::String)),
            ("price".to_owned(), FieldSpec::new("price", ParamType::Float)),
        ]),
        join_condition: Some("products.category = :category".into()),
    }
}

fn generated(fields: &[(&str, ParamType)]) -> DomainConfig {
    let mut config = DomainConfig::new();
    for (name, ty) in fields {
        let field = FieldSpec::new(*name, *ty);
        config.insert_filter(FilterSpec::equality(&field));
        config.insert_field(field);
    }
    config.insert_join(products());
    config
}

#[test]
fn first_generation_is_identity() {
    let config = generated(&[("id", ParamType::Integer), ("total", ParamType::Float)]);
    assert_eq!(merge(config.clone(), None), config);
}

#[test]
fn merging_a_rendered_file_is_a_no_op() {
    let config = generated(&[("id", ParamType::Integer), ("total", ParamType::Float)]);
    let text = render(&config);
    assert!(!text.lines().any(|l| l.trim() == MARKER));
    assert_eq!(merge(config.clone(), Some(&text)), config);
}

#[test]
fn customized_entry_survives_schema_removal() {
    let old = generated(&[("id", ParamType::Integer)]);
    let text = format!(
        "{}\n{MARKER}\n[fields.legacy_sku]\ntype = \"string\"\n",
        render(&old)
    );

    let merged = merge(generated(&[("id", ParamType::Integer)]), Some(&text));
    let entry = &merged.fields["legacy_sku"];
    assert!(entry.is_customized());
    assert_eq!(entry.preserved_text(), Some("# @joinery:custom\n[fields.legacy_sku]\ntype = \"string\"\n"));
    assert_eq!(merged.field("legacy_sku"), Some(&FieldSpec::new("legacy_sku", ParamType::String)));
    assert!(render(&merged).contains("# @joinery:custom\n[fields.legacy_sku]\ntype = \"string\"\n"));
}

#[test]
fn customized_entry_beats_a_type_change() {
    let text = "[fields.total] # @joinery:custom\ntype = \"integer\" # cents\n";
    let merged = merge(generated(&[("total", ParamType::Float)]), Some(text));

    assert_eq!(merged.field("total").map(|f| f.ty), Some(ParamType::Integer));
    assert!(render(&merged).contains("type = \"integer\" # cents"));
}

#[test]
fn unmarked_entries_follow_the_schema() {
    let text = "[fields.total]\ntype = \"integer\"\n";
    let merged = merge(generated(&[("total", ParamType::Float)]), Some(text));

    assert!(merged.fields["total"].is_generated());
    assert_eq!(merged.field("total").map(|f| f.ty), Some(ParamType::Float));
}

#[test]
fn unmarked_stale_entries_are_retained_after_generated_keys() {
    let text = "\
[fields.zeta]
type = \"string\"

[fields.id]
type = \"integer\"

[fields.alpha]
type = \"boolean\"
";
    let merged = merge(
        generated(&[("total", ParamType::Float), ("id", ParamType::Integer)]),
        Some(text),
    );

    assert_eq!(merged.keys(SectionKind::Fields), vec!["total", "id", "zeta", "alpha"]);
    assert!(matches!(merged.fields["zeta"], Entry::Retained(_)));
    assert!(matches!(merged.fields["alpha"], Entry::Retained(_)));
}

#[test]
fn customized_join_keeps_its_definition() {
    let text = "\
# @joinery:custom
[joins.products]
display_name = \"Catalog\"
join_kind = \"inner\"
source_table = \"catalog\"
condition = \"catalog.category = :category AND catalog.region = :region\"
parameters = [
  { name = \"category\", type = \"string\", required = true },
  { name = \"region\", type = \"string\", default = \"eu\" },
]
fields = { name = \"string\" }
";
    let merged = merge(generated(&[]), Some(text));
    let join = merged.join("products").unwrap();
    assert_eq!(join.display_name, "Catalog");
    assert_eq!(join.arity(), 2);
    assert!(merged.joins["products"].is_customized());
}

#[test]
fn remerging_merged_output_is_stable() {
    let text = format!("{MARKER}\n[fields.legacy_sku]\ntype = \"string\"\n\n[fields.old]\ntype = \"date\"\n");
    let schema = generated(&[("id", ParamType::Integer)]);

    let once = merge(schema.clone(), Some(&text));
    let rendered = render(&once);
    let twice = merge(schema, Some(&rendered));

    assert_eq!(render(&twice), rendered);
    assert_eq!(twice.keys(SectionKind::Fields), once.keys(SectionKind::Fields));
}

#[test]
fn unmappable_headers_are_carried_and_reported() {
    let broken = "[fields.\"open\ntype = 1\n";
    let merged = merge(generated(&[]), Some(broken));
    assert_eq!(merged.foreign, broken);

    let out = render(&merged);
    assert!(out.ends_with(&format!("\n{broken}")));
    let report = load_domain(&out).validate();
    assert!(!report.field_types_valid);
    assert!(report.issues.iter().any(|i| i.contains("unterminated quoted key")), "{:?}", report.issues);
}

#[test]
fn bare_section_tables_do_not_fail_the_merge() {
    let merged = merge(generated(&[("name", ParamType::String)]), Some("[fields]\nname = \"string\"\n"));

    assert!(merged.fields["name"].is_generated());
    let out = render(&merged);
    assert!(out.contains("[fields]\nname = \"string\"\n"));
    let report = load_domain(&out).validate();
    assert!(report.issues.iter().any(|i| i.contains("bare `[fields]` table")), "{:?}", report.issues);
}

#[test]
fn hand_written_text_outside_the_sections_survives() {
    let text = "\
# team note: do not remove ui
[fields.name]
type = \"integer\"

[ui]
theme = \"dark\"

# closing remark
";
    let schema = generated(&[("name", ParamType::String)]);
    let merged = merge(schema.clone(), Some(text));
    assert_eq!(merged.preamble, "# team note: do not remove ui\n");
    assert_eq!(merged.foreign, "[ui]\ntheme = \"dark\"\n\n# closing remark\n");

    let out = render(&merged);
    assert!(out.contains("\n# team note: do not remove ui\n"));
    assert!(out.contains("\n[ui]\ntheme = \"dark\"\n"));
    assert!(out.ends_with("# closing remark\n"));
    assert!(toml::from_str::<toml::Table>(&out).is_ok());
    assert_eq!(render(&merge(schema, Some(&out))), out);
}

#[test]
fn customized_join_with_a_multiline_condition_stays_whole() {
    let join = "\
# @joinery:custom
[joins.p]
condition = \"\"\"
p.a = 1
[fields.name]
\"\"\"
fields = {}
";
    let merged = merge(generated(&[("name", ParamType::String)]), Some(join));

    assert_eq!(merged.joins["p"].preserved_text(), Some(join));
    assert!(merged.fields["name"].is_generated());
    let out = render(&merged);
    let table: toml::Table = toml::from_str(&out).unwrap();
    assert_eq!(table["joins"]["p"]["condition"].as_str(), Some("p.a = 1\n[fields.name]\n"));
}

#[test]
fn control_characters_in_keys_survive_a_round_trip() {
    let config = generated(&[("bell\u{7}", ParamType::String), ("tab\tkey", ParamType::Integer)]);
    let text = render(&config);
    assert!(text.contains("[fields.\"bell\\u0007\"]"));
    assert_eq!(merge(config.clone(), Some(&text)), config);
}

#[test]
fn loaded_domain_reports_typos_and_unreadable_entries() {
    let text = "\
[fields.total]
type = \"decmal\"

[joins.products]
condition = \"products.category = :category\"
parameters = [{ name = \"category\", type = \"sting\" }]
fields = { name = \"string\" }

[joins.broken]
parameters = \"nope\"
";
    let loaded = load_domain(text);
    assert_eq!(loaded.joins.len(), 1);
    assert_eq!(loaded.unreadable.len(), 1);

    let report = loaded.validate();
    assert!(!report.field_types_valid);
    assert!(!report.parameters_valid);
    assert!(report.join_conditions_valid);
    assert!(report.issues.iter().any(|i| i.contains("`decmal`")), "{:?}", report.issues);
    assert!(report.issues.iter().any(|i| i.contains("`sting`")), "{:?}", report.issues);
    assert!(report.issues.iter().any(|i| i.starts_with("joins broken: unreadable entry")));
}

#[test]
fn rendered_joins_load_back_cleanly() {
    let loaded = load_domain(&render(&generated(&[("id", ParamType::Integer)])));
    assert!(loaded.unreadable.is_empty());
    assert!(loaded.validate().is_valid());
    assert_eq!(loaded.joins["products"].to_definition(), products());
}

fn arb_type() -> impl Strategy<Value = ParamType> {
    prop_oneof![
        Just(ParamType::String),
        Just(ParamType::Integer),
        Just(ParamType::Float),
        Just(ParamType::Boolean),
        Just(ParamType::Date),
        Just(ParamType::DateTime),
    ]
}

fn arb_fields() -> impl Strategy<Value = Vec<(String, ParamType)>> {
    proptest::collection::vec(("[a-z][a-z0-9_ ]{0,8}", arb_type()), 0..6)
}

fn config_of(fields: &[(String, ParamType)]) -> DomainConfig {
    let mut config = DomainConfig::new();
    for (name, ty) in fields {
        let field = FieldSpec::new(name.as_str(), *ty);
        config.insert_filter(FilterSpec::equality(&field));
        config.insert_field(field);
    }
    config
}

proptest! {
    #[test]
    fn identity_and_idempotence_hold(fields in arb_fields()) {
        let config = config_of(&fields);
        prop_assert_eq!(merge(config.clone(), None), config.clone());
        let text = render(&config);
        prop_assert_eq!(merge(config.clone(), Some(&text)), config);
    }

    #[test]
    fn marked_entries_always_survive(old in arb_fields(), new in arb_fields()) {
        let mut previous = config_of(&old);
        previous.fields.clear();
        let mut text = render(&previous);
        for (name, ty) in &old {
            let rendered = render(&config_of(&[(name.clone(), *ty)]));
            let block = rendered.split("\n\n").nth(1).unwrap_or_default();
            text.push_str(&format!("\n{MARKER}\n{block}"));
        }

        // A repeated name keeps its first block; later ones are carried as foreign text.
        let merged = merge(config_of(&new), Some(&text));
        for (name, _) in &old {
            prop_assert!(merged.fields[name.as_str()].is_customized());
        }
    }
}
