use indexmap::IndexMap;
use joinery_domain::{
    FieldReference, FieldSpec, JoinDefinition, Literal, ParamType, ParameterSpec, Symbol,
};
use joinery_joins::{
    JoinOptions, JoinSource, ParameterView, TypeToken, build_join_definition, validate,
    validate_reference_arity,
};

fn products() -> JoinDefinition {
    let fields = [FieldSpec::new("name", ParamType::String), FieldSpec::new("price", ParamType::Float)]
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect();
    build_join_definition(
        "products",
        vec![
            ParameterSpec::new("category", ParamType::String).required(),
            ParameterSpec::new("active", ParamType::Boolean).with_default(Literal::Boolean(true)),
        ],
        fields,
        Some("products.category = :category AND products.active = :active"),
        JoinOptions::default(),
    )
    .expect("valid join")
}

fn joins(list: Vec<JoinDefinition>) -> IndexMap<Symbol, JoinDefinition> {
    list.into_iter().map(|j| (j.key.clone(), j)).collect()
}

/// A join as read from a hand-edited file, with raw type tokens.
struct RawJoin {
    key: String,
    parameters: Vec<(String, String, Option<Literal>)>,
    fields: Vec<(String, String)>,
    condition: Option<String>,
}

impl JoinSource for RawJoin {
    fn key(&self) -> &str {
        &self.key
    }

    fn parameters(&self) -> Vec<ParameterView<'_>> {
        self.parameters
            .iter()
            .map(|(name, ty, default)| ParameterView {
                name,
                ty: TypeToken::Raw(ty),
                required: false,
                default: default.as_ref(),
            })
            .collect()
    }

    fn fields(&self) -> Vec<(&str, TypeToken<'_>)> {
        self.fields.iter().map(|(n, t)| (n.as_str(), TypeToken::Raw(t))).collect()
    }

    fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

#[test]
fn built_joins_validate_cleanly() {
    let report = validate(&joins(vec![products()]));
    assert!(report.is_valid(), "{:?}", report.issues);
    assert!(report.issues.is_empty());
}

#[test]
fn on_disk_joins_are_rechecked() {
    let raw = RawJoin {
        key: "products".into(),
        parameters: vec![
            ("category".into(), "sting".into(), None),
            ("limit".into(), "int".into(), Some(Literal::String("many".into()))),
            ("limit".into(), "int".into(), None),
        ],
        fields: vec![("name".into(), "text".into()), ("price".into(), "money".into())],
        condition: Some("products.category = :category AND products.region = :region".into()),
    };
    let map: IndexMap<Symbol, RawJoin> = [("products".to_owned(), raw)].into_iter().collect();

    let report = validate(&map);
    assert!(!report.parameters_valid);
    assert!(!report.field_types_valid);
    assert!(!report.join_conditions_valid);
    assert_eq!(report.issues.len(), 5, "{:#?}", report.issues);
    assert!(report.issues.iter().any(|i| i.contains("unrecognized type `sting`")));
    assert!(report.issues.iter().any(|i| i.contains("defaults to `many`")));
    assert!(report.issues.iter().any(|i| i.contains("declares `limit` more than once")));
    assert!(report.issues.iter().any(|i| i.contains("field `price` has unrecognized type `money`")));
    assert!(report.issues.iter().any(|i| i.contains("`:region`")));
}

#[test]
fn arity_mismatch_is_reported() {
    let map = joins(vec![products()]);
    let reference = FieldReference::Parameterized {
        join: "products".into(),
        parameters: vec!["electronics".into()],
        field: "price".into(),
    };
    assert_eq!(
        validate_reference_arity(&reference, &map),
        Err("parameter count mismatch: expected 2, got 1".to_owned())
    );

    let reference = FieldReference::Parameterized {
        join: "products".into(),
        parameters: vec!["electronics".into(), "true".into()],
        field: "price".into(),
    };
    assert_eq!(validate_reference_arity(&reference, &map), Ok(()));
}

#[test]
fn dot_notation_against_required_parameters_fails() {
    let map = joins(vec![products()]);
    let reference = FieldReference::DotNotation { join: "products".into(), field: "name".into() };
    assert_eq!(
        validate_reference_arity(&reference, &map),
        Err("join products requires 1 parameter(s)".to_owned())
    );
}

#[test]
fn unknown_joins_are_reported() {
    let map = joins(vec![products()]);
    let reference = FieldReference::DotNotation { join: "vendors".into(), field: "name".into() };
    assert_eq!(validate_reference_arity(&reference, &map), Err("unknown join: vendors".to_owned()));
}

#[test]
fn report_serializes_for_machine_output() {
    let report = validate(&joins(vec![products()]));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["parameters_valid"], true);
    assert_eq!(json["issues"].as_array().map(Vec::len), Some(0));
}
