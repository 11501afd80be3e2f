//! Consistency checks shared by the builder and the validator.

use joinery_domain::{Literal, ParamType};
use joinery_grammar::placeholders;

/// Names declared more than once, each reported once, in first-repeat order.
pub(crate) fn duplicate_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    let mut duplicates = Vec::new();
    for name in names {
        if seen.contains(&name) {
            if !duplicates.contains(&name) {
                duplicates.push(name);
            }
        } else {
            seen.push(name);
        }
    }
    duplicates
}

/// Placeholders in `condition` that name no declared parameter, deduplicated.
pub(crate) fn undeclared_placeholders<'a>(condition: &'a str, declared: &[&str]) -> Vec<&'a str> {
    let mut missing = Vec::new();
    for placeholder in placeholders(condition) {
        if !declared.contains(&placeholder.name) && !missing.contains(&placeholder.name) {
            missing.push(placeholder.name);
        }
    }
    missing
}

/// The default conformed to `ty`, or the offending literal.
pub(crate) fn conformed_default(default: &Literal, ty: ParamType) -> Result<Literal, Literal> {
    default.clone().conform(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_reported_once() {
        assert_eq!(duplicate_names(["a", "b", "a", "a", "b"]), vec!["a", "b"]);
        assert!(duplicate_names(["a", "b"]).is_empty());
    }

    #[test]
    fn undeclared_placeholders_deduplicated() {
        let missing = undeclared_placeholders(":a = :b OR :b = :c", &["a"]);
        assert_eq!(missing, vec!["b", "c"]);
    }
}
