//! Facade crate for the joinery libraries.
//! Re-exports the domain model, grammar, join builder and validator, and the merge engine.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Depend on `joinery` for the pure functions.
//! - Enable `generator` (on by default) for the async pipeline and its storage.

pub use joinery_domain as domain;
pub use joinery_kernel as kernel;

pub use joinery_grammar::{coerce, parse_field_reference, parse_parameter_spec, split_references};
pub use joinery_joins::{build_join_definition, validate, validate_reference_arity};
pub use joinery_merge::{MARKER, merge, render};

/// Feature slices, by concern.
pub mod features {
    #[cfg(feature = "generator")]
    pub use joinery_generator as generator;
    pub use joinery_grammar as grammar;
    pub use joinery_joins as joins;
    pub use joinery_merge as merge;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "grammar",
        "joins",
        "merge",
        #[cfg(feature = "generator")]
        "generator",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[cfg(feature = "generator")]
pub use joinery_storage as storage;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_surface_is_reachable_from_the_facade() {
        let spec = parse_parameter_spec("category:string,required").unwrap();
        assert!(spec.required);
        let reference = parse_field_reference("products:electronics.price").unwrap();
        assert_eq!(reference.parameters(), ["electronics"]);
        assert!(features::is_enabled("merge"));
        assert!(!features::is_enabled("licensing"));
    }
}
