//! Property-based tests for the upgrade pipeline.

use proptest::prelude::*;
use schema_upgrade_core::{upgrade, TypeExpression};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn pascal_case_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,15}"
}

fn camel_case_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,15}"
}

fn legacy_kind() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("ObjectType"),
        Just("InputObjectType"),
        Just("InterfaceType"),
        Just("UnionType"),
        Just("EnumType"),
        Just("ScalarType"),
    ]
}

fn legacy_type() -> impl Strategy<Value = String> {
    let base = prop_oneof![
        Just("types.Int".to_string()),
        Just("types.String".to_string()),
        Just("types.Boolean".to_string()),
        Just("types.ID".to_string()),
        pascal_case_name(),
    ];
    (base, any::<bool>(), any::<bool>()).prop_map(|(base, list, non_null)| {
        let inner = if list { format!("types[{base}]") } else { base };
        if non_null {
            format!("!{inner}")
        } else {
            inner
        }
    })
}

fn field_line() -> impl Strategy<Value = String> {
    (camel_case_name(), legacy_type()).prop_map(|(name, ty)| format!("  field :{name}, {ty}"))
}

fn definition() -> impl Strategy<Value = String> {
    (
        pascal_case_name(),
        legacy_kind(),
        prop::collection::vec(field_line(), 0..6),
    )
        .prop_map(|(name, kind, fields)| {
            let mut lines = vec![format!("{name} = GraphQL::{kind}.define do")];
            lines.extend(fields);
            lines.push("end".to_string());
            lines.join("\n")
        })
}

/// Lines that mention none of the constructs any rule reacts to.
fn inert_text() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z ]{0,20}|# [a-zA-Z ]{0,20}|[A-Z][a-z]{0,8}\\.call\\([0-9]{0,3}\\)", 0..10)
        .prop_map(|lines| lines.join("\n"))
        .prop_filter("no rule keywords", |text| {
            [
                "field",
                "argument",
                "connection",
                "interfaces",
                "possible_types",
                "resolve_type",
                "coerce_",
                "name",
                "define",
            ]
            .iter()
            .all(|keyword| !text.contains(keyword))
        })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn upgrade_is_idempotent(source in definition()) {
        let once = upgrade(&source);
        prop_assert_eq!(upgrade(&once), once);
    }

    #[test]
    fn definitions_become_classes(source in definition()) {
        let upgraded = upgrade(&source);
        prop_assert!(upgraded.starts_with("class "));
        prop_assert!(!upgraded.contains(".define do"));
    }

    #[test]
    fn every_field_gets_a_nullability(source in definition()) {
        let upgraded = upgrade(&source);
        for line in upgraded.lines().filter(|l| l.trim_start().starts_with("field ")) {
            prop_assert!(line.contains("null: "), "line without null: {}", line);
        }
    }

    #[test]
    fn line_count_is_preserved_for_flat_definitions(source in definition()) {
        prop_assert_eq!(upgrade(&source).lines().count(), source.lines().count());
    }

    #[test]
    fn inert_text_is_untouched(text in inert_text()) {
        prop_assert_eq!(upgrade(&text), text);
    }

    #[test]
    fn type_rendering_is_stable(ty in legacy_type()) {
        let parsed = TypeExpression::parse(&ty).expect("generated types are recognized");
        let rendered = parsed.render();
        let reparsed = TypeExpression::parse(&rendered).expect("rendered types are recognized");
        prop_assert_eq!(reparsed.render(), rendered);
    }
}
