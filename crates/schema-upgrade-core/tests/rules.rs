//! End-to-end behavior of the full pipeline on small fragments.

use schema_upgrade_core::rules::LegacyKind;
use schema_upgrade_core::{upgrade, SkipReason, TypeExpression, UpgradeOptions, Upgrader};

// ---------------------------------------------------------------------------
// Type expressions
// ---------------------------------------------------------------------------

#[test]
fn non_null_marker_sets_nullability() {
    let ty = TypeExpression::parse("!Foo").unwrap();
    assert_eq!(ty.base_type, "Foo");
    assert!(!ty.nullable);

    let ty = TypeExpression::parse("Foo").unwrap();
    assert!(ty.nullable);
}

#[test]
fn list_nullability_comes_from_the_outer_level() {
    let ty = TypeExpression::parse("[Foo]").unwrap();
    assert!(ty.is_list());
    assert!(ty.nullable);
    assert_eq!(ty.render(), "[Foo]");

    let ty = TypeExpression::parse("![Foo]").unwrap();
    assert!(ty.is_list());
    assert!(!ty.nullable);

    let lossy = TypeExpression::parse("!types[!Foo]").unwrap();
    assert_eq!(lossy, TypeExpression::parse("!types[Foo]").unwrap());
}

#[test]
fn lambda_wrapping_survives_rendering() {
    let ty = TypeExpression::parse("-> { !types[Types::PostType] }").unwrap();
    assert!(ty.lambda_wrapped);
    assert!(!ty.nullable);
    assert_eq!(ty.render(), "-> { [Types::PostType] }");
}

#[test]
fn lambda_keyword_type_is_upgraded() {
    assert_eq!(
        upgrade("field :owner, lambda { !Types::UserType }"),
        "field :owner, -> { Types::UserType }, null: false"
    );
}

#[test]
fn unrecognized_type_reports_the_expression() {
    let err = TypeExpression::parse("build_type(:post)").unwrap_err();
    assert_eq!(
        err,
        SkipReason::UnrecognizedType {
            expr: "build_type(:post)".into()
        }
    );
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[test]
fn field_rename() {
    assert_eq!(
        upgrade("field :firstName, !types.String"),
        "field :first_name, String, null: false"
    );
}

#[test]
fn argument_required_flag() {
    assert_eq!(
        upgrade(r#"argument :status, !TodoStatus, "Restrict items to this status""#),
        r#"argument :status, TodoStatus, "Restrict items to this status", required: true"#
    );
}

#[test]
fn connection_appends_flag_after_null() {
    assert_eq!(
        upgrade("connection :posts, PostType.connection_type, max_page_size: 50"),
        "field :posts, PostType.connection_type, max_page_size: 50, null: true, connection: true"
    );
}

#[test]
fn property_becomes_method_and_name_is_underscored() {
    assert_eq!(
        upgrade("field :displayName, types.String, property: :name"),
        "field :display_name, String, method: :name, null: true"
    );
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

#[test]
fn definition_mapping_table() {
    let expected = [
        ("ObjectType", "BaseObject"),
        ("InterfaceType", "BaseInterface"),
        ("UnionType", "BaseUnion"),
        ("EnumType", "BaseEnum"),
        ("InputObjectType", "BaseInputObject"),
        ("ScalarType", "BaseScalar"),
    ];
    for (legacy, base) in expected {
        let kind = LegacyKind::from_legacy_name(legacy).unwrap();
        assert_eq!(kind.base_class(), base);
        assert_eq!(
            upgrade(&format!("Thing = GraphQL::{legacy}.define do\nend")),
            format!("class Thing < Types::{base}\nend")
        );
    }
}

#[test]
fn qualified_definition_name_is_kept() {
    assert_eq!(
        upgrade("Admin::AuditType = GraphQL::ObjectType.define do\nend"),
        "class Admin::AuditType < Types::BaseObject\nend"
    );
}

#[test]
fn inferable_name_is_deleted() {
    let src = "UserType = GraphQL::ObjectType.define do\n  name \"User\"\n  field :id, !types.ID\nend";
    assert_eq!(
        upgrade(src),
        "class UserType < Types::BaseObject\n  field :id, ID, null: false\nend"
    );
}

#[test]
fn mismatched_name_becomes_graphql_name() {
    let src = "TeamType = GraphQL::ObjectType.define do\n  name \"User\"\nend";
    assert_eq!(
        upgrade(src),
        "class TeamType < Types::BaseObject\n  graphql_name \"User\"\nend"
    );
}

#[test]
fn base_namespace_is_configurable() {
    let upgrader = Upgrader::with_options(UpgradeOptions {
        base_namespace: String::new(),
        ..UpgradeOptions::default()
    });
    assert_eq!(
        upgrader.upgrade("PostType = GraphQL::ObjectType.define do\nend"),
        "class PostType < BaseObject\nend"
    );
}

// ---------------------------------------------------------------------------
// Resolvers and interfaces
// ---------------------------------------------------------------------------

#[test]
fn resolver_parameters_become_accessors() {
    let src = "\
field :fullName, !types.String do
  resolve ->(obj, arg, ctx) { ctx[:formatter].call(obj.objective, ctx_total) }
end";
    assert_eq!(
        upgrade(src),
        "\
field :full_name, String, null: false

def full_name
  context[:formatter].call(object.objective, ctx_total)
end"
    );
}

#[test]
fn quoted_strings_inside_interpolation_do_not_hide_params() {
    let src = r##"field :label, !types.String do
  resolve ->(obj, args, ctx) { "#{obj.tags.join(", ")} for #{ctx[:user]}" }
end"##;
    let report = Upgrader::new().upgrade_with_report(src);
    assert_eq!(
        report.output,
        r##"field :label, String, null: false

def label
  "#{object.tags.join(", ")} for #{context[:user]}"
end"##
    );
    assert!(report.skipped.is_empty());
}

#[test]
fn interfaces_expand_in_order() {
    assert_eq!(
        upgrade("interfaces [A, B]\ninterfaces [C]"),
        "implements A\nimplements B\nimplements C"
    );
}

// ---------------------------------------------------------------------------
// Totality
// ---------------------------------------------------------------------------

#[test]
fn unrelated_text_is_untouched() {
    let src = "# frozen_string_literal: true\n\nmodule Util\n  def self.call(x)\n    x * 2\n  end\nend\n";
    assert_eq!(upgrade(src), src);
}

#[test]
fn malformed_definition_is_left_in_place() {
    let src = "BrokenType = GraphQL::ObjectType.define do\n  field :a, types.Int do\n";
    let report = Upgrader::new().upgrade_with_report(src);
    assert!(report.output.starts_with("BrokenType = GraphQL::ObjectType.define do"));
    assert!(report
        .skipped
        .iter()
        .any(|s| matches!(s.reason, SkipReason::UnbalancedBlock { .. })));
}

#[test]
fn partially_upgraded_source_converges() {
    let src = "\
class PostType < Types::BaseObject
  field :title, String, null: false
  field :bodyText, types.String
end";
    let once = upgrade(src);
    assert_eq!(
        once,
        "\
class PostType < Types::BaseObject
  field :title, String, null: false
  field :body_text, String, null: true
end"
    );
    assert_eq!(upgrade(&once), once);
}
