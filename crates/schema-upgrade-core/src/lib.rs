//! # schema-upgrade-core
//!
//! Rule-based source-to-source upgrader for legacy GraphQL schema definitions.
//!
//! This crate provides:
//! - A lexer for the host-language fragments the rules reason about
//! - A nesting-aware block matcher for `do ... end` constructs
//! - A type-expression rewriter that separates nullability from the type
//! - A declaration signature parser and re-serializer
//! - A fixed pipeline of rewrite rules that turns `X = GraphQL::ObjectType.define do`
//!   definitions into `class X < Types::BaseObject` classes
//!
//! Upgrading is total: text without legacy constructs comes back byte-for-byte,
//! and a construct that cannot be rewritten safely is left as it was and
//! reported instead.
//!
//! # Example
//!
//! ```
//! use schema_upgrade_core::upgrade;
//!
//! let source = r#"UserType = GraphQL::ObjectType.define do
//!   name "User"
//!   field :firstName, !types.String
//! end"#;
//!
//! let upgraded = upgrade(source);
//! assert_eq!(
//!     upgraded,
//!     "class UserType < Types::BaseObject\n  field :first_name, String, null: false\nend"
//! );
//! assert_eq!(upgrade(&upgraded), upgraded);
//! ```

pub mod block;
pub mod error;
mod lexer;
pub mod naming;
mod pipeline;
pub mod rules;
pub mod signature;
pub mod source;
pub mod token;
pub mod type_expr;

pub use error::{SkipReason, Skipped, Span};
pub use pipeline::{upgrade, UpgradeOptions, UpgradeReport, Upgrader};
pub use rules::{Rule, RuleKind, RuleOutcome};
pub use signature::Signature;
pub use type_expr::TypeExpression;
