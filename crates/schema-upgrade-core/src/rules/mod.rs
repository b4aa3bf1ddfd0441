//! The closed set of rewrite rules and the trait they share.
//!
//! Each rule is a pure text→text transform. Rules never talk to each other;
//! the only thing they share is the text the pipeline threads through them.

use std::fmt;
use std::str::FromStr;

use crate::error::Skipped;

mod class_proc;
mod declaration;
mod implements;
mod name;
mod property;
mod resolve;
mod type_definition;

pub use class_proc::ClassProcRule;
pub use declaration::{ArgumentRule, ConnectionRule, FieldRule, InputFieldRule};
pub use implements::{ImplementsRule, PossibleTypesRule};
pub use name::NameRule;
pub use property::PropertyToMethodRule;
pub use resolve::ResolveProcRule;
pub use type_definition::{LegacyKind, TypeDefinitionRule};

// ---------------------------------------------------------------------------
// RuleKind
// ---------------------------------------------------------------------------

/// Identifies a rule. The declaration order is the pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    TypeDefinition,
    Name,
    Field,
    Argument,
    InputField,
    Connection,
    PropertyToMethod,
    ResolveProc,
    Implements,
    PossibleTypes,
    ClassProc,
}

impl RuleKind {
    /// Every rule, in pipeline order.
    pub const ALL: [RuleKind; 11] = [
        Self::TypeDefinition,
        Self::Name,
        Self::Field,
        Self::Argument,
        Self::InputField,
        Self::Connection,
        Self::PropertyToMethod,
        Self::ResolveProc,
        Self::Implements,
        Self::PossibleTypes,
        Self::ClassProc,
    ];

    /// The snake_case name used in configuration files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeDefinition => "type_definition",
            Self::Name => "name",
            Self::Field => "field",
            Self::Argument => "argument",
            Self::InputField => "input_field",
            Self::Connection => "connection",
            Self::PropertyToMethod => "property_to_method",
            Self::ResolveProc => "resolve_proc",
            Self::Implements => "implements",
            Self::PossibleTypes => "possible_types",
            Self::ClassProc => "class_proc",
        }
    }

    /// One-line summary of what the rule rewrites.
    pub fn description(&self) -> &'static str {
        match self {
            Self::TypeDefinition => "`X = GraphQL::ObjectType.define do` becomes `class X < Types::BaseObject`",
            Self::Name => "drops an inferable `name \"X\"` or renames it to `graphql_name`",
            Self::Field => "flattens `field` declarations and emits `null:`",
            Self::Argument => "rewrites `argument` types and emits `required:`",
            Self::InputField => "turns `input_field` into `argument`",
            Self::Connection => "turns `connection` into `field ..., connection: true`",
            Self::PropertyToMethod => "renames `property:` to `method:`",
            Self::ResolveProc => "moves `resolve` procs into resolver methods",
            Self::Implements => "expands `interfaces [A, B]` into `implements` lines",
            Self::PossibleTypes => "unwraps `possible_types [A, B]`",
            Self::ClassProc => "turns `resolve_type` and coercion procs into class methods",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a rule name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRule(pub String);

impl fmt::Display for UnknownRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = RuleKind::ALL.iter().map(RuleKind::as_str).collect();
        write!(
            f,
            "unknown rule '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownRule {}

impl FromStr for RuleKind {
    type Err = UnknownRule;

    /// Accepts snake_case or kebab-case names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownRule(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// The result of applying one rule to a whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub text: String,
    /// Number of constructs rewritten.
    pub rewrites: usize,
    /// Constructs recognized but left untouched.
    pub skipped: Vec<Skipped>,
}

impl RuleOutcome {
    /// An outcome that leaves `source` as it was.
    pub fn unchanged(source: &str) -> Self {
        Self {
            text: source.to_string(),
            rewrites: 0,
            skipped: Vec::new(),
        }
    }
}

/// A single rewrite over the full source text.
///
/// Implementations must return the input unchanged when their pattern is
/// absent, and must not match their own output.
pub trait Rule: Send + Sync {
    fn kind(&self) -> RuleKind;

    fn apply(&self, source: &str) -> RuleOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        let mut sorted = RuleKind::ALL;
        sorted.sort();
        assert_eq!(sorted, RuleKind::ALL);
    }

    #[test]
    fn names_round_trip() {
        for kind in RuleKind::ALL {
            assert_eq!(kind.as_str().parse::<RuleKind>(), Ok(kind));
        }
    }

    #[test]
    fn kebab_case_is_accepted() {
        assert_eq!("resolve-proc".parse::<RuleKind>(), Ok(RuleKind::ResolveProc));
        assert_eq!(" Field ".parse::<RuleKind>(), Ok(RuleKind::Field));
    }

    #[test]
    fn unknown_rule_lists_known_names() {
        let err = "fields".parse::<RuleKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'fields'"));
        assert!(msg.contains("input_field"));
    }

    #[test]
    fn unchanged_outcome() {
        let outcome = RuleOutcome::unchanged("abc");
        assert_eq!(outcome.text, "abc");
        assert_eq!(outcome.rewrites, 0);
        assert!(outcome.skipped.is_empty());
    }
}
