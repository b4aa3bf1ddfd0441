use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::BlockMatcher;
use crate::error::{SkipReason, Skipped};
use crate::rules::{Rule, RuleKind, RuleOutcome};
use crate::source::SourceText;

static DEFINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<indent>[ \t]*)(?P<name>[A-Z][A-Za-z0-9_]*(?:::[A-Z][A-Za-z0-9_]*)*)\s*=\s*GraphQL::(?P<kind>[A-Za-z]+)\.define\s+do\s*(?P<comment>#.*)?$",
    )
    .expect("definition regex is valid")
});

/// The six legacy definition kinds and their class-based bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKind {
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    Scalar,
}

impl LegacyKind {
    pub const ALL: [LegacyKind; 6] = [
        Self::Object,
        Self::Interface,
        Self::Union,
        Self::Enum,
        Self::InputObject,
        Self::Scalar,
    ];

    /// The legacy constant under `GraphQL::`, e.g. `ObjectType`.
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Self::Object => "ObjectType",
            Self::Interface => "InterfaceType",
            Self::Union => "UnionType",
            Self::Enum => "EnumType",
            Self::InputObject => "InputObjectType",
            Self::Scalar => "ScalarType",
        }
    }

    /// The class-based base class, without namespace.
    pub fn base_class(&self) -> &'static str {
        match self {
            Self::Object => "BaseObject",
            Self::Interface => "BaseInterface",
            Self::Union => "BaseUnion",
            Self::Enum => "BaseEnum",
            Self::InputObject => "BaseInputObject",
            Self::Scalar => "BaseScalar",
        }
    }

    pub fn from_legacy_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.legacy_name() == name)
    }

    /// Whether `class` names one of the six base classes, in any namespace.
    pub fn is_base_class(class: &str) -> bool {
        let unqualified = crate::naming::unqualified(class);
        Self::ALL.iter().any(|k| k.base_class() == unqualified)
    }
}

/// Rewrites `Name = GraphQL::<Kind>.define do` headers into class headers.
pub struct TypeDefinitionRule {
    base_namespace: String,
}

impl TypeDefinitionRule {
    pub fn new(base_namespace: impl Into<String>) -> Self {
        Self {
            base_namespace: base_namespace.into(),
        }
    }

    fn superclass(&self, kind: LegacyKind) -> String {
        if self.base_namespace.is_empty() {
            kind.base_class().to_string()
        } else {
            format!("{}::{}", self.base_namespace, kind.base_class())
        }
    }
}

impl Default for TypeDefinitionRule {
    fn default() -> Self {
        Self::new("Types")
    }
}

impl Rule for TypeDefinitionRule {
    fn kind(&self) -> RuleKind {
        RuleKind::TypeDefinition
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        let mut text = SourceText::from(source);
        let mut rewrites = 0;
        let mut skipped = Vec::new();

        let matcher = BlockMatcher::new(text.lines());
        let mut headers = Vec::new();

        for (index, line) in text.lines().iter().enumerate() {
            let Some(caps) = DEFINE_RE.captures(line) else {
                continue;
            };
            let Some(kind) = LegacyKind::from_legacy_name(&caps["kind"]) else {
                continue;
            };
            if matcher.match_block(index).is_none() {
                skipped.push(Skipped::at(
                    self.kind(),
                    index,
                    line,
                    SkipReason::UnbalancedBlock {
                        opener: line.trim().to_string(),
                    },
                ));
                continue;
            }

            let mut header = format!(
                "{}class {} < {}",
                &caps["indent"],
                &caps["name"],
                self.superclass(kind)
            );
            if let Some(comment) = caps.name("comment") {
                header.push(' ');
                header.push_str(comment.as_str());
            }
            headers.push((index, header));
        }

        // Header rewrites keep the line count, so indices stay valid.
        for (index, header) in headers {
            text.splice(index..=index, vec![header]);
            rewrites += 1;
        }

        RuleOutcome {
            text: text.to_string(),
            rewrites,
            skipped,
        }
    }
}
