use std::fmt;

use crate::rules::RuleKind;

/// A byte-offset span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Creates a new span from start (inclusive) to end (exclusive).
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Why a recognized construct was left untouched.
///
/// None of these abort an upgrade. The rule that hits one skips that single
/// occurrence and carries on with the rest of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkipReason {
    /// A block opener has no balancing `end` before the end of the text.
    UnbalancedBlock { opener: String },

    /// A statement never closes its brackets before the end of the text.
    UnterminatedStatement { keyword: String },

    /// A type expression does not fit the legacy type grammar.
    UnrecognizedType { expr: String },

    /// A declaration gives no type, inline or in its block.
    MissingType { name: String },

    /// A resolver is not a proc literal that can be split into params and body.
    UnsupportedResolver { text: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnbalancedBlock { opener } => {
                write!(f, "block opened by '{opener}' has no matching 'end'")
            }
            Self::UnterminatedStatement { keyword } => {
                write!(f, "'{keyword}' statement never closes its brackets")
            }
            Self::UnrecognizedType { expr } => {
                write!(f, "unrecognized type expression '{expr}'")
            }
            Self::MissingType { name } => {
                write!(f, "declaration of '{name}' has no type")
            }
            Self::UnsupportedResolver { text } => {
                write!(
                    f,
                    "resolver '{text}' is not a proc literal; convert it by hand"
                )
            }
        }
    }
}

impl std::error::Error for SkipReason {}

/// A construct that a rule recognized but did not rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub rule: RuleKind,
    /// 1-based line number in the text the rule was applied to.
    pub line: usize,
    /// The trimmed source line that triggered the rule.
    pub snippet: String,
    pub reason: SkipReason,
}

impl Skipped {
    /// Builds a skip record for the 0-based line `index` holding `line`.
    pub fn at(rule: RuleKind, index: usize, line: &str, reason: SkipReason) -> Self {
        Self {
            rule,
            line: index + 1,
            snippet: line.trim().to_string(),
            reason,
        }
    }
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rule skipped line {}: {}",
            self.rule, self.line, self.reason
        )
    }
}
