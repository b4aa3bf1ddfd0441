use std::collections::BTreeSet;

use crate::rules::declaration::{rewrite_declarations, Edit};
use crate::rules::{Rule, RuleKind, RuleOutcome};

/// Block statements naming the method a field reads from.
const METHOD_STATEMENTS: &[&str] = &["property", "method"];

pub(crate) fn is_method_statement(keyword: &str) -> bool {
    METHOD_STATEMENTS.contains(&keyword)
}

/// Renames `property:` to `method:` on `field` declarations and pulls a
/// leftover `property :x` block statement into the declaration.
#[derive(Debug, Default)]
pub struct PropertyToMethodRule;

impl Rule for PropertyToMethodRule {
    fn kind(&self) -> RuleKind {
        RuleKind::PropertyToMethod
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        rewrite_declarations(self.kind(), source, "field", |decl, lines| {
            let mut sig = decl.signature.clone();
            let mut removed = BTreeSet::new();
            let mut changed = sig.rename_kwarg("property", "method");

            if !sig.has_kwarg("method") {
                if let Some((range, stmt)) = decl.find_statement(lines, METHOD_STATEMENTS) {
                    sig.push_kwarg("method", stmt.value);
                    sig.comments.extend(stmt.comments);
                    removed.extend(range);
                    changed = true;
                }
            }

            if changed {
                Edit::replace(decl.reassemble(lines, sig, &removed, Vec::new()))
            } else {
                Edit::keep()
            }
        })
    }
}
