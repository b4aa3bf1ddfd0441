use crate::block::BlockMatcher;
use crate::error::{SkipReason, Skipped};
use crate::lexer::tokenize_code;
use crate::rules::declaration::Statement;
use crate::rules::resolve::{method_lines, ProcLiteral};
use crate::rules::{Rule, RuleKind, RuleOutcome};
use crate::source::{indentation, SourceText};
use crate::token::Token;

/// Type-level hooks that legacy definitions assign as procs.
const CLASS_HOOKS: &[&str] = &["resolve_type", "coerce_input", "coerce_result"];

/// Whether `line` assigns one of the hooks, e.g. `resolve_type ->(obj, ctx) {`.
fn hook_on(line: &str) -> Option<&'static str> {
    let tokens = tokenize_code(line);
    let first = tokens.first().filter(|t| t.is(Token::Ident))?;
    let hook = CLASS_HOOKS.iter().copied().find(|h| first.is_ident(h))?;
    let next = tokens.get(1)?;
    let proc_start = next.is(Token::Arrow)
        || next.is_ident("lambda")
        || next.is_ident("proc")
        || (next.is(Token::LParen) && next.span.start == first.span.end);
    proc_start.then_some(hook)
}

/// Turns `resolve_type` and coercion procs into `def self.<hook>` methods.
///
/// Parameter names and the body are kept as written.
#[derive(Debug, Default)]
pub struct ClassProcRule;

impl Rule for ClassProcRule {
    fn kind(&self) -> RuleKind {
        RuleKind::ClassProc
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        let mut text = SourceText::from(source);
        let mut edits = Vec::new();
        let mut skipped = Vec::new();

        {
            let matcher = BlockMatcher::new(text.lines());
            let mut index = 0;
            while index < text.len() {
                let line = text.line(index);
                let Some(hook) = hook_on(line) else {
                    index += 1;
                    continue;
                };
                let Some(end) = matcher.statement_end(index) else {
                    skipped.push(Skipped::at(
                        self.kind(),
                        index,
                        line,
                        SkipReason::UnbalancedBlock {
                            opener: line.trim().to_string(),
                        },
                    ));
                    index += 1;
                    continue;
                };

                let parsed = Statement::parse(&text.join(index..=end))
                    .ok_or_else(|| SkipReason::UnsupportedResolver {
                        text: line.trim().to_string(),
                    })
                    .and_then(|stmt| {
                        ProcLiteral::parse(&stmt.value).map(|proc| (proc, stmt.comments))
                    });

                match parsed {
                    Ok((proc, comments)) => {
                        let indent = indentation(line);
                        let mut header = format!("self.{hook}({})", proc.params.join(", "));
                        for comment in comments {
                            header.push(' ');
                            header.push_str(&comment);
                        }
                        let lines =
                            method_lines(indent, &header, &ProcLiteral::body_lines(&proc.body));
                        edits.push((index, end, lines));
                    }
                    Err(reason) => skipped.push(Skipped::at(self.kind(), index, line, reason)),
                }
                index = end + 1;
            }
        }

        let rewrites = edits.len();
        for (start, end, lines) in edits.into_iter().rev() {
            text.splice(start..=end, lines);
        }

        RuleOutcome {
            text: text.to_string(),
            rewrites,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_type_becomes_class_method() {
        let src = "  resolve_type ->(obj, ctx) {
    Schema.types[obj.class.name]
  }";
        assert_eq!(
            ClassProcRule.apply(src).text,
            "  def self.resolve_type(obj, ctx)\n    Schema.types[obj.class.name]\n  end"
        );
    }

    #[test]
    fn coercions_with_do_end() {
        let src = "\
coerce_input ->(value, ctx) do
  Time.iso8601(value)
end
coerce_result ->(value, ctx) { value.iso8601 }";
        let out = ClassProcRule.apply(src);
        assert_eq!(
            out.text,
            "\
def self.coerce_input(value, ctx)
  Time.iso8601(value)
end
def self.coerce_result(value, ctx)
  value.iso8601
end"
        );
        assert_eq!(out.rewrites, 2);
    }

    #[test]
    fn non_proc_hook_is_skipped() {
        let src = "resolve_type(TypeResolver.method(:call))";
        let out = ClassProcRule.apply(src);
        assert_eq!(out.text, src);
        assert_eq!(out.skipped.len(), 1);
    }

    #[test]
    fn class_method_is_idempotent() {
        let src = "def self.resolve_type(obj, ctx)\n  obj\nend";
        assert_eq!(ClassProcRule.apply(src), RuleOutcome::unchanged(src));
    }

    #[test]
    fn plain_calls_are_untouched() {
        let src = "resolve_type :foo";
        assert_eq!(ClassProcRule.apply(src), RuleOutcome::unchanged(src));
    }
}
