use crate::block::BlockMatcher;
use crate::error::{SkipReason, Skipped};
use crate::lexer::{matching_close, split_top_level, tokenize, tokenize_code};
use crate::rules::{Rule, RuleKind, RuleOutcome};
use crate::source::{indentation, SourceText};
use crate::token::Token;

/// A `keyword [A, B, ...]` statement with its list items.
struct ListStatement {
    start: usize,
    end: usize,
    indent: String,
    items: Vec<String>,
    comments: Vec<String>,
}

/// Parses `keyword [A, B]` or `keyword([A, B])` from the statement text.
///
/// Returns `None` when the argument is not a single array literal.
fn parse_list_statement(text: &str, keyword: &str) -> Option<(Vec<String>, Vec<String>)> {
    let tokens = tokenize_code(text);
    let first = tokens.first().filter(|t| t.is_ident(keyword))?;

    let mut pos = 1;
    let parenthesized = tokens
        .get(1)
        .is_some_and(|t| t.is(Token::LParen) && t.span.start == first.span.end);
    if parenthesized {
        pos += 1;
    }

    if !tokens.get(pos).is_some_and(|t| t.is(Token::LBracket)) {
        return None;
    }
    let close = matching_close(&tokens, pos)?;
    let expected_end = if parenthesized { close + 2 } else { close + 1 };
    if tokens.len() != expected_end
        || (parenthesized && !tokens[close + 1].is(Token::RParen))
    {
        return None;
    }

    let items = split_top_level(&tokens[pos + 1..close])?
        .into_iter()
        .map(|item| text[item[0].span.start..item[item.len() - 1].span.end].to_string())
        .collect();
    let comments = tokenize(text)
        .into_iter()
        .filter(|t| t.is(Token::Comment))
        .map(|t| t.text)
        .collect();
    Some((items, comments))
}

fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    tokenize_code(line)
        .first()
        .is_some_and(|t| t.is_ident(keyword))
}

/// Finds `keyword [...]` statements, recording unterminated ones as skips.
fn find_list_statements(
    kind: RuleKind,
    text: &SourceText,
    keyword: &str,
) -> (Vec<ListStatement>, Vec<Skipped>) {
    let matcher = BlockMatcher::new(text.lines());
    let mut found = Vec::new();
    let mut skipped = Vec::new();
    let mut index = 0;

    while index < text.len() {
        let line = text.line(index);
        if !starts_with_keyword(line, keyword) {
            index += 1;
            continue;
        }
        let Some(end) = matcher.statement_end(index) else {
            skipped.push(Skipped::at(
                kind,
                index,
                line,
                SkipReason::UnterminatedStatement {
                    keyword: keyword.to_string(),
                },
            ));
            index += 1;
            continue;
        };

        if let Some((items, comments)) = parse_list_statement(&text.join(index..=end), keyword) {
            found.push(ListStatement {
                start: index,
                end,
                indent: indentation(line).to_string(),
                items,
                comments,
            });
        }
        index = end + 1;
    }

    (found, skipped)
}

fn with_comments(mut lines: Vec<String>, comments: &[String]) -> Vec<String> {
    if let Some(last) = lines.last_mut() {
        for comment in comments {
            last.push(' ');
            last.push_str(comment);
        }
    }
    lines
}

/// Expands `interfaces [A, B]` into one `implements` line per interface.
#[derive(Debug, Default)]
pub struct ImplementsRule;

impl Rule for ImplementsRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Implements
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        let mut text = SourceText::from(source);
        let (found, skipped) = find_list_statements(self.kind(), &text, "interfaces");
        let rewrites = found.len();

        for stmt in found.into_iter().rev() {
            let lines = stmt
                .items
                .iter()
                .map(|item| format!("{}implements {}", stmt.indent, item))
                .collect();
            text.splice(stmt.start..=stmt.end, with_comments(lines, &stmt.comments));
        }

        RuleOutcome {
            text: text.to_string(),
            rewrites,
            skipped,
        }
    }
}

/// Unwraps `possible_types [A, B]` into `possible_types A, B`.
#[derive(Debug, Default)]
pub struct PossibleTypesRule;

impl Rule for PossibleTypesRule {
    fn kind(&self) -> RuleKind {
        RuleKind::PossibleTypes
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        let mut text = SourceText::from(source);
        let (found, skipped) = find_list_statements(self.kind(), &text, "possible_types");
        let mut rewrites = 0;

        for stmt in found.into_iter().rev().filter(|s| !s.items.is_empty()) {
            let line = format!("{}possible_types {}", stmt.indent, stmt.items.join(", "));
            text.splice(stmt.start..=stmt.end, with_comments(vec![line], &stmt.comments));
            rewrites += 1;
        }

        RuleOutcome {
            text: text.to_string(),
            rewrites,
            skipped,
        }
    }
}
