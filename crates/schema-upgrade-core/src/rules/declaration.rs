//! Locating and flattening `field`, `argument`, `input_field` and
//! `connection` declarations.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::block::{Block, BlockMatcher};
use crate::error::{SkipReason, Skipped};
use crate::lexer::{matching_close, tokenize, tokenize_code, SpannedToken};
use crate::naming::underscore;
use crate::rules::{property, resolve, Rule, RuleKind, RuleOutcome};
use crate::signature::{KeywordArg, Signature};
use crate::source::{is_blank, SourceText};
use crate::token::Token;
use crate::type_expr::TypeExpression;

/// Keyword arguments that hand the whole field to another object. Such a
/// declaration carries no type of its own.
const DELEGATING_KEYS: &[&str] = &["function", "resolver", "mutation", "subscription", "field"];

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

/// A statement inside a declaration block: `keyword value # comment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement {
    pub keyword: String,
    /// Everything after the keyword, with call parens removed.
    pub value: String,
    /// Comments after the last code token.
    pub comments: Vec<String>,
}

impl Statement {
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let all = tokenize(text);
        let code: Vec<SpannedToken> = all
            .iter()
            .filter(|t| !t.is(Token::Comment))
            .cloned()
            .collect();
        let keyword = code.first().filter(|t| t.is(Token::Ident))?;
        let last = &code[code.len() - 1];

        let value = match code.get(1) {
            None => String::new(),
            Some(open)
                if open.is(Token::LParen)
                    && open.span.start == keyword.span.end
                    && matching_close(&code, 1) == Some(code.len() - 1) =>
            {
                text[open.span.end..last.span.start].trim().to_string()
            }
            Some(first) => text[first.span.start..last.span.end].to_string(),
        };

        let comments = all
            .iter()
            .filter(|t| t.is(Token::Comment) && t.span.start >= last.span.end)
            .map(|t| t.text.clone())
            .collect();

        Some(Self {
            keyword: keyword.text.clone(),
            value,
            comments,
        })
    }
}

// ---------------------------------------------------------------------------
// Declaration
// ---------------------------------------------------------------------------

/// A declaration statement located in the text, with its optional block.
#[derive(Debug, Clone)]
pub(crate) struct Declaration {
    pub start: usize,
    pub header_end: usize,
    pub block: Option<Block>,
    /// Statements directly inside the block.
    pub children: Vec<RangeInclusive<usize>>,
    pub signature: Signature,
}

impl Declaration {
    /// Last line of the whole declaration, including its block.
    pub fn end(&self) -> usize {
        self.block.map_or(self.header_end, |b| b.end)
    }

    fn statements<'a>(
        &'a self,
        lines: &'a [String],
    ) -> impl Iterator<Item = (RangeInclusive<usize>, Statement)> + 'a {
        self.children.iter().filter_map(move |child| {
            let stmt = Statement::parse(&lines[child.clone()].join("\n"))?;
            Some((child.clone(), stmt))
        })
    }

    /// Finds the first block statement whose keyword is one of `keywords`.
    pub fn find_statement(
        &self,
        lines: &[String],
        keywords: &[&str],
    ) -> Option<(RangeInclusive<usize>, Statement)> {
        self.statements(lines)
            .find(|(_, stmt)| keywords.contains(&stmt.keyword.as_str()) && !stmt.value.is_empty())
    }

    /// Whether the block holds a `keyword` statement outside `removed`.
    pub fn retains(&self, lines: &[String], keyword: &str, removed: &BTreeSet<usize>) -> bool {
        self.statements(lines)
            .any(|(range, stmt)| stmt.keyword == keyword && !removed.contains(range.start()))
    }

    /// Rebuilds the declaration from `signature`, dropping the `removed`
    /// block lines and appending `trailer` after a blank line. A blank line
    /// also follows the trailer unless the next line is blank or an `end`.
    ///
    /// The block delimiters go away when nothing but blank lines remains.
    pub fn reassemble(
        &self,
        lines: &[String],
        mut signature: Signature,
        removed: &BTreeSet<usize>,
        trailer: Vec<String>,
    ) -> Vec<String> {
        let body: Vec<String> = match self.block {
            Some(block) => block
                .body()
                .filter(|i| !removed.contains(i))
                .map(|i| lines[i].clone())
                .collect(),
            None => Vec::new(),
        };
        let body = trim_blank_edges(body);

        if body.is_empty() {
            signature.trailing_block = None;
        }

        let mut out = vec![signature.render()];
        if let Some(block) = self.block.filter(|_| !body.is_empty()) {
            out.extend(body);
            out.push(lines[block.end].clone());
        }
        if !trailer.is_empty() {
            out.push(String::new());
            out.extend(trailer);
            let next = lines.get(self.end() + 1);
            if next.is_some_and(|l| !is_blank(l) && !closes_block(l)) {
                out.push(String::new());
            }
        }
        out
    }
}

fn trim_blank_edges(mut lines: Vec<String>) -> Vec<String> {
    while lines.last().is_some_and(|l| is_blank(l)) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| is_blank(l)).count();
    lines.split_off(leading)
}

fn closes_block(line: &str) -> bool {
    tokenize_code(line).first().is_some_and(|t| t.is(Token::End))
}

/// Whether `line` starts a `keyword :name ...` or `keyword(...)` call.
fn starts_declaration(line: &str, keyword: &str) -> bool {
    let tokens = tokenize_code(line);
    let Some(first) = tokens.first().filter(|t| t.is_ident(keyword)) else {
        return false;
    };
    tokens.get(1).is_some_and(|next| match next.token {
        Token::Symbol | Token::DoubleQuoted | Token::SingleQuoted => true,
        Token::LParen => next.span.start == first.span.end,
        _ => false,
    })
}

fn locate(matcher: &BlockMatcher<'_>, start: usize, keyword: &str) -> Result<Declaration, SkipReason> {
    let lines = matcher.lines();
    let unterminated = || SkipReason::UnterminatedStatement {
        keyword: keyword.to_string(),
    };
    let unbalanced = || SkipReason::UnbalancedBlock {
        opener: lines[start].trim().to_string(),
    };

    let mut header_end = matcher.header_end(start).ok_or_else(unterminated)?;
    let mut signature =
        Signature::parse(&lines[start..=header_end].join("\n")).ok_or_else(unterminated)?;
    let mut block = None;

    if matcher.opens_block(header_end) {
        if signature.trailing_block.is_some() {
            block = Some(matcher.match_block(header_end).ok_or_else(unbalanced)?);
        } else {
            // The block belongs to an argument, e.g. `resolve: ->(o, a, c) do`.
            header_end = matcher.statement_end(start).ok_or_else(unbalanced)?;
            signature = Signature::parse(&lines[start..=header_end].join("\n"))
                .ok_or_else(unterminated)?;
        }
    }

    let children = block.map(|b| matcher.children(&b)).unwrap_or_default();
    Ok(Declaration {
        start,
        header_end,
        block,
        children,
        signature,
    })
}

/// Finds every `keyword` declaration in the text, in source order.
pub(crate) fn find_declarations(
    text: &SourceText,
    keyword: &str,
) -> Vec<Result<Declaration, (usize, SkipReason)>> {
    let matcher = BlockMatcher::new(text.lines());
    let mut found = Vec::new();
    let mut index = 0;

    while index < text.len() {
        if !starts_declaration(text.line(index), keyword) {
            index += 1;
            continue;
        }
        match locate(&matcher, index, keyword) {
            Ok(decl) => {
                index = decl.header_end + 1;
                found.push(Ok(decl));
            }
            Err(reason) => {
                found.push(Err((index, reason)));
                index += 1;
            }
        }
    }

    found
}

/// What to do with one declaration.
#[derive(Debug, Default)]
pub(crate) struct Edit {
    pub replacement: Option<Vec<String>>,
    pub skipped: Vec<SkipReason>,
}

impl Edit {
    pub fn keep() -> Self {
        Self::default()
    }

    pub fn replace(lines: Vec<String>) -> Self {
        Self {
            replacement: Some(lines),
            skipped: Vec::new(),
        }
    }

    pub fn skip(reason: SkipReason) -> Self {
        Self {
            replacement: None,
            skipped: vec![reason],
        }
    }
}

/// Applies `rewrite` to every `keyword` declaration, bottom to top so that
/// replacing one declaration never shifts the lines of those above it.
pub(crate) fn rewrite_declarations<F>(
    kind: RuleKind,
    source: &str,
    keyword: &str,
    mut rewrite: F,
) -> RuleOutcome
where
    F: FnMut(&Declaration, &[String]) -> Edit,
{
    let mut text = SourceText::from(source);
    let found = find_declarations(&text, keyword);
    let mut rewrites = 0;
    let mut skipped = Vec::new();

    for item in found.into_iter().rev() {
        let decl = match item {
            Ok(decl) => decl,
            Err((index, reason)) => {
                skipped.push(Skipped::at(kind, index, text.line(index), reason));
                continue;
            }
        };

        let edit = rewrite(&decl, text.lines());
        for reason in edit.skipped {
            skipped.push(Skipped::at(kind, decl.start, text.line(decl.start), reason));
        }
        if let Some(lines) = edit.replacement {
            let range = decl.start..=decl.end();
            if lines[..] != text.lines()[range.clone()] {
                text.splice(range, lines);
                rewrites += 1;
            }
        }
    }

    skipped.reverse();
    RuleOutcome {
        text: text.to_string(),
        rewrites,
        skipped,
    }
}

// ---------------------------------------------------------------------------
// Names and literals
// ---------------------------------------------------------------------------

fn is_identifier(name: &str) -> bool {
    let stem = name.strip_suffix(['?', '!']).unwrap_or(name);
    let mut chars = stem.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits a declared name (`:firstName` or `"firstName"`) into the
/// underscored symbol to emit and the bare method name.
pub(crate) fn declared_name(raw: &str) -> Option<(String, String)> {
    let bare = raw.strip_prefix(':').or_else(|| {
        ['"', '\''].into_iter().find_map(|q| {
            raw.strip_prefix(q)
                .and_then(|r| r.strip_suffix(q))
                .filter(|_| raw.len() >= 2)
        })
    })?;
    if !is_identifier(bare) {
        return None;
    }
    let method = underscore(bare);
    Some((format!(":{method}"), method))
}

pub(crate) fn is_string_literal(text: &str) -> bool {
    let tokens = tokenize(text);
    tokens.len() == 1 && tokens[0].token.is_string()
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationKind {
    Field,
    Argument,
    InputField,
    Connection,
}

impl DeclarationKind {
    fn keyword(&self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Argument => "argument",
            Self::InputField => "input_field",
            Self::Connection => "connection",
        }
    }

    fn target_keyword(&self) -> &'static str {
        match self {
            Self::Field | Self::Connection => "field",
            Self::Argument | Self::InputField => "argument",
        }
    }

    fn rule(&self) -> RuleKind {
        match self {
            Self::Field => RuleKind::Field,
            Self::Argument => RuleKind::Argument,
            Self::InputField => RuleKind::InputField,
            Self::Connection => RuleKind::Connection,
        }
    }

    fn is_field_like(&self) -> bool {
        matches!(self, Self::Field | Self::Connection)
    }

    /// The keyword argument whose presence marks an upgraded declaration.
    fn upgraded_marker(&self) -> &'static str {
        if self.is_field_like() {
            "null"
        } else {
            "required"
        }
    }

    /// Block statements that become keyword arguments verbatim.
    fn config_keys(&self) -> &'static [&'static str] {
        if self.is_field_like() {
            &["hash_key", "deprecation_reason", "complexity"]
        } else {
            &["default_value", "as", "prepare"]
        }
    }
}

/// Rewrites one legacy declaration into its class-based form.
fn flatten(kind: DeclarationKind, decl: &Declaration, lines: &[String]) -> Edit {
    let mut sig = decl.signature.clone();
    if sig.has_kwarg(kind.upgraded_marker()) {
        return Edit::keep();
    }
    let Some(raw_name) = sig.name.clone() else {
        return Edit::keep();
    };

    let positional_type = sig
        .positional
        .first()
        .filter(|p| !is_string_literal(p))
        .cloned();
    let has_description = sig.positional.iter().any(|p| is_string_literal(p));

    let mut removed = BTreeSet::new();
    let mut comments = Vec::new();
    let mut block_type = None;
    let mut block_description = None;
    let mut method = None;
    let mut resolver = None;
    let mut config = Vec::new();

    for (range, stmt) in decl.statements(lines) {
        if stmt.value.is_empty() {
            continue;
        }
        let keyword = stmt.keyword.as_str();
        let pulled = match keyword {
            "type" if positional_type.is_none() && block_type.is_none() => {
                block_type = Some(stmt.value.clone());
                true
            }
            "description" if !has_description && block_description.is_none() => {
                block_description = Some(stmt.value.clone());
                true
            }
            key if kind.is_field_like() && property::is_method_statement(key) && method.is_none() => {
                method = Some(stmt.value.clone());
                true
            }
            "resolve" if kind.is_field_like() && resolver.is_none() => {
                resolver = Some((range.clone(), stmt.clone()));
                false
            }
            key if kind.config_keys().contains(&key) => {
                config.push(KeywordArg::new(key, stmt.value.clone()));
                true
            }
            _ => false,
        };
        if pulled {
            removed.extend(range);
            comments.extend(stmt.comments);
        }
    }

    let Some(type_text) = positional_type.clone().or(block_type) else {
        if DELEGATING_KEYS.iter().any(|key| sig.has_kwarg(key)) {
            return Edit::keep();
        }
        return Edit::skip(SkipReason::MissingType { name: raw_name });
    };
    let ty = match TypeExpression::parse(&type_text) {
        Ok(ty) => ty,
        Err(reason) => return Edit::skip(reason),
    };

    let names = declared_name(&raw_name);
    sig.keyword = kind.target_keyword().to_string();
    if let Some((symbol, _)) = &names {
        sig.name = Some(symbol.clone());
    }

    if positional_type.is_some() {
        sig.positional[0] = ty.render();
    } else {
        sig.positional.insert(0, ty.render());
    }
    if let Some(description) = block_description {
        sig.positional.insert(1, description);
    }

    sig.keyword_args.extend(config);
    if kind.is_field_like() {
        sig.push_kwarg("null", ty.nullable.to_string());
    } else {
        sig.push_kwarg("required", (!ty.nullable).to_string());
    }
    if let Some(method) = method {
        sig.push_kwarg("method", method);
    }
    if kind == DeclarationKind::Connection {
        sig.push_kwarg("connection", "true");
    }
    sig.comments.extend(comments);

    let mut skipped = Vec::new();
    let mut trailer = Vec::new();
    let resolver_source = match &resolver {
        Some((_, stmt)) => Some(stmt.value.clone()),
        None if kind.is_field_like() => sig.kwarg("resolve").map(str::to_string),
        None => None,
    };

    if let Some(source) = resolver_source {
        let declares_arguments = decl.retains(lines, "argument", &removed);
        let method = match &names {
            Some((_, method_name)) => {
                resolve::resolver_method(method_name, &source, &sig.indent, declares_arguments)
            }
            None => Err(SkipReason::UnsupportedResolver { text: source }),
        };
        match method {
            Ok(method) => {
                trailer = method;
                match resolver {
                    Some((range, stmt)) => {
                        removed.extend(range);
                        sig.comments.extend(stmt.comments);
                    }
                    None => {
                        sig.remove_kwarg("resolve");
                    }
                }
            }
            Err(reason) => skipped.push(reason),
        }
    }

    Edit {
        replacement: Some(decl.reassemble(lines, sig, &removed, trailer)),
        skipped,
    }
}

fn apply_kind(kind: DeclarationKind, source: &str) -> RuleOutcome {
    rewrite_declarations(kind.rule(), source, kind.keyword(), |decl, lines| {
        flatten(kind, decl, lines)
    })
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Flattens `field` declarations and emits `null:`.
#[derive(Debug, Default)]
pub struct FieldRule;

impl Rule for FieldRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Field
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        apply_kind(DeclarationKind::Field, source)
    }
}

/// Rewrites `argument` types and emits `required:`.
#[derive(Debug, Default)]
pub struct ArgumentRule;

impl Rule for ArgumentRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Argument
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        apply_kind(DeclarationKind::Argument, source)
    }
}

/// Turns `input_field` into `argument`.
#[derive(Debug, Default)]
pub struct InputFieldRule;

impl Rule for InputFieldRule {
    fn kind(&self) -> RuleKind {
        RuleKind::InputField
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        apply_kind(DeclarationKind::InputField, source)
    }
}

/// Turns `connection` into `field ..., connection: true`.
#[derive(Debug, Default)]
pub struct ConnectionRule;

impl Rule for ConnectionRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Connection
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        apply_kind(DeclarationKind::Connection, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(source: &str) -> RuleOutcome {
        FieldRule.apply(source)
    }

    #[test]
    fn statement_parse_forms() {
        let stmt = Statement::parse("  description \"The id\" # note").unwrap();
        assert_eq!(stmt.keyword, "description");
        assert_eq!(stmt.value, "\"The id\"");
        assert_eq!(stmt.comments, vec!["# note"]);

        let stmt = Statement::parse("type(!types.Int)").unwrap();
        assert_eq!(stmt.value, "!types.Int");

        let stmt = Statement::parse("resolve ->(o, a, c) {\n  o.x # inner\n}").unwrap();
        assert_eq!(stmt.value, "->(o, a, c) {\n  o.x # inner\n}");
        assert!(stmt.comments.is_empty());
    }

    #[test]
    fn declared_names() {
        assert_eq!(
            declared_name(":firstName"),
            Some((":first_name".into(), "first_name".into()))
        );
        assert_eq!(
            declared_name("\"isAdmin?\""),
            Some((":is_admin?".into(), "is_admin?".into()))
        );
        assert_eq!(declared_name(":\"odd name\""), None);
        assert_eq!(declared_name("name"), None);
    }

    #[test]
    fn field_rename_example() {
        let out = field("field :firstName, !types.String");
        assert_eq!(out.text, "field :first_name, String, null: false");
        assert_eq!(out.rewrites, 1);
    }

    #[test]
    fn nullable_field_with_description() {
        let out = field("  field :email, types.String, \"Primary email\"");
        assert_eq!(out.text, "  field :email, String, \"Primary email\", null: true");
    }

    #[test]
    fn existing_kwargs_come_first() {
        let out = field("field :name, !types.String, property: :full_name, max_page_size: 10");
        assert_eq!(
            out.text,
            "field :name, String, property: :full_name, max_page_size: 10, null: false"
        );
    }

    #[test]
    fn block_is_flattened() {
        let src = "  field :fullName do
    type !types.String
    description \"The full name\"
    property :name
  end";
        assert_eq!(
            field(src).text,
            "  field :full_name, String, \"The full name\", null: false, method: :name"
        );
    }

    #[test]
    fn block_description_stays_when_positional_exists() {
        let src = "field :a, types.Int, \"Inline\" do\n  description \"Block\"\nend";
        assert_eq!(
            field(src).text,
            "field :a, Integer, \"Inline\", null: true do\n  description \"Block\"\nend"
        );
    }

    #[test]
    fn config_statements_become_kwargs() {
        let src = "field :oldName, types.String do\n  deprecation_reason \"Use name\"\n  hash_key :old\nend";
        assert_eq!(
            field(src).text,
            "field :old_name, String, deprecation_reason: \"Use name\", hash_key: :old, null: true"
        );
    }

    #[test]
    fn unpulled_statements_keep_the_block() {
        let src = "\
field :todos, types[TodoType] do
  argument :status, TodoStatus

  description \"All todos\"
end";
        assert_eq!(
            field(src).text,
            "field :todos, [TodoType], \"All todos\", null: true do\n  argument :status, TodoStatus\nend"
        );
    }

    #[test]
    fn resolver_becomes_method() {
        let src = "  field :fullName, !types.String do
    resolve ->(obj, args, ctx) { \"#{obj.first} #{obj.last}\" }
  end";
        assert_eq!(
            field(src).text,
            "  field :full_name, String, null: false\n\n  def full_name\n    \"#{object.first} #{object.last}\"\n  end"
        );
    }

    #[test]
    fn resolver_with_arguments_takes_splat() {
        let src = "\
field :items, types[ItemType] do
  argument :limit, types.Int
  resolve ->(obj, args, ctx) {
    obj.items.first(10)
  }
end";
        assert_eq!(
            field(src).text,
            "\
field :items, [ItemType], null: true do
  argument :limit, types.Int
end

def items(**args)
  object.items.first(10)
end"
        );
    }

    #[test]
    fn inline_resolve_kwarg() {
        let src = "field :count, !types.Int, resolve: ->(o, a, c) { o.size }";
        assert_eq!(
            field(src).text,
            "field :count, Integer, null: false\n\ndef count\n  object.size\nend"
        );
    }

    #[test]
    fn resolver_method_is_separated_from_next_declaration() {
        let src = "  field :a, types.Int, resolve: ->(o, a, c) { o.a }\n  field :b, types.Int\nend";
        assert_eq!(
            field(src).text,
            "  field :a, Integer, null: true\n\n  def a\n    object.a\n  end\n\n  field :b, Integer, null: true\nend"
        );

        let src = "  field :b, types.Int, resolve: ->(o, a, c) { o.b }\nend";
        assert_eq!(
            field(src).text,
            "  field :b, Integer, null: true\n\n  def b\n    object.b\n  end\nend"
        );
    }

    #[test]
    fn unsupported_resolver_is_left_in_block() {
        let src = "field :a, types.Int do\n  resolve Resolvers::A.new\nend";
        let out = field(src);
        assert_eq!(
            out.text,
            "field :a, Integer, null: true do\n  resolve Resolvers::A.new\nend"
        );
        assert_eq!(out.skipped.len(), 1);
        assert!(matches!(
            out.skipped[0].reason,
            SkipReason::UnsupportedResolver { .. }
        ));
    }

    #[test]
    fn already_upgraded_field_is_kept() {
        let src = "field :first_name, String, null: false";
        assert_eq!(field(src), RuleOutcome::unchanged(src));
    }

    #[test]
    fn delegating_field_is_kept() {
        let src = "field :search, function: Functions::Search.new";
        assert_eq!(field(src), RuleOutcome::unchanged(src));
    }

    #[test]
    fn missing_type_is_skipped() {
        let src = "field :mystery do\n  description \"?\"\nend";
        let out = field(src);
        assert_eq!(out.text, src);
        assert!(matches!(out.skipped[0].reason, SkipReason::MissingType { .. }));
    }

    #[test]
    fn unrecognized_type_is_skipped() {
        let src = "field :a, some_helper(1)\nfield :b, types.Int";
        let out = field(src);
        assert_eq!(out.text, "field :a, some_helper(1)\nfield :b, Integer, null: true");
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].line, 1);
        assert_eq!(out.rewrites, 1);
    }

    #[test]
    fn unbalanced_block_is_skipped() {
        let src = "field :a, types.Int do\n  description \"x\"";
        let out = field(src);
        assert_eq!(out.text, src);
        assert!(matches!(
            out.skipped[0].reason,
            SkipReason::UnbalancedBlock { .. }
        ));
    }

    #[test]
    fn multi_line_header() {
        let src = "field :createdAt,\n  !types.String,\n  \"When\" # ts";
        assert_eq!(
            field(src).text,
            "field :created_at, String, \"When\", null: false # ts"
        );
    }

    #[test]
    fn argument_example() {
        let out = ArgumentRule.apply(r#"argument :status, !TodoStatus, "Restrict items to this status""#);
        assert_eq!(
            out.text,
            r#"argument :status, TodoStatus, "Restrict items to this status", required: true"#
        );
    }

    #[test]
    fn argument_name_and_default() {
        let src = "argument :pageSize, types.Int, default_value: 10";
        assert_eq!(
            ArgumentRule.apply(src).text,
            "argument :page_size, Integer, default_value: 10, required: false"
        );
    }

    #[test]
    fn input_field_becomes_argument() {
        let out = InputFieldRule.apply("  input_field :title, !types.String");
        assert_eq!(out.text, "  argument :title, String, required: true");
    }

    #[test]
    fn connection_becomes_field() {
        let out = ConnectionRule.apply("connection :todos, TodoType.connection_type");
        assert_eq!(
            out.text,
            "field :todos, TodoType.connection_type, null: true, connection: true"
        );
    }

    #[test]
    fn connection_with_block() {
        let src = "connection :items, !ItemType.connection_type do\n  resolve ->(obj, args, ctx) { obj.items }\nend";
        assert_eq!(
            ConnectionRule.apply(src).text,
            "field :items, ItemType.connection_type, null: false, connection: true\n\ndef items\n  object.items\nend"
        );
    }
}
