use std::fmt;

use crate::lexer::{matching_close, split_top_level, tokenize, SpannedToken};
use crate::source::indentation;
use crate::token::Token;

/// How a keyword argument was spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    /// `key: value`
    Label,
    /// `:key => value`
    Rocket,
}

/// One `key: value` pair of a declaration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordArg {
    pub key: String,
    pub value: String,
    pub style: KeyStyle,
}

impl KeywordArg {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            style: KeyStyle::Label,
        }
    }
}

impl fmt::Display for KeywordArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            KeyStyle::Label => write!(f, "{}: {}", self.key, self.value),
            KeyStyle::Rocket => write!(f, ":{} => {}", self.key, self.value),
        }
    }
}

/// A parsed declaration call such as
/// `field :firstName, !types.String, "The name", property: :first_name do`.
///
/// Positional arguments and pre-existing keyword arguments keep their source
/// order through a parse and re-serialize cycle. Arguments are split on
/// top-level commas only, so brackets, parens and braces inside a type
/// expression or lambda never split an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Leading whitespace of the statement's first line.
    pub indent: String,
    pub keyword: String,
    /// The first positional argument, usually a symbol.
    pub name: Option<String>,
    /// Positional arguments after the name.
    pub positional: Vec<String>,
    pub keyword_args: Vec<KeywordArg>,
    /// The call used `keyword(...)` rather than `keyword ...`.
    pub parenthesized: bool,
    /// `do` or `do |params|` when the call opens a block.
    pub trailing_block: Option<String>,
    /// Comments found anywhere in the statement, in order.
    pub comments: Vec<String>,
}

impl Signature {
    /// Parses the header of a declaration statement.
    ///
    /// `text` may span several lines. Returns `None` if it does not start
    /// with an identifier or its brackets do not balance.
    pub fn parse(text: &str) -> Option<Self> {
        let all = tokenize(text);
        let comments = all
            .iter()
            .filter(|t| t.is(Token::Comment))
            .map(|t| t.text.clone())
            .collect();
        let mut tokens: Vec<SpannedToken> =
            all.into_iter().filter(|t| !t.is(Token::Comment)).collect();

        let trailing_block = split_trailing_block(text, &mut tokens);

        let keyword = tokens.first().filter(|t| t.is(Token::Ident))?;
        let mut rest = &tokens[1..];

        let parenthesized = rest
            .first()
            .is_some_and(|t| t.is(Token::LParen) && t.span.start == keyword.span.end);
        if parenthesized {
            if matching_close(rest, 0) != Some(rest.len() - 1) {
                return None;
            }
            rest = &rest[1..rest.len() - 1];
        }

        let mut name = None;
        let mut positional = Vec::new();
        let mut keyword_args = Vec::new();

        for item in split_top_level(rest)? {
            let first = &item[0];
            let item_text = |from: usize| {
                text[item[from].span.start..item[item.len() - 1].span.end].to_string()
            };

            if first.is(Token::Label) && item.len() > 1 {
                keyword_args.push(KeywordArg {
                    key: first.text.trim_end_matches(':').to_string(),
                    value: item_text(1),
                    style: KeyStyle::Label,
                });
            } else if first.is(Token::Symbol)
                && item.len() > 2
                && item[1].is(Token::HashRocket)
                && !first.text.starts_with(":\"")
            {
                keyword_args.push(KeywordArg {
                    key: first.text[1..].to_string(),
                    value: item_text(2),
                    style: KeyStyle::Rocket,
                });
            } else if name.is_none() && positional.is_empty() && keyword_args.is_empty() {
                name = Some(item_text(0));
            } else {
                positional.push(item_text(0));
            }
        }

        Some(Self {
            indent: indentation(text).to_string(),
            keyword: keyword.text.clone(),
            name,
            positional,
            keyword_args,
            parenthesized,
            trailing_block,
            comments,
        })
    }

    pub fn kwarg(&self, key: &str) -> Option<&str> {
        self.keyword_args
            .iter()
            .find(|k| k.key == key)
            .map(|k| k.value.as_str())
    }

    pub fn has_kwarg(&self, key: &str) -> bool {
        self.kwarg(key).is_some()
    }

    /// Removes the keyword argument `key`, returning its value.
    pub fn remove_kwarg(&mut self, key: &str) -> Option<String> {
        let index = self.keyword_args.iter().position(|k| k.key == key)?;
        Some(self.keyword_args.remove(index).value)
    }

    /// Renames the key of a keyword argument in place. Returns whether it
    /// was present.
    pub fn rename_kwarg(&mut self, from: &str, to: &str) -> bool {
        match self.keyword_args.iter_mut().find(|k| k.key == from) {
            Some(arg) => {
                arg.key = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Appends a keyword argument after all existing ones.
    pub fn push_kwarg(&mut self, key: &str, value: impl Into<String>) {
        self.keyword_args.push(KeywordArg::new(key, value));
    }

    /// All arguments in emission order.
    fn arguments(&self) -> Vec<String> {
        self.name
            .iter()
            .cloned()
            .chain(self.positional.iter().cloned())
            .chain(self.keyword_args.iter().map(ToString::to_string))
            .collect()
    }

    /// Serializes the call back to a single statement header.
    pub fn render(&self) -> String {
        let args = self.arguments().join(", ");
        let mut out = format!("{}{}", self.indent, self.keyword);

        if self.parenthesized {
            out.push('(');
            out.push_str(&args);
            out.push(')');
        } else if !args.is_empty() {
            out.push(' ');
            out.push_str(&args);
        }

        if let Some(block) = &self.trailing_block {
            out.push(' ');
            out.push_str(block);
        }
        for comment in &self.comments {
            out.push(' ');
            out.push_str(comment);
        }
        out
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Strips a trailing `do` or `do |params|` from `tokens`, returning its text.
fn split_trailing_block(text: &str, tokens: &mut Vec<SpannedToken>) -> Option<String> {
    let mut do_index = tokens.len().checked_sub(1)?;

    if tokens[do_index].is(Token::Pipe) {
        let open_pipe = tokens[..do_index].iter().rposition(|t| t.is(Token::Pipe))?;
        do_index = open_pipe.checked_sub(1)?;
    }
    if !tokens[do_index].is(Token::Do) {
        return None;
    }

    let start = tokens[do_index].span.start;
    let end = tokens[tokens.len() - 1].span.end;
    tokens.truncate(do_index);
    Some(text[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_field() {
        let sig = Signature::parse("  field :firstName, !types.String").unwrap();
        assert_eq!(sig.indent, "  ");
        assert_eq!(sig.keyword, "field");
        assert_eq!(sig.name.as_deref(), Some(":firstName"));
        assert_eq!(sig.positional, vec!["!types.String"]);
        assert!(sig.keyword_args.is_empty());
        assert!(sig.trailing_block.is_none());
    }

    #[test]
    fn parse_zero_positionals() {
        let sig = Signature::parse("field :id").unwrap();
        assert_eq!(sig.name.as_deref(), Some(":id"));
        assert!(sig.positional.is_empty());
    }

    #[test]
    fn nested_brackets_do_not_split() {
        let sig =
            Signature::parse(r#"field :items, !types[!types[Foo]], "All items", max: 3"#).unwrap();
        assert_eq!(sig.positional, vec!["!types[!types[Foo]]", "\"All items\""]);
        assert_eq!(sig.kwarg("max"), Some("3"));
    }

    #[test]
    fn parse_keyword_args_in_both_styles() {
        let sig = Signature::parse("field :a, T, property: :b, :hash_key => :c").unwrap();
        assert_eq!(sig.keyword_args[0], KeywordArg::new("property", ":b"));
        assert_eq!(sig.keyword_args[1].key, "hash_key");
        assert_eq!(sig.keyword_args[1].style, KeyStyle::Rocket);
        assert_eq!(sig.render(), "field :a, T, property: :b, :hash_key => :c");
    }

    #[test]
    fn parse_trailing_block() {
        let sig = Signature::parse("field :a, T do").unwrap();
        assert_eq!(sig.trailing_block.as_deref(), Some("do"));
        assert_eq!(sig.positional, vec!["T"]);

        let sig = Signature::parse("field :a do |f|").unwrap();
        assert_eq!(sig.trailing_block.as_deref(), Some("do |f|"));
        assert!(sig.positional.is_empty());
    }

    #[test]
    fn parse_continuation_after_comma() {
        let sig = Signature::parse("field :a,\n    types.String,\n    \"desc\"").unwrap();
        assert_eq!(sig.positional, vec!["types.String", "\"desc\""]);
        assert_eq!(sig.render(), "field :a, types.String, \"desc\"");
    }

    #[test]
    fn parse_parenthesized_call() {
        let sig = Signature::parse("field(:a, !T, null: true)").unwrap();
        assert!(sig.parenthesized);
        assert_eq!(sig.positional, vec!["!T"]);
        assert_eq!(sig.render(), "field(:a, !T, null: true)");
    }

    #[test]
    fn space_before_paren_is_an_argument() {
        let sig = Signature::parse("field (:a)").unwrap();
        assert!(!sig.parenthesized);
        assert_eq!(sig.name.as_deref(), Some("(:a)"));
    }

    #[test]
    fn lambda_argument_is_one_item() {
        let sig = Signature::parse("field :a, T, resolve: ->(o, a, c) { o.x(1, 2) }").unwrap();
        assert_eq!(sig.kwarg("resolve"), Some("->(o, a, c) { o.x(1, 2) }"));
    }

    #[test]
    fn comments_are_kept() {
        let sig = Signature::parse("field :a, T # the a").unwrap();
        assert_eq!(sig.comments, vec!["# the a"]);
        assert_eq!(sig.render(), "field :a, T # the a");
    }

    #[test]
    fn keyword_edits() {
        let mut sig = Signature::parse("field :a, T, property: :b").unwrap();
        assert!(sig.rename_kwarg("property", "method"));
        assert!(!sig.rename_kwarg("missing", "x"));
        sig.push_kwarg("null", "true");
        assert_eq!(sig.render(), "field :a, T, method: :b, null: true");
        assert_eq!(sig.remove_kwarg("method").as_deref(), Some(":b"));
        assert!(!sig.has_kwarg("method"));
    }

    #[test]
    fn unbalanced_brackets_fail() {
        assert!(Signature::parse("field :a, types[T").is_none());
        assert!(Signature::parse("field :a, T]").is_none());
    }

    #[test]
    fn non_call_fails() {
        assert!(Signature::parse("\"field\"").is_none());
        assert!(Signature::parse("").is_none());
    }
}
