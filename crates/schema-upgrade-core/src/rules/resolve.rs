//! Resolver procs and the methods that replace them.

use std::collections::BTreeSet;

use crate::error::SkipReason;
use crate::lexer::{matching_close, rewrite_tokens, split_top_level, tokenize_code, SpannedToken};
use crate::naming::underscore;
use crate::rules::declaration::{declared_name, rewrite_declarations, Edit};
use crate::rules::{Rule, RuleKind, RuleOutcome};
use crate::source::{dedent, is_blank};
use crate::token::{interpolation_close, Token};

/// Accessors that replace the resolver's positional parameters, in order.
const ACCESSORS: [&str; 3] = ["object", "args", "context"];

/// A proc literal split into its parameter names and raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProcLiteral {
    pub params: Vec<String>,
    pub body: String,
}

impl ProcLiteral {
    /// Parses `->(a, b) { ... }`, `->(a, b) do ... end`, `lambda { |a| ... }`,
    /// `proc do |a| ... end` and `Proc.new { |a| ... }`.
    pub(crate) fn parse(text: &str) -> Result<Self, SkipReason> {
        let unsupported = || SkipReason::UnsupportedResolver {
            text: text.lines().next().unwrap_or_default().trim().to_string(),
        };
        let tokens = tokenize_code(text);

        let mut params = Vec::new();
        let mut pos = match tokens.first() {
            Some(t) if t.is(Token::Arrow) => {
                if tokens.get(1).is_some_and(|t| t.is(Token::LParen)) {
                    let close = matching_close(&tokens, 1).ok_or_else(unsupported)?;
                    params = parse_params(&tokens[2..close]).ok_or_else(unsupported)?;
                    close + 1
                } else {
                    1
                }
            }
            Some(t) if t.is_ident("lambda") || t.is_ident("proc") => 1,
            Some(t)
                if t.is(Token::Constant)
                    && t.text == "Proc"
                    && tokens.get(1).is_some_and(|t| t.is(Token::Dot))
                    && tokens.get(2).is_some_and(|t| t.is_ident("new")) =>
            {
                3
            }
            _ => return Err(unsupported()),
        };

        let opener = tokens.get(pos).ok_or_else(unsupported)?;
        let last = tokens.len() - 1;
        let closes = match opener.token {
            Token::LBrace => matching_close(&tokens, pos) == Some(last),
            Token::Do => last > pos && tokens[last].is(Token::End),
            _ => false,
        };
        if !closes {
            return Err(unsupported());
        }

        let mut body_start = opener.span.end;
        pos += 1;
        if params.is_empty() && tokens.get(pos).is_some_and(|t| t.is(Token::Pipe)) {
            let close = tokens[pos + 1..]
                .iter()
                .position(|t| t.is(Token::Pipe))
                .map(|offset| pos + 1 + offset)
                .ok_or_else(unsupported)?;
            params = parse_params(&tokens[pos + 1..close]).ok_or_else(unsupported)?;
            body_start = tokens[close].span.end;
        }

        let body_end = tokens[last].span.start;
        if body_start > body_end {
            return Err(unsupported());
        }

        Ok(Self {
            params,
            body: text[body_start..body_end].to_string(),
        })
    }

    /// Body lines with the opener and closer lines dropped and the common
    /// indentation removed.
    pub(crate) fn body_lines(body: &str) -> Vec<String> {
        let raw: Vec<&str> = body.split('\n').collect();
        let mut out = Vec::new();

        let first = raw[0].trim();
        if !first.is_empty() {
            out.push(first.to_string());
        }
        if raw.len() > 1 {
            let mut rest = raw[1..].to_vec();
            if rest.last().is_some_and(|l| is_blank(l)) {
                rest.pop();
            }
            out.extend(dedent(&rest));
        }

        while out.last().is_some_and(|l| l.is_empty()) {
            out.pop();
        }
        let leading = out.iter().take_while(|l| l.is_empty()).count();
        out.split_off(leading)
    }
}

fn parse_params(tokens: &[SpannedToken]) -> Option<Vec<String>> {
    split_top_level(tokens)?
        .into_iter()
        .map(|item| match item {
            [name] if name.is(Token::Ident) => Some(name.text.clone()),
            _ => None,
        })
        .collect()
}

/// Returns the accessor replacing the parameter `name`, if it is one.
fn accessor_for(params: &[String], name: &str) -> Option<&'static str> {
    params
        .iter()
        .zip(ACCESSORS)
        .find(|(param, _)| param.as_str() == name && name != "_")
        .map(|(_, accessor)| accessor)
}

/// The key of `args[:fooBar]` or `args["fooBar"]`, when token `i` is one.
fn args_key<'t>(tokens: &'t [SpannedToken], i: usize, params: &[String]) -> Option<&'t str> {
    if i < 2 || !tokens.get(i + 1).is_some_and(|t| t.is(Token::RBracket)) {
        return None;
    }
    let receiver = &tokens[i - 2];
    let receiver_is_args = receiver.is(Token::Ident)
        && accessor_for(params, &receiver.text) == Some("args")
        && !(i >= 3 && tokens[i - 3].is(Token::Dot));
    if !tokens[i - 1].is(Token::LBracket) || !receiver_is_args {
        return None;
    }

    let text = tokens[i].text.as_str();
    let key = match tokens[i].token {
        Token::Symbol => text.strip_prefix(':')?,
        Token::DoubleQuoted | Token::SingleQuoted => &text[1..text.len() - 1],
        _ => return None,
    };
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        .then_some(key)
}

/// Applies `rewrite` to the code inside each `#{...}` of a string literal.
///
/// Returns `None` when an interpolation never closes.
fn rewrite_interpolations<F>(literal: &str, mut rewrite: F) -> Option<String>
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(literal.len());
    let mut rest = literal;

    while let Some(start) = rest.find("#{") {
        let escaped = rest[..start].ends_with('\\');
        out.push_str(&rest[..start + 2]);
        let after = &rest[start + 2..];
        if escaped {
            rest = after;
            continue;
        }

        let close = interpolation_close(after)?;
        out.push_str(&rewrite(&after[..close]));
        rest = &after[close..];
    }

    out.push_str(rest);
    Some(out)
}

/// Rewrites proc parameters to accessors, token by token.
///
/// Returns the new body and whether it reads the arguments. Fails when a
/// string interpolation in the body cannot be delimited.
pub(crate) fn rewrite_body(body: &str, params: &[String]) -> Result<(String, bool), SkipReason> {
    let mut uses_args = false;
    let mut unclosed = None;

    let text = rewrite_tokens(body, |tokens, i| {
        let tok = &tokens[i];
        let after_dot = i > 0 && matches!(tokens[i - 1].token, Token::Dot | Token::Scope);
        match tok.token {
            Token::Ident if !after_dot => {
                let accessor = accessor_for(params, &tok.text)?;
                uses_args |= accessor == "args";
                Some(accessor.to_string())
            }
            Token::Symbol | Token::DoubleQuoted | Token::SingleQuoted
                if args_key(tokens, i, params).is_some() =>
            {
                args_key(tokens, i, params).map(|key| format!(":{}", underscore(key)))
            }
            Token::DoubleQuoted if tok.text.contains("#{") => {
                let rewritten = rewrite_interpolations(&tok.text, |code| {
                    match rewrite_body(code, params) {
                        Ok((rewritten, used)) => {
                            uses_args |= used;
                            rewritten
                        }
                        Err(reason) => {
                            unclosed.get_or_insert(reason);
                            code.to_string()
                        }
                    }
                });
                if rewritten.is_none() {
                    unclosed.get_or_insert(SkipReason::UnsupportedResolver {
                        text: tok.text.clone(),
                    });
                }
                rewritten
            }
            _ => None,
        }
    });

    match unclosed {
        Some(reason) => Err(reason),
        None => Ok((text, uses_args)),
    }
}

/// Renders `def <header>` with `body` indented one level under `indent`.
pub(crate) fn method_lines(indent: &str, header: &str, body: &[String]) -> Vec<String> {
    let mut lines = vec![format!("{indent}def {header}")];
    lines.extend(body.iter().map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("{indent}  {line}")
        }
    }));
    lines.push(format!("{indent}end"));
    lines
}

/// Builds the resolver method for field `name` from a proc literal.
///
/// The method takes `**args` when the body reads the arguments or the field
/// declares any.
pub(crate) fn resolver_method(
    name: &str,
    proc_text: &str,
    indent: &str,
    declares_arguments: bool,
) -> Result<Vec<String>, SkipReason> {
    let proc = ProcLiteral::parse(proc_text)?;
    let (body, uses_args) = rewrite_body(&proc.body, &proc.params)?;
    let header = if uses_args || declares_arguments {
        format!("{name}(**args)")
    } else {
        name.to_string()
    };
    Ok(method_lines(
        indent,
        &header,
        &ProcLiteral::body_lines(&body),
    ))
}

/// Moves a `resolve` proc left on a class-based `field` into a method.
#[derive(Debug, Default)]
pub struct ResolveProcRule;

impl Rule for ResolveProcRule {
    fn kind(&self) -> RuleKind {
        RuleKind::ResolveProc
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        rewrite_declarations(self.kind(), source, "field", |decl, lines| {
            let mut sig = decl.signature.clone();
            let statement = decl.find_statement(lines, &["resolve"]);
            let proc_text = match (&statement, sig.kwarg("resolve")) {
                (Some((_, stmt)), _) => stmt.value.clone(),
                (None, Some(inline)) => inline.to_string(),
                (None, None) => return Edit::keep(),
            };

            let Some((_, method_name)) = sig.name.as_deref().and_then(declared_name) else {
                return Edit::skip(SkipReason::UnsupportedResolver { text: proc_text });
            };
            let mut removed = BTreeSet::new();
            let declares_arguments = decl.retains(lines, "argument", &removed);

            match resolver_method(&method_name, &proc_text, &sig.indent, declares_arguments) {
                Ok(method) => {
                    match statement {
                        Some((range, stmt)) => {
                            removed.extend(range);
                            sig.comments.extend(stmt.comments);
                        }
                        None => {
                            sig.remove_kwarg("resolve");
                        }
                    }
                    Edit::replace(decl.reassemble(lines, sig, &removed, method))
                }
                Err(reason) => Edit::skip(reason),
            }
        })
    }
}
