use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::BlockMatcher;
use crate::lexer::rewrite_tokens;
use crate::naming::{camelize, unqualified};
use crate::rules::{LegacyKind, Rule, RuleKind, RuleOutcome};
use crate::source::{is_blank, SourceText};

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*class\s+(?P<name>[A-Z][A-Za-z0-9_:]*)\s*<\s*(?P<base>[A-Z][A-Za-z0-9_:]*)")
        .expect("class regex is valid")
});

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*name\s*\(?\s*(?:"(?P<dq>[^"\\#]*)"|'(?P<sq>[^'\\]*)')\s*\)?\s*(?:#.*)?$"#)
        .expect("name regex is valid")
});

/// Deletes `name "X"` when the class name already implies it, otherwise
/// renames it to `graphql_name`.
#[derive(Debug, Default)]
pub struct NameRule;

/// Whether the declared name can be inferred from the class name.
fn is_inferable(declared: &str, class: &str) -> bool {
    let camel = camelize(declared);
    let class = unqualified(class);
    camel == class || class.strip_suffix("Type").is_some_and(|stem| stem == camel)
}

enum NameEdit {
    Delete(usize),
    Rename(usize),
}

impl Rule for NameRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Name
    }

    fn apply(&self, source: &str) -> RuleOutcome {
        let mut text = SourceText::from(source);
        let mut edits = Vec::new();

        {
            let matcher = BlockMatcher::new(text.lines());
            for (index, line) in text.lines().iter().enumerate() {
                let Some(caps) = CLASS_RE.captures(line) else {
                    continue;
                };
                if !LegacyKind::is_base_class(&caps["base"]) {
                    continue;
                }
                let Some(block) = matcher.match_block(index) else {
                    continue;
                };

                let statement = matcher.children(&block).into_iter().find_map(|child| {
                    let first = *child.start();
                    let caps = NAME_RE.captures(&text.lines()[first])?;
                    let declared = caps.name("dq").or_else(|| caps.name("sq"))?;
                    Some((first, declared.as_str().to_string()))
                });

                if let Some((line_index, declared)) = statement {
                    if is_inferable(&declared, &caps["name"]) {
                        edits.push(NameEdit::Delete(line_index));
                    } else {
                        edits.push(NameEdit::Rename(line_index));
                    }
                }
            }
        }

        let rewrites = edits.len();
        edits.sort_by_key(|edit| match edit {
            NameEdit::Delete(i) | NameEdit::Rename(i) => std::cmp::Reverse(*i),
        });

        for edit in edits {
            match edit {
                NameEdit::Rename(index) => {
                    let renamed = rewrite_tokens(text.line(index), |tokens, i| {
                        (i == 0 && tokens[i].is_ident("name")).then(|| "graphql_name".to_string())
                    });
                    text.splice(index..=index, vec![renamed]);
                }
                NameEdit::Delete(index) => {
                    // Don't leave a blank line hanging under the class header.
                    let header_above = index > 0 && CLASS_RE.is_match(text.line(index - 1));
                    let blank_below = index + 1 < text.len() && is_blank(text.line(index + 1));
                    if header_above && blank_below {
                        text.splice(index..=index + 1, Vec::new());
                    } else {
                        text.splice(index..=index, Vec::new());
                    }
                }
            }
        }

        RuleOutcome {
            text: text.to_string(),
            rewrites,
            skipped: Vec::new(),
        }
    }
}
