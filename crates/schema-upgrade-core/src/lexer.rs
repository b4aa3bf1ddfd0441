use logos::Logos;

use crate::error::Span;
use crate::token::Token;

/// A token paired with its source span.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub text: String,
}

impl SpannedToken {
    pub fn is(&self, token: Token) -> bool {
        self.token == token
    }

    /// Whether this is the identifier `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        self.token == Token::Ident && self.text == name
    }
}

/// Tokenizes a source fragment into a sequence of spanned tokens.
///
/// Tokenizing never fails. Bytes the lexer cannot classify (backticks,
/// unterminated quotes, non-ASCII punctuation) produce no token, but they stay
/// in the gaps between spans. Anything that rebuilds text from the token
/// stream copies those gaps verbatim.
pub fn tokenize(source: &str) -> Vec<SpannedToken> {
    let mut tokens = Vec::new();

    let lexer = Token::lexer(source);
    for (result, range) in lexer.spanned() {
        if let Ok(token) = result {
            tokens.push(SpannedToken {
                token,
                span: Span::new(range.start, range.end),
                text: source[range].to_string(),
            });
        }
    }

    tokens
}

/// Tokenizes and drops comments.
pub fn tokenize_code(source: &str) -> Vec<SpannedToken> {
    tokenize(source)
        .into_iter()
        .filter(|t| t.token != Token::Comment)
        .collect()
}

/// Rebuilds `source` with each token passed through `rewrite`.
///
/// Gaps between tokens are copied verbatim, so whitespace and anything the
/// lexer skipped survives unchanged. `rewrite` sees the whole token slice and
/// the index of the current token so it can look at neighbours.
pub fn rewrite_tokens<F>(source: &str, mut rewrite: F) -> String
where
    F: FnMut(&[SpannedToken], usize) -> Option<String>,
{
    let tokens = tokenize(source);
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    for i in 0..tokens.len() {
        let span = &tokens[i].span;
        output.push_str(&source[cursor..span.start]);
        match rewrite(&tokens, i) {
            Some(replacement) => output.push_str(&replacement),
            None => output.push_str(&tokens[i].text),
        }
        cursor = span.end;
    }
    output.push_str(&source[cursor..]);
    output
}

/// Returns the index of the bracket closing the one at `open`.
pub fn matching_close(tokens: &[SpannedToken], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        if tok.token.is_open_bracket() {
            depth += 1;
        } else if tok.token.is_close_bracket() {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Splits tokens on commas outside any bracket. Returns `None` when the
/// brackets do not balance.
pub fn split_top_level(tokens: &[SpannedToken]) -> Option<Vec<&[SpannedToken]>> {
    let mut items = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, tok) in tokens.iter().enumerate() {
        if tok.token.is_open_bracket() {
            depth += 1;
        } else if tok.token.is_close_bracket() {
            depth -= 1;
            if depth < 0 {
                return None;
            }
        } else if tok.is(Token::Comma) && depth == 0 {
            if i > start {
                items.push(&tokens[start..i]);
            }
            start = i + 1;
        }
    }
    if depth != 0 {
        return None;
    }
    if start < tokens.len() {
        items.push(&tokens[start..]);
    }
    Some(items)
}
