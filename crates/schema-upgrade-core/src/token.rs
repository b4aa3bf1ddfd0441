use logos::Logos;

/// Tokens produced for host-language source fragments.
///
/// This is not a full grammar of the host language. It recognizes only what the
/// upgrade rules need to reason about: identifiers, constants, symbols,
/// labels, literals, comments, block keywords and bracket punctuation.
/// Whitespace and backslash line continuations are skipped by logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"\\\r?\n")]
pub enum Token {
    // -- Block keywords --
    #[token("do")]
    Do,

    #[token("end")]
    End,

    // -- Punctuation --
    #[token("->")]
    Arrow,

    #[token("=>")]
    HashRocket,

    #[token("::")]
    Scope,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("|")]
    Pipe,

    #[token("!")]
    Bang,

    #[token(":")]
    Colon,

    /// Any other single operator character, e.g. `=`, `+`, `<`, `?`.
    #[regex(r"[+\-*/%<>=&^~?]")]
    Op,

    // -- Literals --
    /// A double-quoted string, possibly containing `#{...}` interpolation.
    ///
    /// Quotes inside an interpolation do not end the string.
    #[token("\"", lex_double_quoted)]
    DoubleQuoted,

    /// A single-quoted string.
    #[regex(r"'([^'\\]|\\.)*'")]
    SingleQuoted,

    /// A symbol literal, e.g. `:first_name` or `:"odd name"`.
    #[regex(r":[a-zA-Z_][a-zA-Z0-9_]*[?!=]?")]
    #[regex(r#":"([^"\\]|\\.)*""#)]
    Symbol,

    /// A hash label, e.g. `null:` in `null: true`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*[?!]?:")]
    Label,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"[0-9][0-9_]*\.[0-9]+")]
    Number,

    /// A line comment running to the end of the line.
    #[regex(r"#[^\n]*")]
    Comment,

    // -- Names --
    /// A constant, optionally namespaced: `Types::UserType`.
    #[regex(r"[A-Z][a-zA-Z0-9_]*(::[A-Z][a-zA-Z0-9_]*)*")]
    Constant,

    /// A local name or method name, e.g. `obj`, `valid?`, `save!`.
    #[regex(r"[a-z_][a-zA-Z0-9_]*[?!]?")]
    Ident,

    /// An instance or class variable, e.g. `@object`.
    #[regex(r"@@?[a-zA-Z_][a-zA-Z0-9_]*")]
    InstanceVar,

    #[regex(r"\$[a-zA-Z0-9_]+")]
    GlobalVar,
}

/// Consumes the rest of a double-quoted string after its opening quote.
fn lex_double_quoted(lex: &mut logos::Lexer<Token>) -> bool {
    match closing_offset(lex.remainder(), Nesting::Str) {
        Some(end) => {
            lex.bump(end + 1);
            true
        }
        None => false,
    }
}

/// Returns the offset of the `}` that closes an interpolation, given the text
/// right after its `#{`.
pub(crate) fn interpolation_close(code: &str) -> Option<usize> {
    closing_offset(code, Nesting::Code(0))
}

// ---------------------------------------------------------------------------
// String nesting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Nesting {
    /// Inside a double-quoted string.
    Str,
    /// Inside `#{...}`, with the count of unclosed `{` in the code.
    Code(usize),
}

/// Scans `text` from inside `outer` and returns the offset of the byte that
/// closes it. Strings nested in interpolations, and interpolations nested in
/// those strings, are skipped whole.
fn closing_offset(text: &str, outer: Nesting) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut stack = vec![outer];
    let mut i = 0;

    while i < bytes.len() {
        let top = *stack.last()?;
        match (top, bytes[i]) {
            (Nesting::Str, b'\\') => i += 1,
            (Nesting::Str, b'"') => {
                stack.pop();
            }
            (Nesting::Str, b'#') if bytes.get(i + 1) == Some(&b'{') => {
                stack.push(Nesting::Code(0));
                i += 1;
            }
            (Nesting::Code(_), b'"') => stack.push(Nesting::Str),
            (Nesting::Code(_), b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'\'' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            (Nesting::Code(0), b'}') => {
                stack.pop();
            }
            (Nesting::Code(depth), b'{' | b'}') => {
                let depth = if bytes[i] == b'{' { depth + 1 } else { depth - 1 };
                stack.pop();
                stack.push(Nesting::Code(depth));
            }
            _ => {}
        }
        if stack.is_empty() {
            return Some(i);
        }
        i += 1;
    }
    None
}

impl Token {
    /// Returns a human-readable description of this token kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Do => "'do'",
            Self::End => "'end'",
            Self::Arrow => "'->'",
            Self::HashRocket => "'=>'",
            Self::Scope => "'::'",
            Self::Dot => "'.'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Pipe => "'|'",
            Self::Bang => "'!'",
            Self::Colon => "':'",
            Self::Op => "operator",
            Self::DoubleQuoted | Self::SingleQuoted => "string literal",
            Self::Symbol => "symbol",
            Self::Label => "label",
            Self::Number => "number",
            Self::Comment => "comment",
            Self::Constant => "constant",
            Self::Ident => "identifier",
            Self::InstanceVar => "instance variable",
            Self::GlobalVar => "global variable",
        }
    }

    /// Whether this token opens a nesting level in the bracket namespace.
    pub fn is_open_bracket(&self) -> bool {
        matches!(self, Self::LParen | Self::LBracket | Self::LBrace)
    }

    /// Whether this token closes a nesting level in the bracket namespace.
    pub fn is_close_bracket(&self) -> bool {
        matches!(self, Self::RParen | Self::RBracket | Self::RBrace)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::DoubleQuoted | Self::SingleQuoted)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
