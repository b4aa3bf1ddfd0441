use std::fmt;

use crate::error::SkipReason;
use crate::lexer::{tokenize_code, SpannedToken};
use crate::token::Token;

/// Legacy scalar spellings and their canonical names.
const SCALAR_ALIASES: &[(&str, &str)] = &[
    ("Int", "Integer"),
    ("Bool", "Boolean"),
    ("GraphQL::STRING_TYPE", "String"),
    ("GraphQL::INT_TYPE", "Integer"),
    ("GraphQL::FLOAT_TYPE", "Float"),
    ("GraphQL::BOOLEAN_TYPE", "Boolean"),
    ("GraphQL::ID_TYPE", "ID"),
];

/// Returns the canonical name for a builtin scalar alias, or `name` itself.
pub fn canonical_scalar(name: &str) -> &str {
    SCALAR_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, canonical)| canonical)
}

/// A parsed legacy type expression.
///
/// Nullability describes the outermost level only. Non-null markers on list
/// elements are dropped while parsing, so `types[!Foo]` and `types[Foo]`
/// produce the same expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpression {
    /// Canonical base type, including any kept postfix such as
    /// `.connection_type`.
    pub base_type: String,
    pub nullable: bool,
    /// Number of list wrappers around the base type. Zero for a plain type.
    pub list_depth: usize,
    /// The expression was deferred with `-> { ... }`.
    pub lambda_wrapped: bool,
}

impl TypeExpression {
    /// Parses a legacy type expression such as `!types[Types::UserType]`.
    pub fn parse(expr: &str) -> Result<Self, SkipReason> {
        let unrecognized = || SkipReason::UnrecognizedType {
            expr: expr.trim().to_string(),
        };

        let mut parser = TypeParser::new(tokenize_code(expr));
        let parsed = parser.parse_outer().ok_or_else(unrecognized)?;
        if parser.peek().is_some() {
            return Err(unrecognized());
        }
        Ok(parsed)
    }

    pub fn is_list(&self) -> bool {
        self.list_depth > 0
    }

    /// Renders the expression in the class-based form, without nullability.
    pub fn render(&self) -> String {
        let inner = format!(
            "{}{}{}",
            "[".repeat(self.list_depth),
            self.base_type,
            "]".repeat(self.list_depth)
        );
        if self.lambda_wrapped {
            format!("-> {{ {inner} }}")
        } else {
            inner
        }
    }
}

impl fmt::Display for TypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// The result of parsing one nesting level.
struct Level {
    base: String,
    list_depth: usize,
    non_null: bool,
}

/// Recursive descent over the tokens of a single type expression.
struct TypeParser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl TypeParser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    // -- Cursor helpers --

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&SpannedToken> {
        self.tokens.get(self.pos + offset)
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek().is_some_and(|t| t.is(token)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Option<()> {
        self.eat(token).then_some(())
    }

    /// deferred = '->' | ('lambda' | 'proc') before '{'
    fn eat_deferred(&mut self) -> bool {
        if self.eat(Token::Arrow) {
            return true;
        }
        let keyword = self
            .peek()
            .is_some_and(|t| t.is_ident("lambda") || t.is_ident("proc"));
        if keyword && self.peek_at(1).is_some_and(|t| t.is(Token::LBrace)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // -- Grammar productions --

    /// outer = '!'? ( deferred '{' level '}' | level )
    fn parse_outer(&mut self) -> Option<TypeExpression> {
        let bang = self.eat(Token::Bang);

        let (level, lambda_wrapped) = if self.eat_deferred() {
            self.expect(Token::LBrace)?;
            let level = self.parse_level()?;
            self.expect(Token::RBrace)?;
            (level, true)
        } else {
            (self.parse_level()?, false)
        };

        Some(TypeExpression {
            base_type: level.base,
            nullable: !(bang || level.non_null),
            list_depth: level.list_depth,
            lambda_wrapped,
        })
    }

    /// level = '!' level | list postfix* | named postfix*
    fn parse_level(&mut self) -> Option<Level> {
        if self.eat(Token::Bang) {
            let mut inner = self.parse_level()?;
            inner.non_null = true;
            return Some(inner);
        }

        let mut level = if self.peek().is_some_and(|t| t.is_ident("types"))
            && self.peek_at(1).is_some_and(|t| t.is(Token::LBracket))
        {
            self.pos += 1;
            self.parse_list()?
        } else if self.peek().is_some_and(|t| t.is(Token::LBracket)) {
            self.parse_list()?
        } else {
            self.parse_named()?
        };

        self.parse_postfixes(&mut level)?;
        Some(level)
    }

    /// list = '[' level ']'
    fn parse_list(&mut self) -> Option<Level> {
        self.expect(Token::LBracket)?;
        let inner = self.parse_level()?;
        self.expect(Token::RBracket)?;
        Some(Level {
            base: inner.base,
            list_depth: inner.list_depth + 1,
            non_null: false,
        })
    }

    /// named = ('types' '.')? Constant
    fn parse_named(&mut self) -> Option<Level> {
        if self.peek().is_some_and(|t| t.is_ident("types")) {
            self.pos += 1;
            self.expect(Token::Dot)?;
        }
        let name = self.peek().filter(|t| t.is(Token::Constant))?.text.clone();
        self.pos += 1;
        Some(Level {
            base: canonical_scalar(&name).to_string(),
            list_depth: 0,
            non_null: false,
        })
    }

    /// postfix = '.to_non_null_type' | '.to_list_type' | '.' ident
    fn parse_postfixes(&mut self, level: &mut Level) -> Option<()> {
        while self.peek().is_some_and(|t| t.is(Token::Dot)) {
            let method = self.peek_at(1).filter(|t| t.is(Token::Ident))?.text.clone();
            self.pos += 2;
            match method.as_str() {
                "to_non_null_type" => level.non_null = true,
                "to_list_type" => {
                    level.list_depth += 1;
                    level.non_null = false;
                }
                _ if level.list_depth == 0 => {
                    level.base.push('.');
                    level.base.push_str(&method);
                }
                _ => return None,
            }
        }
        Some(())
    }
}
