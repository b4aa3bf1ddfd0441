//! Nesting-aware matching of `do ... end` style blocks over source lines.
//!
//! Two depth counters are kept apart. Block depth counts keyword openers
//! (`do`, `class`, `def`, statement-initial `if`, ...) against `end`.
//! Bracket depth counts `(`, `[` and `{` against their closers. A proc
//! literal written with braces only ever moves bracket depth, so it cannot
//! disturb block matching.

use std::ops::RangeInclusive;

use crate::lexer::{tokenize_code, SpannedToken};
use crate::token::Token;

/// Keywords that open a block only at the start of a statement.
const STATEMENT_OPENERS: &[&str] = &["class", "module", "def", "begin", "case"];

/// Keywords that open a block at the start of a statement or as the value of
/// an assignment. Used after an expression they are modifiers and open nothing.
const CONDITIONAL_OPENERS: &[&str] = &["if", "unless", "while", "until", "for"];

/// Loop keywords whose optional trailing `do` must not count twice.
const LOOP_OPENERS: &[&str] = &["while", "until", "for"];

/// A contiguous line range delimited by a matched opener and closing `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Line holding the opener.
    pub start: usize,
    /// Line holding the balancing `end`.
    pub end: usize,
}

impl Block {
    /// Lines strictly between the opener and the closer.
    pub fn body(&self) -> RangeInclusive<usize> {
        self.start + 1..=self.end.saturating_sub(1)
    }

    pub fn is_single_line(&self) -> bool {
        self.start == self.end
    }
}

/// Per-line depth information, computed once per line.
#[derive(Debug, Clone, Default)]
struct LineShape {
    /// Block depth changes in source order: `+1` per opener, `-1` per `end`.
    block_events: Vec<i32>,
    /// Net change in bracket depth across the line.
    bracket_delta: i32,
    /// The line ends with `,` or `\`, so the statement carries on.
    continues: bool,
    /// Nothing but whitespace and comments.
    is_empty: bool,
}

impl LineShape {
    fn of(line: &str) -> Self {
        let tokens = tokenize_code(line);
        let trimmed = line.trim_end();
        Self {
            block_events: block_events(&tokens),
            bracket_delta: tokens
                .iter()
                .map(|t| {
                    if t.token.is_open_bracket() {
                        1
                    } else if t.token.is_close_bracket() {
                        -1
                    } else {
                        0
                    }
                })
                .sum(),
            continues: trimmed.ends_with('\\')
                || tokens.last().is_some_and(|t| t.token == Token::Comma),
            is_empty: tokens.is_empty(),
        }
    }
}

fn block_events(tokens: &[SpannedToken]) -> Vec<i32> {
    let mut events = Vec::new();
    let mut loop_pending = false;

    for (i, tok) in tokens.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| &tokens[p]);
        let after_dot = prev.is_some_and(|p| matches!(p.token, Token::Dot | Token::Scope));
        let statement_start = prev.is_none_or(|p| p.token == Token::Semicolon);
        let after_assign = prev.is_some_and(|p| p.token == Token::Op && p.text == "=");

        match tok.token {
            Token::Do if !after_dot => {
                if loop_pending {
                    loop_pending = false;
                } else {
                    events.push(1);
                }
            }
            Token::End if !after_dot => events.push(-1),
            Token::Ident if !after_dot => {
                let word = tok.text.as_str();
                if STATEMENT_OPENERS.contains(&word) && (statement_start || after_assign) {
                    events.push(1);
                } else if CONDITIONAL_OPENERS.contains(&word) && (statement_start || after_assign)
                {
                    events.push(1);
                    loop_pending = LOOP_OPENERS.contains(&word);
                }
            }
            Token::Semicolon => loop_pending = false,
            _ => {}
        }
    }

    events
}

/// Finds blocks and statement extents over a slice of lines.
pub struct BlockMatcher<'a> {
    lines: &'a [String],
    shapes: Vec<LineShape>,
}

impl<'a> BlockMatcher<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self {
            lines,
            shapes: lines.iter().map(|l| LineShape::of(l)).collect(),
        }
    }

    pub fn lines(&self) -> &'a [String] {
        self.lines
    }

    /// Whether line `index` opens at least one block.
    pub fn opens_block(&self, index: usize) -> bool {
        self.shapes[index].block_events.iter().sum::<i32>() > 0
    }

    /// Matches the block opened on line `start`.
    ///
    /// Returns `None` if `start` opens no block, or if the text ends before
    /// depth returns to zero.
    pub fn match_block(&self, start: usize) -> Option<Block> {
        let mut depth = 0i32;
        let mut opened = false;

        for index in start..self.lines.len() {
            for event in &self.shapes[index].block_events {
                depth += event;
                if *event > 0 {
                    opened = true;
                }
                if depth < 0 {
                    return None;
                }
                if opened && depth == 0 {
                    return Some(Block { start, end: index });
                }
            }
            if !opened {
                return None;
            }
        }

        None
    }

    /// Returns the last line of the statement that begins on line `start`.
    ///
    /// A statement continues past a trailing `,` or `\`, past unbalanced
    /// brackets, and through any block it opens. Returns `None` when the text
    /// ends first.
    pub fn statement_end(&self, start: usize) -> Option<usize> {
        let mut block_depth = 0i32;
        let mut bracket_depth = 0i32;

        for index in start..self.lines.len() {
            let shape = &self.shapes[index];
            block_depth += shape.block_events.iter().sum::<i32>();
            bracket_depth += shape.bracket_delta;

            if block_depth < 0 || bracket_depth < 0 {
                return Some(index);
            }
            if block_depth == 0 && bracket_depth == 0 && !shape.continues {
                return Some(index);
            }
        }

        None
    }

    /// Returns the last line of the call header that begins on line `start`.
    ///
    /// Unlike [`statement_end`](Self::statement_end) this stops at the line
    /// that opens a trailing block instead of running through to its `end`.
    pub fn header_end(&self, start: usize) -> Option<usize> {
        let mut bracket_depth = 0i32;

        for index in start..self.lines.len() {
            let shape = &self.shapes[index];
            bracket_depth += shape.bracket_delta;
            if bracket_depth < 0 || (bracket_depth == 0 && !shape.continues) {
                return Some(index);
            }
        }

        None
    }

    /// Returns the statements directly inside `block`, skipping over nested
    /// blocks. Blank and comment-only lines are not statements.
    pub fn children(&self, block: &Block) -> Vec<RangeInclusive<usize>> {
        let mut children = Vec::new();
        if block.end <= block.start + 1 {
            return children;
        }

        let last = block.end - 1;
        let mut index = block.start + 1;
        while index <= last {
            if self.shapes[index].is_empty {
                index += 1;
                continue;
            }
            let end = self
                .statement_end(index)
                .map_or(last, |end| end.min(last));
            children.push(index..=end);
            index = end + 1;
        }

        children
    }
}
