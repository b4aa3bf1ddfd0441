use std::fmt;
use std::ops::RangeInclusive;

/// Source text as an ordered sequence of lines.
///
/// Splitting on `\n` and joining on `\n` is an exact round trip, so text that no
/// rule touches comes back byte-for-byte, including a missing or present final
/// newline and any `\r` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> &str {
        &self.lines[index]
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replaces the lines in `range` with `replacement`.
    pub fn splice(&mut self, range: RangeInclusive<usize>, replacement: Vec<String>) {
        self.lines.splice(range, replacement);
    }

    /// Inserts `new_lines` after line `index`.
    pub fn insert_after(&mut self, index: usize, new_lines: Vec<String>) {
        let at = index + 1;
        self.lines.splice(at..at, new_lines);
    }

    /// Joins the lines in `range` with `\n`.
    pub fn join(&self, range: RangeInclusive<usize>) -> String {
        self.lines[range].join("\n")
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// The line terminator a text is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// `CrLf` when every newline in `text` is preceded by `\r`. Text with
    /// mixed or no line endings counts as `Lf`.
    pub fn detect(text: &str) -> Self {
        let newlines = text.matches('\n').count();
        if newlines > 0 && text.matches("\r\n").count() == newlines {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    /// Converts `text` to `\n` line endings.
    pub fn normalize(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::CrLf => text.replace("\r\n", "\n"),
        }
    }

    /// Converts normalized `text` back to this line ending.
    pub fn restore(self, text: String) -> String {
        match self {
            Self::Lf => text,
            Self::CrLf => text.replace('\n', "\r\n"),
        }
    }
}

/// Returns the leading whitespace of `line`.
pub fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

/// Whether `line` holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Removes the common leading indentation from `lines`, ignoring blank lines.
pub fn dedent(lines: &[&str]) -> Vec<String> {
    let common = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| indentation(l).len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if is_blank(l) {
                String::new()
            } else {
                l[common..].trim_end().to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_exact() {
        for text in ["", "a", "a\n", "a\r\nb\r\n", "\n\n", "  x\n\ty"] {
            assert_eq!(SourceText::from(text).to_string(), text);
        }
    }

    #[test]
    fn line_ending_detection() {
        assert_eq!(LineEnding::detect("a\r\nb\r\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\r\nb\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a"), LineEnding::Lf);
    }

    #[test]
    fn crlf_normalizes_and_restores() {
        let text = "a\r\n\r\nb\r\r\n";
        let ending = LineEnding::detect(text);
        let normalized = ending.normalize(text);
        assert_eq!(normalized, "a\n\nb\r\n");
        assert_eq!(ending.restore(normalized), text);
    }

    #[test]
    fn splice_replaces_range() {
        let mut src = SourceText::from("a\nb\nc\nd");
        src.splice(1..=2, vec!["x".into()]);
        assert_eq!(src.to_string(), "a\nx\nd");
    }

    #[test]
    fn insert_after_appends_lines() {
        let mut src = SourceText::from("a\nb");
        src.insert_after(0, vec!["x".into(), "y".into()]);
        assert_eq!(src.to_string(), "a\nx\ny\nb");
    }

    #[test]
    fn indentation_of_mixed_whitespace() {
        assert_eq!(indentation("    field :id"), "    ");
        assert_eq!(indentation("\t field"), "\t ");
        assert_eq!(indentation("field"), "");
    }

    #[test]
    fn dedent_strips_common_prefix() {
        let out = dedent(&["    a", "      b", "", "    c"]);
        assert_eq!(out, vec!["a", "  b", "", "c"]);
    }
}
