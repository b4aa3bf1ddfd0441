use miette::{Diagnostic, NamedSource, SourceSpan};
use schema_upgrade_core::{SkipReason, Skipped};

/// A diagnostic wrapping a skipped construct for rich miette rendering.
///
/// The module-level `#[allow(unused_assignments)]` in main.rs is required
/// because miette's derive macro generates assignment patterns that rustc
/// flags as unused.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct SkipDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    message: String,
    label: String,

    #[help]
    suggestion: Option<String>,
}

/// Convert a `Skipped` record into a miette `SkipDiagnostic` over `source`.
pub fn skip_to_diagnostic(skip: &Skipped, source: &str, filename: &str) -> SkipDiagnostic {
    let (label, suggestion) = match &skip.reason {
        SkipReason::UnbalancedBlock { .. } => (
            "block never closed",
            Some("Check that every `do` has a matching `end`."),
        ),
        SkipReason::UnterminatedStatement { .. } => (
            "statement never closed",
            Some("Close the open bracket or parenthesis."),
        ),
        SkipReason::UnrecognizedType { .. } => (
            "type left as written",
            Some("Use a constant, `types.X`, `types[X]` or `!X`, or upgrade this declaration by hand."),
        ),
        SkipReason::MissingType { .. } => (
            "no type given",
            Some("Add a `type` statement to the block or a type argument to the declaration."),
        ),
        SkipReason::UnsupportedResolver { .. } => (
            "resolver kept in the block",
            Some("Move the resolver into a method by hand."),
        ),
        // Catch future non_exhaustive variants
        _ => ("left unchanged", None),
    };

    SkipDiagnostic {
        src: NamedSource::new(filename, source.to_string()),
        span: locate(skip, source),
        message: format!("{} rule skipped: {}", skip.rule, skip.reason),
        label: label.to_string(),
        suggestion: suggestion.map(str::to_string),
    }
}

/// Render all skipped constructs for a file using miette.
pub fn render_skips(skipped: &[Skipped], source: &str, filename: &str) -> Vec<miette::Report> {
    skipped
        .iter()
        .map(|skip| miette::Report::new(skip_to_diagnostic(skip, source, filename)))
        .collect()
}

/// Span of the skipped construct in the original `source`.
///
/// Line numbers refer to the text the rule saw, which earlier rules may have
/// shifted, so the snippet is matched first and the line number only breaks
/// ties.
fn locate(skip: &Skipped, source: &str) -> SourceSpan {
    let reported = skip.line.saturating_sub(1);
    let mut offset = 0;
    let mut best: Option<(usize, usize, usize)> = None;
    let mut fallback = None;

    for (index, line) in source.split('\n').enumerate() {
        let trimmed = line.trim();
        let start = offset + (line.len() - line.trim_start().len());
        if index == reported {
            fallback = Some((start, trimmed.len()));
        }
        if !skip.snippet.is_empty() && trimmed == skip.snippet {
            let distance = index.abs_diff(reported);
            if best.map_or(true, |(d, _, _)| distance < d) {
                best = Some((distance, start, trimmed.len()));
            }
        }
        offset += line.len() + 1;
    }

    match best {
        Some((_, start, len)) => (start, len).into(),
        None => fallback.unwrap_or((0, 0)).into(),
    }
}
