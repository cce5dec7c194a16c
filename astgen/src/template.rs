//! Positional render templates.
//!
//! `{}` is a placeholder, `{{` and `}}` are literal braces.
//! Anything else in braces is rejected.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unmatched `{{` at byte {0}")]
    UnmatchedOpen(usize),
    #[error("unmatched `}}` at byte {0}")]
    UnmatchedClose(usize),
}

pub fn parse(format: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut text = String::new();

    let mut chars = format.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '{' => match chars.peek() {
                Some((_, '{')) => {
                    chars.next();
                    text.push('{');
                }
                Some((_, '}')) => {
                    chars.next();
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Placeholder);
                }
                _ => return Err(TemplateError::UnmatchedOpen(i)),
            },
            '}' => match chars.peek() {
                Some((_, '}')) => {
                    chars.next();
                    text.push('}');
                }
                _ => return Err(TemplateError::UnmatchedClose(i)),
            },
            c => text.push(c),
        }
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    Ok(segments)
}

pub fn placeholders(segments: &[Segment]) -> usize {
    segments
        .iter()
        .filter(|segment| matches!(segment, Segment::Placeholder))
        .count()
}

/// Unescaped literal text of the template, ignoring placeholders.
pub fn text(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        if let Segment::Text(text) = segment {
            out.push_str(text);
        }
    }
    out
}
