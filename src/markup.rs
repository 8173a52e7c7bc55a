//! Inline paragraph markup.
//!
//! Paragraph text may carry a tiny subset of HTML: `<b>`/`<strong>`, `<i>`/`<em>`, `<u>`,
//! `<br/>`, and character entities (`&amp;`, `&#38;`, `&#x26;`, ...). Text that did not come
//! from the caller as markup goes through [sanitize] first, which escapes everything the
//! parser would otherwise interpret, so plain text can never fail to parse.

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Errors from [parse]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("unknown tag <{0}>")]
    UnknownTag(String),

    #[error("closing tag </{found}> does not match the open tag {expected:?}")]
    UnbalancedTag {
        expected: Option<String>,
        found: String,
    },

    #[error("tag <{0}> is never closed")]
    UnclosedTag(String),

    #[error("tag starting at byte {0} is never terminated")]
    UnterminatedTag(usize),

    #[error("bad character entity `&{0}`")]
    BadEntity(String),
}

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(Run),
    LineBreak,
}

/// Escape text so that [parse] reproduces it verbatim. Newlines become explicit line
/// breaks and carriage returns are dropped.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&#38;"),
            '<' => out.push_str("&#60;"),
            '>' => out.push_str("&#62;"),
            'ç' => out.push_str("&#231;"),
            'Ç' => out.push_str("&#199;"),
            '\n' => out.push_str("<br />"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Unicode compatibility composition (NFKC), which folds ligatures, full-width forms
/// and the like into characters the standard fonts can draw
pub fn normalize(text: &str) -> String {
    text.nfkc().collect()
}

/// The inline content of plain text, equivalent to `parse(&sanitize(text))` but without
/// any parsing
pub fn plain(text: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            inlines.push(Inline::LineBreak);
        }
        let line: String = line.chars().filter(|&c| c != '\r').collect();
        if !line.is_empty() {
            inlines.push(Inline::Text(Run {
                text: line,
                ..Default::default()
            }));
        }
    }
    inlines
}

/// Flatten inline content back to text, with line breaks as `\n`
pub fn plain_text(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(run) => run.text.as_str(),
            Inline::LineBreak => "\n",
        })
        .collect()
}

#[derive(Default)]
struct Builder {
    inlines: Vec<Inline>,
    current: String,
    stack: Vec<&'static str>,
}

impl Builder {
    fn style(&self) -> (bool, bool, bool) {
        (
            self.stack.contains(&"b"),
            self.stack.contains(&"i"),
            self.stack.contains(&"u"),
        )
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.current);
        let (bold, italic, underline) = self.style();
        if let Some(Inline::Text(last)) = self.inlines.last_mut() {
            if (last.bold, last.italic, last.underline) == (bold, italic, underline) {
                last.text.push_str(&text);
                return;
            }
        }
        self.inlines.push(Inline::Text(Run {
            text,
            bold,
            italic,
            underline,
        }));
    }
}

fn canonical_tag(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "b" | "strong" => Some("b"),
        "i" | "em" => Some("i"),
        "u" => Some("u"),
        "br" => Some("br"),
        _ => None,
    }
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = entity.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Parse paragraph markup into styled runs. Raw newlines inside markup are ordinary
/// whitespace; only `<br/>` breaks a line.
pub fn parse(markup: &str) -> Result<Vec<Inline>, MarkupError> {
    let mut b = Builder::default();
    let mut chars = markup.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        match ch {
            '<' => {
                let end = markup[start..]
                    .find('>')
                    .map(|offset| start + offset)
                    .ok_or(MarkupError::UnterminatedTag(start))?;
                let inner = markup[start + 1..end].trim();
                while chars.peek().is_some_and(|&(i, _)| i <= end) {
                    chars.next();
                }

                let (closing, inner) = match inner.strip_prefix('/') {
                    Some(rest) => (true, rest.trim_start()),
                    None => (false, inner),
                };
                let self_closing = inner.ends_with('/');
                let name = inner
                    .trim_end_matches('/')
                    .split_whitespace()
                    .next()
                    .unwrap_or_default();
                let tag = canonical_tag(name).ok_or_else(|| MarkupError::UnknownTag(name.to_string()))?;

                b.flush();
                if tag == "br" {
                    if !closing {
                        b.inlines.push(Inline::LineBreak);
                    }
                } else if closing {
                    match b.stack.last() {
                        Some(&open) if open == tag => {
                            b.stack.pop();
                        }
                        other => {
                            return Err(MarkupError::UnbalancedTag {
                                expected: other.map(|s| s.to_string()),
                                found: name.to_string(),
                            })
                        }
                    }
                } else if !self_closing {
                    b.stack.push(tag);
                }
            }
            '&' => {
                let end = markup[start..]
                    .find(';')
                    .map(|offset| start + offset)
                    .filter(|&end| end - start <= 10)
                    .ok_or_else(|| {
                        MarkupError::BadEntity(markup[start + 1..].chars().take(8).collect())
                    })?;
                let entity = &markup[start + 1..end];
                let decoded =
                    decode_entity(entity).ok_or_else(|| MarkupError::BadEntity(entity.to_string()))?;
                b.current.push(decoded);
                while chars.peek().is_some_and(|&(i, _)| i <= end) {
                    chars.next();
                }
            }
            '\r' => {}
            '\n' => b.current.push(' '),
            _ => b.current.push(ch),
        }
    }

    if let Some(open) = b.stack.last() {
        return Err(MarkupError::UnclosedTag(open.to_string()));
    }
    b.flush();
    Ok(b.inlines)
}
