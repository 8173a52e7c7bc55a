//! Turns a small subset of HTML into paragraphs.
//!
//! `<p>` and `<li>` elements become one paragraph each, with `<strong>`/`<b>`,
//! `<em>`/`<i>`, `<u>` and `<br>` kept as inline markup; any other inline tag is dropped
//! but its text is kept. List items get a bullet (`<ul>`) or their number (`<ol>`).
//! Attributes are ignored throughout. Text that sits directly inside any other element
//! becomes a paragraph of its own.

use crate::paragraph::Paragraph;
use crate::style::{ParagraphStyle, StyleSheet};
use crate::PDFError;
use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;

pub const BULLET: &str = "•";

/// Convert an HTML fragment into paragraphs styled from `styles`
pub fn mini_html(html: &str, styles: &StyleSheet) -> Result<Vec<Paragraph>, PDFError> {
    let document = kuchiki::parse_html().one(html);
    let body = document
        .select_first("body")
        .map_err(|_| PDFError::Html("the fragment has no body".to_string()))?;

    let mut converter = Converter {
        styles,
        paragraphs: Vec::new(),
    };
    converter.children(body.as_node(), None, &styles.paragraph)?;
    Ok(converter.paragraphs)
}

struct Converter<'a> {
    styles: &'a StyleSheet,
    paragraphs: Vec<Paragraph>,
}

impl Converter<'_> {
    fn push(
        &mut self,
        markup: &str,
        bullet: Option<&str>,
        style: &ParagraphStyle,
    ) -> Result<(), PDFError> {
        let mut paragraph = Paragraph::from_markup(markup, style.clone())?;
        if let Some(bullet) = bullet {
            paragraph = paragraph.with_bullet(bullet);
        }
        self.paragraphs.push(paragraph);
        Ok(())
    }

    fn children(
        &mut self,
        node: &NodeRef,
        bullet: Option<&str>,
        style: &ParagraphStyle,
    ) -> Result<(), PDFError> {
        for child in node.children() {
            if let Some(text) = child.as_text() {
                let text = text.borrow();
                if !text.trim().is_empty() {
                    self.push(&escape(&text), bullet, style)?;
                }
            } else if child.as_element().is_some() {
                self.element(&child, bullet, style)?;
            }
        }
        Ok(())
    }

    fn element(
        &mut self,
        node: &NodeRef,
        bullet: Option<&str>,
        style: &ParagraphStyle,
    ) -> Result<(), PDFError> {
        let Some(element) = node.as_element() else {
            return Ok(());
        };
        let styles = self.styles;

        match &*element.name.local {
            "ul" => {
                for item in node.children().filter(|c| c.as_element().is_some()) {
                    self.element(&item, Some(BULLET), &styles.bullet)?;
                }
            }
            "ol" => {
                let items = node.children().filter(|c| c.as_element().is_some());
                for (i, item) in items.enumerate() {
                    let number = format!("{}.", i + 1);
                    self.element(&item, Some(&number), &styles.numberbullet)?;
                }
            }
            "p" | "li" => {
                let mut markup = String::new();
                inline_markup(node, &mut markup);
                self.push(&markup, bullet, style)?;
            }
            "script" | "style" => {}
            _ => self.children(node, bullet, style)?,
        }
        Ok(())
    }
}

/// Escape decoded HTML text for the paragraph markup parser. HTML does not break lines
/// at newlines, so neither do we.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&#38;"),
            '<' => out.push_str("&#60;"),
            '>' => out.push_str("&#62;"),
            '\n' | '\r' | '\t' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out
}

fn inline_markup(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        if let Some(text) = child.as_text() {
            out.push_str(&escape(&text.borrow()));
            continue;
        }
        let Some(element) = child.as_element() else {
            continue;
        };
        let tag = match &*element.name.local {
            "b" | "strong" => Some("b"),
            "i" | "em" => Some("i"),
            "u" => Some("u"),
            "br" => {
                out.push_str("<br/>");
                continue;
            }
            other => {
                log::warn!("dropping unsupported <{other}> tag, keeping its text");
                None
            }
        };
        match tag {
            Some(tag) => {
                out.push('<');
                out.push_str(tag);
                out.push('>');
                inline_markup(&child, out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            None => inline_markup(&child, out),
        }
    }
}
