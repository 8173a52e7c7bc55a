use crate::canvas::Canvas;
use crate::font::FontBook;
use crate::layout::{inlines_from, layout_inlines, Line};
use crate::markup::{self, Inline, MarkupError};
use crate::style::ParagraphStyle;
use crate::units::Pt;

/// A block of wrapped text set in one [ParagraphStyle], optionally with a bullet hanging
/// in front of its first line.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    inlines: Vec<Inline>,
    pub style: ParagraphStyle,
    pub bullet: Option<String>,
    /// This is what was left over after splitting a paragraph across frames
    continued: bool,
    /// Lines fixed when the paragraph was split off, with the width they were set at
    fixed: Option<(Pt, Vec<Line>)>,
}

impl Paragraph {
    pub fn new(inlines: Vec<Inline>, style: ParagraphStyle) -> Paragraph {
        Paragraph {
            inlines,
            style,
            bullet: None,
            continued: false,
            fixed: None,
        }
    }

    /// A paragraph of plain text. Nothing in `text` is interpreted as markup; newlines
    /// become line breaks.
    pub fn from_text(text: &str, style: ParagraphStyle) -> Paragraph {
        Paragraph::new(markup::plain(&markup::normalize(text)), style)
    }

    /// A paragraph of inline markup (`<b>`, `<i>`, `<u>`, `<br/>`, entities)
    pub fn from_markup(text: &str, style: ParagraphStyle) -> Result<Paragraph, MarkupError> {
        Ok(Paragraph::new(markup::parse(&markup::normalize(text))?, style))
    }

    pub fn with_bullet<S: ToString>(mut self, bullet: S) -> Paragraph {
        self.bullet = Some(bullet.to_string());
        self
    }

    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    /// The paragraph's text, with line breaks as `\n`
    pub fn text(&self) -> String {
        markup::plain_text(&self.inlines)
    }

    fn text_width(&self, width: Pt) -> Pt {
        (width - self.style.left_indent - self.style.right_indent).max(Pt(0.0))
    }

    fn first_line_indent(&self) -> Pt {
        if self.continued {
            Pt(0.0)
        } else {
            self.style.first_line_indent
        }
    }

    /// Break the paragraph into lines for a frame `width` wide
    pub fn lines(&self, fonts: &FontBook, width: Pt) -> Vec<Line> {
        if let Some((fixed_width, lines)) = &self.fixed {
            if (*fixed_width - width).abs() < Pt(0.01) {
                return lines.clone();
            }
        }

        let text_width = self.text_width(width);
        layout_inlines(
            fonts,
            &self.inlines,
            &self.style.font,
            self.style.font_size,
            self.style.colour,
            text_width - self.first_line_indent(),
            text_width,
        )
    }

    pub fn height(&self, fonts: &FontBook, width: Pt) -> Pt {
        self.style.leading * self.lines(fonts, width).len() as f32
    }

    /// Split the paragraph between lines so that the first part fits into `height`.
    /// The first part keeps at least two lines; a paragraph that can't manage that is
    /// moved whole instead.
    pub fn split(
        &self,
        fonts: &FontBook,
        width: Pt,
        height: Pt,
    ) -> Option<(Paragraph, Paragraph)> {
        if self.style.leading <= Pt(0.0) {
            return None;
        }
        let lines = self.lines(fonts, width);
        let fit = ((*height + 0.001) / *self.style.leading).floor().max(0.0) as usize;
        if fit < 2 || fit >= lines.len() {
            return None;
        }

        let mut first = self.clone();
        first.style.space_after = Pt(0.0);
        first.fixed = Some((width, lines[..fit].to_vec()));

        let mut style = self.style.clone();
        style.space_before = Pt(0.0);
        let rest = Paragraph {
            inlines: inlines_from(&self.inlines, lines[fit].start),
            style,
            bullet: None,
            continued: true,
            fixed: None,
        };

        Some((first, rest))
    }

    /// Draw the paragraph with the top of its first line at `y_top`
    pub fn draw(&self, canvas: &mut Canvas, x: Pt, y_top: Pt, width: Pt) {
        let lines = self.lines(canvas.fonts(), width);
        let text_width = self.text_width(width);
        let style = &self.style;
        let mut baseline = y_top - style.font_size;

        canvas.save_state();
        canvas.set_fill_colour(style.colour);
        canvas.set_stroke_colour(style.colour);

        if let (Some(bullet), false) = (&self.bullet, self.continued) {
            canvas.set_font_spec(&style.font, style.bullet_font_size);
            canvas.draw_string(x + style.bullet_indent, baseline, bullet);
        }

        for (i, line) in lines.iter().enumerate() {
            let indent = if i == 0 {
                self.first_line_indent()
            } else {
                Pt(0.0)
            };
            let left = x + style.left_indent + indent;

            for (dx, piece) in line.placements(text_width - indent, style.alignment) {
                canvas.set_font_id(piece.font, piece.size);
                canvas.draw_string(left + dx, baseline, &piece.text);
                if piece.underline {
                    let y = baseline - piece.size * 0.1;
                    canvas.set_line_width(piece.size / 15.0);
                    canvas.line((left + dx, y), (left + dx + piece.width, y));
                }
            }
            baseline -= style.leading;
        }

        canvas.restore_state();
    }
}
