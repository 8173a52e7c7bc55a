use crate::colour::Colour;
use crate::font::{FontBook, FontId, FontSpec};
use crate::markup::Inline;
use crate::style::Alignment;
use crate::units::Pt;

/// A position within a paragraph's inline content: the index of an [Inline] and a
/// byte offset into its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Cursor {
    pub inline: usize,
    pub offset: usize,
}

/// A contiguous piece of a word set in a single face
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    pub font: FontId,
    pub size: Pt,
    pub colour: Colour,
    pub underline: bool,
    pub width: Pt,
    pub start: Cursor,
}

/// One laid out line of a paragraph. Words are separated by the gaps in `gaps`, where
/// `gaps[i]` is the natural space before `words[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub words: Vec<Vec<Piece>>,
    pub gaps: Vec<Pt>,
    /// Natural width of the line, words plus gaps
    pub width: Pt,
    /// The line was ended by an explicit break rather than by running out of room
    pub hard_break: bool,
    /// Whether this is the final line of the paragraph
    pub last: bool,
    /// Where the line's content starts in the paragraph
    pub start: Cursor,
}

impl Line {
    fn new(start: Cursor) -> Line {
        Line {
            words: Vec::new(),
            gaps: Vec::new(),
            width: Pt(0.0),
            hard_break: false,
            last: false,
            start,
        }
    }

    fn push(&mut self, gap: Pt, word: Vec<Piece>) {
        let width: Pt = word.iter().map(|p| p.width).sum();
        if self.words.is_empty() {
            self.width = width;
        } else {
            self.gaps.push(gap);
            self.width += gap + width;
        }
        self.words.push(word);
    }

    /// Horizontal offsets of every piece on the line when it is set into `available`
    /// width with the given alignment. Justified lines spread the spare room over the
    /// gaps, except for the last line and lines ended by an explicit break.
    pub fn placements(&self, available: Pt, alignment: Alignment) -> Vec<(Pt, &Piece)> {
        let spare = (available - self.width).max(Pt(0.0));
        let (mut x, stretch) = match alignment {
            Alignment::Left => (Pt(0.0), Pt(0.0)),
            Alignment::Right => (spare, Pt(0.0)),
            Alignment::Centre => (spare / 2.0, Pt(0.0)),
            Alignment::Justify if !self.last && !self.hard_break && !self.gaps.is_empty() => {
                (Pt(0.0), spare / self.gaps.len() as f32)
            }
            Alignment::Justify => (Pt(0.0), Pt(0.0)),
        };

        let mut placed = Vec::new();
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                x += self.gaps[i - 1] + stretch;
            }
            for piece in word {
                placed.push((x, piece));
                x += piece.width;
            }
        }
        placed
    }
}

enum Token {
    Word(Vec<Piece>),
    Space(Pt),
    Break(Cursor),
}

/// Split inline runs into words, collapsing whitespace the way HTML does. A word may
/// span several runs (`<b>bo</b>ld` is one word in two faces).
fn tokenize(
    fonts: &FontBook,
    inlines: &[Inline],
    font: &FontSpec,
    size: Pt,
    colour: Colour,
) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut word: Vec<Piece> = Vec::new();

    fn finish_word(fonts: &FontBook, word: &mut Vec<Piece>, tokens: &mut Vec<Token>) {
        if word.is_empty() {
            return;
        }
        for piece in word.iter_mut() {
            piece.width = fonts.face(piece.font).width_of_text(&piece.text, piece.size);
        }
        tokens.push(Token::Word(std::mem::take(word)));
    }

    for (i, inline) in inlines.iter().enumerate() {
        match inline {
            Inline::LineBreak => {
                finish_word(fonts, &mut word, &mut tokens);
                tokens.push(Token::Break(Cursor {
                    inline: i + 1,
                    offset: 0,
                }));
            }
            Inline::Text(run) => {
                let spec = font
                    .clone()
                    .bold(font.bold || run.bold)
                    .italic(font.italic || run.italic);
                let font_id = fonts.resolve(&spec);
                let mut new_piece = true;

                for (offset, ch) in run.text.char_indices() {
                    if ch.is_whitespace() && ch != '\u{a0}' {
                        finish_word(fonts, &mut word, &mut tokens);
                        new_piece = true;
                        if !matches!(tokens.last(), Some(Token::Space(_)) | None) {
                            let space = fonts.face(font_id).width_of_text(" ", size);
                            tokens.push(Token::Space(space));
                        }
                        continue;
                    }

                    if new_piece {
                        word.push(Piece {
                            text: String::new(),
                            font: font_id,
                            size,
                            colour,
                            underline: run.underline,
                            width: Pt(0.0),
                            start: Cursor { inline: i, offset },
                        });
                        new_piece = false;
                    }
                    if let Some(piece) = word.last_mut() {
                        piece.text.push(ch);
                    }
                }
            }
        }
    }
    finish_word(fonts, &mut word, &mut tokens);
    tokens
}

/// Break a word that is wider than a whole line into chunks that fit, character by
/// character. Every chunk but the last is returned as a finished line.
fn break_word(
    fonts: &FontBook,
    word: Vec<Piece>,
    available: Pt,
) -> (Vec<Line>, Vec<Piece>) {
    let mut lines = Vec::new();
    let mut chunk: Vec<Piece> = Vec::new();
    let mut chunk_width = Pt(0.0);

    for piece in word {
        let face = fonts.face(piece.font);
        for (offset, ch) in piece.text.char_indices() {
            let mut buf = [0u8; 4];
            let ch_width = face.width_of_text(ch.encode_utf8(&mut buf), piece.size);
            let start = Cursor {
                inline: piece.start.inline,
                offset: piece.start.offset + offset,
            };

            if !chunk.is_empty() && chunk_width + ch_width > available {
                let mut line = Line::new(chunk[0].start);
                line.push(Pt(0.0), std::mem::take(&mut chunk));
                lines.push(line);
                chunk_width = Pt(0.0);
            }

            let continues_piece = chunk
                .last()
                .is_some_and(|last| last.font == piece.font && last.start.inline == start.inline);
            match chunk.last_mut() {
                Some(last) if continues_piece => {
                    last.text.push(ch);
                    last.width += ch_width;
                }
                _ => chunk.push(Piece {
                    text: ch.to_string(),
                    width: ch_width,
                    start,
                    ..piece.clone()
                }),
            }
            chunk_width += ch_width;
        }
    }

    (lines, chunk)
}

/// Lays out styled inline content into lines with natural boundary wrapping.
///
/// Words are placed greedily; a word that would overflow the line starts the next one.
/// Whitespace is collapsed and dropped at line edges. If a single word is wider than
/// a whole line, it is broken between characters so that text never overflows.
///
/// `first_width` is the room on the first line (which may be indented differently),
/// `width` the room on every following line.
#[allow(clippy::too_many_arguments)]
pub fn layout_inlines(
    fonts: &FontBook,
    inlines: &[Inline],
    font: &FontSpec,
    size: Pt,
    colour: Colour,
    first_width: Pt,
    width: Pt,
) -> Vec<Line> {
    let tokens = tokenize(fonts, inlines, font, size, colour);

    let mut lines: Vec<Line> = Vec::new();
    let mut current = Line::new(Cursor::default());
    let mut pending_gap: Option<Pt> = None;
    let available = |lines: &Vec<Line>| if lines.is_empty() { first_width } else { width };

    for token in tokens {
        match token {
            Token::Space(gap) => {
                if !current.words.is_empty() {
                    pending_gap = Some(gap);
                }
            }
            Token::Break(next) => {
                current.hard_break = true;
                lines.push(std::mem::replace(&mut current, Line::new(next)));
                pending_gap = None;
            }
            Token::Word(word) => {
                let word_width: Pt = word.iter().map(|p| p.width).sum();
                let gap = pending_gap.take().unwrap_or_default();

                if !current.words.is_empty()
                    && current.width + gap + word_width > available(&lines)
                {
                    let start = word.first().map(|p| p.start).unwrap_or(current.start);
                    lines.push(std::mem::replace(&mut current, Line::new(start)));
                }

                if current.words.is_empty() && word_width > available(&lines) {
                    let (full, rest) = break_word(fonts, word, available(&lines));
                    lines.extend(full);
                    if let Some(first) = rest.first() {
                        current = Line::new(first.start);
                        current.push(Pt(0.0), rest);
                    }
                } else {
                    current.push(gap, word);
                }
            }
        }
    }

    if !current.words.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    if let Some(last) = lines.last_mut() {
        last.last = true;
    }
    // a paragraph made only of breaks or whitespace has no visible lines
    if lines.len() == 1 && lines[0].words.is_empty() {
        lines.clear();
    }
    lines
}

/// The inline content that remains from `cursor` onwards
pub fn inlines_from(inlines: &[Inline], cursor: Cursor) -> Vec<Inline> {
    let mut rest: Vec<Inline> = inlines.iter().skip(cursor.inline).cloned().collect();
    if let Some(Inline::Text(run)) = rest.first_mut() {
        run.text = run.text.get(cursor.offset..).unwrap_or_default().to_string();
    }
    rest
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::colours;
    use crate::markup::{parse, plain};

    fn layout(text: &str, width: f32) -> Vec<Line> {
        let fonts = FontBook::new();
        layout_inlines(
            &fonts,
            &plain(text),
            &FontSpec::new("Helvetica"),
            Pt(10.0),
            colours::BLACK,
            Pt(width),
            Pt(width),
        )
    }

    fn words(line: &Line) -> Vec<String> {
        line.words
            .iter()
            .map(|w| w.iter().map(|p| p.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn wraps_at_word_boundaries() {
        // "aaaa" is 22.24pt at 10pt, a space 2.78pt
        let lines = layout("aaaa aaaa aaaa", 50.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(words(&lines[0]), vec!["aaaa", "aaaa"]);
        assert_eq!(words(&lines[1]), vec!["aaaa"]);
        assert!(lines[1].last && !lines[0].last);
        assert_eq!(lines[1].start, Cursor { inline: 0, offset: 10 });
    }

    #[test]
    fn collapses_whitespace() {
        let lines = layout("  a    b  ", 500.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(words(&lines[0]), vec!["a", "b"]);
        assert_eq!(lines[0].gaps.len(), 1);
    }

    #[test]
    fn honours_hard_breaks() {
        let lines = layout("a\n\nb", 500.0);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].hard_break);
        assert!(lines[1].words.is_empty());
        assert_eq!(words(&lines[2]), vec!["b"]);
        assert_eq!(lines[2].start, Cursor { inline: 3, offset: 0 });
    }

    #[test]
    fn breaks_overlong_words_between_characters() {
        let lines = layout("aaaaaaaaaa", 12.0);
        assert!(lines.len() > 1);
        let joined: String = lines.iter().flat_map(words).collect();
        assert_eq!(joined, "aaaaaaaaaa");
        for line in &lines {
            assert!(line.width <= Pt(12.0));
        }
    }

    #[test]
    fn words_can_span_styles() {
        let fonts = FontBook::new();
        let inlines = parse("<b>bo</b>ld word").expect("valid markup");
        let lines = layout_inlines(
            &fonts,
            &inlines,
            &FontSpec::new("Helvetica"),
            Pt(10.0),
            colours::BLACK,
            Pt(500.0),
            Pt(500.0),
        );
        assert_eq!(lines[0].words[0].len(), 2);
        assert_ne!(lines[0].words[0][0].font, lines[0].words[0][1].font);
    }

    #[test]
    fn justified_lines_fill_the_width() {
        let lines = layout("aaaa aaaa aaaa", 50.0);
        let placed = lines[0].placements(Pt(50.0), Alignment::Justify);
        let (x, piece) = placed[placed.len() - 1];
        assert!(((x + piece.width).0 - 50.0).abs() < 1e-3);

        // the last line is left alone
        let placed = lines[1].placements(Pt(50.0), Alignment::Justify);
        assert_eq!(placed[0].0, Pt(0.0));
    }

    #[test]
    fn right_aligned_lines_end_at_the_edge() {
        let lines = layout("aaaa", 100.0);
        let placed = lines[0].placements(Pt(100.0), Alignment::Right);
        assert!(((placed[0].0 + placed[0].1.width).0 - 100.0).abs() < 1e-3);
    }

    #[test]
    fn remainder_starts_at_the_cursor() {
        let inlines = plain("hello world");
        let rest = inlines_from(&inlines, Cursor { inline: 0, offset: 6 });
        assert_eq!(crate::markup::plain_text(&rest), "world");
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(layout("", 100.0).is_empty());
        assert!(layout("   ", 100.0).is_empty());
    }
}
