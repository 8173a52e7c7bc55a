//! The standard-14 Helvetica family. These faces are built into every PDF reader, so they
//! are never embedded: the document only carries a font dictionary naming them, and text is
//! encoded as single WinAnsi bytes. Widths come from the Adobe AFM files.

use crate::units::Pt;
use unicode_normalization::UnicodeNormalization;

/// One of the four built-in Helvetica faces
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

/// widths of U+0020 through U+007E, in 1/1000 em
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl StandardFont {
    /// Pick the face for a bold / italic combination
    pub fn variant(bold: bool, italic: bool) -> StandardFont {
        match (bold, italic) {
            (false, false) => StandardFont::Helvetica,
            (true, false) => StandardFont::HelveticaBold,
            (false, true) => StandardFont::HelveticaOblique,
            (true, true) => StandardFont::HelveticaBoldOblique,
        }
    }

    /// The PostScript name the face is referred to by in the PDF
    pub fn base_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    fn is_bold(&self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique
        )
    }

    pub fn ascender(&self) -> i16 {
        718
    }

    pub fn descender(&self) -> i16 {
        -207
    }

    /// Advance width of a character in 1/1000 em. Characters the encoding can't represent
    /// are measured as the `?` they will be drawn as.
    pub fn glyph_width(&self, ch: char) -> u16 {
        let table = if self.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        let ascii = |c: char| table[(c as usize) - 0x20];

        match ch {
            ' '..='~' => ascii(ch),
            '\u{a0}' => ascii(' '),
            '•' => 350,
            '–' | '€' => 556,
            '—' | '…' | '‰' => 1000,
            '‘' | '’' | '‚' => {
                if self.is_bold() {
                    278
                } else {
                    222
                }
            }
            '“' | '”' | '„' => {
                if self.is_bold() {
                    500
                } else {
                    333
                }
            }
            '°' => 400,
            '×' | '÷' | '±' | '¬' => 584,
            '©' | '®' => 737,
            'ß' | 'ø' => {
                if self.is_bold() {
                    611
                } else {
                    556
                }
            }
            'æ' | 'Æ' => 889,
            '«' | '»' | '§' | '¢' | '£' | '¥' => 556,
            '·' => 278,
            '¡' => 333,
            '¿' => 611,
            _ if encode_char(ch).is_none() => ascii('?'),
            _ => {
                // accented latin letters are as wide as their base letter
                match ch.nfd().next() {
                    Some(base @ ' '..='~') => ascii(base),
                    _ => 556,
                }
            }
        }
    }

    /// Measure a run of text at the given size
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let units: u32 = text.chars().map(|c| self.glyph_width(c) as u32).sum();
        size * (units as f32 / 1000.0)
    }

    /// Encode text into WinAnsi bytes, substituting `?` for anything unrepresentable
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| encode_char(ch).unwrap_or(b'?'))
            .collect()
    }
}

/// Map a character onto the WinAnsi code page
pub(crate) fn encode_char(ch: char) -> Option<u8> {
    match ch {
        ' '..='~' => Some(ch as u8),
        '\u{a0}'..='\u{ff}' => Some(ch as u32 as u8),
        '€' => Some(0x80),
        '‚' => Some(0x82),
        'ƒ' => Some(0x83),
        '„' => Some(0x84),
        '…' => Some(0x85),
        '†' => Some(0x86),
        '‡' => Some(0x87),
        'ˆ' => Some(0x88),
        '‰' => Some(0x89),
        'Š' => Some(0x8a),
        '‹' => Some(0x8b),
        'Œ' => Some(0x8c),
        'Ž' => Some(0x8e),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        '˜' => Some(0x98),
        '™' => Some(0x99),
        'š' => Some(0x9a),
        '›' => Some(0x9b),
        'œ' => Some(0x9c),
        'ž' => Some(0x9e),
        'Ÿ' => Some(0x9f),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn measures_with_afm_widths() {
        let w = StandardFont::Helvetica.width_of_text("Hi", Pt(10.0));
        // H = 722, i = 222
        assert!((w.0 - 9.44).abs() < 1e-4);
        assert!(
            StandardFont::HelveticaBold.width_of_text("Hi", Pt(10.0))
                > StandardFont::Helvetica.width_of_text("Hi", Pt(10.0))
        );
    }

    #[test]
    fn accented_letters_use_base_widths() {
        let f = StandardFont::Helvetica;
        assert_eq!(f.glyph_width('é'), f.glyph_width('e'));
        assert_eq!(f.glyph_width('Ç'), f.glyph_width('C'));
    }

    #[test]
    fn encodes_winansi() {
        let f = StandardFont::Helvetica;
        assert_eq!(f.encode("a•é"), vec![b'a', 0x95, 0xe9]);
        assert_eq!(f.encode("日本"), b"??".to_vec());
    }
}
