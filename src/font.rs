use crate::{
    refs::{ObjectReferences, RefType},
    standard::StandardFont,
    truetype::EmbeddedFont,
    PDFError, Pt,
};
use id_arena::{Arena, Id};
use pdf_writer::{Name, Pdf};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Anything text can be drawn with: either one of the built-in Helvetica faces, or
/// an embedded TrueType / OpenType face.
#[derive(Debug)]
pub enum FontFace {
    Standard(StandardFont),
    Embedded(EmbeddedFont),
}

/// Identifies a face within a [FontBook]
pub type FontId = Id<FontFace>;

impl FontFace {
    pub fn name(&self) -> String {
        match self {
            FontFace::Standard(f) => f.base_name().to_string(),
            FontFace::Embedded(f) => f.name(),
        }
    }

    /// Calculate the width of a run of text at the given font size
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        match self {
            FontFace::Standard(f) => f.width_of_text(text, size),
            FontFace::Embedded(f) => f.width_of_text(text, size),
        }
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        match self {
            FontFace::Standard(f) => size * (f.ascender() as f32 / 1000.0),
            FontFace::Embedded(f) => f.ascent(size),
        }
    }

    /// Distance from the baseline to the bottom of the font at the given size. Note: this
    /// is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        match self {
            FontFace::Standard(f) => size * (f.descender() as f32 / 1000.0),
            FontFace::Embedded(f) => f.descent(size),
        }
    }

    /// Encode text into the bytes a `Tj` operator expects for this face
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            FontFace::Standard(f) => f.encode(text),
            FontFace::Embedded(f) => f.encode(text),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        match self {
            FontFace::Standard(f) => {
                let id = refs.gen(RefType::Font(font_index));
                let mut font = writer.type1_font(id);
                font.base_font(Name(f.base_name().as_bytes()));
                font.encoding_predefined(Name(b"WinAnsiEncoding"));
            }
            FontFace::Embedded(f) => f.write(refs, font_index, writer),
        }
    }
}

/// Requests a face by family name and style. Style suffixes in the ReportLab /
/// PostScript manner (`Helvetica-Bold`, `Helvetica-Oblique`, `MyFont-BoldItalic`) are
/// understood by [FontSpec::from_name].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new<S: ToString>(family: S) -> FontSpec {
        FontSpec {
            family: family.to_string(),
            bold: false,
            italic: false,
        }
    }

    pub fn from_name(name: &str) -> FontSpec {
        let suffixes: [(&str, bool, bool); 5] = [
            ("-BoldItalic", true, true),
            ("-BoldOblique", true, true),
            ("-Bold", true, false),
            ("-Italic", false, true),
            ("-Oblique", false, true),
        ];
        for (suffix, bold, italic) in suffixes {
            if let Some(family) = name.strip_suffix(suffix) {
                return FontSpec {
                    family: family.to_string(),
                    bold,
                    italic,
                };
            }
        }
        FontSpec::new(name)
    }

    pub fn bold(mut self, bold: bool) -> FontSpec {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> FontSpec {
        self.italic = italic;
        self
    }
}

impl std::fmt::Display for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = match (self.bold, self.italic) {
            (false, false) => "",
            (true, false) => "-Bold",
            (false, true) => "-Italic",
            (true, true) => "-BoldItalic",
        };
        write!(f, "{}{suffix}", self.family)
    }
}

#[derive(Debug, Copy, Clone)]
struct FontFamily {
    regular: FontId,
    bold: FontId,
    italic: FontId,
    bold_italic: FontId,
}

impl FontFamily {
    fn pick(&self, bold: bool, italic: bool) -> FontId {
        match (bold, italic) {
            (false, false) => self.regular,
            (true, false) => self.bold,
            (false, true) => self.italic,
            (true, true) => self.bold_italic,
        }
    }
}

/// All faces available to a document, grouped into families. Faces are stored
/// "globally" within the document such that every page refers to them by their
/// [FontId]. A new book always knows the built-in `Helvetica` family.
#[derive(Debug)]
pub struct FontBook {
    pub faces: Arena<FontFace>,
    families: HashMap<String, FontFamily>,
    default_family: String,
    standard: FontFamily,
    /// Families looked up without being registered, each warned about once
    missing: RefCell<BTreeSet<String>>,
}

impl Default for FontBook {
    fn default() -> Self {
        FontBook::new()
    }
}

impl FontBook {
    pub fn new() -> FontBook {
        let mut faces = Arena::new();
        let mut alloc =
            |bold, italic| faces.alloc(FontFace::Standard(StandardFont::variant(bold, italic)));
        let family = FontFamily {
            regular: alloc(false, false),
            bold: alloc(true, false),
            italic: alloc(false, true),
            bold_italic: alloc(true, true),
        };

        let mut families = HashMap::new();
        families.insert("Helvetica".to_string(), family);
        FontBook {
            faces,
            families,
            default_family: "Helvetica".to_string(),
            standard: family,
            missing: RefCell::new(BTreeSet::new()),
        }
    }

    /// Register a family of embedded faces. Missing variants fall back: italic to
    /// regular, bold to regular, bold-italic to bold.
    pub fn register_family<S: ToString>(
        &mut self,
        family: S,
        regular: EmbeddedFont,
        italic: Option<EmbeddedFont>,
        bold: Option<EmbeddedFont>,
        bold_italic: Option<EmbeddedFont>,
    ) {
        let regular = self.faces.alloc(FontFace::Embedded(regular));
        let italic = italic
            .map(|f| self.faces.alloc(FontFace::Embedded(f)))
            .unwrap_or(regular);
        let bold = bold
            .map(|f| self.faces.alloc(FontFace::Embedded(f)))
            .unwrap_or(regular);
        let bold_italic = bold_italic
            .map(|f| self.faces.alloc(FontFace::Embedded(f)))
            .unwrap_or(bold);

        let family = family.to_string();
        log::debug!("registered font family `{family}`");
        self.families.insert(
            family,
            FontFamily {
                regular,
                bold,
                italic,
                bold_italic,
            },
        );
    }

    /// Load and register a family from font files on disk
    pub fn register_fonts_from_paths<P: AsRef<Path>>(
        &mut self,
        regular: P,
        italic: Option<P>,
        bold: Option<P>,
        bold_italic: Option<P>,
        family: &str,
    ) -> Result<(), PDFError> {
        let load = |p: Option<P>| p.map(EmbeddedFont::load_from_path).transpose();
        let regular = EmbeddedFont::load_from_path(regular)?;
        let italic = load(italic)?;
        let bold = load(bold)?;
        let bold_italic = load(bold_italic)?;
        self.register_family(family, regular, italic, bold, bold_italic);
        Ok(())
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    /// Make `family` the one unknown families fall back to
    pub fn set_default_family(&mut self, family: &str) -> Result<(), PDFError> {
        if !self.has_family(family) {
            return Err(PDFError::UnknownFontFamily(family.to_string()));
        }
        self.default_family = family.to_string();
        Ok(())
    }

    /// Find the face for a spec, falling back to the default family
    pub fn resolve(&self, spec: &FontSpec) -> FontId {
        match self.families.get(&spec.family) {
            Some(family) => family.pick(spec.bold, spec.italic),
            None => {
                if self.missing.borrow_mut().insert(spec.family.clone()) {
                    log::warn!(
                        "font family `{}` is not registered, using `{}`",
                        spec.family,
                        self.default_family
                    );
                }
                self.families
                    .get(&self.default_family)
                    .unwrap_or(&self.standard)
                    .pick(spec.bold, spec.italic)
            }
        }
    }

    /// Families that were asked for but never registered
    pub fn missing_families(&self) -> Vec<String> {
        self.missing.borrow().iter().cloned().collect()
    }

    pub fn face(&self, id: FontId) -> &FontFace {
        &self.faces[id]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_style_suffixes() {
        let spec = FontSpec::from_name("Helvetica-Bold");
        assert_eq!(spec.family, "Helvetica");
        assert!(spec.bold && !spec.italic);

        let spec = FontSpec::from_name("Fira Sans-BoldItalic");
        assert_eq!(spec.family, "Fira Sans");
        assert!(spec.bold && spec.italic);

        assert_eq!(FontSpec::from_name("Helvetica-Oblique").to_string(), "Helvetica-Italic");
        assert_eq!(FontSpec::from_name("Helvetica").to_string(), "Helvetica");
    }

    #[test]
    fn resolves_standard_variants() {
        let book = FontBook::new();
        let bold = book.resolve(&FontSpec::new("Helvetica").bold(true));
        assert_eq!(book.face(bold).name(), "Helvetica-Bold");
        let bi = book.resolve(&FontSpec::from_name("Helvetica-BoldItalic"));
        assert_eq!(book.face(bi).name(), "Helvetica-BoldOblique");
    }

    #[test]
    fn unknown_families_fall_back_to_default() {
        let book = FontBook::new();
        let id = book.resolve(&FontSpec::new("Garamond").italic(true));
        assert_eq!(book.face(id).name(), "Helvetica-Oblique");
        book.resolve(&FontSpec::new("Garamond"));
        book.resolve(&FontSpec::new("Futura").bold(true));
        assert_eq!(book.missing_families(), vec!["Futura", "Garamond"]);
        assert!(!book.has_family("Garamond"));
    }

    #[test]
    fn default_family_must_exist() {
        let mut book = FontBook::new();
        assert!(matches!(
            book.set_default_family("Nope"),
            Err(PDFError::UnknownFontFamily(_))
        ));
    }
}
