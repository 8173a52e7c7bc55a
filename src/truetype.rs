use crate::{
    refs::{ObjectReferences, RefType},
    PDFError, Pt,
};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::HashMap;
use std::path::Path;

/// A TTF or OTF face that will be embedded in its entirety in the generated PDF, so
/// large fonts may dramatically increase the size of the output. Text drawn with it is
/// encoded as 2-byte glyph ids (`Identity-H`), with a ToUnicode map so that it can
/// still be copied out of the PDF.
pub struct EmbeddedFont {
    pub face: OwnedFace,
}

impl std::fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("name", &self.name())
            .finish()
    }
}

impl EmbeddedFont {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<EmbeddedFont, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(EmbeddedFont { face })
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<EmbeddedFont, PDFError> {
        let bytes = std::fs::read(path)?;
        EmbeddedFont::load(bytes)
    }

    fn name_entry(&self, name_id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The full name of the font, or `"Embedded"` if it doesn't carry one
    pub fn name(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
            .unwrap_or_else(|| "Embedded".to_string())
    }

    pub fn family(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
            .unwrap_or_else(|| self.name())
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().ascender() as f32
    }

    /// Distance from the baseline to the bottom of the font; usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().descender() as f32
    }

    /// The glyph a character is drawn with, falling back to the replacement
    /// character, then `?`, then `.notdef`
    pub fn glyph_for(&self, ch: char) -> GlyphId {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .unwrap_or(GlyphId(0))
    }

    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let face = self.face.as_face_ref();
        let units: u32 = text
            .chars()
            .map(|ch| face.glyph_hor_advance(self.glyph_for(ch)).unwrap_or_default() as u32)
            .sum();
        self.scaling(size) * units as f32
    }

    /// Encode text as big-endian glyph ids
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|ch| self.glyph_for(ch).0.to_be_bytes())
            .collect()
    }

    fn glyph_ids(&self) -> HashMap<u16, char> {
        let mut map: HashMap<u16, char> = HashMap::new();

        let Some(cmap) = self.face.as_face_ref().tables().cmap else {
            return map;
        };
        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                if let Ok(ch) = char::try_from(codepoint) {
                    if let Some(index) = subtable.glyph_index(codepoint).filter(|index| index.0 > 0)
                    {
                        map.entry(index.0).or_insert(ch);
                    }
                }
            });
        }

        map
    }

    /// (advance, height) of every mapped glyph
    fn glyph_metrics(&self, ids: &HashMap<u16, char>) -> HashMap<u16, (u16, i16)> {
        let face = self.face.as_face_ref();
        ids.keys()
            .filter_map(|&id| {
                let gid = GlyphId(id);
                let advance = face.glyph_hor_advance(gid)?;
                let height = face
                    .glyph_bounding_box(gid)
                    .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                    .unwrap_or(1000);
                Some((id, (advance, height)))
            })
            .collect()
    }

    fn write_cid(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) -> Ref {
        let font_descriptor_id = self.write_descriptor(refs, font_index, writer);

        let id = refs.gen(RefType::CidFont(font_index));

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(font_descriptor_id);

        let metrics = self.glyph_metrics(&self.glyph_ids());
        let scaling = 1000.0 / self.face.as_face_ref().units_per_em() as f32;

        // the most popular width becomes the default
        let mut width_counts: HashMap<u16, usize> = HashMap::new();
        for (width, _) in metrics.values() {
            *width_counts.entry(*width).or_insert(0) += 1;
        }
        let default_width = width_counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(&width, _)| width as f32 * scaling)
            .unwrap_or(1000.0);

        let mut id_widths: Vec<(u16, f32)> = metrics
            .iter()
            .map(|(&cid, &(width, _))| (cid, width as f32 * scaling))
            .collect();
        id_widths.sort_by_key(|(id, _)| *id);

        let mut widths = cid_font.widths();
        let mut run: Option<(u16, Vec<f32>)> = None;
        for (cid, width) in id_widths {
            match run.as_mut() {
                Some((start, ws)) if (cid - *start) as usize == ws.len() => ws.push(width),
                _ => {
                    if let Some((start, ws)) = run.take() {
                        widths.consecutive(start, ws);
                    }
                    run = Some((cid, vec![width]));
                }
            }
        }
        if let Some((start, ws)) = run {
            widths.consecutive(start, ws);
        }
        widths.finish();

        cid_font.default_width(default_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let font_data_id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(font_data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let face = self.face.as_face_ref();
        let metrics = self.glyph_metrics(&self.glyph_ids());
        let max_width = metrics.values().map(|&(w, _)| w).max().unwrap_or_default();
        let max_height = metrics.values().map(|&(_, h)| h).max().unwrap_or_default();
        let sum_width: usize = metrics.values().map(|&(w, _)| w as usize).sum();
        let avg_width = sum_width as f32 / metrics.len().max(1) as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));

        let name = self.name().replace(' ', "");
        let family = self.family();
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(name.as_bytes()));
        descriptor.family(Str(family.as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags: FontFlags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.set(FontFlags::FIXED_PITCH, true);
        }
        if face.is_italic() {
            flags.set(FontFlags::ITALIC, true);
        }
        descriptor.flags(flags);

        let scaling = 1000.0 / face.units_per_em() as f32;
        descriptor.bbox(pdf_writer::Rect {
            x1: 0.0,
            y1: face.descender() as f32 * scaling,
            x2: max_width as f32 * scaling,
            y2: max_height as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        descriptor.cap_height(
            face.capital_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(1000.0),
        );
        descriptor.x_height(
            face.x_height()
                .unwrap_or_else(|| face.capital_height().unwrap_or_default()) as f32
                * scaling,
        );
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);
        descriptor.font_file2(font_data_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut map = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mut ids: Vec<(u16, char)> = self.glyph_ids().into_iter().collect();
        ids.sort_by_key(|&(id, _)| id);

        // bfchar blocks hold at most 100 entries sharing a high byte
        let mut blocks: Vec<Vec<(u16, char)>> = Vec::new();
        let mut high_byte: Option<u8> = None;
        for (id, ch) in ids {
            let hb = (id >> 8) as u8;
            match blocks.last_mut() {
                Some(block) if high_byte == Some(hb) && block.len() < 100 => block.push((id, ch)),
                _ => {
                    high_byte = Some(hb);
                    blocks.push(vec![(id, ch)]);
                }
            }
        }

        for block in blocks {
            map.push_str(&format!("{} beginbfchar\n", block.len()));
            for (id, ch) in block {
                let mut utf16 = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|unit| format!("{unit:04x}"))
                    .collect();
                map.push_str(&format!("<{id:04x}> <{hex}>\n"));
            }
            map.push_str("endbfchar\n");
        }

        map.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            map.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        let mut stream = writer.stream(id, compressed.as_slice());
        stream.filter(Filter::FlateDecode);

        id
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let font_id = refs.gen(RefType::Font(font_index));
        let cid_font_id = self.write_cid(refs, font_index, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}
