use crate::canvas::CanvasOp;
use crate::colour::Colour;
use crate::doc_template::RenderedPage;
use crate::font::{FontBook, FontId};
use crate::image::Image;
use crate::info::Info;
use crate::outline::Outline;
use crate::pagination::PaginationState;
use crate::refs::{ObjectReferences, RefType};
use crate::PDFError;
use id_arena::Arena;
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Ref, Str};
use std::collections::BTreeSet;
use std::io::Write;

/// A laid out document, ready to be written. Until [RenderedDocument::write] is called
/// nothing has been serialised, so the pages can still be inspected (or drawn on).
pub struct RenderedDocument {
    pub pages: Vec<RenderedPage>,
    pub outline: Outline,
    pub info: Option<Info>,
    pub fonts: FontBook,
    pub images: Arena<Image>,
    /// Page counting state of the final layout pass
    pub pagination: PaginationState,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every face some page draws text with
    fn used_fonts(&self) -> BTreeSet<usize> {
        self.pages
            .iter()
            .flat_map(|page| page.ops.iter())
            .filter_map(|op| match op {
                CanvasOp::Text { font, .. } => Some(font.index()),
                _ => None,
            })
            .collect()
    }

    /// Write the entire document to the writer. The whole PDF is assembled in memory
    /// first, as `pdf-writer` requires.
    pub fn write<W: Write>(&self, mut w: W) -> Result<(), PDFError> {
        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = &self.info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..self.pages.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        let used_fonts = self.used_fonts();
        for (id, face) in self.fonts.faces.iter() {
            if used_fonts.contains(&id.index()) {
                face.write(&mut refs, id.index(), &mut writer);
            }
        }

        for (id, image) in self.images.iter() {
            image.write(&mut refs, id.index(), &mut writer)?;
        }

        for (i, page) in self.pages.iter().enumerate() {
            let content_id = refs.gen(RefType::ContentForPage(i));

            let mut pdf_page = writer.page(page_refs[i]);
            pdf_page.media_box(pdf_writer::Rect::new(0.0, 0.0, *page.size.0, *page.size.1));
            pdf_page.parent(page_tree_id);
            pdf_page.contents(content_id);

            let mut resources = pdf_page.resources();
            let mut resource_fonts = resources.fonts();
            for &index in used_fonts.iter() {
                if let Some(font_ref) = refs.get(RefType::Font(index)) {
                    resource_fonts.pair(Name(format!("F{index}").as_bytes()), font_ref);
                }
            }
            resource_fonts.finish();
            let mut resource_xobjects = resources.x_objects();
            for (id, _) in self.images.iter() {
                if let Some(image_ref) = refs.get(RefType::Image(id.index())) {
                    resource_xobjects.pair(Name(format!("I{}", id.index()).as_bytes()), image_ref);
                }
            }
            resource_xobjects.finish();
            resources.finish();
            pdf_page.finish();

            let rendered = render_ops(&page.ops, &self.fonts, &self.images)?;
            let compressed =
                compress_to_vec_zlib(&rendered, CompressionLevel::DefaultLevel as u8);
            writer
                .stream(content_id, compressed.as_slice())
                .filter(Filter::FlateDecode);
        }

        let outline_id = self.outline.write(&mut refs, &page_refs, &mut writer);

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        if let Some(outline_id) = outline_id {
            catalog.outlines(outline_id);
        }
        catalog.finish();

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }

    /// Render the document into a byte buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, PDFError> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }
}

fn set_fill(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_fill_gray(g),
    };
}

fn set_stroke(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_stroke_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_stroke_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_stroke_gray(g),
    };
}

fn paint(content: &mut Content, fill: bool, stroke: bool) {
    match (fill, stroke) {
        (true, true) => content.fill_nonzero_and_stroke(),
        (true, false) => content.fill_nonzero(),
        (false, true) => content.stroke(),
        (false, false) => content.end_path(),
    };
}

fn font_name(font: FontId) -> String {
    format!("F{}", font.index())
}

/// Turn recorded canvas operations into a content stream
pub(crate) fn render_ops(
    ops: &[CanvasOp],
    fonts: &FontBook,
    images: &Arena<Image>,
) -> Result<Vec<u8>, PDFError> {
    let mut content = Content::new();

    for op in ops {
        match op {
            CanvasOp::SaveState => {
                content.save_state();
            }
            CanvasOp::RestoreState => {
                content.restore_state();
            }
            CanvasOp::Transform(transform) => transform.write_to_content(&mut content),
            CanvasOp::LineWidth(width) => {
                content.set_line_width(**width);
            }
            CanvasOp::FillColour(colour) => set_fill(&mut content, *colour),
            CanvasOp::StrokeColour(colour) => set_stroke(&mut content, *colour),
            CanvasOp::Text {
                font,
                size,
                x,
                y,
                text,
            } => {
                let encoded = fonts.face(*font).encode(text);
                content.begin_text();
                content.set_font(Name(font_name(*font).as_bytes()), **size);
                content.next_line(**x, **y);
                content.show(Str(encoded.as_slice()));
                content.end_text();
            }
            CanvasOp::Line { from, to } => {
                content.move_to(*from.0, *from.1);
                content.line_to(*to.0, *to.1);
                content.stroke();
            }
            CanvasOp::Rect { rect, fill, stroke } => {
                content.rect(*rect.x1, *rect.y1, *rect.width(), *rect.height());
                paint(&mut content, *fill, *stroke);
            }
            CanvasOp::Path {
                points,
                close,
                fill,
                stroke,
            } => {
                let mut points = points.iter();
                if let Some((x, y)) = points.next() {
                    content.move_to(**x, **y);
                }
                for (x, y) in points {
                    content.line_to(**x, **y);
                }
                if *close {
                    content.close_path();
                }
                paint(&mut content, *fill, *stroke);
            }
            CanvasOp::Image { image, rect } => {
                if images.get(*image).is_none() {
                    return Err(PDFError::ImageMissing(image.index()));
                }
                content.save_state();
                content.transform([
                    *rect.width(),
                    0.0,
                    0.0,
                    *rect.height(),
                    *rect.x1,
                    *rect.y1,
                ]);
                content.x_object(Name(format!("I{}", image.index()).as_bytes()));
                content.restore_state();
            }
        }
    }

    Ok(content.finish())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canvas::Canvas;
    use crate::rect::Rect;
    use crate::units::Pt;

    #[test]
    fn text_selects_the_face_by_index() {
        let fonts = FontBook::new();
        let images = Arena::new();
        let mut canvas = Canvas::new(&fonts, &images, (Pt(200.0), Pt(200.0)));
        canvas.set_font("Helvetica-Bold", Pt(12.0));
        canvas.draw_string(Pt(10.0), Pt(20.0), "Hi");
        let bold = fonts.resolve(&crate::font::FontSpec::new("Helvetica").bold(true));

        let rendered = render_ops(canvas.ops(), &fonts, &images).expect("renders");
        let text = String::from_utf8_lossy(&rendered);
        assert!(text.contains(&format!("/F{} 12 Tf", bold.index())));
        assert!(text.contains("10 20 Td"));
        assert!(text.contains("(Hi) Tj"));
    }

    #[test]
    fn paths_close_and_fill() {
        let fonts = FontBook::new();
        let images = Arena::new();
        let mut canvas = Canvas::new(&fonts, &images, (Pt(200.0), Pt(200.0)));
        canvas.set_fill_colour(Colour::new_rgb(1.0, 0.0, 0.0));
        canvas.path(
            vec![(Pt(0.0), Pt(0.0)), (Pt(10.0), Pt(0.0)), (Pt(5.0), Pt(10.0))],
            true,
            true,
            false,
        );
        canvas.rect(Rect::from_xywh(Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0)), false, true);

        let rendered = render_ops(canvas.ops(), &fonts, &images).expect("renders");
        let text = String::from_utf8_lossy(&rendered);
        assert!(text.contains("1 0 0 rg"));
        assert!(text.contains("h\nf"));
        assert!(text.contains("1 2 3 4 re\nS"));
    }

    #[test]
    fn unknown_images_are_errors() {
        let fonts = FontBook::new();
        let images: Arena<Image> = Arena::new();
        let mut other: Arena<Image> = Arena::new();
        let missing = other.alloc(Image::new_raster(image::DynamicImage::new_rgb8(1, 1)));
        let ops = vec![CanvasOp::Image {
            image: missing,
            rect: Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(1.0), Pt(1.0)),
        }];
        assert!(matches!(
            render_ops(&ops, &fonts, &images),
            Err(PDFError::ImageMissing(0))
        ));
    }
}
