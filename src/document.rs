use crate::address::Address;
use crate::canvas::Canvas;
use crate::config::DocumentConfig;
use crate::doc_template::DocTemplate;
use crate::flowable::Block;
use crate::font::FontBook;
use crate::html::{self, BULLET};
use crate::image::{Image, ImageId};
use crate::info::Info;
use crate::outline::Outline;
use crate::paragraph::Paragraph;
use crate::stationery;
use crate::style::{ParagraphStyle, StyleSheet, TableStyle};
use crate::table::{Cell, Table};
use crate::template::{
    default_page_index_string, Frame, PageContext, PageFn, PageIndexFn, PageTemplate,
};
use crate::truetype::EmbeddedFont;
use crate::units::{cm, mm, Pt};
use crate::writer::RenderedDocument;
use crate::{colours, PDFError};
use id_arena::Arena;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

/// Id of the template used for the first page of every (sub-)document
pub const FIRST: &str = "First";
/// Id of the template used for all following pages
pub const LATER: &str = "Later";

/// The space [PDFDocument::spacer] adds
pub const DEFAULT_SPACE: Pt = Pt(0.6 * 72.0 / 2.54);

/// A document is built by appending blocks to its story (paragraphs, tables, spacers,
/// page breaks, ...) after choosing a page layout with one of the `init_*` methods.
/// Nothing is laid out until [PDFDocument::build] (or [PDFDocument::generate]), which
/// runs as many layout passes as it takes for "Page X of Y" footers to be right.
///
/// ```
/// use pdf_document::{stationery, PDFDocument};
///
/// let mut pdf = PDFDocument::new();
/// pdf.init_report(stationery::blank(), None);
/// pdf.h1("Quarterly report");
/// pdf.p("Revenue went up & costs went down.");
///
/// let mut bytes = Vec::new();
/// pdf.generate(&mut bytes).expect("can generate the document");
/// assert!(bytes.starts_with(b"%PDF"));
/// ```
pub struct PDFDocument {
    pub config: DocumentConfig,
    pub style: StyleSheet,
    pub fonts: FontBook,
    pub images: Arena<Image>,
    story: Vec<Block>,
    templates: Vec<PageTemplate>,
    watermark: Option<String>,
    page_index_string: PageIndexFn,
    info: Option<Info>,
    keeptogether_index: Option<usize>,
}

impl Default for PDFDocument {
    fn default() -> Self {
        PDFDocument::new()
    }
}

impl PDFDocument {
    pub fn new() -> PDFDocument {
        PDFDocument::with_config(DocumentConfig::default())
    }

    pub fn with_config(config: DocumentConfig) -> PDFDocument {
        PDFDocument {
            style: StyleSheet::new(&config.font_name, config.font_size),
            info: config.info(),
            config,
            fonts: FontBook::new(),
            images: Arena::new(),
            story: Vec::new(),
            templates: Vec::new(),
            watermark: None,
            page_index_string: Rc::new(default_page_index_string),
            keeptogether_index: None,
        }
    }

    /// The blocks appended so far
    pub fn story(&self) -> &[Block] {
        &self.story
    }

    pub fn templates(&self) -> &[PageTemplate] {
        &self.templates
    }

    /// The frame inside the configured margins
    fn full_frame(&self) -> Frame {
        let rect = self.config.margins.content_rect(self.config.page_size());
        Frame {
            rect,
            show_boundary: self.config.show_boundaries,
        }
    }

    fn frame(&self, x: Pt, y: Pt, width: Pt, height: Pt) -> Frame {
        Frame::new(x, y, width, height).with_boundary(self.config.show_boundaries)
    }

    /// Set up a "First" and a "Later" template sharing `frames`. The first page of the
    /// document (and of every restarted sub-document) uses `page_fn`, all other pages
    /// `page_fn_later`, or `page_fn` again if that is not given.
    pub fn init_templates(
        &mut self,
        frames: Vec<Frame>,
        page_fn: PageFn,
        page_fn_later: Option<PageFn>,
    ) {
        self.add_first_and_later(frames.clone(), frames, page_fn, page_fn_later);
    }

    fn add_first_and_later(
        &mut self,
        first_frames: Vec<Frame>,
        later_frames: Vec<Frame>,
        page_fn: PageFn,
        page_fn_later: Option<PageFn>,
    ) {
        let size = self.config.page_size();
        let page_fn_later = page_fn_later.unwrap_or_else(|| page_fn.clone());
        self.templates = vec![
            PageTemplate::new(FIRST, size, first_frames)
                .on_page(page_fn)
                .auto_next(LATER),
            PageTemplate::new(LATER, size, later_frames).on_page(page_fn_later),
        ];
    }

    /// A report: one frame per page, inside the configured margins
    pub fn init_report(&mut self, page_fn: PageFn, page_fn_later: Option<PageFn>) {
        let frame = self.full_frame();
        self.init_templates(vec![frame], page_fn, page_fn_later);
        self.generate_style(None, None);
    }

    /// A report whose first page carries the confidential mark, watermarked
    /// "CONFIDENTIAL" throughout (for stationery that draws the watermark)
    pub fn init_confidential_report(&mut self, page_fn: PageFn, page_fn_later: Option<PageFn>) {
        let page_fn_later = page_fn_later.unwrap_or_else(|| page_fn.clone());
        let mark: PageFn =
            Rc::new(|canvas: &mut Canvas, _: &PageContext| stationery::confidential(canvas));
        let first = stationery::combine(vec![page_fn, mark]);
        self.watermark(Some("CONFIDENTIAL"));
        self.init_report(first, Some(page_fn_later));
    }

    /// A letter: the first page has a frame for the recipient's address (by default at
    /// 2.6cm, 20.2cm from the bottom left) above the body frame, later pages use the
    /// whole area inside the margins
    pub fn init_letter(
        &mut self,
        page_fn: PageFn,
        page_fn_later: Option<PageFn>,
        address_x: Option<Pt>,
        address_y: Option<Pt>,
    ) {
        let full = self.full_frame();
        let address = self.frame(
            address_x.unwrap_or_else(|| cm(2.6)),
            address_y.unwrap_or_else(|| cm(20.2)),
            full.width(),
            cm(4.0),
        );
        let body = self.frame(full.left(), full.bottom(), full.width(), cm(18.2));
        self.add_first_and_later(vec![address, body], vec![full], page_fn, page_fn_later);
        self.generate_style(None, None);
    }

    /// Rebuild the style sheet, from the configured font and size unless others are
    /// given. Blocks already in the story keep their styles.
    pub fn generate_style(&mut self, font_name: Option<&str>, font_size: Option<f32>) {
        self.style = StyleSheet::new(
            font_name.unwrap_or(&self.config.font_name),
            font_size.unwrap_or(self.config.font_size),
        );
    }

    /// Text for stationery to draw diagonally across every page, see
    /// [stationery::draw_watermark]
    pub fn watermark(&mut self, watermark: Option<&str>) {
        self.watermark = watermark.map(str::to_string);
    }

    /// Start a new sub-document on a fresh page, with its own page numbering and the
    /// first-page template
    pub fn restart(&mut self) {
        self.story.push(Block::NextTemplate(FIRST.to_string()));
        self.story.push(Block::RestartPageBreak);
    }

    /// Plain text in any style; newlines start new lines
    pub fn paragraph(&mut self, text: &str, style: &ParagraphStyle) {
        self.story
            .push(Block::Paragraph(Paragraph::from_text(text, style.clone())));
    }

    pub fn p(&mut self, text: &str) {
        let style = self.style.normal.clone();
        self.paragraph(text, &style);
    }

    pub fn h1(&mut self, text: &str) {
        let style = self.style.heading1.clone();
        self.paragraph(text, &style);
    }

    pub fn h2(&mut self, text: &str) {
        let style = self.style.heading2.clone();
        self.paragraph(text, &style);
    }

    pub fn h3(&mut self, text: &str) {
        let style = self.style.heading3.clone();
        self.paragraph(text, &style);
    }

    pub fn small(&mut self, text: &str) {
        let style = self.style.small.clone();
        self.paragraph(text, &style);
    }

    pub fn smaller(&mut self, text: &str) {
        let style = self.style.smaller.clone();
        self.paragraph(text, &style);
    }

    /// A paragraph of inline markup (`<b>`, `<i>`, `<u>`, `<br/>`, entities). Unlike the
    /// plain text methods this can fail, if the markup is malformed.
    pub fn p_markup(&mut self, text: &str, style: Option<&ParagraphStyle>) -> Result<(), PDFError> {
        let style = style.unwrap_or(&self.style.normal).clone();
        self.story
            .push(Block::Paragraph(Paragraph::from_markup(text, style)?));
        Ok(())
    }

    /// A bulleted list, one markup paragraph per item
    pub fn ul<I, S>(&mut self, items: I) -> Result<(), PDFError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            let paragraph = Paragraph::from_markup(item.as_ref(), self.style.bullet.clone())?;
            self.story
                .push(Block::Paragraph(paragraph.with_bullet(BULLET)));
        }
        Ok(())
    }

    /// 0.6cm of vertical space
    pub fn spacer(&mut self) {
        self.spacer_height(DEFAULT_SPACE);
    }

    pub fn spacer_height(&mut self, height: Pt) {
        self.story.push(Block::Spacer(height));
    }

    /// A table with fixed column widths, in the stock table style unless another is given
    pub fn table(&mut self, data: Vec<Vec<Cell>>, columns: &[Pt], style: Option<&TableStyle>) {
        let style = style.unwrap_or(&self.style.table).clone();
        self.story.push(Block::Table(Table::new(data, columns, style)));
    }

    /// A thin black rule across the frame
    pub fn hr(&mut self) {
        self.story.push(Block::Rule {
            thickness: Pt(0.2),
            colour: colours::BLACK,
        });
    }

    /// A thin grey rule across the frame
    pub fn hr_mini(&mut self) {
        self.story.push(Block::Rule {
            thickness: Pt(0.2),
            colour: colours::GREY,
        });
    }

    /// Append the paragraphs of a small HTML fragment, see [crate::html]
    pub fn mini_html(&mut self, html: &str) -> Result<(), PDFError> {
        let paragraphs = html::mini_html(html, &self.style)?;
        self.story
            .extend(paragraphs.into_iter().map(Block::Paragraph));
        Ok(())
    }

    pub fn pagebreak(&mut self) {
        self.story.push(Block::PageBreak);
    }

    /// A table pushed down to the bottom of the frame it lands in, e.g. the totals of an
    /// invoice
    pub fn bottom_table(
        &mut self,
        data: Vec<Vec<Cell>>,
        columns: &[Pt],
        style: Option<&TableStyle>,
    ) {
        let style = style.unwrap_or(&self.style.table).clone();
        self.story.push(Block::BottomSpacer);
        self.story
            .push(Block::BottomTable(Table::new(data, columns, style)));
    }

    pub fn append(&mut self, block: Block) {
        self.story.push(block);
    }

    /// Move on to the next frame unless there are at least 20cm left in this one
    pub fn next_frame(&mut self) {
        self.story.push(Block::CondPageBreak(cm(20.0)));
    }

    /// Everything appended from here until [PDFDocument::end_keeptogether] is kept in the
    /// same frame, if it fits into one
    pub fn start_keeptogether(&mut self) {
        self.keeptogether_index = Some(self.story.len());
    }

    pub fn end_keeptogether(&mut self) {
        let Some(index) = self.keeptogether_index.take() else {
            log::warn!("end_keeptogether called without start_keeptogether");
            return;
        };
        let group = self.story.split_off(index.min(self.story.len()));
        self.story.push(Block::KeepTogether(group));
    }

    /// The small line above an address, usually the sender
    pub fn address_head(&mut self, text: &str) {
        self.smaller(text);
        self.spacer_height(mm(2.0));
    }

    pub fn address(&mut self, address: &Address) {
        self.p(&address.to_text());
    }

    /// An outline entry for the page the following content lands on. `key` can be used
    /// by page callbacks to find that page with [crate::PageContext::anchor_page].
    pub fn bookmark<T: ToString, K: ToString>(&mut self, title: T, key: K, level: usize) {
        self.story.push(Block::Bookmark {
            title: title.to_string(),
            key: key.to_string(),
            level,
        });
    }

    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Register an image for page callbacks to draw
    pub fn add_image(&mut self, image: Image) -> ImageId {
        self.images.alloc(image)
    }

    /// Register a TrueType family from files on disk. Italic falls back to regular, bold
    /// to regular, and bold-italic to bold.
    pub fn register_fonts_from_paths<P: AsRef<Path>>(
        &mut self,
        regular: P,
        italic: Option<P>,
        bold: Option<P>,
        bold_italic: Option<P>,
        family: &str,
    ) -> Result<(), PDFError> {
        self.fonts
            .register_fonts_from_paths(regular, italic, bold, bold_italic, family)
    }

    /// Register a TrueType family from font data, with the same fallbacks as
    /// [PDFDocument::register_fonts_from_paths]
    pub fn register_fonts(
        &mut self,
        regular: Vec<u8>,
        italic: Option<Vec<u8>>,
        bold: Option<Vec<u8>>,
        bold_italic: Option<Vec<u8>>,
        family: &str,
    ) -> Result<(), PDFError> {
        let load = |data: Option<Vec<u8>>| data.map(EmbeddedFont::load).transpose();
        let regular = EmbeddedFont::load(regular)?;
        let italic = load(italic)?;
        let bold = load(bold)?;
        let bold_italic = load(bold_italic)?;
        self.fonts
            .register_family(family, regular, italic, bold, bold_italic);
        Ok(())
    }

    /// Change how page callbacks format the page index
    pub fn set_page_index_string(&mut self, format: PageIndexFn) {
        self.page_index_string = format;
    }

    /// Format a page index the way page callbacks will see it
    pub fn page_index_string(&self, current: usize, total: usize) -> String {
        (self.page_index_string)(current, total)
    }

    /// Lay the story out
    pub fn build(mut self) -> Result<RenderedDocument, PDFError> {
        if self.keeptogether_index.is_some() {
            log::warn!("start_keeptogether was never ended; closing the group at the end");
            self.end_keeptogether();
        }

        let doc = DocTemplate {
            templates: self.templates,
            font_name: self.style.font_name.clone(),
            watermark: self.watermark,
            page_index_string: self.page_index_string,
            max_passes: self.config.max_passes,
            show_boundaries: self.config.show_boundaries,
        };
        let layout = doc.build(&self.story, &self.fonts, &self.images)?;

        Ok(RenderedDocument {
            pages: layout.pages,
            outline: Outline::new(layout.outline),
            info: self.info,
            fonts: self.fonts,
            images: self.images,
            pagination: layout.pagination,
        })
    }

    /// Lay the story out and write the PDF to `w`
    pub fn generate<W: Write>(self, w: W) -> Result<(), PDFError> {
        self.build()?.write(w)
    }
}
