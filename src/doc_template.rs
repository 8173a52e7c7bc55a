//! The multi-pass layout engine.
//!
//! [DocTemplate::build] lays the whole story out, page by page, as many times as it takes
//! for the page count to settle. Footers are drawn at the start of each page, before the
//! page's content is known, so a footer reading "Page 1 of 3" can only be right once a
//! previous pass has counted the pages. Every pass starts from scratch; only the
//! [PaginationState] carries over. The pages of the first stable pass are returned.

use crate::canvas::{Canvas, CanvasOp};
use crate::flowable::{stacked_height, Block};
use crate::font::FontBook;
use crate::image::Image;
use crate::outline::OutlineEntry;
use crate::pagination::{PaginationState, Processed};
use crate::template::{default_page_index_string, Frame, PageContext, PageIndexFn, PageTemplate};
use crate::units::Pt;
use crate::PDFError;
use id_arena::Arena;
use std::collections::VecDeque;
use std::rc::Rc;

/// Room for rounding errors when checking whether a block fits
const EPSILON: Pt = Pt(0.001);

pub const DEFAULT_MAX_PASSES: usize = 10;

/// The page templates of a document and the settings that drive its layout
pub struct DocTemplate {
    /// The first template is used for the first page
    pub templates: Vec<PageTemplate>,
    /// Base font family, handed to page callbacks
    pub font_name: String,
    pub watermark: Option<String>,
    pub page_index_string: PageIndexFn,
    /// Give up if the layout hasn't settled after this many passes
    pub max_passes: usize,
    /// Outline every frame, for debugging layouts
    pub show_boundaries: bool,
}

impl Default for DocTemplate {
    fn default() -> Self {
        DocTemplate {
            templates: Vec::new(),
            font_name: "Helvetica".to_string(),
            watermark: None,
            page_index_string: Rc::new(default_page_index_string),
            max_passes: DEFAULT_MAX_PASSES,
            show_boundaries: false,
        }
    }
}

/// The drawing operations of one finished page
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// (width, height)
    pub size: (Pt, Pt),
    pub template: String,
    pub ops: Vec<CanvasOp>,
}

/// The outcome of a successful build
#[derive(Debug)]
pub struct Layout {
    pub pages: Vec<RenderedPage>,
    pub outline: Vec<OutlineEntry>,
    pub pagination: PaginationState,
}

impl DocTemplate {
    pub fn new(templates: Vec<PageTemplate>) -> DocTemplate {
        DocTemplate {
            templates,
            ..Default::default()
        }
    }

    pub fn add_page_template(&mut self, template: PageTemplate) {
        self.templates.push(template);
    }

    pub fn template_index(&self, id: &str) -> Result<usize, PDFError> {
        self.templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| PDFError::UnknownPageTemplate(id.to_string()))
    }

    /// Lay out `story` until the pagination is stable
    pub fn build(
        &self,
        story: &[Block],
        fonts: &FontBook,
        images: &Arena<Image>,
    ) -> Result<Layout, PDFError> {
        if self.templates.is_empty() {
            return Err(PDFError::MissingPageTemplate);
        }
        let mut auto_next = Vec::with_capacity(self.templates.len());
        for template in self.templates.iter() {
            if template.frames.is_empty() {
                return Err(PDFError::NoFrames(template.id.clone()));
            }
            auto_next.push(match &template.auto_next {
                Some(id) => Some(self.template_index(id)?),
                None => None,
            });
        }

        let mut state = PaginationState::new();
        loop {
            if state.passes >= self.max_passes {
                return Err(PDFError::PaginationUnstable {
                    passes: state.passes,
                });
            }

            state.begin_pass();
            let (pages, outline) =
                Pass::new(self, &auto_next, fonts, images, &mut state).run(story)?;
            let stable = state.end_pass();
            log::debug!(
                "layout pass {} produced {} pages ({} counted), {}",
                state.passes,
                pages.len(),
                state.num_pages,
                if stable { "stable" } else { "unstable" }
            );

            if stable {
                log::info!(
                    "laid out {} pages in {} passes",
                    pages.len(),
                    state.passes
                );
                return Ok(Layout {
                    pages,
                    outline,
                    pagination: state,
                });
            }
        }
    }
}

/// One traversal of the story
struct Pass<'a, 's> {
    doc: &'a DocTemplate,
    auto_next: &'a [Option<usize>],
    fonts: &'a FontBook,
    images: &'a Arena<Image>,
    state: &'s mut PaginationState,
    pages: Vec<RenderedPage>,
    outline: Vec<OutlineEntry>,
    /// The page being filled, if one has begun
    canvas: Option<Canvas<'a>>,
    /// Physical number of the current (or last finished) page
    page: usize,
    template: usize,
    pages_on_template: usize,
    pending_template: Option<usize>,
    frame: usize,
    /// Top of the free space in the current frame
    y: Pt,
    at_top: bool,
}

impl<'a, 's> Pass<'a, 's> {
    fn new(
        doc: &'a DocTemplate,
        auto_next: &'a [Option<usize>],
        fonts: &'a FontBook,
        images: &'a Arena<Image>,
        state: &'s mut PaginationState,
    ) -> Pass<'a, 's> {
        Pass {
            doc,
            auto_next,
            fonts,
            images,
            state,
            pages: Vec::new(),
            outline: Vec::new(),
            canvas: None,
            page: 0,
            template: 0,
            pages_on_template: 0,
            pending_template: None,
            frame: 0,
            y: Pt(0.0),
            at_top: true,
        }
    }

    fn run(mut self, story: &[Block]) -> Result<(Vec<RenderedPage>, Vec<OutlineEntry>), PDFError> {
        let mut queue: VecDeque<Block> = story.iter().cloned().collect();
        while let Some(block) = queue.pop_front() {
            self.process(block, &mut queue)?;
        }

        // even an empty story makes a page
        if self.pages.is_empty() {
            self.ensure_page();
        }
        self.end_page();
        Ok((self.pages, self.outline))
    }

    fn current_frame(&self) -> Frame {
        self.doc.templates[self.template].frames[self.frame]
    }

    fn remaining(&self) -> Pt {
        self.y - self.current_frame().bottom()
    }

    fn after(&mut self, processed: Processed) {
        self.state.after_block(self.page, processed);
    }

    fn ensure_page(&mut self) {
        if self.canvas.is_none() {
            self.begin_page();
        }
    }

    fn begin_page(&mut self) {
        let next = match self.pending_template.take() {
            Some(next) => Some(next),
            None if self.pages_on_template > 0 => self.auto_next[self.template],
            None => None,
        };
        if let Some(next) = next {
            if next != self.template {
                log::trace!(
                    "switching from template `{}` to `{}`",
                    self.doc.templates[self.template].id,
                    self.doc.templates[next].id
                );
            }
            self.template = next;
            self.pages_on_template = 0;
        }

        self.page += 1;
        self.pages_on_template += 1;
        self.state.note_page(self.page);

        let template = &self.doc.templates[self.template];
        log::trace!("beginning page {} with template `{}`", self.page, template.id);

        let mut canvas = Canvas::new(self.fonts, self.images, template.page_size);
        if let Some(on_page) = &template.on_page {
            let ctx = PageContext {
                page: self.page,
                template: &template.id,
                font_name: &self.doc.font_name,
                watermark: self.doc.watermark.as_deref(),
                page_index: self.state.page_index(self.page),
                index_format: &*self.doc.page_index_string,
                anchors: self.state.known_anchors(),
            };
            on_page(&mut canvas, &ctx);
        }
        for frame in template.frames.iter() {
            if frame.show_boundary || self.doc.show_boundaries {
                canvas.draw_boundary(frame.rect);
            }
        }

        self.canvas = Some(canvas);
        self.frame = 0;
        self.y = template.frames[0].top();
        self.at_top = true;
    }

    fn end_page(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            let template = &self.doc.templates[self.template];
            self.pages.push(RenderedPage {
                size: template.page_size,
                template: template.id.clone(),
                ops: canvas.into_ops(),
            });
        }
    }

    /// Move on to the next frame, or finish the page after the last one. The next page
    /// only begins once something needs it.
    fn next_frame(&mut self) {
        let frames = &self.doc.templates[self.template].frames;
        if self.canvas.is_some() && self.frame + 1 < frames.len() {
            self.frame += 1;
            self.y = frames[self.frame].top();
            self.at_top = true;
        } else {
            self.end_page();
        }
    }

    fn process(&mut self, block: Block, queue: &mut VecDeque<Block>) -> Result<(), PDFError> {
        match block {
            Block::NextTemplate(id) => {
                self.pending_template = Some(self.doc.template_index(&id)?);
                self.after(Processed::Other);
            }
            Block::PageBreak => {
                self.ensure_page();
                self.end_page();
                self.after(Processed::Other);
            }
            Block::RestartPageBreak => {
                self.ensure_page();
                self.end_page();
                self.after(Processed::Restart(self.page));
            }
            Block::CondPageBreak(height) => {
                self.ensure_page();
                if !self.at_top && self.remaining() < height {
                    self.next_frame();
                }
                self.after(Processed::Other);
            }
            Block::Bookmark { title, key, level } => {
                self.ensure_page();
                self.state.record_anchor(&key, self.page);
                self.outline.push(OutlineEntry {
                    title,
                    level,
                    page_index: self.page - 1,
                });
                self.after(Processed::Other);
            }
            Block::BottomSpacer => {
                self.ensure_page();
                let available = self.remaining();
                let height = available - self.state.bottom_table_height;
                self.y -= if height <= Pt(0.0) { available } else { height };
                self.at_top = false;
                self.after(Processed::Other);
            }
            Block::KeepTogether(blocks) => {
                self.ensure_page();
                let frame = self.current_frame();
                let mut needed = stacked_height(&blocks, self.fonts, frame.width());
                if let (false, Some(first)) = (self.at_top, blocks.first()) {
                    needed += first.space_before();
                }
                if !self.at_top
                    && needed > self.remaining() + EPSILON
                    && needed <= frame.height() + EPSILON
                {
                    self.next_frame();
                }
                for block in blocks.into_iter().rev() {
                    queue.push_front(block);
                }
            }
            block => self.place(block, queue),
        }
        Ok(())
    }

    /// Put a content block into the current frame, splitting it or moving on to later
    /// frames as needed
    fn place(&mut self, block: Block, queue: &mut VecDeque<Block>) {
        loop {
            self.ensure_page();
            let frame = self.current_frame();
            let width = frame.width();
            let available = self.remaining();
            let before = if self.at_top {
                Pt(0.0)
            } else {
                block.space_before()
            };
            let height = block.height(self.fonts, width);

            if before + height <= available + EPSILON {
                self.draw(&block, before, height);
                return;
            }

            if let Some((first, rest)) = block.split(self.fonts, width, available - before) {
                let first_height = first.height(self.fonts, width);
                self.draw(&first, before, first_height);
                queue.push_front(rest);
                return;
            }

            if self.at_top {
                if let Block::Spacer(_) = block {
                    // no point carrying space taller than a frame over to the next one
                    self.y = frame.bottom();
                    self.at_top = false;
                    self.after(Processed::Other);
                    return;
                }
                log::warn!(
                    "block of {} is taller than its {} frame on page {}; it will overflow",
                    height,
                    frame.height(),
                    self.page
                );
                self.draw(&block, before, height);
                return;
            }

            self.next_frame();
        }
    }

    fn draw(&mut self, block: &Block, before: Pt, height: Pt) {
        let frame = self.current_frame();
        let top = self.y - before;
        if let Some(canvas) = self.canvas.as_mut() {
            block.draw(canvas, frame.left(), top, frame.width());
        }
        self.y = top - height - block.space_after();
        self.at_top = false;

        let processed = match block {
            Block::BottomTable(_) => Processed::BottomTable(height),
            _ => Processed::Other,
        };
        self.after(processed);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::paragraph::Paragraph;
    use crate::style::StyleSheet;
    use crate::table::{Cell, Table};
    use crate::units::cm;
    use std::cell::RefCell;

    fn page_size() -> (Pt, Pt) {
        (cm(21.0), cm(29.7))
    }

    fn single_frame(height: Pt) -> DocTemplate {
        DocTemplate::new(vec![PageTemplate::new(
            "Only",
            page_size(),
            vec![Frame::new(cm(2.6), cm(2.0), cm(16.4), height)],
        )])
    }

    fn spacers(n: usize, height: Pt) -> Vec<Block> {
        (0..n).map(|_| Block::Spacer(height)).collect()
    }

    fn build(doc: &DocTemplate, story: &[Block]) -> Layout {
        let fonts = FontBook::new();
        let images = Arena::new();
        doc.build(story, &fonts, &images).expect("story lays out")
    }

    #[test]
    fn an_empty_story_is_one_page() {
        let layout = build(&single_frame(cm(25.0)), &[]);
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.pagination.num_pages, 1);
        assert_eq!(layout.pagination.page_index(1), (1, 1));
    }

    #[test]
    fn content_flows_onto_new_pages() {
        // five 10pt spacers per page
        let layout = build(&single_frame(Pt(50.0)), &spacers(12, Pt(10.0)));
        assert_eq!(layout.pages.len(), 3);
        assert_eq!(layout.pagination.num_pages, 3);
    }

    #[test]
    fn trailing_page_breaks_leave_no_blank_page() {
        let mut story = spacers(1, Pt(10.0));
        story.push(Block::PageBreak);
        let layout = build(&single_frame(cm(25.0)), &story);
        assert_eq!(layout.pages.len(), 1);
    }

    #[test]
    fn footers_see_the_final_page_count() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = seen.clone();
        let mut doc = single_frame(Pt(50.0));
        doc.templates[0].on_page = Some(Rc::new(move |_: &mut Canvas, ctx: &PageContext| {
            record.borrow_mut().push(ctx.page_index_string());
        }));

        let layout = build(&doc, &spacers(12, Pt(10.0)));
        assert_eq!(layout.pagination.passes, 2);

        let seen = seen.borrow();
        // the last pass drew the last three footers
        assert_eq!(
            seen[seen.len() - 3..],
            ["Page 1 of 3", "Page 2 of 3", "Page 3 of 3"]
        );
    }

    #[test]
    fn restarts_number_segments_separately() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = seen.clone();
        let mut doc = single_frame(Pt(50.0));
        doc.templates[0].on_page = Some(Rc::new(move |_: &mut Canvas, ctx: &PageContext| {
            record.borrow_mut().push((ctx.page, ctx.page_index()));
        }));

        let mut story = spacers(8, Pt(10.0));
        story.push(Block::RestartPageBreak);
        story.extend(spacers(12, Pt(10.0)));
        let layout = build(&doc, &story);
        assert_eq!(layout.pages.len(), 5);

        let seen = seen.borrow();
        let last_pass = &seen[seen.len() - 5..];
        assert_eq!(last_pass[0], (1, (1, 2)));
        assert_eq!(last_pass[1], (2, (2, 2)));
        // the boundary is the page the restart happened on
        assert_eq!(last_pass[2], (3, (2, 4)));
        assert_eq!(last_pass[4], (5, (4, 4)));
    }

    #[test]
    fn another_pass_after_a_stable_build_changes_nothing() {
        let doc = single_frame(Pt(50.0));
        let fonts = FontBook::new();
        let images = Arena::new();
        let mut story = spacers(25, Pt(10.0));
        story.push(Block::RestartPageBreak);
        story.extend(spacers(15, Pt(10.0)));

        let layout = doc.build(&story, &fonts, &images).expect("story lays out");
        assert_eq!(layout.pages.len(), 8);
        let mut state = layout.pagination;
        let num_pages = state.num_pages;

        state.begin_pass();
        let (pages, _) = Pass::new(&doc, &[None], &fonts, &images, &mut state)
            .run(&story)
            .expect("story lays out again");
        assert!(state.end_pass());
        assert_eq!(pages.len(), 8);
        assert_eq!(state.num_pages, num_pages);
        assert_eq!(state.boundaries(), vec![5]);
        assert_eq!(state.page_index(7), (3, 4));
    }

    #[test]
    fn templates_chain_automatically() {
        let frame = Frame::new(cm(2.6), cm(2.0), cm(16.4), Pt(50.0));
        let doc = DocTemplate::new(vec![
            PageTemplate::new("First", page_size(), vec![frame]).auto_next("Later"),
            PageTemplate::new("Later", page_size(), vec![frame]),
        ]);
        let layout = build(&doc, &spacers(12, Pt(10.0)));
        let ids: Vec<_> = layout.pages.iter().map(|p| p.template.as_str()).collect();
        assert_eq!(ids, ["First", "Later", "Later"]);
    }

    #[test]
    fn explicit_next_templates_win() {
        let frame = Frame::new(cm(2.6), cm(2.0), cm(16.4), Pt(50.0));
        let doc = DocTemplate::new(vec![
            PageTemplate::new("First", page_size(), vec![frame]).auto_next("Later"),
            PageTemplate::new("Later", page_size(), vec![frame]),
        ]);
        let mut story = spacers(6, Pt(10.0));
        story.push(Block::NextTemplate("First".to_string()));
        story.push(Block::RestartPageBreak);
        story.extend(spacers(6, Pt(10.0)));
        let layout = build(&doc, &story);
        let ids: Vec<_> = layout.pages.iter().map(|p| p.template.as_str()).collect();
        assert_eq!(ids, ["First", "Later", "First", "Later"]);
    }

    #[test]
    fn unknown_templates_are_errors() {
        let fonts = FontBook::new();
        let images = Arena::new();
        let doc = single_frame(cm(25.0));
        let err = doc
            .build(&[Block::NextTemplate("Nope".to_string())], &fonts, &images)
            .unwrap_err();
        assert!(matches!(err, PDFError::UnknownPageTemplate(id) if id == "Nope"));

        let err = DocTemplate::default().build(&[], &fonts, &images).unwrap_err();
        assert!(matches!(err, PDFError::MissingPageTemplate));
    }

    #[test]
    fn gives_up_when_the_pass_budget_runs_out() {
        let fonts = FontBook::new();
        let images = Arena::new();
        let mut doc = single_frame(cm(25.0));
        doc.max_passes = 1;
        let err = doc.build(&spacers(1, Pt(10.0)), &fonts, &images).unwrap_err();
        assert!(matches!(err, PDFError::PaginationUnstable { passes: 1 }));
    }

    #[test]
    fn paragraphs_split_across_pages() {
        let styles = StyleSheet::default();
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let story = vec![Block::Paragraph(Paragraph::from_text(&text, styles.normal.clone()))];
        // room for five lines per page
        let layout = build(&single_frame(styles.normal.leading * 5.0), &story);
        assert!(layout.pages.len() > 1);
        for page in layout.pages.iter() {
            let lines = page
                .ops
                .iter()
                .filter_map(|op| match op {
                    CanvasOp::Text { y, .. } => Some(y.0.round() as i32),
                    _ => None,
                })
                .collect::<std::collections::BTreeSet<_>>();
            assert!(lines.len() <= 5);
        }
    }

    #[test]
    fn keep_together_moves_to_a_fresh_frame() {
        let mut story = spacers(3, Pt(10.0));
        story.push(Block::KeepTogether(spacers(3, Pt(10.0))));
        let layout = build(&single_frame(Pt(50.0)), &story);
        assert_eq!(layout.pages.len(), 2);
    }

    #[test]
    fn bottom_tables_sit_at_the_bottom_of_the_frame() {
        let styles = StyleSheet::default();
        let table = Table::new(
            vec![vec![Cell::from("Total"), Cell::from("100.00")]],
            &[cm(8.0), cm(8.4)],
            styles.table.clone(),
        );
        let story = vec![
            Block::Spacer(Pt(10.0)),
            Block::BottomSpacer,
            Block::BottomTable(table),
        ];
        let layout = build(&single_frame(cm(25.0)), &story);

        assert!(layout.pagination.bottom_table_height > Pt(0.0));
        let last = layout.pages.last().expect("a page");
        let baseline = last
            .ops
            .iter()
            .find_map(|op| match op {
                CanvasOp::Text { text, y, .. } if text == "Total" => Some(*y),
                _ => None,
            })
            .expect("the table was drawn");
        // the row's baseline is within a row of the frame bottom
        assert!(baseline >= cm(2.0) && baseline < cm(2.0) + Pt(12.0));
    }

    #[test]
    fn bookmarks_record_their_page() {
        let mut story = spacers(6, Pt(10.0));
        story.push(Block::Bookmark {
            title: "Second".to_string(),
            key: "second".to_string(),
            level: 0,
        });
        let layout = build(&single_frame(Pt(50.0)), &story);
        assert_eq!(layout.outline.len(), 1);
        assert_eq!(layout.outline[0].page_index, 1);
        assert_eq!(layout.pagination.anchor_page("second"), Some(2));
    }
}
