//! Frames and page templates.
//!
//! A [PageTemplate] describes one kind of page: its size, the [Frame]s story content
//! flows into (top to bottom, first frame first), and a callback that draws the page
//! furniture when a page using the template begins.

use crate::canvas::Canvas;
use crate::rect::Rect;
use crate::units::Pt;
use std::collections::HashMap;
use std::rc::Rc;

/// Draws page furniture (headers, footers, logos) at the start of every page
pub type PageFn = Rc<dyn Fn(&mut Canvas, &PageContext)>;

/// Formats a (current, total) page pair for footers
pub type PageIndexFn = Rc<dyn Fn(usize, usize) -> String>;

/// A rectangular region of a page that story content flows into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub rect: Rect,
    /// Outline the frame in grey, for debugging layouts
    pub show_boundary: bool,
}

impl Frame {
    /// A frame with its lower left corner at (x, y), measured from the bottom left of
    /// the page
    pub fn new<X, Y, W, H>(x: X, y: Y, width: W, height: H) -> Frame
    where
        X: Into<Pt>,
        Y: Into<Pt>,
        W: Into<Pt>,
        H: Into<Pt>,
    {
        Frame {
            rect: Rect::from_xywh(x, y, width, height),
            show_boundary: false,
        }
    }

    pub fn with_boundary(mut self, show_boundary: bool) -> Frame {
        self.show_boundary = show_boundary;
        self
    }

    pub fn left(&self) -> Pt {
        self.rect.x1
    }

    pub fn bottom(&self) -> Pt {
        self.rect.y1
    }

    pub fn top(&self) -> Pt {
        self.rect.y2
    }

    pub fn width(&self) -> Pt {
        self.rect.width()
    }

    pub fn height(&self) -> Pt {
        self.rect.height()
    }
}

#[derive(Clone)]
pub struct PageTemplate {
    pub id: String,
    /// (width, height)
    pub page_size: (Pt, Pt),
    pub frames: Vec<Frame>,
    pub on_page: Option<PageFn>,
    /// The template to switch to once a page using this one is finished, unless the
    /// story asks for another one explicitly
    pub auto_next: Option<String>,
}

impl std::fmt::Debug for PageTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageTemplate")
            .field("id", &self.id)
            .field("page_size", &self.page_size)
            .field("frames", &self.frames)
            .field("on_page", &self.on_page.is_some())
            .field("auto_next", &self.auto_next)
            .finish()
    }
}

impl PageTemplate {
    pub fn new<S: ToString>(id: S, page_size: (Pt, Pt), frames: Vec<Frame>) -> PageTemplate {
        PageTemplate {
            id: id.to_string(),
            page_size,
            frames,
            on_page: None,
            auto_next: None,
        }
    }

    pub fn on_page(mut self, on_page: PageFn) -> PageTemplate {
        self.on_page = Some(on_page);
        self
    }

    pub fn auto_next<S: ToString>(mut self, id: S) -> PageTemplate {
        self.auto_next = Some(id.to_string());
        self
    }
}

/// Everything a page callback may want to know about the page being drawn
pub struct PageContext<'a> {
    /// Physical page number, starting at 1
    pub page: usize,
    /// Id of the template the page uses
    pub template: &'a str,
    /// Base font family of the document's style sheet
    pub font_name: &'a str,
    pub watermark: Option<&'a str>,
    pub(crate) page_index: (usize, usize),
    pub(crate) index_format: &'a dyn Fn(usize, usize) -> String,
    pub(crate) anchors: &'a HashMap<String, usize>,
}

impl PageContext<'_> {
    /// The (current, total) page pair shown to the reader, relative to the current
    /// segment of the document
    pub fn page_index(&self) -> (usize, usize) {
        self.page_index
    }

    /// The page index formatted for a footer, "Page 2 of 5" unless the document says
    /// otherwise
    pub fn page_index_string(&self) -> String {
        let (current, total) = self.page_index;
        (self.index_format)(current, total)
    }

    /// The physical page a bookmark landed on, as of the previous layout pass
    pub fn anchor_page(&self, key: &str) -> Option<usize> {
        self.anchors.get(key).copied()
    }
}

/// "Page {current} of {total}"
pub fn default_page_index_string(current: usize, total: usize) -> String {
    format!("Page {current} of {total}")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::units::cm;

    #[test]
    fn frames_are_measured_from_the_bottom_left() {
        let frame = Frame::new(cm(2.6), cm(2.0), cm(16.4), cm(25.0));
        assert_eq!(frame.left(), cm(2.6));
        assert_eq!(frame.bottom(), cm(2.0));
        assert!((frame.top().0 - cm(27.0).0).abs() < 1e-3);
        assert!((frame.height().0 - cm(25.0).0).abs() < 1e-3);
    }

    #[test]
    fn context_formats_the_page_index() {
        let anchors = HashMap::from([("intro".to_string(), 3)]);
        let ctx = PageContext {
            page: 4,
            template: "Later",
            font_name: "Helvetica",
            watermark: None,
            page_index: (2, 5),
            index_format: &default_page_index_string,
            anchors: &anchors,
        };
        assert_eq!(ctx.page_index_string(), "Page 2 of 5");
        assert_eq!(ctx.anchor_page("intro"), Some(3));
        assert_eq!(ctx.anchor_page("outro"), None);
    }
}
