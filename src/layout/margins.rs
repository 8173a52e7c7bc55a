use crate::rect::Rect;
use crate::units::{cm, Pt};
use serde::{Deserialize, Serialize};

/// Margins describe where the main frame of a page sits. Page templates built from
/// margins get a single frame covering [Margins::content_rect]; page furniture drawn by
/// callbacks is free to go into the margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Top, right, bottom, left, as in CSS
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The region inside the margins of a page of the given size
    pub fn content_rect(&self, page_size: (Pt, Pt)) -> Rect {
        Rect {
            x1: self.left,
            y1: self.bottom,
            x2: page_size.0 - self.right,
            y2: page_size.1 - self.top,
        }
    }
}

impl Default for Margins {
    /// The report margins: a 16.4cm × 25cm frame on A4, 2.6cm from the left edge and
    /// 2cm from the bottom
    fn default() -> Self {
        Margins::trbl(cm(2.7), cm(2.0), cm(2.0), cm(2.6))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::PaperSize;

    #[test]
    fn default_margins_give_the_report_frame() {
        let rect = Margins::default().content_rect(PaperSize::A4.dimensions());
        assert!((rect.x1 - cm(2.6)).abs() < Pt(0.01));
        assert!((rect.y1 - cm(2.0)).abs() < Pt(0.01));
        assert!((rect.width() - cm(16.4)).abs() < Pt(0.01));
        assert!((rect.height() - cm(25.0)).abs() < Pt(0.01));
    }
}
