use crate::units::*;

/// A rectangle on the page, lower-left corner (`x1`, `y1`) to upper-right corner
/// (`x2`, `y2`)
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rect {
    pub x1: Pt,
    pub y1: Pt,
    pub x2: Pt,
    pub y2: Pt,
}

impl Rect {
    /// Create a rectangle from its lower-left corner and its size
    pub fn from_xywh<X, Y, W, H>(x: X, y: Y, width: W, height: H) -> Rect
    where
        X: Into<Pt>,
        Y: Into<Pt>,
        W: Into<Pt>,
        H: Into<Pt>,
    {
        let x: Pt = x.into();
        let y: Pt = y.into();
        Rect {
            x1: x,
            y1: y,
            x2: x + width.into(),
            y2: y + height.into(),
        }
    }

    pub fn width(&self) -> Pt {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> Pt {
        (self.y2 - self.y1).abs()
    }
}
