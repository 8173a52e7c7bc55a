//! A recording drawing surface.
//!
//! Each page gets a [Canvas] while it is being laid out. Page callbacks (stationery)
//! and story blocks draw onto it; nothing is serialised until the pagination has
//! stabilised, at which point the recorded [CanvasOp]s of the final pass are turned into
//! a PDF content stream by the writer.

use crate::colour::{colours, Colour};
use crate::font::{FontBook, FontFace, FontId, FontSpec};
use crate::image::{Image, ImageId};
use crate::rect::Rect;
use crate::transform::Transform;
use crate::units::Pt;
use id_arena::Arena;

/// One recorded drawing operation, in page coordinates (origin at the bottom left)
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    SaveState,
    RestoreState,
    Transform(Transform),
    LineWidth(Pt),
    FillColour(Colour),
    StrokeColour(Colour),
    Text {
        font: FontId,
        size: Pt,
        x: Pt,
        y: Pt,
        text: String,
    },
    Line {
        from: (Pt, Pt),
        to: (Pt, Pt),
    },
    Rect {
        rect: Rect,
        fill: bool,
        stroke: bool,
    },
    Path {
        points: Vec<(Pt, Pt)>,
        close: bool,
        fill: bool,
        stroke: bool,
    },
    /// An image stretched over `rect`
    Image {
        image: ImageId,
        rect: Rect,
    },
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    font: FontId,
    font_size: Pt,
}

pub struct Canvas<'a> {
    fonts: &'a FontBook,
    images: &'a Arena<Image>,
    page_size: (Pt, Pt),
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    ops: Vec<CanvasOp>,
}

impl<'a> Canvas<'a> {
    pub fn new(fonts: &'a FontBook, images: &'a Arena<Image>, page_size: (Pt, Pt)) -> Canvas<'a> {
        Canvas {
            fonts,
            images,
            page_size,
            state: GraphicsState {
                font: fonts.resolve(&FontSpec::new("Helvetica")),
                font_size: Pt(12.0),
            },
            saved: Vec::new(),
            ops: Vec::new(),
        }
    }

    /// (width, height) of the page being drawn
    pub fn page_size(&self) -> (Pt, Pt) {
        self.page_size
    }

    pub fn fonts(&self) -> &'a FontBook {
        self.fonts
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<CanvasOp> {
        self.ops
    }

    fn face(&self) -> &FontFace {
        self.fonts.face(self.state.font)
    }

    /// Select a face by name, e.g. `Helvetica-Bold`
    pub fn set_font(&mut self, name: &str, size: Pt) {
        self.set_font_spec(&FontSpec::from_name(name), size);
    }

    pub fn set_font_spec(&mut self, spec: &FontSpec, size: Pt) {
        self.state.font = self.fonts.resolve(spec);
        self.state.font_size = size;
    }

    pub fn set_font_id(&mut self, font: FontId, size: Pt) {
        self.state.font = font;
        self.state.font_size = size;
    }

    pub fn set_fill_colour(&mut self, colour: Colour) {
        self.ops.push(CanvasOp::FillColour(colour));
    }

    pub fn set_stroke_colour(&mut self, colour: Colour) {
        self.ops.push(CanvasOp::StrokeColour(colour));
    }

    pub fn set_line_width(&mut self, width: Pt) {
        self.ops.push(CanvasOp::LineWidth(width));
    }

    pub fn save_state(&mut self) {
        self.saved.push(self.state);
        self.ops.push(CanvasOp::SaveState);
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
            self.ops.push(CanvasOp::RestoreState);
        } else {
            log::warn!("restore_state called without a matching save_state");
        }
    }

    pub fn transform(&mut self, transform: Transform) {
        self.ops.push(CanvasOp::Transform(transform));
    }

    pub fn translate<X: Into<Pt>, Y: Into<Pt>>(&mut self, x: X, y: Y) {
        self.transform(Transform::translate(x.into(), y.into()));
    }

    /// Rotate the coordinate system counter-clockwise by `degrees`
    pub fn rotate(&mut self, degrees: f32) {
        self.transform(Transform::rotate(degrees.to_radians()));
    }

    /// Width of `text` in the current font
    pub fn string_width(&self, text: &str) -> Pt {
        self.face().width_of_text(text, self.state.font_size)
    }

    /// Draw `text` with its baseline starting at (x, y)
    pub fn draw_string<X: Into<Pt>, Y: Into<Pt>>(&mut self, x: X, y: Y, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(CanvasOp::Text {
            font: self.state.font,
            size: self.state.font_size,
            x: x.into(),
            y: y.into(),
            text: text.to_string(),
        });
    }

    /// Draw `text` so that it ends at x
    pub fn draw_right_string<X: Into<Pt>, Y: Into<Pt>>(&mut self, x: X, y: Y, text: &str) {
        let x: Pt = x.into();
        let width = self.string_width(text);
        self.draw_string(x - width, y, text);
    }

    /// Draw `text` centred on x
    pub fn draw_centred_string<X: Into<Pt>, Y: Into<Pt>>(&mut self, x: X, y: Y, text: &str) {
        let x: Pt = x.into();
        let width = self.string_width(text);
        self.draw_string(x - width / 2.0, y, text);
    }

    pub fn line(&mut self, from: (Pt, Pt), to: (Pt, Pt)) {
        self.ops.push(CanvasOp::Line { from, to });
    }

    pub fn rect(&mut self, rect: Rect, fill: bool, stroke: bool) {
        self.ops.push(CanvasOp::Rect { rect, fill, stroke });
    }

    /// A polyline through `points`, optionally closed into a polygon
    pub fn path(&mut self, points: Vec<(Pt, Pt)>, close: bool, fill: bool, stroke: bool) {
        if points.len() < 2 {
            return;
        }
        self.ops.push(CanvasOp::Path {
            points,
            close,
            fill,
            stroke,
        });
    }

    /// Stretch an image over `rect`
    pub fn draw_image(&mut self, image: ImageId, rect: Rect) {
        self.ops.push(CanvasOp::Image { image, rect });
    }

    /// Draw an image with its lower left corner at (x, y). Give either a width or a
    /// height to scale it proportionally, both to stretch it, or neither to draw it at
    /// its natural size.
    pub fn draw_image_scaled<X: Into<Pt>, Y: Into<Pt>>(
        &mut self,
        image: ImageId,
        x: X,
        y: Y,
        width: Option<Pt>,
        height: Option<Pt>,
    ) {
        let Some(img) = self.images.get(image) else {
            log::warn!("image {} is not registered with the document", image.index());
            return;
        };
        let (natural_w, natural_h) = (Pt(img.width), Pt(img.height));
        let (w, h) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, natural_h * (*w / natural_w.0.max(f32::EPSILON))),
            (None, Some(h)) => (natural_w * (*h / natural_h.0.max(f32::EPSILON)), h),
            (None, None) => (natural_w, natural_h),
        };
        self.draw_image(image, Rect::from_xywh(x, y, w, h));
    }

    /// Draw the outline of a frame, for debugging layouts
    pub(crate) fn draw_boundary(&mut self, rect: Rect) {
        self.save_state();
        self.set_stroke_colour(colours::GREY);
        self.set_line_width(Pt(0.5));
        self.rect(rect, false, true);
        self.restore_state();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::units::mm;

    #[test]
    fn right_strings_end_at_x() {
        let fonts = FontBook::new();
        let images = Arena::new();
        let mut canvas = Canvas::new(&fonts, &images, (mm(210.0), mm(297.0)));
        canvas.set_font("Helvetica", Pt(10.0));
        canvas.draw_right_string(Pt(100.0), Pt(10.0), "Hi");
        match &canvas.ops()[0] {
            CanvasOp::Text { x, size, .. } => {
                assert!((x.0 - (100.0 - 9.44)).abs() < 1e-3);
                assert_eq!(*size, Pt(10.0));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn restore_state_brings_back_the_font() {
        let fonts = FontBook::new();
        let images = Arena::new();
        let mut canvas = Canvas::new(&fonts, &images, (Pt(100.0), Pt(100.0)));
        canvas.set_font("Helvetica", Pt(8.0));
        canvas.save_state();
        canvas.set_font("Helvetica-Bold", Pt(20.0));
        canvas.restore_state();
        canvas.draw_string(Pt(0.0), Pt(0.0), "x");
        match canvas.ops().last() {
            Some(CanvasOp::Text { size, .. }) => assert_eq!(*size, Pt(8.0)),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn empty_strings_draw_nothing() {
        let fonts = FontBook::new();
        let images = Arena::new();
        let mut canvas = Canvas::new(&fonts, &images, (Pt(100.0), Pt(100.0)));
        canvas.draw_string(Pt(0.0), Pt(0.0), "");
        assert!(canvas.ops().is_empty());
    }
}
