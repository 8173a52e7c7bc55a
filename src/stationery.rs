//! Page furniture: letterheads, footers, watermarks and the like.
//!
//! Anything that implements [Stationery] can be turned into a page callback with
//! [page_fn]; plain closures taking `(&mut Canvas, &PageContext)` already do. Several
//! callbacks can be drawn one after another with [combine].

use crate::canvas::Canvas;
use crate::colour::colours;
use crate::font::FontSpec;
use crate::image::ImageId;
use crate::template::{PageContext, PageFn};
use crate::units::{cm, mm, Pt};
use std::rc::Rc;

/// Draws the furniture of a page
pub trait Stationery {
    fn draw(&self, canvas: &mut Canvas, page: &PageContext);
}

impl<F> Stationery for F
where
    F: Fn(&mut Canvas, &PageContext),
{
    fn draw(&self, canvas: &mut Canvas, page: &PageContext) {
        self(canvas, page)
    }
}

/// Wrap stationery up as a page callback
pub fn page_fn<S: Stationery + 'static>(stationery: S) -> PageFn {
    Rc::new(move |canvas: &mut Canvas, page: &PageContext| stationery.draw(canvas, page))
}

/// A page callback that draws `fns` in order
pub fn combine(fns: Vec<PageFn>) -> PageFn {
    Rc::new(move |canvas: &mut Canvas, page: &PageContext| {
        for f in fns.iter() {
            f(canvas, page);
        }
    })
}

/// Stationery that draws nothing
pub fn blank() -> PageFn {
    Rc::new(|_: &mut Canvas, _: &PageContext| {})
}

/// The red zig-zag mark in the top right corner of confidential documents
pub fn confidential(canvas: &mut Canvas) {
    const MARK: [(f32, f32); 12] = [
        (10.0, 0.0),
        (20.0, 10.0),
        (30.0, 0.0),
        (40.0, 10.0),
        (30.0, 20.0),
        (40.0, 30.0),
        (30.0, 40.0),
        (20.0, 30.0),
        (10.0, 40.0),
        (0.0, 30.0),
        (10.0, 20.0),
        (0.0, 10.0),
    ];

    canvas.save_state();
    canvas.translate(cm(18.5), cm(27.4));
    canvas.set_line_width(Pt(3.0));
    canvas.set_fill_colour(colours::RED);
    canvas.set_stroke_colour(colours::GREY);
    canvas.path(
        MARK.iter().map(|&(x, y)| (Pt(x), Pt(y))).collect(),
        true,
        true,
        false,
    );
    canvas.restore_state();
}

/// Draw the document's watermark, if it has one, diagonally across the page
pub fn draw_watermark(canvas: &mut Canvas, page: &PageContext) {
    let Some(watermark) = page.watermark else {
        return;
    };
    canvas.save_state();
    canvas.rotate(60.0);
    canvas.set_fill_colour(colours::LIGHT_GREY);
    canvas.set_font_spec(&FontSpec::new(page.font_name), Pt(120.0));
    canvas.draw_centred_string(mm(195.0), mm(-30.0), watermark);
    canvas.restore_state();
}

/// Draw an SVG (or any other image) with its lower left corner at (x, y), scaled
/// proportionally to the given width or, if one is given, height
pub fn draw_svg(
    canvas: &mut Canvas,
    image: ImageId,
    x: Pt,
    y: Pt,
    width: Option<Pt>,
    height: Option<Pt>,
) {
    match (width, height) {
        (_, Some(height)) => canvas.draw_image_scaled(image, x, y, None, Some(height)),
        (width, None) => canvas.draw_image_scaled(image, x, y, width, None),
    }
}

/// A bold title followed by a regular subtitle along the top of the page
pub fn header(canvas: &mut Canvas, page: &PageContext, title: &str, subtitle: &str) {
    let regular = FontSpec::new(page.font_name);
    canvas.save_state();
    canvas.set_font_spec(&regular.clone().bold(true), Pt(10.0));
    canvas.draw_string(mm(26.0), mm(284.0), title);
    canvas.set_font_spec(&regular, Pt(10.0));
    canvas.draw_string(mm(26.0 + 28.6), mm(284.0), subtitle);
    canvas.restore_state();
}

/// Small print along the bottom of the page: `lines` stacked upwards so that the last
/// one sits lowest, and the page index on the right
pub fn footer(canvas: &mut Canvas, page: &PageContext, lines: &[String]) {
    canvas.save_state();
    canvas.set_font_spec(&FontSpec::new(page.font_name), Pt(6.0));
    canvas.draw_right_string(mm(190.0), mm(8.0), &page.page_index_string());
    for (i, line) in lines.iter().rev().enumerate() {
        canvas.draw_string(mm(26.0 + 28.6), mm(8.0 + 3.0 * i as f32), line);
    }
    canvas.restore_state();
}

/// An image placed on every page, e.g. a company logo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Logo {
    pub image: ImageId,
    pub x: Pt,
    pub y: Pt,
    pub width: Option<Pt>,
    pub height: Option<Pt>,
}

/// Company stationery: name and tagline at the top, the watermark, footer lines with the
/// page index, and an optional logo
#[derive(Debug, Clone, Default)]
pub struct Letterhead {
    pub company: String,
    pub tagline: String,
    pub footer_lines: Vec<String>,
    pub logo: Option<Logo>,
    /// Separate the header from the content with a thin rule
    pub rule: bool,
}

impl Letterhead {
    pub fn new<S: ToString, T: ToString>(company: S, tagline: T) -> Letterhead {
        Letterhead {
            company: company.to_string(),
            tagline: tagline.to_string(),
            ..Default::default()
        }
    }

    pub fn footer_line<S: ToString>(mut self, line: S) -> Letterhead {
        self.footer_lines.push(line.to_string());
        self
    }

    pub fn logo(mut self, logo: Logo) -> Letterhead {
        self.logo = Some(logo);
        self
    }

    pub fn rule(mut self, rule: bool) -> Letterhead {
        self.rule = rule;
        self
    }
}

impl Stationery for Letterhead {
    fn draw(&self, canvas: &mut Canvas, page: &PageContext) {
        header(canvas, page, &self.company, &self.tagline);
        if self.rule {
            canvas.save_state();
            canvas.set_stroke_colour(colours::GREY);
            canvas.set_line_width(Pt(0.2));
            canvas.line((mm(26.0), mm(281.0)), (mm(190.0), mm(281.0)));
            canvas.restore_state();
        }
        draw_watermark(canvas, page);
        footer(canvas, page, &self.footer_lines);
        if let Some(logo) = self.logo {
            draw_svg(canvas, logo.image, logo.x, logo.y, logo.width, logo.height);
        }
    }
}
