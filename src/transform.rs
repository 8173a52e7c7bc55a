//! Affine transforms recorded by [Canvas::translate](crate::Canvas::translate) and
//! [Canvas::rotate](crate::Canvas::rotate).

use crate::units::*;
use pdf_writer::Content;

/// The six numbers of a PDF `cm` operator, `[a b c d e f]`, mapping `(x, y)` to
/// `(a·x + c·y + e, b·x + d·y + f)`.
///
/// ```
/// use pdf_document::{Transform, Pt};
///
/// // rotate a watermark, then move it onto the page
/// let transform = Transform::rotate(60f32.to_radians())
///     .then(Transform::translate(Pt(300.0), Pt(100.0)));
/// assert_eq!(transform.e, 300.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::translate(Pt(0.0), Pt(0.0))
    }
}

impl Transform {
    pub fn translate(x: Pt, y: Pt) -> Transform {
        Transform {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: x.0,
            f: y.0,
        }
    }

    /// Counter-clockwise rotation about the origin, in radians
    pub fn rotate(angle: f32) -> Transform {
        let (sin, cos) = angle.sin_cos();
        Transform {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self` followed by `next`
    pub fn then(self, next: Transform) -> Transform {
        Transform {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
            e: self.e * next.a + self.f * next.c + next.e,
            f: self.e * next.b + self.f * next.d + next.f,
        }
    }

    pub fn apply(&self, x: Pt, y: Pt) -> (Pt, Pt) {
        (
            Pt(self.a * x.0 + self.c * y.0 + self.e),
            Pt(self.b * x.0 + self.d * y.0 + self.f),
        )
    }

    pub(crate) fn write_to_content(&self, content: &mut Content) {
        content.transform([self.a, self.b, self.c, self.d, self.e, self.f]);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rotation_then_translation() {
        let t = Transform::rotate(std::f32::consts::FRAC_PI_2)
            .then(Transform::translate(Pt(10.0), Pt(0.0)));
        let (x, y) = t.apply(Pt(1.0), Pt(0.0));
        assert!((x.0 - 10.0).abs() < 1e-5);
        assert!((y.0 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(
            Transform::default().apply(Pt(3.0), Pt(4.0)),
            (Pt(3.0), Pt(4.0))
        );
    }
}
