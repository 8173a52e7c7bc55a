//! Typed lengths. Everything is laid out in [Pt] (1/72 inch, the native PDF unit);
//! [Mm], [Cm], and [In] exist so that page furniture can be specified the way it is
//! measured on paper and converted with `.into()`.

use derive_more::{Add, AddAssign, Deref, DerefMut, Display, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul, Neg};

/// Points, 1/72 of an inch
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Deref,
    DerefMut,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// Millimetres
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Deref, Display, From, Into,
)]
#[display("{_0}mm")]
pub struct Mm(pub f32);

/// Centimetres
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Deref, Display, From, Into,
)]
#[display("{_0}cm")]
pub struct Cm(pub f32);

/// Inches
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Deref, Display, From, Into,
)]
#[display("{_0}in")]
pub struct In(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * 72.0 / 25.4)
    }
}

impl From<Cm> for Pt {
    fn from(cm: Cm) -> Self {
        Pt(cm.0 * 72.0 / 2.54)
    }
}

impl From<In> for Pt {
    fn from(inches: In) -> Self {
        Pt(inches.0 * 72.0)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Self {
        Mm(pt.0 * 25.4 / 72.0)
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Mul<Pt> for f32 {
    type Output = Pt;

    fn mul(self, rhs: Pt) -> Pt {
        Pt(self * rhs.0)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

impl Div<Pt> for Pt {
    type Output = Pt;

    fn div(self, rhs: Pt) -> Pt {
        Pt(self.0 / rhs.0)
    }
}

impl Neg for Pt {
    type Output = Pt;

    fn neg(self) -> Pt {
        Pt(-self.0)
    }
}

impl Pt {
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    pub fn abs(self) -> Pt {
        Pt(self.0.abs())
    }
}

/// Shorthand for `Pt::from(Mm(value))`
pub fn mm(value: f32) -> Pt {
    Mm(value).into()
}

/// Shorthand for `Pt::from(Cm(value))`
pub fn cm(value: f32) -> Pt {
    Cm(value).into()
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(a: Pt, b: f32) -> bool {
        (a.0 - b).abs() < 1e-3
    }

    #[test]
    fn paper_measurements_convert_to_points() {
        assert!(close(Pt::from(In(1.0)), 72.0));
        assert!(close(Pt::from(Mm(25.4)), 72.0));
        assert!(close(cm(2.54), 72.0));
        assert!(close(mm(210.0), 595.2756));
    }

    #[test]
    fn arithmetic_stays_in_points() {
        let a = Pt(10.0) + Pt(5.0) * 2.0 - Pt(4.0) / 2.0;
        assert_eq!(a, Pt(18.0));
        assert_eq!(-Pt(3.0), Pt(-3.0));
        assert_eq!(Pt(3.0).max(Pt(4.0)), Pt(4.0));
        let total: Pt = [Pt(1.0), Pt(2.0)].into_iter().sum();
        assert_eq!(total, Pt(3.0));
    }
}
