use serde::{Deserialize, Serialize};

/// A colour, expressed in RGB, CMYK, or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the CMYK space. c, m, y, and k range from 0.0 to 1.0
    pub fn new_cmyk(c: f32, m: f32, y: f32, k: f32) -> Colour {
        Colour::CMYK { c, m, y, k }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Parse a hex colour as found in stylesheets and configuration (`#666`, `#666666`,
    /// or without the leading `#`). Returns [None] for anything else.
    pub fn from_hex(hex: &str) -> Option<Colour> {
        let hex = hex.trim().trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| channel(&format!("{c}{c}")));
                Some(Colour::new_rgb_bytes(
                    digits.next()??,
                    digits.next()??,
                    digits.next()??,
                ))
            }
            6 => Some(Colour::new_rgb_bytes(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            _ => None,
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const GREY: Colour = Colour::Grey { g: 0.5 };
    /// The shade used for watermarks
    pub const LIGHT_GREY: Colour = Colour::Grey { g: 0.9 };
    pub const RED: Colour = Colour::RGB {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        let long = Colour::from_hex("#666666").expect("valid hex");
        let short = Colour::from_hex("666").expect("valid hex");
        assert_eq!(long, short);
        assert_eq!(long, Colour::new_rgb_bytes(0x66, 0x66, 0x66));
    }

    #[test]
    fn rejects_garbage_hex() {
        assert_eq!(Colour::from_hex("#12"), None);
        assert_eq!(Colour::from_hex("zzzzzz"), None);
    }
}
