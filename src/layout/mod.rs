//! Utilities to lay out text within frames.
//!
//! Paragraph content arrives as styled [Inline](crate::markup::Inline) runs and is broken
//! into [Line]s by [layout_inlines], which wraps at word boundaries, collapses whitespace,
//! and falls back to breaking between characters when a single word is wider than the
//! frame. Each line can then be placed with [Line::placements] for left, right, centred,
//! or justified setting. A [Cursor] into the inline content marks where each line
//! starts, which is what lets a paragraph be split across frames and re-flowed at a
//! different width on the next page.
//!
//! # Example
//!
//! ```
//! use pdf_document::{colours, FontBook, FontSpec, Pt};
//! use pdf_document::layout::layout_inlines;
//! use pdf_document::markup::plain;
//!
//! let fonts = FontBook::new();
//! let lines = layout_inlines(
//!     &fonts,
//!     &plain("Hello, world! This line will wrap."),
//!     &FontSpec::new("Helvetica"),
//!     Pt(12.0),
//!     colours::BLACK,
//!     Pt(100.0),
//!     Pt(100.0),
//! );
//! assert!(lines.len() > 1);
//! ```

mod margins;
mod text;

pub use margins::*;
pub use text::*;
