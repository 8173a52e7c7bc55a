//! Build PDF reports and letters from a story of paragraphs, tables and page breaks,
//! with stationery drawn on every page and "Page X of Y" footers that are always right.

mod address;
pub use address::*;

mod canvas;
pub use canvas::*;

mod colour;
pub use colour::*;

/// Document settings, loadable from TOML
pub mod config;

mod doc_template;
pub use doc_template::*;

mod document;
pub use document::*;

mod flowable;
pub use flowable::*;

mod font;
pub use font::*;

/// Conversion of a small HTML subset into paragraphs
pub mod html;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Utility functions and structures to layout objects (most text) on pages
pub mod layout;

/// Inline paragraph markup: sanitising, normalisation and parsing
pub mod markup;

mod outline;
pub use outline::*;

mod pagination;
pub use pagination::*;

mod paragraph;
pub use paragraph::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod standard;
pub use standard::StandardFont;

pub mod stationery;

mod style;
pub use style::*;

mod table;
pub use table::*;

mod template;
pub use template::*;

mod transform;
pub use transform::*;

mod truetype;
pub use truetype::EmbeddedFont;

mod units;
pub use units::*;

pub mod utils;

mod writer;
pub use writer::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
