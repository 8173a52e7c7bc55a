//! Document settings that can be loaded from a TOML file.
//!
//! ```
//! use pdf_document::config::{DocumentConfig, PaperSize};
//!
//! let config = DocumentConfig::from_toml_str(r#"
//!     font_size = 10
//!     paper = "letter"
//!     title = "Invoice 2024-117"
//! "#).expect("valid config");
//! assert_eq!(config.paper, PaperSize::Letter);
//! assert_eq!(config.font_name, "Helvetica");
//! ```

use crate::doc_template::DEFAULT_MAX_PASSES;
use crate::info::Info;
use crate::layout::Margins;
use crate::units::{In, Pt};
use crate::PDFError;
use serde::{Deserialize, Serialize};

/// Paper formats, in portrait orientation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
}

impl PaperSize {
    /// (width, height) in portrait orientation
    pub fn dimensions(self) -> (Pt, Pt) {
        match self {
            PaperSize::A4 => (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4)),
            PaperSize::A5 => (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4)),
            PaperSize::Letter => (In(8.5).into(), In(11.0).into()),
            PaperSize::Legal => (In(8.5).into(), In(14.0).into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Base font family of the style sheet
    pub font_name: String,
    /// Base font size in points; headings and small print are derived from it
    pub font_size: f32,
    pub paper: PaperSize,
    pub landscape: bool,
    /// Where the main frame of report pages sits
    pub margins: Margins,
    /// Outline every frame, for debugging layouts
    pub show_boundaries: bool,
    /// Give up if the layout hasn't settled after this many passes
    pub max_passes: usize,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            font_name: "Helvetica".to_string(),
            font_size: 9.0,
            paper: PaperSize::A4,
            landscape: false,
            margins: Margins::default(),
            show_boundaries: false,
            max_passes: DEFAULT_MAX_PASSES,
            title: None,
            author: None,
            subject: None,
        }
    }
}

impl DocumentConfig {
    pub fn from_toml_str(source: &str) -> Result<DocumentConfig, PDFError> {
        toml::from_str(source).map_err(Into::into)
    }

    /// (width, height) of the pages, taking the orientation into account
    pub fn page_size(&self) -> (Pt, Pt) {
        let (w, h) = self.paper.dimensions();
        if self.landscape {
            (h, w)
        } else {
            (w, h)
        }
    }

    /// Document metadata from the configured title, author, and subject, if any of them
    /// is set
    pub fn info(&self) -> Option<Info> {
        if self.title.is_none() && self.author.is_none() && self.subject.is_none() {
            return None;
        }
        let mut info = Info::new();
        if let Some(title) = &self.title {
            info.title(title);
        }
        if let Some(author) = &self.author {
            info.author(author);
        }
        if let Some(subject) = &self.subject {
            info.subject(subject);
        }
        Some(info)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::units::cm;

    #[test]
    fn empty_config_uses_defaults() {
        let config = DocumentConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, DocumentConfig::default());
        assert_eq!(config.font_size, 9.0);
        assert_eq!(config.max_passes, 10);
        assert!(config.info().is_none());
    }

    #[test]
    fn reads_margins_and_metadata() {
        let config = DocumentConfig::from_toml_str(
            r#"
            font_name = "Reporting"
            landscape = true
            max_passes = 4
            author = "Accounts"

            [margins]
            top = 20.0
            right = 30.0
            bottom = 40.0
            left = 50.0
            "#,
        )
        .expect("valid config");
        assert_eq!(config.font_name, "Reporting");
        assert_eq!(config.max_passes, 4);
        assert_eq!(config.margins.left, Pt(50.0));
        let (w, h) = config.page_size();
        assert!(w > h);
        assert_eq!(
            config.info().and_then(|i| i.author),
            Some("Accounts".to_string())
        );
    }

    #[test]
    fn rejects_unknown_paper() {
        let result = DocumentConfig::from_toml_str(r#"paper = "b5""#);
        assert!(matches!(result, Err(PDFError::Config(_))));
    }

    #[test]
    fn a4_is_21_by_29_7_cm() {
        let (w, h) = PaperSize::A4.dimensions();
        assert!((w - cm(21.0)).abs() < Pt(0.01));
        assert!((h - cm(29.7)).abs() < Pt(0.01));
    }
}
