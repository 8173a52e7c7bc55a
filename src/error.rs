use crate::markup::MarkupError;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to parse the image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// [usvg] failed to parse the image
    Svg(#[from] usvg::Error),

    #[error("failed to convert SVG: {0}")]
    /// [svg2pdf] could not convert a parsed SVG tree
    SvgConversion(String),

    #[error(transparent)]
    /// Caller-provided paragraph markup was malformed
    Markup(#[from] MarkupError),

    #[error("failed to read HTML fragment: {0}")]
    /// The HTML subset converter could not make sense of its input
    Html(String),

    #[error(transparent)]
    /// A configuration file could not be parsed
    Config(#[from] toml::de::Error),

    #[error("pagination did not stabilise after {passes} passes")]
    /// The story kept changing its page count (or references) between passes
    PaginationUnstable { passes: usize },

    #[error("unknown page template `{0}`")]
    /// A next-template action named a template the document does not have
    UnknownPageTemplate(String),

    #[error("page template `{0}` has no frames")]
    /// Content cannot be placed on a template without frames
    NoFrames(String),

    #[error("the document has no page templates")]
    /// [crate::DocTemplate::build] was called without any templates
    MissingPageTemplate,

    #[error("no font family named `{0}` has been registered")]
    UnknownFontFamily(String),

    #[error("image {0} is not registered with the document")]
    ImageMissing(usize),
}
