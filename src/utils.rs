//! Odds and ends for serving generated documents.

use regex::Regex;
use std::sync::LazyLock;

static UNSAFE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\-.]+").expect("valid filename pattern"));

/// Replace every run of characters other than ASCII letters, digits, `-` and `.` with a
/// single `-`
pub fn sanitize_filename(filename: &str) -> String {
    UNSAFE_RUNS.replace_all(filename, "-").into_owned()
}

/// The value of a `Content-Disposition` header for a PDF named after `filename`
///
/// ```
/// use pdf_document::utils::content_disposition;
///
/// assert_eq!(
///     content_disposition("Rechnung März 2024", true),
///     "attachment; filename=Rechnung-M-rz-2024.pdf"
/// );
/// ```
pub fn content_disposition(filename: &str, as_attachment: bool) -> String {
    format!(
        "{}; filename={}.pdf",
        if as_attachment { "attachment" } else { "inline" },
        sanitize_filename(filename)
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn runs_collapse_to_one_dash() {
        assert_eq!(sanitize_filename("a  b//c"), "a-b-c");
        assert_eq!(sanitize_filename("report-2024.v2"), "report-2024.v2");
        assert_eq!(sanitize_filename("über"), "-ber");
        assert_eq!(sanitize_filename("Offerte: Zürich (2024)"), "Offerte-Z-rich-2024-");
    }

    #[test]
    fn inline_disposition() {
        assert_eq!(
            content_disposition("offer", false),
            "inline; filename=offer.pdf"
        );
    }
}
