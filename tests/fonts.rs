use pdf_document::{stationery, FontFace, FontSpec, PDFDocument, PDFError};
use std::path::PathBuf;

fn tuffy() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fonts/Tuffy.ttf")
}

#[test]
fn missing_faces_fall_back_to_regular() {
    let mut pdf = PDFDocument::new();
    pdf.register_fonts_from_paths(tuffy(), None, None, None, "Reporting")
        .expect("font loads");

    let regular = pdf.fonts.resolve(&FontSpec::new("Reporting"));
    assert!(matches!(pdf.fonts.face(regular), FontFace::Embedded(_)));
    for (bold, italic) in [(true, false), (false, true), (true, true)] {
        let spec = FontSpec::new("Reporting").bold(bold).italic(italic);
        assert_eq!(pdf.fonts.resolve(&spec), regular);
    }
}

#[test]
fn embedded_text_can_be_extracted() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut pdf = PDFDocument::new();
    pdf.register_fonts_from_paths(tuffy(), None, None, None, "Reporting")
        .expect("font loads");
    pdf.init_report(stationery::blank(), None);
    pdf.generate_style(Some("Reporting"), None);
    pdf.h1("Bold falls back to regular");
    pdf.p("Grüezi & <hello> Ünïcödé");

    let mut bytes = Vec::new();
    pdf.generate(&mut bytes).expect("document writes");

    let raw = String::from_utf8_lossy(&bytes);
    assert!(raw.contains("/FontFile2"));
    assert!(raw.contains("/ToUnicode"));
    assert!(raw.contains("/Identity-H"));
    // only the embedded family is used, so no standard font is written
    assert!(!raw.contains("/Helvetica"));

    let document = lopdf::Document::load_mem(&bytes).expect("output is a readable PDF");
    assert_eq!(document.get_pages().len(), 1);
    let text = document.extract_text(&[1]).expect("text extracts");
    for word in ["Bold", "regular", "Grüezi", "<hello>", "Ünïcödé"] {
        assert!(text.contains(word), "missing {word} in {text:?}");
    }
}

#[test]
fn unreadable_font_files_are_errors() {
    let mut pdf = PDFDocument::new();
    let missing = tuffy().with_file_name("Nope.ttf");
    assert!(matches!(
        pdf.register_fonts_from_paths(missing, None, None, None, "Nope"),
        Err(PDFError::Io(_))
    ));
    assert!(!pdf.fonts.has_family("Nope"));
}
