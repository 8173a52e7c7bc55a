use pdf_document::config::DocumentConfig;
use pdf_document::{
    cm, stationery, Address, Canvas, CanvasOp, Cell, PDFDocument, PDFError, PageContext, PageFn,
    Pt, RenderedDocument,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn footer() -> PageFn {
    stationery::page_fn(|canvas: &mut Canvas, page: &PageContext| {
        stationery::footer(canvas, page, &["FEINHEIT AG".to_string()])
    })
}

fn page_texts(rendered: &RenderedDocument, page: usize) -> Vec<String> {
    rendered.pages[page]
        .ops
        .iter()
        .filter_map(|op| match op {
            CanvasOp::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn footers(rendered: &RenderedDocument) -> Vec<String> {
    (0..rendered.page_count())
        .map(|page| {
            page_texts(rendered, page)
                .into_iter()
                .find(|text| text.starts_with("Page "))
                .unwrap_or_default()
        })
        .collect()
}

fn load(rendered: &RenderedDocument) -> (Vec<u8>, lopdf::Document) {
    let bytes = rendered.to_bytes().expect("document writes");
    let document = lopdf::Document::load_mem(&bytes).expect("output is a readable PDF");
    (bytes, document)
}

#[test]
fn long_reports_count_their_pages() {
    init_logging();
    let mut pdf = PDFDocument::new();
    pdf.init_report(footer(), None);
    pdf.h1("Lorem ipsum");
    for i in 0..40 {
        pdf.h3(&format!("Section {}", i + 1));
        pdf.p(&lipsum::lipsum(120));
    }

    let rendered = pdf.build().expect("report lays out");
    let pages = rendered.page_count();
    assert!(pages > 2);
    assert_eq!(rendered.pagination.num_pages, pages);

    let expected: Vec<String> = (1..=pages)
        .map(|page| format!("Page {page} of {pages}"))
        .collect();
    assert_eq!(footers(&rendered), expected);

    let (_, document) = load(&rendered);
    assert_eq!(document.get_pages().len(), pages);
}

#[test]
fn an_empty_report_is_one_page() {
    let mut pdf = PDFDocument::new();
    pdf.init_report(footer(), None);
    let rendered = pdf.build().expect("empty story lays out");
    assert_eq!(footers(&rendered), vec!["Page 1 of 1"]);

    let (_, document) = load(&rendered);
    assert_eq!(document.get_pages().len(), 1);
}

#[test]
fn restarted_documents_number_their_own_pages() {
    let mut pdf = PDFDocument::new();
    pdf.init_report(footer(), None);
    pdf.p("first document, page one");
    pdf.pagebreak();
    pdf.p("first document, page two");
    pdf.pagebreak();
    pdf.p("first document, page three");
    pdf.restart();
    pdf.p("second document, page one");
    pdf.pagebreak();
    pdf.p("second document, page two");

    let rendered = pdf.build().expect("batch lays out");
    assert_eq!(rendered.page_count(), 5);
    assert_eq!(rendered.pagination.boundaries(), vec![3]);

    let templates: Vec<_> = rendered.pages.iter().map(|p| p.template.as_str()).collect();
    assert_eq!(templates, ["First", "Later", "Later", "First", "Later"]);

    // a restarted document counts from the page the restart happened on
    assert_eq!(
        footers(&rendered),
        vec![
            "Page 1 of 3",
            "Page 2 of 3",
            "Page 3 of 3",
            "Page 2 of 3",
            "Page 3 of 3"
        ]
    );
}

#[test]
fn invoices_keep_their_totals_at_the_bottom() {
    let mut pdf = PDFDocument::new();
    pdf.init_letter(footer(), None, None, None);
    pdf.address_head("FEINHEIT AG, Molkenstrasse 21, 8004 Zürich");
    pdf.address(&Address {
        company: "Example Corp.".to_string(),
        first_name: "Anna".to_string(),
        last_name: "Beispiel".to_string(),
        address: "Hauptstrasse 5".to_string(),
        zip_code: "3000".to_string(),
        city: "Bern".to_string(),
        ..Default::default()
    });
    pdf.next_frame();
    pdf.h1("Invoice 2024-117");
    pdf.table(
        vec![
            vec![Cell::from("Consulting"), Cell::from("1200.00")],
            vec![Cell::from("Hosting"), Cell::from("240.00")],
        ],
        &[cm(12.4), cm(4.0)],
        None,
    );
    let totals_style = pdf.style.table_head.clone();
    pdf.bottom_table(
        vec![vec![Cell::from("Total"), Cell::from("1440.00")]],
        &[cm(12.4), cm(4.0)],
        Some(&totals_style),
    );

    let rendered = pdf.build().expect("invoice lays out");
    assert_eq!(rendered.page_count(), 1);
    assert!(rendered.pagination.bottom_table_height > Pt(0.0));
    assert_eq!(footers(&rendered), vec!["Page 1 of 1"]);

    // paragraphs are drawn word by word, table cells whole
    let texts = page_texts(&rendered, 0);
    for expected in ["Example", "Beispiel", "Bern", "Total", "1440.00"] {
        assert!(texts.iter().any(|t| t == expected), "missing {expected}");
    }

    let (_, document) = load(&rendered);
    assert_eq!(document.get_pages().len(), 1);
}

#[test]
fn letters_batch_into_one_file() {
    let recipients = ["Anna", "Beat", "Carla"];
    let mut pdf = PDFDocument::new();
    pdf.init_letter(footer(), None, None, None);
    for (i, name) in recipients.iter().enumerate() {
        if i > 0 {
            pdf.restart();
        }
        pdf.address(&Address {
            first_name: name.to_string(),
            last_name: "Muster".to_string(),
            ..Default::default()
        });
        pdf.next_frame();
        pdf.p(&format!("Dear {name},"));
        pdf.p(&lipsum::lipsum(40));
    }

    let rendered = pdf.build().expect("letters lay out");
    assert_eq!(rendered.page_count(), 3);
    assert!(rendered.pages.iter().all(|p| p.template == "First"));

    let (_, document) = load(&rendered);
    assert_eq!(document.get_pages().len(), 3);
}

#[test]
fn unstable_pagination_is_an_error() {
    let config = DocumentConfig {
        max_passes: 1,
        ..Default::default()
    };
    let mut pdf = PDFDocument::with_config(config);
    pdf.init_report(footer(), None);
    pdf.p("one pass is never enough to know the page count");
    assert!(matches!(
        pdf.build(),
        Err(PDFError::PaginationUnstable { passes: 1 })
    ));
}

#[test]
fn configured_metadata_is_written() {
    let config = DocumentConfig::from_toml_str(
        r#"
        title = "Annual report"
        author = "Accounts"
        font_size = 10
        "#,
    )
    .expect("valid config");
    let mut pdf = PDFDocument::with_config(config);
    pdf.init_report(stationery::blank(), None);
    assert_eq!(pdf.style.normal.font_size, Pt(10.0));
    pdf.bookmark("Overview", "overview", 0);
    pdf.h1("Overview");
    pdf.mini_html("<p>Figures are <em>unaudited</em>.</p><ol><li>Revenue</li><li>Costs</li></ol>")
        .expect("valid html");

    let rendered = pdf.build().expect("report lays out");
    let (bytes, document) = load(&rendered);
    assert_eq!(document.get_pages().len(), 1);

    let raw = String::from_utf8_lossy(&bytes);
    assert!(raw.contains("(Annual report)"));
    assert!(raw.contains("(Accounts)"));
    assert!(raw.contains("/Outlines"));
    assert!(raw.contains("(Overview)"));
}

#[test]
fn confidential_reports_are_marked() {
    let mut pdf = PDFDocument::new();
    let letterhead = stationery::Letterhead::new("FEINHEIT AG", "Web development");
    pdf.init_confidential_report(stationery::page_fn(letterhead), None);
    pdf.p("for your eyes only");
    pdf.pagebreak();
    pdf.p("still confidential");

    let rendered = pdf.build().expect("report lays out");
    assert_eq!(rendered.page_count(), 2);

    let has_mark = |page: usize| {
        rendered.pages[page]
            .ops
            .iter()
            .any(|op| matches!(op, CanvasOp::Path { points, .. } if points.len() == 12))
    };
    assert!(has_mark(0));
    assert!(!has_mark(1));
    for page in 0..2 {
        assert!(page_texts(&rendered, page).contains(&"CONFIDENTIAL".to_string()));
    }
}
