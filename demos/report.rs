use pdf_document::config::DocumentConfig;
use pdf_document::stationery::{self, Letterhead};
use pdf_document::{cm, Cell, PDFDocument};

fn main() {
    env_logger::init();

    let config = DocumentConfig::from_toml_str(
        r#"
        title = "Lorem ipsum"
        author = "FEINHEIT AG"
        font_size = 10
        "#,
    )
    .expect("valid config");

    let mut pdf = PDFDocument::with_config(config);
    let letterhead = Letterhead::new("FEINHEIT AG", "Digital agency")
        .footer_line("FEINHEIT AG, Molkenstrasse 21, 8004 Zürich")
        .footer_line("www.feinheit.ch")
        .rule(true);
    pdf.init_report(stationery::page_fn(letterhead), None);

    pdf.bookmark("Introduction", "intro", 0);
    pdf.h1("Lorem ipsum");
    pdf.p(&lipsum::lipsum(80));
    pdf.ul(["Dolor sit amet", "Consectetur <b>adipiscing</b> elit"])
        .expect("valid markup");
    pdf.spacer();

    for section in 1..=12 {
        pdf.bookmark(format!("Section {section}"), format!("section-{section}"), 0);
        pdf.h2(&format!("Section {section}"));
        pdf.p(&lipsum::lipsum_words(200));
        pdf.start_keeptogether();
        pdf.h3("Figures");
        pdf.table(
            vec![
                vec![Cell::from("Revenue"), Cell::from("12 400.00")],
                vec![Cell::from("Costs"), Cell::from("9 800.00")],
            ],
            &[cm(12.4), cm(4.0)],
            None,
        );
        pdf.end_keeptogether();
        pdf.hr();
    }

    pdf.mini_html("<p>Figures are <em>unaudited</em>.</p><ol><li>Revenue</li><li>Costs</li></ol>")
        .expect("valid html");

    let out = std::fs::File::create("report.pdf").unwrap();
    pdf.generate(out).unwrap();
}
