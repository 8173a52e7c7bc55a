use pdf_document::stationery::{self, Letterhead};
use pdf_document::{Address, PDFDocument};

fn main() {
    env_logger::init();

    let recipients = [
        Address {
            company: "Example Corp.".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Beispiel".to_string(),
            address: "Hauptstrasse 5".to_string(),
            zip_code: "3000".to_string(),
            city: "Bern".to_string(),
            ..Default::default()
        },
        Address {
            manner_of_address: "Herr".to_string(),
            first_name: "Beat".to_string(),
            last_name: "Muster".to_string(),
            address: "Seeweg 12".to_string(),
            zip_code: "6003".to_string(),
            city: "Luzern".to_string(),
            ..Default::default()
        },
        Address {
            full_override: "Carla Rossi\nVia Nassa 1\n6900 Lugano".to_string(),
            ..Default::default()
        },
    ];

    let mut pdf = PDFDocument::new();
    let letterhead = Letterhead::new("FEINHEIT AG", "Digital agency")
        .footer_line("FEINHEIT AG, Molkenstrasse 21, 8004 Zürich");
    pdf.init_letter(stationery::page_fn(letterhead), None, None, None);

    for (i, recipient) in recipients.iter().enumerate() {
        if i > 0 {
            pdf.restart();
        }
        pdf.address_head("FEINHEIT AG, Molkenstrasse 21, 8004 Zürich");
        pdf.address(recipient);
        pdf.next_frame();
        pdf.h1("Annual meeting");
        pdf.p(&format!("Dear {},", recipient.lines()[0]));
        for _ in 0..8 {
            pdf.p(&lipsum::lipsum_words(60));
        }
        pdf.spacer();
        pdf.p("Kind regards");
    }

    let out = std::fs::File::create("batch-letters.pdf").unwrap();
    pdf.generate(out).unwrap();
}
