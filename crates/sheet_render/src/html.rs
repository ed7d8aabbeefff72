//! Print-ready HTML serialization of a [`Document`]. Every piece of text is
//! escaped on the way out.

use std::fmt::Write as _;

use sheet_core::sanitize::escape_html;

use crate::document::{Block, Card, Document, Page, Part, Table};

const STYLESHEET: &str = r#"
    :root {
      --pf2e-green: #1f3f33;
      --pf2e-gold: #b48b2f;
      --pf2e-cream: #f6f1e7;
      --pf2e-ink: #1b1b1b;
      --pf2e-muted: #6b6b6b;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      font-family: "Palatino Linotype", "Book Antiqua", Palatino, serif;
      color: var(--pf2e-ink);
      background: var(--pf2e-cream);
    }
    .page {
      width: 210mm;
      min-height: 297mm;
      padding: 16mm 14mm;
      margin: 0 auto 8mm auto;
      background: #fff;
      box-shadow: 0 4px 18px rgba(0,0,0,0.12);
      page-break-after: always;
    }
    .page:last-child { page-break-after: auto; }
    header {
      display: grid;
      grid-template-columns: 1fr auto;
      gap: 12px;
      border-bottom: 2px solid var(--pf2e-gold);
      padding-bottom: 8px;
      margin-bottom: 12px;
    }
    .title { font-size: 22px; font-weight: 700; color: var(--pf2e-green); letter-spacing: 0.5px; }
    .subtitle { font-size: 12px; color: var(--pf2e-muted); }
    .chip {
      display: inline-flex;
      align-items: center;
      justify-content: center;
      padding: 4px 10px;
      min-height: 22px;
      border: 1px solid var(--pf2e-gold);
      border-radius: 999px;
      font-size: 12px;
      background: #fff8e8;
    }
    .grid-2 { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; margin-bottom: 12px; }
    .grid-3 { display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 12px; margin-bottom: 12px; }
    .card {
      border: 1px solid #e2d7c3;
      background: #fffdf8;
      padding: 10px 12px;
      margin-bottom: 12px;
      border-radius: 8px;
      break-inside: avoid;
      page-break-inside: avoid;
    }
    .grid-2 > .card, .grid-3 > .card { margin-bottom: 0; }
    .card h3 {
      margin: 0 0 6px 0;
      font-size: 12px;
      letter-spacing: 0.8px;
      text-transform: uppercase;
      color: var(--pf2e-green);
    }
    .card h4 { margin: 12px 0 6px 0; font-size: 12px; text-transform: uppercase; color: var(--pf2e-green); }
    .stat { font-size: 20px; font-weight: 700; color: var(--pf2e-green); }
    table { width: 100%; border-collapse: collapse; font-size: 11.5px; }
    th, td { padding: 5px 7px; border-bottom: 1px solid #e6dccb; text-align: left; vertical-align: top; }
    th {
      text-transform: uppercase;
      font-size: 11px;
      color: var(--pf2e-green);
      letter-spacing: 0.6px;
      background: #f5efe2;
    }
    ul { margin: 0; padding-left: 18px; font-size: 12px; }
    .note { font-size: 11px; color: var(--pf2e-muted); }
    .notes-box {
      min-height: 90mm;
      border: 1px dashed #d8c9b1;
      border-radius: 8px;
      background: repeating-linear-gradient(to bottom, #fffdf8 0px, #fffdf8 18px, #f0e7d6 19px);
      padding: 10px 12px;
    }
    @page { size: A4; margin: 12mm; }
    @media print {
      body { background: #fff; }
      .page { width: auto; min-height: auto; margin: 0; box-shadow: none; }
    }
"#;

pub fn render_html(document: &Document) -> String {
    let mut out = String::new();
    writeln!(&mut out, "<!doctype html>").expect("writing to String cannot fail");
    writeln!(&mut out, "<html lang=\"en\">").expect("writing to String cannot fail");
    writeln!(&mut out, "<head>").expect("writing to String cannot fail");
    writeln!(&mut out, "  <meta charset=\"utf-8\" />").expect("writing to String cannot fail");
    writeln!(&mut out, "  <title>{}</title>", escape_html(&document.title))
        .expect("writing to String cannot fail");
    writeln!(&mut out, "  <style>{STYLESHEET}  </style>").expect("writing to String cannot fail");
    writeln!(&mut out, "</head>").expect("writing to String cannot fail");
    writeln!(&mut out, "<body>").expect("writing to String cannot fail");
    for page in &document.pages {
        write_page(&mut out, page);
    }
    writeln!(&mut out, "</body>").expect("writing to String cannot fail");
    writeln!(&mut out, "</html>").expect("writing to String cannot fail");
    out
}

fn write_page(out: &mut String, page: &Page) {
    writeln!(out, "  <section class=\"page\">").expect("writing to String cannot fail");
    writeln!(out, "    <header>").expect("writing to String cannot fail");
    writeln!(out, "      <div>").expect("writing to String cannot fail");
    writeln!(
        out,
        "        <div class=\"title\">{}</div>",
        escape_html(&page.title)
    )
    .expect("writing to String cannot fail");
    writeln!(
        out,
        "        <div class=\"subtitle\">{}</div>",
        escape_html(&page.subtitle)
    )
    .expect("writing to String cannot fail");
    writeln!(out, "      </div>").expect("writing to String cannot fail");
    writeln!(out, "      <div>").expect("writing to String cannot fail");
    for chip in &page.chips {
        writeln!(out, "        <div class=\"chip\">{}</div>", escape_html(chip))
            .expect("writing to String cannot fail");
    }
    writeln!(out, "      </div>").expect("writing to String cannot fail");
    writeln!(out, "    </header>").expect("writing to String cannot fail");

    for block in &page.blocks {
        match block {
            Block::Grid { columns, cards } => {
                writeln!(out, "    <div class=\"grid-{columns}\">")
                    .expect("writing to String cannot fail");
                for card in cards {
                    write_card(out, card);
                }
                writeln!(out, "    </div>").expect("writing to String cannot fail");
            }
            Block::Card(card) => write_card(out, card),
            Block::Note(text) => {
                writeln!(out, "    <div class=\"note\">{}</div>", escape_html(text))
                    .expect("writing to String cannot fail");
            }
        }
    }
    writeln!(out, "  </section>").expect("writing to String cannot fail");
}

fn write_card(out: &mut String, card: &Card) {
    writeln!(out, "      <div class=\"card\">").expect("writing to String cannot fail");
    writeln!(out, "        <h3>{}</h3>", escape_html(&card.heading))
        .expect("writing to String cannot fail");
    for part in &card.parts {
        match part {
            Part::Stat(value) => {
                writeln!(out, "        <div class=\"stat\">{}</div>", escape_html(value))
                    .expect("writing to String cannot fail");
            }
            Part::Note(text) => {
                writeln!(out, "        <div class=\"note\">{}</div>", escape_html(text))
                    .expect("writing to String cannot fail");
            }
            Part::Subheading(text) => {
                writeln!(out, "        <h4>{}</h4>", escape_html(text))
                    .expect("writing to String cannot fail");
            }
            Part::Table(table) => write_table(out, table),
            Part::List(entries) => {
                let items: String = entries
                    .iter()
                    .map(|entry| format!("<li>{}</li>", escape_html(entry)))
                    .collect();
                writeln!(out, "        <ul>{items}</ul>").expect("writing to String cannot fail");
            }
            Part::NotesBox => {
                writeln!(out, "        <div class=\"notes-box\"></div>")
                    .expect("writing to String cannot fail");
            }
        }
    }
    writeln!(out, "      </div>").expect("writing to String cannot fail");
}

fn write_table(out: &mut String, table: &Table) {
    let headers: String = table
        .headers
        .iter()
        .map(|header| format!("<th>{}</th>", escape_html(header)))
        .collect();
    writeln!(out, "        <table>").expect("writing to String cannot fail");
    writeln!(out, "          <thead><tr>{headers}</tr></thead>")
        .expect("writing to String cannot fail");
    writeln!(out, "          <tbody>").expect("writing to String cannot fail");
    for row in &table.rows {
        let cells: String = row
            .iter()
            .map(|cell| format!("<td>{}</td>", escape_html(cell)))
            .collect();
        writeln!(out, "            <tr>{cells}</tr>").expect("writing to String cannot fail");
    }
    writeln!(out, "          </tbody>").expect("writing to String cannot fail");
    writeln!(out, "        </table>").expect("writing to String cannot fail");
}

#[cfg(test)]
mod tests {
    use crate::document::{Block, Card, Document, Page, PageKind, Part, Table};

    use super::render_html;

    #[test]
    fn escapes_text_everywhere() {
        let document = Document {
            title: "Tom & Jerry's <sheet>".to_string(),
            pages: vec![Page {
                kind: PageKind::Summary,
                title: "<b>".to_string(),
                subtitle: "\"quoted\"".to_string(),
                chips: vec!["a&b".to_string()],
                blocks: vec![Block::Card(
                    Card::new("<h1>")
                        .with(Part::List(vec!["<script>".to_string()]))
                        .with(Part::Table(
                            Table::new(["<k>"]).row(["<v>".to_string()]),
                        )),
                )],
            }],
        };
        let html = render_html(&document);

        assert!(html.contains("<title>Tom &amp; Jerry&#x27;s &lt;sheet&gt;</title>"));
        assert!(html.contains("<div class=\"title\">&lt;b&gt;</div>"));
        assert!(html.contains("&quot;quoted&quot;"));
        assert!(html.contains("<div class=\"chip\">a&amp;b</div>"));
        assert!(html.contains("<h3>&lt;h1&gt;</h3>"));
        assert!(html.contains("<li>&lt;script&gt;</li>"));
        assert!(html.contains("<th>&lt;k&gt;</th>"));
        assert!(html.contains("<td>&lt;v&gt;</td>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn empty_document_still_has_head_and_body() {
        let html = render_html(&Document {
            title: "Empty".to_string(),
            pages: Vec::new(),
        });
        assert!(html.starts_with("<!doctype html>\n"));
        assert!(html.contains("<body>\n</body>"));
        assert!(!html.contains("class=\"page\""));
    }
}
