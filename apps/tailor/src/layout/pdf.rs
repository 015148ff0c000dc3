//! Serializes a `RenderedDocument` into PDF bytes with lopdf.
//!
//! Fonts are the base-14 Helvetica pair with WinAnsiEncoding, so nothing is
//! embedded. Runs are stored top-down and flipped into PDF user space here.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::layout::font_metrics::FontWeight;
use crate::layout::sink::{RenderedDocument, RenderedPage, SinkError};

pub fn write_pdf(rendered: &RenderedDocument) -> Result<Vec<u8>, SinkError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = add_font(&mut doc, FontWeight::Normal);
    let bold_id = add_font(&mut doc, FontWeight::Bold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontWeight::Normal.resource_name() => regular_id,
            FontWeight::Bold.resource_name() => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(rendered.pages.len());
    for page in &rendered.pages {
        let content = page_content(page, rendered.page_height);
        let encoded = content
            .encode()
            .map_err(|e| SinkError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(rendered.page_width),
                Object::Real(rendered.page_height),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| SinkError::Serialize(e.to_string()))?;
    Ok(buffer)
}

fn add_font(doc: &mut Document, weight: FontWeight) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => weight.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

fn page_content(page: &RenderedPage, page_height: f32) -> Content {
    let mut operations = Vec::with_capacity(page.runs.len() * 5);
    for run in &page.runs {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(run.weight.resource_name().as_bytes().to_vec()),
                Object::Real(run.font_size),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(run.x), Object::Real(page_height - run.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_win_ansi(&run.text),
                StringFormat::Literal,
            )],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

/// Maps text onto WinAnsiEncoding bytes. Unmappable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::sink::TextRun;

    fn doc_with_pages(n: usize) -> RenderedDocument {
        let pages = (0..n)
            .map(|i| RenderedPage {
                runs: vec![TextRun {
                    text: format!("Page {} (draft)", i + 1),
                    x: 50.0,
                    y: 50.0,
                    font_size: 11.0,
                    weight: FontWeight::Normal,
                }],
            })
            .collect();
        RenderedDocument {
            page_width: 595.28,
            page_height: 841.89,
            pages,
        }
    }

    #[test]
    fn test_write_pdf_has_header_and_page_count() {
        let bytes = write_pdf(&doc_with_pages(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn test_encode_win_ansi_maps_bullet_and_quotes() {
        assert_eq!(encode_win_ansi("\u{2022} Go"), vec![0x95, b' ', b'G', b'o']);
        assert_eq!(encode_win_ansi("\u{2019}"), vec![0x92]);
        assert_eq!(encode_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("\u{4E2D}"), vec![b'?']);
    }
}
