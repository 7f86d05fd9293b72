//! Shared helpers for integration tests.
//!
//! Builds small `.xlsx` workbooks in memory so tests never depend on binary
//! fixtures, and reads produced archives back into `(name, content)` pairs.

#![allow(dead_code)]

use sheet_vcf_bot::models::{Chat, Document, Message, Update, User};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// A single worksheet cell.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

/// Text cell.
pub fn t(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

/// Numeric cell.
pub fn n(value: f64) -> Cell {
    Cell::Number(value)
}

/// Missing cell.
pub fn e() -> Cell {
    Cell::Empty
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Contacts" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn column_letter(index: usize) -> char {
    assert!(index < 26, "test workbooks support up to 26 columns");
    (b'A' + index as u8) as char
}

fn sheet_xml(rows: &[Vec<Cell>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    for (r, row) in rows.iter().enumerate() {
        let row_number = r + 1;
        xml.push_str(&format!(r#"<row r="{}">"#, row_number));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letter(c), row_number);
            match cell {
                Cell::Text(value) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    reference,
                    escape_xml(value)
                )),
                Cell::Number(value) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value))
                }
                Cell::Empty => {}
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Build an `.xlsx` workbook whose first sheet holds `rows`.
pub fn workbook(rows: &[Vec<Cell>]) -> Vec<u8> {
    let sheet = sheet_xml(rows);
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", sheet.as_str()),
    ];

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in parts {
        writer.start_file(name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Build a workbook with the standard `Names, Phone, Cat` header.
pub fn contacts_workbook(rows: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut sheet = vec![vec![t("Names"), t("Phone"), t("Cat")]];
    for (name, phone, category) in rows {
        sheet.push(
            [name, phone, category]
                .iter()
                .map(|value| if value.is_empty() { e() } else { t(value) })
                .collect(),
        );
    }
    workbook(&sheet)
}

/// Read an archive back as `(entry name, entry text)` pairs in stored order.
pub fn read_archive(bytes: &[u8]) -> Vec<(String, String)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            (entry.name().to_string(), content)
        })
        .collect()
}

/// A private-chat message from user 7 in chat 100.
pub fn private_message(message_id: i64) -> Message {
    Message {
        message_id,
        from: Some(User {
            id: 7,
            first_name: "Sara".to_string(),
            ..Default::default()
        }),
        chat: Chat {
            id: 100,
            kind: "private".to_string(),
        },
        text: None,
        caption: None,
        document: None,
    }
}

/// An update carrying a text message.
pub fn text_update(update_id: i64, text: &str) -> Update {
    let mut message = private_message(update_id * 10);
    message.text = Some(text.to_string());
    Update {
        update_id,
        message: Some(message),
    }
}

/// An update carrying an uploaded document.
pub fn document_update(update_id: i64, file_id: &str, file_name: &str, size: u64) -> Update {
    let mut message = private_message(update_id * 10);
    message.document = Some(Document {
        file_id: file_id.to_string(),
        file_name: Some(file_name.to_string()),
        mime_type: None,
        file_size: Some(size),
    });
    Update {
        update_id,
        message: Some(message),
    }
}
