//! Minimal PDF 1.4 serializer for laid-out documents.
//!
//! Object layout:
//! - 1: Catalog
//! - 2: Pages tree
//! - 3: Helvetica (base-14, WinAnsiEncoding)
//! - 4: Info
//! - 5.. : per page, a Page object followed by its content stream
//!
//! Output bytes depend only on the document, so identical layouts serialize
//! identically (no creation date is written).

use crate::metrics::text_width_pt;
use hourglass_core::{Align, Document, DrawCommand, Rgb};
use std::fmt::Write as _;
use std::io::{self, Write};
use thiserror::Error;

pub const MM_TO_PT: f64 = 72.0 / 25.4;

const FIRST_PAGE_OBJ: usize = 5;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("document has no pages")]
    NoPages,

    #[error("writing pdf: {0}")]
    Io(#[from] io::Error),
}

/// Map text onto WinAnsi bytes. Latin-1 maps straight through; anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            0x20..=0x7e | 0xa0..=0xff => c as u8,
            0x2013 => 0x96,
            0x2014 => 0x97,
            0x2018 => 0x91,
            0x2019 => 0x92,
            0x201c => 0x93,
            0x201d => 0x94,
            0x2022 => 0x95,
            0x20ac => 0x80,
            _ => b'?',
        })
        .collect()
}

fn escape_literal(bytes: &[u8], out: &mut Vec<u8>) {
    for &b in bytes {
        if matches!(b, b'\\' | b'(' | b')') {
            out.push(b'\\');
        }
        out.push(b);
    }
}

fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn color(c: Rgb) -> String {
    format!(
        "{} {} {}",
        num(f64::from(c.0) / 255.0),
        num(f64::from(c.1) / 255.0),
        num(f64::from(c.2) / 255.0)
    )
}

/// Build the content stream for one page. `page_height` is in millimetres.
pub fn content_stream(commands: &[DrawCommand], page_height: f64) -> Vec<u8> {
    let mut out = Vec::new();
    for cmd in commands {
        match cmd {
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color: c,
            } => {
                let line = format!(
                    "{} rg\n{} {} {} {} re f\n",
                    color(*c),
                    num(x * MM_TO_PT),
                    num((page_height - y - height) * MM_TO_PT),
                    num(width * MM_TO_PT),
                    num(height * MM_TO_PT),
                );
                out.extend_from_slice(line.as_bytes());
            }
            DrawCommand::Text {
                x,
                y,
                text,
                font_size,
                color: c,
                align,
            } => {
                let encoded = encode_win_ansi(text);
                let mut x_pt = x * MM_TO_PT;
                if *align == Align::Center {
                    x_pt -= text_width_pt(&encoded, *font_size) / 2.0;
                }
                let head = format!(
                    "BT\n{} rg\n/F1 {} Tf\n{} {} Td\n(",
                    color(*c),
                    num(*font_size),
                    num(x_pt),
                    num((page_height - y) * MM_TO_PT),
                );
                out.extend_from_slice(head.as_bytes());
                escape_literal(&encoded, &mut out);
                out.extend_from_slice(b") Tj\nET\n");
            }
        }
    }
    out
}

struct ObjectWriter<W: Write> {
    inner: W,
    written: usize,
    offsets: Vec<usize>,
}

impl<W: Write> ObjectWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            written: 0,
            offsets: Vec::new(),
        }
    }

    fn raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn object(&mut self, id: usize, body: &[u8]) -> io::Result<()> {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.written);
        self.raw(format!("{id} 0 obj\n").as_bytes())?;
        self.raw(body)?;
        self.raw(b"\nendobj\n")
    }

    fn stream(&mut self, id: usize, data: &[u8]) -> io::Result<()> {
        let mut body = format!("<< /Length {} >>\nstream\n", data.len()).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.object(id, &body)
    }

    fn finish(mut self, info_id: usize) -> io::Result<W> {
        let xref_at = self.written;
        let count = self.offsets.len() + 1;
        let mut xref = format!("xref\n0 {count}\n0000000000 65535 f \n");
        for off in &self.offsets {
            // each entry is exactly 20 bytes including the EOL
            let _ = writeln!(xref, "{off:010} 00000 n ");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {count} /Root 1 0 R /Info {info_id} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
        );
        self.raw(xref.as_bytes())?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

fn literal(text: &str) -> Vec<u8> {
    let mut out = vec![b'('];
    escape_literal(&encode_win_ansi(text), &mut out);
    out.push(b')');
    out
}

/// Serialize `doc` into `sink`.
pub fn write_pdf<W: Write>(doc: &Document, producer: &str, sink: W) -> Result<W, PdfError> {
    if doc.pages.is_empty() {
        return Err(PdfError::NoPages);
    }

    let width_pt = num(doc.width * MM_TO_PT);
    let height_pt = num(doc.height * MM_TO_PT);
    let page_ids: Vec<usize> = (0..doc.pages.len())
        .map(|i| FIRST_PAGE_OBJ + i * 2)
        .collect();

    let mut w = ObjectWriter::new(sink);
    w.raw(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n")?;

    w.object(1, b"<< /Type /Catalog /Pages 2 0 R >>")?;

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
    w.object(
        2,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_ids.len()
        )
        .as_bytes(),
    )?;

    w.object(
        3,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    )?;

    let mut info = b"<< /Title ".to_vec();
    info.extend(literal(hourglass_core::layout::TITLE));
    info.extend_from_slice(b" /Producer ");
    info.extend(literal(producer));
    info.extend_from_slice(b" >>");
    w.object(4, &info)?;

    for (page, id) in doc.pages.iter().zip(&page_ids) {
        let body = format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width_pt} {height_pt}] \
/Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            id + 1
        );
        w.object(*id, body.as_bytes())?;
        w.stream(id + 1, &content_stream(&page.commands, doc.height))?;
    }

    Ok(w.finish(4)?)
}

pub fn render_pdf(doc: &Document, producer: &str) -> Result<Vec<u8>, PdfError> {
    write_pdf(doc, producer, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(28.346456), "28.35");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn encodes_latin1_and_replaces_the_rest() {
        assert_eq!(encode_win_ansi("café"), b"caf\xe9".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
        assert_eq!(encode_win_ansi("a–b"), b"a\x96b".to_vec());
    }

    #[test]
    fn escapes_parens_and_backslash() {
        assert_eq!(literal(r"a(b)\c"), br"(a\(b\)\\c)".to_vec());
    }

    #[test]
    fn rect_flips_y_axis() {
        let cmds = [DrawCommand::FillRect {
            x: 10.0,
            y: 0.0,
            width: 25.4,
            height: 25.4,
            color: Rgb::BLACK,
        }];
        let s = String::from_utf8(content_stream(&cmds, 297.0)).unwrap();
        // (297 - 0 - 25.4) mm = 271.6 mm = 769.89 pt
        assert!(s.contains("0 0 0 rg"));
        assert!(s.contains("28.35 769.89 72 72 re f"), "{s}");
    }

    #[test]
    fn centred_text_shifts_left_by_half_width() {
        let cmds = [DrawCommand::Text {
            x: 25.4,
            y: 297.0,
            text: "Hours".into(),
            font_size: 20.0,
            color: Rgb::WHITE,
            align: Align::Center,
        }];
        let s = String::from_utf8(content_stream(&cmds, 297.0)).unwrap();
        // 72 - 53.34 / 2 = 45.33
        assert!(s.contains("45.33 0 Td"), "{s}");
        assert!(s.contains("1 1 1 rg"));
        assert!(s.contains("(Hours) Tj"));
    }
}
