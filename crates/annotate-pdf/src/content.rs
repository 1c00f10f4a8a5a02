//! Content-stream text walker.
//!
//! Interprets the text-positioning and text-showing operators of a page's
//! content stream and yields positioned runs, grouped into baseline lines.
//! Glyph metrics are not consulted: run widths are estimated from the font
//! size, which is accurate enough to slice a line box proportionally for
//! highlighting.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use compare_engine::CompareError;

/// Average glyph advance as a fraction of the font size (roman text).
const GLYPH_WIDTH_RATIO: f64 = 0.5;
/// Runs whose baselines differ by no more than this many points share a line.
const LINE_TOLERANCE: f64 = 2.0;
/// Horizontal gap (relative to font size) treated as a word break when
/// concatenating runs.
const WORD_GAP_RATIO: f64 = 0.3;

/// A run of text positioned at its baseline origin in page user space.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub font_size: f64,
}

/// Runs on one baseline, concatenated left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    /// Baseline y.
    pub y: f64,
    pub font_size: f64,
}

/// PDF text-space matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy)]
struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other` in PDF row-vector convention.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }
}

/// The subset of text state the walker needs.
struct TextState {
    font_size: f64,
    leading: f64,
    text_matrix: Matrix,
    line_matrix: Matrix,
}

impl TextState {
    fn new() -> Self {
        Self {
            font_size: 12.0,
            leading: 0.0,
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
        }
    }

    fn begin_text(&mut self) {
        self.text_matrix = Matrix::IDENTITY;
        self.line_matrix = Matrix::IDENTITY;
    }

    /// `Td`: displace the line matrix and restart the text matrix there.
    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn set_matrix(&mut self, m: Matrix) {
        self.line_matrix = m;
        self.text_matrix = m;
    }

    fn effective_font_size(&self) -> f64 {
        let scale = self.text_matrix.d.abs();
        if scale > 0.0 {
            self.font_size * scale
        } else {
            self.font_size
        }
    }

    fn show_text(&mut self, runs: &mut Vec<TextRun>, text: String) {
        if text.is_empty() {
            return;
        }
        // Advance in text space; width in device space.
        let advance = text.chars().count() as f64 * self.font_size * GLYPH_WIDTH_RATIO;
        let h_scale = self.text_matrix.a.abs();
        let width = advance * if h_scale > 0.0 { h_scale } else { 1.0 };

        runs.push(TextRun {
            text,
            x: self.text_matrix.e,
            y: self.text_matrix.f,
            width,
            font_size: self.effective_font_size(),
        });
        self.text_matrix = Matrix::translation(advance, 0.0).multiply(&self.text_matrix);
    }

    /// `TJ`: strings interleaved with kerning adjustments. Large negative
    /// adjustments are word gaps.
    fn show_text_array(&mut self, runs: &mut Vec<TextRun>, items: &[Object]) {
        let mut text = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => text.push_str(&decode_text_bytes(bytes)),
                Object::Integer(n) if *n < -100 => text.push(' '),
                Object::Real(r) if *r < -100.0 => text.push(' '),
                _ => {}
            }
        }
        self.show_text(runs, text);
    }
}

/// All positioned text runs of a page, in stream order.
///
/// A page without a content stream yields no runs; an undecodable stream is
/// treated as document corruption.
pub fn page_text_runs(doc: &Document, page_id: ObjectId) -> Result<Vec<TextRun>, CompareError> {
    let content = match doc.get_page_content(page_id) {
        Ok(content) => content,
        Err(_) => return Ok(Vec::new()),
    };
    let operations = Content::decode(&content)
        .map_err(|e| CompareError::CorruptDocument(format!("content stream: {e}")))?;

    let mut state = TextState::new();
    let mut runs = Vec::new();

    for op in operations.operations {
        match op.operator.as_str() {
            "BT" => state.begin_text(),
            "Tf" => {
                if let Some(size) = op.operands.get(1).and_then(operand_number) {
                    state.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(operand_number) {
                    state.leading = leading;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (
                    op.operands.first().and_then(operand_number),
                    op.operands.get(1).and_then(operand_number),
                ) {
                    state.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (
                    op.operands.first().and_then(operand_number),
                    op.operands.get(1).and_then(operand_number),
                ) {
                    state.leading = -ty;
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                let n: Vec<f64> = op.operands.iter().filter_map(operand_number).collect();
                if n.len() == 6 {
                    state.set_matrix(Matrix {
                        a: n[0],
                        b: n[1],
                        c: n[2],
                        d: n[3],
                        e: n[4],
                        f: n[5],
                    });
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    state.show_text(&mut runs, decode_text_bytes(bytes));
                }
            }
            "'" => {
                state.next_line();
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    state.show_text(&mut runs, decode_text_bytes(bytes));
                }
            }
            "\"" => {
                state.next_line();
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    state.show_text(&mut runs, decode_text_bytes(bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    state.show_text_array(&mut runs, items);
                }
            }
            _ => {}
        }
    }

    Ok(runs)
}

/// Baseline-grouped lines of a page, top to bottom.
pub fn page_text_lines(doc: &Document, page_id: ObjectId) -> Result<Vec<TextLine>, CompareError> {
    Ok(group_into_lines(page_text_runs(doc, page_id)?))
}

fn group_into_lines(runs: Vec<TextRun>) -> Vec<TextLine> {
    let mut buckets: Vec<(f64, Vec<TextRun>)> = Vec::new();
    for run in runs {
        match buckets
            .iter_mut()
            .find(|(y, _)| (*y - run.y).abs() <= LINE_TOLERANCE)
        {
            Some((_, bucket)) => bucket.push(run),
            None => buckets.push((run.y, vec![run])),
        }
    }
    buckets.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut lines = Vec::with_capacity(buckets.len());
    for (y, mut bucket) in buckets {
        bucket.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let font_size = bucket.iter().map(|r| r.font_size).fold(0.0, f64::max);
        let x0 = bucket.first().map(|r| r.x).unwrap_or(0.0);
        let mut x1 = x0;
        let mut text = String::new();
        let mut cursor: Option<f64> = None;

        for run in &bucket {
            if let Some(end) = cursor {
                let gap = run.x - end;
                if gap > WORD_GAP_RATIO * font_size
                    && !text.ends_with(' ')
                    && !run.text.starts_with(' ')
                {
                    text.push(' ');
                }
            }
            text.push_str(&run.text);
            cursor = Some(run.x + run.width);
            x1 = x1.max(run.x + run.width);
        }

        lines.push(TextLine {
            text,
            x0,
            x1,
            y,
            font_size,
        });
    }
    lines
}

/// Decode a PDF string: UTF-8, then UTF-16BE (BOM), then Latin-1.
fn decode_text_bytes(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|chunk| {
                if chunk.len() == 2 {
                    Some(u16::from_be_bytes([chunk[0], chunk[1]]))
                } else {
                    None
                }
            })
            .collect();
        if let Ok(s) = String::from_utf16(&units) {
            return s;
        }
    }
    bytes.iter().map(|&b| b as char).collect()
}

fn operand_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Dictionary, Stream};
    use pretty_assertions::assert_eq;

    /// One-page document with the given raw content stream.
    fn doc_with_content(content: &str) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let content_id = doc.add_object(Object::Stream(Stream::new(
            Dictionary::new(),
            content.as_bytes().to_vec(),
        )));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
        });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        (doc, page_id)
    }

    #[test]
    fn test_single_run_position() {
        let (doc, page_id) = doc_with_content("BT /F1 12 Tf 50 700 Td (Hello World) Tj ET");
        let runs = page_text_runs(&doc, page_id).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello World");
        assert_eq!(runs[0].x, 50.0);
        assert_eq!(runs[0].y, 700.0);
        assert_eq!(runs[0].font_size, 12.0);
    }

    #[test]
    fn test_relative_td_moves_lines() {
        let (doc, page_id) =
            doc_with_content("BT /F1 12 Tf 50 700 Td (Line one) Tj 0 -20 Td (Line two) Tj ET");
        let lines = page_text_lines(&doc, page_id).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Line one");
        assert_eq!(lines[0].y, 700.0);
        assert_eq!(lines[1].text, "Line two");
        assert_eq!(lines[1].y, 680.0);
    }

    #[test]
    fn test_tm_sets_absolute_position() {
        let (doc, page_id) = doc_with_content("BT /F1 12 Tf 1 0 0 1 100 500 Tm (Centered) Tj ET");
        let runs = page_text_runs(&doc, page_id).unwrap();
        assert_eq!(runs[0].x, 100.0);
        assert_eq!(runs[0].y, 500.0);
    }

    #[test]
    fn test_tj_array_with_kerning_gap() {
        let (doc, page_id) =
            doc_with_content("BT /F1 10 Tf 40 600 Td [(Amount:) -250 (100)] TJ ET");
        let runs = page_text_runs(&doc, page_id).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Amount: 100");
    }

    #[test]
    fn test_t_star_uses_leading() {
        let (doc, page_id) =
            doc_with_content("BT /F1 12 Tf 14 TL 50 700 Td (First) Tj T* (Second) Tj ET");
        let lines = page_text_lines(&doc, page_id).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].y, 686.0);
    }

    #[test]
    fn test_runs_on_same_baseline_group_into_one_line() {
        let (doc, page_id) = doc_with_content(
            "BT /F1 12 Tf 50 700 Td (Left) Tj ET BT /F1 12 Tf 200 700 Td (Right) Tj ET",
        );
        let lines = page_text_lines(&doc, page_id).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Left Right");
        assert_eq!(lines[0].x0, 50.0);
        assert!(lines[0].x1 > 200.0);
    }

    #[test]
    fn test_page_without_content_has_no_runs() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        let runs = page_text_runs(&doc, page_id).unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn test_latin1_fallback_decoding() {
        assert_eq!(decode_text_bytes(b"plain"), "plain");
        // 0xE9 is é in Latin-1 and invalid as standalone UTF-8.
        assert_eq!(decode_text_bytes(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }

    #[test]
    fn test_utf16be_decoding() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_bytes(&bytes), "Hi");
    }
}
