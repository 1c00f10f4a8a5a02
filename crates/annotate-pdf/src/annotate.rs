//! The mutable annotation target over a lopdf document.

use compare_engine::{AnnotateTarget, CompareError};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use shared_types::{Point, Rect, Rgb};

use crate::content::{self, TextLine};
use crate::search;

/// Stroke opacity for highlight annotations.
const HIGHLIGHT_OPACITY: f32 = 0.4;
/// Sticky-note icon box edge, in points.
const NOTE_ICON_SIZE: f64 = 18.0;
/// Deletion markers are red.
const MARKER_COLOR: Rgb = Rgb::new(0.8, 0.0, 0.0);

/// A parsed new-version document plus its walked text, owned exclusively for
/// the duration of one comparison.
pub struct PdfTarget {
    doc: Document,
    page_ids: Vec<ObjectId>,
    page_lines: Vec<Vec<TextLine>>,
}

impl PdfTarget {
    pub fn load(pdf_bytes: &[u8]) -> Result<Self, CompareError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| CompareError::CorruptDocument(e.to_string()))?;
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

        // Walk text once up front; search hits the cache.
        let mut page_lines = Vec::with_capacity(page_ids.len());
        for &page_id in &page_ids {
            page_lines.push(content::page_text_lines(&doc, page_id)?);
        }
        tracing::debug!(
            pages = page_ids.len(),
            lines = page_lines.iter().map(Vec::len).sum::<usize>(),
            "walked document text"
        );

        Ok(Self {
            doc,
            page_ids,
            page_lines,
        })
    }

    fn page_id(&self, page: u32) -> Result<ObjectId, CompareError> {
        page.checked_sub(1)
            .and_then(|idx| self.page_ids.get(idx as usize))
            .copied()
            .ok_or_else(|| CompareError::Annotation(format!("page {page} out of range")))
    }

    fn page_height(&self, page: u32) -> f64 {
        let Ok(page_id) = self.page_id(page) else {
            return 792.0;
        };
        self.doc
            .get_object(page_id)
            .ok()
            .and_then(|obj| obj.as_dict().ok())
            .and_then(|dict| dict.get(b"MediaBox").ok())
            .and_then(|media_box| media_box.as_array().ok())
            .and_then(|arr| arr.get(3))
            .and_then(|top| match top {
                Object::Integer(i) => Some(*i as f64),
                Object::Real(r) => Some(f64::from(*r)),
                _ => None,
            })
            .unwrap_or(792.0)
    }

    fn push_annotation(&mut self, page: u32, annot: Dictionary) -> Result<(), CompareError> {
        let page_id = self.page_id(page)?;
        let annot_id = self.doc.add_object(Object::Dictionary(annot));

        let page_obj = self
            .doc
            .get_object_mut(page_id)
            .map_err(|e| CompareError::Annotation(e.to_string()))?;
        if let Object::Dictionary(ref mut page_dict) = page_obj {
            if let Ok(Object::Array(ref mut arr)) = page_dict.get_mut(b"Annots") {
                arr.push(Object::Reference(annot_id));
            } else {
                page_dict.set("Annots", Object::Array(vec![Object::Reference(annot_id)]));
            }
        }
        Ok(())
    }
}

fn rect_array(rect: &Rect) -> Object {
    Object::Array(vec![
        Object::Real(rect.x0 as f32),
        Object::Real(rect.y0 as f32),
        Object::Real(rect.x1 as f32),
        Object::Real(rect.y1 as f32),
    ])
}

fn color_array(color: Rgb) -> Object {
    Object::Array(vec![
        Object::Real(color.r),
        Object::Real(color.g),
        Object::Real(color.b),
    ])
}

impl AnnotateTarget for PdfTarget {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn search_text(&self, page: u32, snippet: &str) -> Result<Vec<Rect>, CompareError> {
        let idx = page
            .checked_sub(1)
            .map(|idx| idx as usize)
            .filter(|idx| *idx < self.page_lines.len())
            .ok_or_else(|| CompareError::Annotation(format!("page {page} out of range")))?;
        Ok(search::search_page(&self.page_lines[idx], snippet))
    }

    fn add_highlight(&mut self, page: u32, rect: Rect, color: Rgb) -> Result<(), CompareError> {
        let mut annot = Dictionary::new();
        annot.set("Type", Object::Name(b"Annot".to_vec()));
        annot.set("Subtype", Object::Name(b"Highlight".to_vec()));
        annot.set("Rect", rect_array(&rect));
        annot.set(
            "QuadPoints",
            Object::Array(vec![
                Object::Real(rect.x0 as f32),
                Object::Real(rect.y1 as f32),
                Object::Real(rect.x1 as f32),
                Object::Real(rect.y1 as f32),
                Object::Real(rect.x0 as f32),
                Object::Real(rect.y0 as f32),
                Object::Real(rect.x1 as f32),
                Object::Real(rect.y0 as f32),
            ]),
        );
        annot.set("C", color_array(color));
        annot.set("CA", Object::Real(HIGHLIGHT_OPACITY));

        self.push_annotation(page, annot)
    }

    fn add_note(&mut self, page: u32, at: Point, text: &str) -> Result<(), CompareError> {
        let mut annot = Dictionary::new();
        annot.set("Type", Object::Name(b"Annot".to_vec()));
        annot.set("Subtype", Object::Name(b"Text".to_vec()));
        annot.set(
            "Rect",
            rect_array(&Rect::new(
                at.x,
                at.y,
                at.x + NOTE_ICON_SIZE,
                at.y + NOTE_ICON_SIZE,
            )),
        );
        annot.set("Name", Object::Name(b"Comment".to_vec()));
        annot.set(
            "Contents",
            Object::String(text.as_bytes().to_vec(), StringFormat::Literal),
        );

        self.push_annotation(page, annot)
    }

    fn add_page_marker(&mut self, page: u32, text: &str) -> Result<(), CompareError> {
        let top = self.page_height(page);
        let mut annot = Dictionary::new();
        annot.set("Type", Object::Name(b"Annot".to_vec()));
        annot.set("Subtype", Object::Name(b"FreeText".to_vec()));
        annot.set(
            "Rect",
            rect_array(&Rect::new(36.0, top - 56.0, 396.0, top - 32.0)),
        );
        annot.set(
            "Contents",
            Object::String(text.as_bytes().to_vec(), StringFormat::Literal),
        );
        let da = format!(
            "/Helvetica 10 Tf {} {} {} rg",
            MARKER_COLOR.r, MARKER_COLOR.g, MARKER_COLOR.b
        );
        annot.set("DA", Object::String(da.into_bytes(), StringFormat::Literal));

        self.push_annotation(page, annot)
    }

    fn save(&mut self) -> Result<Vec<u8>, CompareError> {
        self.doc.compress();
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| CompareError::Serialization(e.to_string()))?;
        Ok(buffer)
    }
}
