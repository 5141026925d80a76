// Resume rendering: JSON resume → A4 PDF.
// Drawing is CPU-bound and must run inside tokio::task::spawn_blocking
// (see `render_blocking`).

pub mod layout;
pub mod metrics;

use std::io::BufWriter;
use std::sync::Arc;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use serde_json::Value;
use thiserror::Error;

use self::layout::{document_title, layout_resume, Paragraph};
use self::metrics::wrap_text;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
/// 0.5"
const MARGIN_VERTICAL_MM: f32 = 12.7;
/// 0.75"
const MARGIN_SIDE_MM: f32 = 19.05;
const LINE_SPACING: f32 = 1.25;
const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Renders a structured resume into a printable document.
pub trait ResumeRenderer: Send + Sync {
    fn render(&self, resume: &Value) -> Result<Vec<u8>, RenderError>;
}

/// Runs a renderer on the blocking pool.
pub async fn render_blocking(
    renderer: Arc<dyn ResumeRenderer>,
    resume: Value,
) -> Result<Vec<u8>, RenderError> {
    tokio::task::spawn_blocking(move || renderer.render(&resume))
        .await
        .map_err(|e| RenderError::Task(e.to_string()))?
}

/// Single-column A4 resume using the built-in Helvetica faces.
pub struct PdfRenderer;

impl ResumeRenderer for PdfRenderer {
    fn render(&self, resume: &Value) -> Result<Vec<u8>, RenderError> {
        let paragraphs = layout_resume(resume);
        draw(&document_title(resume), &paragraphs)
    }
}

fn draw(title: &str, paragraphs: &[Paragraph]) -> Result<Vec<u8>, RenderError> {
    let (doc, page1, layer1) = PdfDocument::new(
        pdf_safe(title),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?;

    let mut layer: PdfLayerReference = doc.get_page(page1).get_layer(layer1);
    let mut y = PAGE_HEIGHT_MM - MARGIN_VERTICAL_MM;
    let text_width_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_SIDE_MM;

    for paragraph in paragraphs {
        let style = paragraph.style;
        let size = style.font_size();
        let line_height = size * LINE_SPACING / PT_PER_MM;
        let indent = style.indent_mm();
        let font: &IndirectFontRef = if style.bold() { &bold } else { &regular };

        y -= style.space_before_pt() / PT_PER_MM;
        let width_pt = (text_width_mm - indent) * PT_PER_MM;

        for line in wrap_text(&pdf_safe(&paragraph.text), size, width_pt, style.bold()) {
            if y - line_height < MARGIN_VERTICAL_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = PAGE_HEIGHT_MM - MARGIN_VERTICAL_MM;
            }
            y -= line_height;
            layer.use_text(line, size, Mm(MARGIN_SIDE_MM + indent), Mm(y), font);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| RenderError::Pdf(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| RenderError::Pdf(format!("PDF buffer error: {e}")))
}

/// Built-in PDF fonts only cover a single-byte charset; typographic
/// punctuation is folded to ASCII and anything else becomes '?'.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            c if c.is_ascii() && !c.is_ascii_control() => c,
            '\t' | '\n' | '\r' => ' ',
            '•' | '·' | '–' | '—' | '‐' | '−' => '-',
            '‘' | '’' | '′' => '\'',
            '“' | '”' | '″' => '"',
            '\u{a0}' => ' ',
            _ => '?',
        })
        .collect()
}
