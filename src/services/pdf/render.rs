//! 把排版结果写成 PDF

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

use printpdf::{Mm, PdfDocument};
use tracing::debug;

use super::font::FontSource;
use super::layout::{LaidOutDocument, PlacedLine};
use crate::error::{AppError, AppResult};

const PT_TO_MM: f32 = 25.4 / 72.0;
const LAYER_NAME: &str = "Layer 1";

/// 行内基线位置（从页面底边算起，printpdf 的坐标原点在左下角）
fn baseline_from_bottom(line: &PlacedLine, page_height: f32) -> f32 {
    let font_mm = line.font_size * PT_TO_MM;
    let baseline_from_top = line.y + (line.height + font_mm * 0.7) / 2.0;
    page_height - baseline_from_top
}

pub fn render_pdf(
    doc: &LaidOutDocument,
    font: &FontSource,
    title: &str,
    path: &Path,
) -> AppResult<()> {
    let (pdf, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(doc.page_width),
        Mm(doc.page_height),
        LAYER_NAME,
    );
    let font_ref = pdf.add_external_font(Cursor::new(font.bytes.as_slice()))?;

    for (i, page) in doc.pages.iter().enumerate() {
        let (page_idx, layer_idx) = if i == 0 {
            (first_page, first_layer)
        } else {
            pdf.add_page(Mm(doc.page_width), Mm(doc.page_height), LAYER_NAME)
        };
        let layer = pdf.get_page(page_idx).get_layer(layer_idx);

        for line in &page.lines {
            layer.use_text(
                line.text.as_str(),
                line.font_size,
                Mm(line.x),
                Mm(baseline_from_bottom(line, doc.page_height)),
                &font_ref,
            );
        }
    }

    let file = File::create(path).map_err(|e| AppError::file(path, e))?;
    pdf.save(&mut BufWriter::new(file))?;
    debug!("PDF 已写入: {} ({} 页)", path.display(), doc.page_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineKind;

    #[test]
    fn baseline_sits_inside_its_row() {
        let line = PlacedLine {
            text: "1.題目".to_string(),
            kind: LineKind::Item { number: 1 },
            font_size: 12.0,
            x: 10.0,
            y: 15.0,
            height: 8.0,
        };
        let baseline = baseline_from_bottom(&line, 297.0);
        let row_top = 297.0 - 15.0;
        let row_bottom = 297.0 - 23.0;
        assert!(baseline < row_top && baseline > row_bottom);
    }
}
