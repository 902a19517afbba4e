//! PDF writer for captured regions. Uses the built-in Helvetica faces so the
//! capture metrics match what is drawn.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, Point, Polygon, Pt,
    Rgb as PdfRgb,
};

use crate::export::{ExportError, PX_TO_PT};
use crate::layout::font_metrics::{win_ansi_code, FontFace};
use crate::layout::{PaintItem, RenderedRegion};
use crate::templates::document::Rgb;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        rgb.0 as f32 / 255.0,
        rgb.1 as f32 / 255.0,
        rgb.2 as f32 / 255.0,
        None,
    ))
}

fn mm(px: f32) -> Mm {
    Mm::from(Pt(px * PX_TO_PT))
}

/// Built-in PDF fonts are WinAnsi encoded; characters without a code are replaced.
fn encodable(text: &str) -> String {
    text.chars()
        .map(|c| if win_ansi_code(c).is_some() { c } else { '?' })
        .collect()
}

pub fn write_pdf(region: &RenderedRegion, title: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        title,
        mm(region.width_px),
        mm(region.height_px),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Font(format!("{e:?}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Font(format!("{e:?}")))?;
    let layer = doc.get_page(page).get_layer(layer);

    // PDF space grows upwards from the bottom-left corner.
    let flip = |y_px: f32| mm(region.height_px - y_px);

    layer.set_fill_color(color(region.background));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(mm(0.0), mm(0.0)), false),
            (Point::new(mm(region.width_px), mm(0.0)), false),
            (Point::new(mm(region.width_px), mm(region.height_px)), false),
            (Point::new(mm(0.0), mm(region.height_px)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });

    for item in &region.items {
        match item {
            PaintItem::Text {
                x,
                baseline,
                size_px,
                face,
                color: rgb,
                text,
            } => {
                let font: &IndirectFontRef = match face {
                    FontFace::Regular => &regular,
                    FontFace::Bold => &bold,
                };
                layer.set_fill_color(color(*rgb));
                layer.use_text(
                    encodable(text),
                    size_px * PX_TO_PT,
                    mm(*x),
                    flip(*baseline),
                    font,
                );
            }
            PaintItem::Rule {
                x1,
                x2,
                y,
                thickness,
                color: rgb,
            } => {
                layer.set_outline_color(color(*rgb));
                layer.set_outline_thickness(thickness * PX_TO_PT);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(mm(*x1), flip(*y)), false),
                        (Point::new(mm(*x2), flip(*y)), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Encode(format!("{e:?}")))
}
