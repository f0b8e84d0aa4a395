use std::path::Path;

use ab_glyph::{Font, FontArc, Glyph, Point, ScaleFont};
use color_eyre::eyre::{Context, Result};
use image::{Rgb, RgbImage};
use maplabel_core::Places;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const LABEL_FILL: Rgb<u8> = Rgb([224, 224, 224]);
const MARKER: Rgb<u8> = Rgb([30, 30, 30]);
const GLYPH_INK: Rgb<u8> = Rgb([20, 20, 20]);
const MARGIN: f64 = 16.0;

/// Render every resolved placeable onto a flat raster: a light-grey fill
/// behind its label box, a marker dot, and the label text itself. This is
/// pure CLI glue reproducing `original_source`'s `out.png` debug step; it
/// plays no part in the energy computation.
pub fn render(
    places: &Places,
    visible: &[usize],
    font: &FontArc,
    font_size_px: f32,
    out_path: &Path,
) -> Result<()> {
    if visible.is_empty() {
        return Ok(());
    }

    let mut bounds = places.get(visible[0]).mask_rect();
    for &index in visible {
        bounds = bounds.union(&places.get(index).mask_rect());
    }
    bounds = bounds.inflate(MARGIN);

    let width = bounds.width().ceil().max(1.0) as u32;
    let height = bounds.height().ceil().max(1.0) as u32;
    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);

    let to_pixel = |x: f64, y: f64| -> (i64, i64) {
        (
            (x - bounds.min.x).round() as i64,
            (bounds.max.y - y).round() as i64, // flip: pixel rows grow downward
        )
    };

    for &index in visible {
        let place = places.get(index);
        let label = place.label_rect();
        let (x0, y0) = to_pixel(label.min.x, label.max.y);
        let (x1, y1) = to_pixel(label.max.x, label.min.y);
        fill_rect(&mut image, x0, y0, x1, y1, LABEL_FILL);

        let anchor = place.header().anchor;
        let (ax, ay) = to_pixel(anchor.x, anchor.y);
        fill_rect(&mut image, ax - 2, ay - 2, ax + 2, ay + 2, MARKER);

        draw_text(&mut image, font, font_size_px, place.display_name(), x0 + 2, y0 + 2);
    }

    image
        .save(out_path)
        .wrap_err_with(|| format!("writing preview to {}", out_path.display()))
}

fn fill_rect(image: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    let (x0, x1) = (x0.min(x1), x0.max(x1));
    let (y0, y1) = (y0.min(y1), y0.max(y1));
    for y in y0.max(0)..y1.min(image.height() as i64) {
        for x in x0.max(0)..x1.min(image.width() as i64) {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Rasterize `text` at `(x, y)` (top-left of the line) using `ab_glyph`'s
/// outline drawing callback, blending glyph coverage onto the image.
fn draw_text(image: &mut RgbImage, font: &FontArc, size_px: f32, text: &str, x: i64, y: i64) {
    let scaled = font.as_scaled(size_px);
    let mut cursor = x as f32;
    let baseline = y as f32 + scaled.ascent();

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        let glyph = Glyph {
            id: glyph_id,
            scale: scaled.scale(),
            position: Point { x: cursor, y: baseline },
        };
        if let Some(outlined) = scaled.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if px >= 0 && py >= 0 && (px as u32) < image.width() && (py as u32) < image.height() {
                    let existing = image.get_pixel(px as u32, py as u32);
                    let blended = blend(*existing, GLYPH_INK, coverage);
                    image.put_pixel(px as u32, py as u32, blended);
                }
            });
        }
        cursor += scaled.h_advance(glyph_id);
    }
}

fn blend(background: Rgb<u8>, ink: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let mix = |b: u8, i: u8| -> u8 {
        (b as f32 * (1.0 - coverage) + i as f32 * coverage).round() as u8
    };
    Rgb([
        mix(background.0[0], ink.0[0]),
        mix(background.0[1], ink.0[1]),
        mix(background.0[2], ink.0[2]),
    ])
}
