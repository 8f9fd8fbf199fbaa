/// Raster drawing primitives for the collage canvas
///
/// Everything draws directly into an `RgbaImage`. Shapes are painted
/// opaque; glyphs are alpha-blended using the rasterizer's coverage.
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

/// Fill an axis-aligned rectangle, clamped to the canvas
pub fn fill_rect(img: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, color: Rgba<u8>) {
    for py in y.max(0)..(y + h as i32).min(img.height() as i32) {
        for px in x.max(0)..(x + w as i32).min(img.width() as i32) {
            img.put_pixel(px as u32, py as u32, color);
        }
    }
}

/// Fill a circle centered at (cx, cy)
pub fn fill_circle(img: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
    let x0 = ((cx - radius).floor() as i32).max(0);
    let x1 = (((cx + radius).ceil() as i32) + 1).min(img.width() as i32);
    let y0 = ((cy - radius).floor() as i32).max(0);
    let y1 = (((cy + radius).ceil() as i32) + 1).min(img.height() as i32);

    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Whether local pixel (x, y) lies inside a w×h rounded rectangle
/// with corner radius r
pub fn rounded_rect_contains(x: i32, y: i32, w: i32, h: i32, r: i32) -> bool {
    if x < 0 || y < 0 || x >= w || y >= h {
        return false;
    }
    if x >= r && x < w - r {
        return true;
    }
    if y >= r && y < h - r {
        return true;
    }
    let (cx, cy) = if x < r {
        if y < r {
            (r - 1, r - 1)
        } else {
            (r - 1, h - r)
        }
    } else if y < r {
        (w - r, r - 1)
    } else {
        (w - r, h - r)
    };
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

/// Fill a rounded rectangle
pub fn fill_rounded_rect(
    img: &mut RgbaImage,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radius: f32,
    color: Rgba<u8>,
) {
    let (x0, y0) = (x.round() as i32, y.round() as i32);
    let (wi, hi) = (w.round() as i32, h.round() as i32);
    let r = radius.round() as i32;
    for ly in 0..hi {
        for lx in 0..wi {
            if rounded_rect_contains(lx, ly, wi, hi, r) {
                let (px, py) = (x0 + lx, y0 + ly);
                if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                    img.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

/// Stroke the outline of a rounded rectangle with the given width
pub fn stroke_rounded_rect(
    img: &mut RgbaImage,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radius: f32,
    stroke: f32,
    color: Rgba<u8>,
) {
    let (x0, y0) = (x.round() as i32, y.round() as i32);
    let (wi, hi) = (w.round() as i32, h.round() as i32);
    let r = radius.round() as i32;
    let s = stroke.round() as i32;
    let inner_r = (r - s).max(0);

    for ly in 0..hi {
        for lx in 0..wi {
            if !rounded_rect_contains(lx, ly, wi, hi, r) {
                continue;
            }
            let inside_inner =
                rounded_rect_contains(lx - s, ly - s, wi - 2 * s, hi - 2 * s, inner_r);
            if inside_inner {
                continue;
            }
            let (px, py) = (x0 + lx, y0 + ly);
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Cover-fit scale factor for a source image into a square cell:
/// the smallest uniform scale that leaves no unfilled cell pixels
pub fn cover_scale(src_w: u32, src_h: u32, cell: f32) -> f32 {
    (cell / src_w as f32).max(cell / src_h as f32)
}

/// Draw a source image into a square cell at (x, y): cover-fit scaled,
/// centered, and clipped to a rounded-rectangle mask
pub fn blit_cover_rounded(
    img: &mut RgbaImage,
    src: &RgbaImage,
    x: f32,
    y: f32,
    cell: f32,
    radius: f32,
) {
    let scale = cover_scale(src.width(), src.height(), cell);
    let scaled_w = ((src.width() as f32 * scale).round() as u32).max(1);
    let scaled_h = ((src.height() as f32 * scale).round() as u32).max(1);
    let scaled = image::imageops::resize(src, scaled_w, scaled_h, FilterType::Lanczos3);

    // Center the overflow, then clip to the cell
    let off_x = (scaled_w as f32 - cell) / 2.0;
    let off_y = (scaled_h as f32 - cell) / 2.0;

    let (x0, y0) = (x.round() as i32, y.round() as i32);
    let side = cell.round() as i32;
    let r = radius.round() as i32;

    for ly in 0..side {
        for lx in 0..side {
            if !rounded_rect_contains(lx, ly, side, side, r) {
                continue;
            }
            let sx = (lx as f32 + off_x).round() as i32;
            let sy = (ly as f32 + off_y).round() as i32;
            let sx = sx.clamp(0, scaled_w as i32 - 1) as u32;
            let sy = sy.clamp(0, scaled_h as i32 - 1) as u32;

            let (px, py) = (x0 + lx, y0 + ly);
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, *scaled.get_pixel(sx, sy));
            }
        }
    }
}

/// Measured advance width of `text` at `px` pixels
pub fn text_width(font: &Font<'_>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    font.glyphs_for(text.chars())
        .scan(None, |last, glyph| {
            let glyph = glyph.scaled(scale);
            let mut advance = glyph.h_metrics().advance_width;
            if let Some(prev) = last.replace(glyph.id()) {
                advance += font.pair_kerning(scale, prev, glyph.id());
            }
            Some(advance)
        })
        .sum()
}

/// Draw text with its baseline at `baseline_y`, left edge at `x`,
/// alpha-blending glyph coverage over the canvas
pub fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'_>,
    px: f32,
    x: f32,
    baseline_y: f32,
    color: Rgba<u8>,
    text: &str,
) {
    let scale = Scale::uniform(px);
    for glyph in font.layout(text, scale, point(x, baseline_y)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 || px as u32 >= img.width() || py as u32 >= img.height() {
                return;
            }
            let alpha = coverage.clamp(0.0, 1.0);
            if alpha <= 0.0 {
                return;
            }
            let dst = img.get_pixel_mut(px as u32, py as u32);
            let inv = 1.0 - alpha;
            for c in 0..3 {
                dst.0[c] = (color.0[c] as f32 * alpha + dst.0[c] as f32 * inv) as u8;
            }
            dst.0[3] = 255;
        });
    }
}

/// Draw text horizontally centered on `cx`, baseline at `baseline_y`
pub fn draw_text_centered(
    img: &mut RgbaImage,
    font: &Font<'_>,
    px: f32,
    cx: f32,
    baseline_y: f32,
    color: Rgba<u8>,
    text: &str,
) {
    let width = text_width(font, px, text);
    draw_text(img, font, px, cx - width / 2.0, baseline_y, color, text);
}
