/// The collage renderer
///
/// Takes the registered identity and the filled gallery and produces
/// one flattened certificate image: a header banner, a row-major grid
/// of cover-fit thumbnails with numbered badges, and a footer with the
/// confirmation time and point count.
///
/// Slot photos are decoded concurrently; the footer is only drawn after
/// the decode join has settled for every slot. A slot whose decode
/// fails or misses the deadline degrades to a placeholder cell and is
/// reported in the outcome instead of hanging the export.
use chrono::Local;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgba, RgbaImage};
use rusttype::Font;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};

use super::layout::CollageLayout;
use super::{draw, font};
use crate::error::{Error, Result};
use crate::state::data::{Gallery, Identity};

/// JPEG quality of the exported certificate
pub const EXPORT_QUALITY: u8 = 85;

/// Shared deadline for the whole decode join
pub const DECODE_TIMEOUT: Duration = Duration::from_secs(10);

// Palette
const BACKGROUND: Rgba<u8> = Rgba([254, 242, 242, 255]);
const ACCENT: Rgba<u8> = Rgba([220, 38, 38, 255]);
const CELL_BORDER: Rgba<u8> = Rgba([254, 226, 226, 255]);
const PLACEHOLDER: Rgba<u8> = Rgba([226, 232, 240, 255]);
const FOOTER_PRIMARY: Rgba<u8> = Rgba([127, 29, 29, 255]);
const FOOTER_SECONDARY: Rgba<u8> = Rgba([153, 27, 27, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

// Header band with a decorative circle at its bottom edge
const HEADER_BAND: f32 = 240.0;
const ACCENT_RADIUS: f32 = 40.0;
const TITLE_PX: f32 = 56.0;
const TITLE_BASELINE: f32 = 100.0;
const SUBTITLE_PX: f32 = 40.0;
const SUBTITLE_BASELINE: f32 = 160.0;
const NAME_PX: f32 = 32.0;
const NAME_BASELINE: f32 = 220.0;

// Grid cells
const CELL_RADIUS: f32 = 12.0;
const BORDER_WIDTH: f32 = 4.0;
const BADGE_WIDTH: f32 = 40.0;
const BADGE_HEIGHT: f32 = 32.0;
const BADGE_RADIUS: f32 = 6.0;
const BADGE_PX: f32 = 20.0;
/// Badge offset from the cell's top-left corner
const BADGE_INSET: f32 = 10.0;
/// Badge number baseline, measured from the cell's top edge
const BADGE_BASELINE: f32 = 33.0;

// Footer baselines measured up from the bottom edge
const FOOTER_PRIMARY_PX: f32 = 24.0;
const FOOTER_PRIMARY_RISE: f32 = 50.0;
const FOOTER_SECONDARY_PX: f32 = 18.0;
const FOOTER_SECONDARY_RISE: f32 = 25.0;

const TITLE: &str = "Scavenger Hunt";
const SUBTITLE: &str = "Neighborhood Market Mission";

/// The finished render: encoded bytes, dimensions, and the slots that
/// fell back to a placeholder
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub jpeg_data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub failed_slots: Vec<u32>,
}

impl RenderOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failed_slots.is_empty()
    }
}

/// Render the certificate collage for a gallery of 1..=SLOT_COUNT photos.
/// Threshold enforcement is the caller's job.
pub async fn render_collage(identity: &Identity, gallery: &Gallery) -> Result<RenderOutcome> {
    if gallery.is_empty() {
        return Err(Error::Render("gallery is empty; nothing to compose".into()));
    }
    let font = font::load_font()?;
    let layout = CollageLayout::for_count(gallery.len());

    // Barrier: every decode settles (success, failure, or deadline)
    // before any pixel is composed.
    let (decoded, failed_slots) = decode_all(gallery, DECODE_TIMEOUT).await;

    compose(identity, gallery, &decoded, failed_slots, &layout, &font)
}

/// Decode every slot photo concurrently under one deadline.
///
/// Returns the decoded images keyed by slot id, plus the ids that did
/// not decode (bad bytes, a panicked task, or past the deadline). The
/// join always settles.
async fn decode_all(gallery: &Gallery, timeout: Duration) -> (BTreeMap<u32, RgbaImage>, Vec<u32>) {
    let mut tasks = JoinSet::new();
    for slot in gallery.iter() {
        let slot_id = slot.slot_id;
        let bytes = slot.jpeg_data.clone();
        tasks.spawn_blocking(move || {
            (
                slot_id,
                image::load_from_memory(&bytes).map(DynamicImage::into_rgba8),
            )
        });
    }

    let deadline = Instant::now() + timeout;
    let mut decoded = BTreeMap::new();
    let mut failed = Vec::new();

    loop {
        match timeout_at(deadline, tasks.join_next()).await {
            Ok(Some(Ok((slot_id, Ok(img))))) => {
                decoded.insert(slot_id, img);
            }
            Ok(Some(Ok((slot_id, Err(_))))) => failed.push(slot_id),
            // A panicked decode task; the slot is picked up below
            Ok(Some(Err(_))) => {}
            Ok(None) => break,
            Err(_) => {
                tasks.abort_all();
                break;
            }
        }
    }

    for id in gallery.slot_ids() {
        if !decoded.contains_key(&id) && !failed.contains(&id) {
            failed.push(id);
        }
    }
    failed.sort_unstable();
    (decoded, failed)
}

/// Compose the full canvas and encode it. Runs strictly after the
/// decode barrier; cells write to disjoint regions, the footer last.
fn compose(
    identity: &Identity,
    gallery: &Gallery,
    decoded: &BTreeMap<u32, RgbaImage>,
    failed_slots: Vec<u32>,
    layout: &CollageLayout,
    font: &Font<'_>,
) -> Result<RenderOutcome> {
    let mut canvas = RgbaImage::from_pixel(layout.canvas_width, layout.canvas_height, BACKGROUND);
    let center_x = layout.canvas_width as f32 / 2.0;
    let bottom = layout.canvas_height as f32;

    // Header
    draw::fill_rect(
        &mut canvas,
        0,
        0,
        layout.canvas_width,
        HEADER_BAND as u32,
        ACCENT,
    );
    draw::fill_circle(&mut canvas, center_x, HEADER_BAND, ACCENT_RADIUS, ACCENT);
    draw::draw_text_centered(&mut canvas, font, TITLE_PX, center_x, TITLE_BASELINE, WHITE, TITLE);
    draw::draw_text_centered(
        &mut canvas,
        font,
        SUBTITLE_PX,
        center_x,
        SUBTITLE_BASELINE,
        WHITE,
        SUBTITLE,
    );
    draw::draw_text_centered(
        &mut canvas,
        font,
        NAME_PX,
        center_x,
        NAME_BASELINE,
        WHITE,
        &format!("Mission conqueror: {}", identity.full_name()),
    );

    // Grid: ascending slot id, row-major
    for (index, slot) in gallery.iter().enumerate() {
        let (x, y) = layout.cell_origin(index as u32);

        match decoded.get(&slot.slot_id) {
            Some(photo) => {
                draw::blit_cover_rounded(&mut canvas, photo, x, y, layout.cell, CELL_RADIUS)
            }
            None => draw::fill_rounded_rect(
                &mut canvas,
                x,
                y,
                layout.cell,
                layout.cell,
                CELL_RADIUS,
                PLACEHOLDER,
            ),
        }

        draw::fill_rounded_rect(
            &mut canvas,
            x + BADGE_INSET,
            y + BADGE_INSET,
            BADGE_WIDTH,
            BADGE_HEIGHT,
            BADGE_RADIUS,
            ACCENT,
        );
        draw::draw_text_centered(
            &mut canvas,
            font,
            BADGE_PX,
            x + BADGE_INSET + BADGE_WIDTH / 2.0,
            y + BADGE_BASELINE,
            WHITE,
            &slot.slot_id.to_string(),
        );
        draw::stroke_rounded_rect(
            &mut canvas,
            x,
            y,
            layout.cell,
            layout.cell,
            CELL_RADIUS,
            BORDER_WIDTH,
            CELL_BORDER,
        );
    }

    // Footer, strictly after every cell
    let stamp = Local::now().format("%d/%m/%Y %H:%M:%S");
    draw::draw_text_centered(
        &mut canvas,
        font,
        FOOTER_PRIMARY_PX,
        center_x,
        bottom - FOOTER_PRIMARY_RISE,
        FOOTER_PRIMARY,
        &format!("Mission confirmed at {}", stamp),
    );
    draw::draw_text_centered(
        &mut canvas,
        font,
        FOOTER_SECONDARY_PX,
        center_x,
        bottom - FOOTER_SECONDARY_RISE,
        FOOTER_SECONDARY,
        &format!("Collected {} points", gallery.len()),
    );

    let mut jpeg_data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg_data, EXPORT_QUALITY);
    DynamicImage::ImageRgba8(canvas)
        .to_rgb8()
        .write_with_encoder(encoder)?;

    Ok(RenderOutcome {
        jpeg_data,
        width: layout.canvas_width,
        height: layout.canvas_height,
        failed_slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Gender, ImageSlot};

    fn identity() -> Identity {
        Identity {
            given_name: "Pim".into(),
            family_name: "Thong".into(),
            age: 19,
            gender: Gender::Female,
        }
    }

    fn sample_jpeg(w: u32, h: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(w, h, image::Rgb(rgb));
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, 90);
        img.write_with_encoder(encoder).unwrap();
        bytes
    }

    fn gallery_of(ids: &[u32]) -> Gallery {
        let mut gallery = Gallery::new();
        for &id in ids {
            gallery
                .insert(ImageSlot {
                    slot_id: id,
                    jpeg_data: sample_jpeg(40 + id * 3, 30 + id * 2, [id as u8 * 10, 80, 120]),
                    captured_at: 0,
                })
                .unwrap();
        }
        gallery
    }

    #[tokio::test]
    async fn decode_join_settles_for_every_slot() {
        let gallery = gallery_of(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        let (decoded, failed) = decode_all(&gallery, DECODE_TIMEOUT).await;
        assert_eq!(decoded.len(), 12);
        assert!(failed.is_empty());
    }

    #[tokio::test]
    async fn undecodable_slots_are_reported_not_hung() {
        let mut gallery = gallery_of(&[1, 3]);
        gallery
            .insert(ImageSlot {
                slot_id: 2,
                jpeg_data: b"not an image at all".to_vec(),
                captured_at: 0,
            })
            .unwrap();

        let (decoded, failed) = decode_all(&gallery, DECODE_TIMEOUT).await;
        assert_eq!(decoded.len(), 2);
        assert!(decoded.contains_key(&1) && decoded.contains_key(&3));
        assert_eq!(failed, vec![2]);
    }

    #[tokio::test]
    async fn expired_deadline_fails_every_slot_and_still_settles() {
        // Large enough that no decode can finish before the first poll
        let mut gallery = Gallery::new();
        for id in [2, 4, 6, 8] {
            gallery
                .insert(ImageSlot {
                    slot_id: id,
                    jpeg_data: sample_jpeg(1600, 1200, [90, 90, 90]),
                    captured_at: 0,
                })
                .unwrap();
        }

        let (decoded, failed) = decode_all(&gallery, Duration::ZERO).await;
        assert!(decoded.is_empty());
        assert_eq!(failed, vec![2, 4, 6, 8]);
    }

    #[tokio::test]
    async fn empty_gallery_is_an_error() {
        let result = render_collage(&identity(), &Gallery::new()).await;
        assert!(matches!(result, Err(Error::Render(_))));
    }

    #[tokio::test]
    async fn render_output_matches_layout_dimensions() {
        let gallery = gallery_of(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let outcome = match render_collage(&identity(), &gallery).await {
            Ok(o) => o,
            // Host has no usable TTF installed; nothing to verify
            Err(Error::FontUnavailable) => return,
            Err(e) => panic!("render failed: {}", e),
        };

        let layout = CollageLayout::for_count(10);
        assert_eq!((outcome.width, outcome.height), (layout.canvas_width, layout.canvas_height));
        assert!(!outcome.is_partial());

        // Round-trip: decoding the composite yields exactly the computed dims
        let decoded = image::load_from_memory(&outcome.jpeg_data).unwrap();
        assert_eq!(decoded.width(), layout.canvas_width);
        assert_eq!(decoded.height(), layout.canvas_height);
    }

    #[tokio::test]
    async fn failed_slot_degrades_to_placeholder_and_is_listed() {
        let mut gallery = gallery_of(&[1, 2]);
        gallery
            .insert(ImageSlot {
                slot_id: 5,
                jpeg_data: vec![0u8; 16],
                captured_at: 0,
            })
            .unwrap();

        let outcome = match render_collage(&identity(), &gallery).await {
            Ok(o) => o,
            Err(Error::FontUnavailable) => return,
            Err(e) => panic!("render failed: {}", e),
        };
        assert_eq!(outcome.failed_slots, vec![5]);
        assert!(outcome.is_partial());

        // The placeholder cell is painted, so the export completed
        // (footer included) instead of hanging on the bad slot.
        let layout = CollageLayout::for_count(3);
        let composite = image::load_from_memory(&outcome.jpeg_data)
            .unwrap()
            .into_rgba8();
        // Slot 5 is the third slot in ascending order, grid index 2
        let (x, y) = layout.cell_origin(2);
        let probe = composite.get_pixel(
            (x + layout.cell / 2.0) as u32,
            (y + layout.cell / 2.0) as u32,
        );
        for c in 0..3 {
            let delta = (probe.0[c] as i32 - PLACEHOLDER.0[c] as i32).abs();
            assert!(delta < 16, "placeholder channel {} off by {}", c, delta);
        }
    }

    #[tokio::test]
    async fn single_photo_renders_on_the_small_grid() {
        let gallery = gallery_of(&[7]);
        let outcome = match render_collage(&identity(), &gallery).await {
            Ok(o) => o,
            Err(Error::FontUnavailable) => return,
            Err(e) => panic!("render failed: {}", e),
        };
        let layout = CollageLayout::for_count(1);
        assert_eq!((layout.columns, layout.rows), (2, 1));
        assert_eq!(outcome.height, layout.canvas_height);
    }
}
