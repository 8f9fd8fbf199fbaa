/// Photo ingestion: decode, downscale, re-encode
///
/// Every photo is normalized before it reaches the store: scaled to a
/// fixed working width and re-encoded as JPEG. This keeps the key-value
/// store small no matter what the camera produced.
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::path::Path;

use crate::error::Result;
use crate::state::data::ImageSlot;

/// Working width every stored photo is scaled to
pub const INGEST_WIDTH: u32 = 600;

/// JPEG quality for stored photos (storage, not export)
const INGEST_QUALITY: u8 = 70;

/// Load a photo from disk and normalize it for storage
pub fn ingest_file(path: &Path) -> Result<Vec<u8>> {
    let img = image::open(path)?;
    normalize(&img)
}

/// Scale to the working width (height proportional) and re-encode
pub fn normalize(img: &image::DynamicImage) -> Result<Vec<u8>> {
    let scale = INGEST_WIDTH as f32 / img.width() as f32;
    let height = ((img.height() as f32 * scale).round() as u32).max(1);
    let resized = img.resize_exact(INGEST_WIDTH, height, FilterType::Lanczos3);

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, INGEST_QUALITY);
    resized.to_rgb8().write_with_encoder(encoder)?;
    Ok(jpeg)
}

/// Ingest a photo straight into a slot record, stamping the capture time
pub fn ingest_slot(slot_id: u32, path: &Path) -> Result<ImageSlot> {
    Ok(ImageSlot {
        slot_id,
        jpeg_data: ingest_file(path)?,
        captured_at: Utc::now().timestamp(),
    })
}
