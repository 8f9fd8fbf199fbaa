/// Font resolution for the collage text overlay
///
/// The crate ships no font assets; a TTF is resolved at render time
/// from an explicit override or from common system locations.
use rusttype::Font;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment override pointing at a .ttf file
pub const FONT_ENV: &str = "SNAPHUNT_FONT";

/// Well-known system font locations, tried in order
const SYSTEM_FONTS: [&str; 8] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Paths that will be tried, override first
fn candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(custom) = std::env::var(FONT_ENV) {
        paths.push(PathBuf::from(custom));
    }
    paths.extend(SYSTEM_FONTS.iter().map(PathBuf::from));
    paths
}

/// Load the first usable font; a missing font is a reported error,
/// never a panic
pub fn load_font() -> Result<Font<'static>> {
    for path in candidates() {
        if !path.is_file() {
            continue;
        }
        if let Ok(data) = std::fs::read(&path) {
            if let Some(font) = Font::try_from_vec(data) {
                return Ok(font);
            }
        }
    }
    Err(Error::FontUnavailable)
}
