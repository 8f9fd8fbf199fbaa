/// Collage rendering module
///
/// This module turns a session's gallery into the certificate image:
/// - Pure layout arithmetic for the grid canvas (layout.rs)
/// - Raster drawing primitives (draw.rs)
/// - System font resolution for the text overlay (font.rs)
/// - The renderer itself: decode join, composition, encoding (render.rs)

pub mod draw;
pub mod font;
pub mod layout;
pub mod render;
