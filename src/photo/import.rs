/// Bulk folder import
///
/// Walks a directory tree and ingests every decodable image into the
/// lowest free slots, in path order, until the board runs out of slots.
use std::path::Path;
use walkdir::WalkDir;

use super::ingest;
use crate::error::Result;
use crate::state::session::Session;

/// Result of a folder import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    /// True when the walk stopped early because every slot was filled
    pub board_full: bool,
}

/// File extensions we attempt to decode
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"];

/// Import all images under `folder` into the session's free slots
pub fn import_folder(session: &mut Session, folder: &Path) -> Result<ImportResult> {
    let mut result = ImportResult::default();

    for entry in WalkDir::new(folder)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(extension) = path.extension() else {
            continue;
        };
        let ext = extension.to_string_lossy().to_lowercase();
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        let Some(slot_id) = session.gallery.first_free_slot() else {
            result.board_full = true;
            break;
        };

        match ingest::ingest_slot(slot_id, path) {
            Ok(record) => {
                session.add_photo(record)?;
                result.imported += 1;
            }
            Err(e) => {
                eprintln!("⚠️  Skipping {}: {}", path.display(), e);
                result.skipped += 1;
            }
        }
    }

    Ok(result)
}
