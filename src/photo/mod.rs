/// Photo intake module
///
/// This module handles:
/// - Normalizing uploaded photos for storage (ingest.rs)
/// - Bulk-importing a folder of photos into free slots (import.rs)

pub mod import;
pub mod ingest;
