/// Certificate file delivery
///
/// Writes the rendered collage to disk with a filename derived from
/// the participant's given name.
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::collage::render::RenderOutcome;
use crate::error::Result;
use crate::state::data::Identity;

/// Fixed filename prefix for exported certificates
pub const EXPORT_PREFIX: &str = "snaphunt-mission";

/// Target path for a certificate inside `dir`
pub fn certificate_path(dir: &Path, identity: &Identity) -> PathBuf {
    let name: String = identity
        .given_name
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '-' } else { c })
        .collect();
    dir.join(format!("{}-{}.jpg", EXPORT_PREFIX, name))
}

/// Write the rendered certificate and return its path
pub fn write_certificate(
    dir: &Path,
    identity: &Identity,
    outcome: &RenderOutcome,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = certificate_path(dir, identity);
    let mut file = File::create(&path)?;
    file.write_all(&outcome.jpeg_data)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Gender;

    fn identity(given: &str) -> Identity {
        Identity {
            given_name: given.into(),
            family_name: "Tester".into(),
            age: 30,
            gender: Gender::Male,
        }
    }

    #[test]
    fn filename_uses_prefix_and_given_name() {
        let path = certificate_path(Path::new("/tmp"), &identity("Arun"));
        assert_eq!(path, Path::new("/tmp/snaphunt-mission-Arun.jpg"));
    }

    #[test]
    fn unsafe_name_characters_are_replaced() {
        let path = certificate_path(Path::new("/tmp"), &identity("A b/c"));
        assert_eq!(path, Path::new("/tmp/snaphunt-mission-A-b-c.jpg"));
    }

    #[test]
    fn writes_bytes_to_disk() {
        let dir = std::env::temp_dir().join(format!("snaphunt-export-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let outcome = RenderOutcome {
            jpeg_data: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: 4,
            height: 4,
            failed_slots: vec![],
        };
        let path = write_certificate(&dir, &identity("Nok"), &outcome).unwrap();
        assert_eq!(fs::read(&path).unwrap(), outcome.jpeg_data);
    }
}
