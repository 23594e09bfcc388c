use anyhow::{Context, Result};
use exif::Exif;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Reads the EXIF tree embedded in an image file (JPEG, TIFF, HEIF, PNG, WebP).
///
/// Returns `Ok(None)` when the file carries no metadata block. Broken IFD
/// chains are tolerated: whatever could be recovered is returned.
pub fn read_metadata(path: &Path) -> Result<Option<Exif>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut buf_reader = BufReader::new(file);
    let mut exif_reader = exif::Reader::new();
    exif_reader.continue_on_error(true);

    match exif_reader.read_from_container(&mut buf_reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::PartialResult(partial)) => {
            let (exif, errors) = partial.into_inner();
            for e in &errors {
                debug!("Recovered from EXIF error in {}: {}", path.display(), e);
            }
            Ok(Some(exif))
        }
        Err(exif::Error::NotFound(_)) => {
            debug!("No metadata block in {}", path.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to parse metadata of {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{liberty_island_fields, tiff_bytes};
    use exif::{In, Tag};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_tiff_container() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("liberty.tif");
        fs::write(&path, tiff_bytes(&liberty_island_fields())).unwrap();

        let exif = read_metadata(&path).unwrap().unwrap();
        assert!(exif.get_field(Tag::GPSLatitude, In::PRIMARY).is_some());
    }

    #[test]
    fn jpeg_without_exif_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bare.jpg");
        fs::write(&path, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();

        assert!(read_metadata(&path).unwrap().is_none());
    }

    #[test]
    fn unknown_container_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"definitely not an image").unwrap();

        assert!(read_metadata(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let Err(err) = read_metadata(&dir.path().join("nope.jpg")) else {
            panic!("expected an error for a missing file");
        };
        assert!(err.to_string().contains("nope.jpg"));
    }
}
