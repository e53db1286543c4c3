//! Model archive extraction

use crate::ProvisionError;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Extract a ZIP archive into `dest_dir`.
///
/// The archive is expected to contain the model directory as a top-level
/// entry, so extracting into the parent of the configured model directory
/// materializes it.
pub fn unpack_archive(archive_path: &Path, dest_dir: &Path) -> Result<(), ProvisionError> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ProvisionError::Archive(e.to_string()))?;

    debug!(
        "Extracting {} entries into {}",
        archive.len(),
        dest_dir.display()
    );

    archive
        .extract(dest_dir)
        .map_err(|e| ProvisionError::Archive(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unpack_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let archive_path = tmp.path().join("model.zip");

        let file = File::create(&archive_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("animal-classifier/model.onnx", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"stub-weights").unwrap();
        writer.finish().unwrap();

        unpack_archive(&archive_path, tmp.path()).unwrap();

        let extracted = tmp.path().join("animal-classifier/model.onnx");
        assert_eq!(std::fs::read(extracted).unwrap(), b"stub-weights");
    }

    #[test]
    fn test_unpack_corrupt_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let archive_path = tmp.path().join("broken.zip");
        std::fs::write(&archive_path, b"this is not a zip file").unwrap();

        let result = unpack_archive(&archive_path, tmp.path());
        assert!(matches!(result, Err(ProvisionError::Archive(_))));
    }
}
