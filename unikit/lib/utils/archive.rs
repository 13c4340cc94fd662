use std::{fs::File, path::Path};

use flate2::{write::GzEncoder, Compression};
use tar::Builder;

use crate::{UnikitError, UnikitResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Packages a set of files into a gzip-compressed tar archive.
///
/// Each file is stored under its base name, which is the layout cloud
/// providers expect for raw disk uploads (e.g. a single `disk.raw` entry).
pub fn create_archive(archive: &Path, files: &[&Path]) -> UnikitResult<()> {
    let fd = File::create(archive)?;
    let encoder = GzEncoder::new(fd, Compression::default());
    let mut builder = Builder::new(encoder);

    for file in files {
        let name = file.file_name().ok_or_else(|| {
            UnikitError::custom(anyhow::anyhow!(
                "archive entry has no base name: {}",
                file.display()
            ))
        })?;

        let mut fd = File::open(file)?;
        builder.append_file(name, &mut fd)?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::{fs, io::Read};
    use tar::Archive;

    #[test]
    fn test_create_archive_roundtrip() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let disk = temp_dir.path().join("disk.raw");
        fs::write(&disk, b"image contents")?;

        let archive_path = temp_dir.path().join("image.tar.gz");
        create_archive(&archive_path, &[disk.as_path()])?;

        let mut archive = Archive::new(GzDecoder::new(File::open(&archive_path)?));
        let mut entries = archive.entries()?;

        let mut entry = entries.next().unwrap()?;
        assert_eq!(entry.path()?.to_str(), Some("disk.raw"));

        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        assert_eq!(contents, b"image contents");

        assert!(entries.next().is_none());
        Ok(())
    }
}
