use crate::constants::{mime_type_for_extension, MAX_FILE_SIZE};
use crate::error::{CompressionError, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// An input image held in memory. The pipeline only ever reads it.
#[derive(Debug, Clone)]
pub struct SourceImage {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Loads a file from disk, declaring its MIME type from the extension.
    ///
    /// # Returns
    /// * `Ok(SourceImage)` - The file contents, named after the file
    /// * `Err(CompressionError)` - If the file is missing or over the size limit
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CompressionError::FileNotFound(path.to_path_buf()));
        }

        let file_size = fs::metadata(path)?.len();
        if file_size > MAX_FILE_SIZE {
            return Err(CompressionError::FileTooLarge(file_size, MAX_FILE_SIZE));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| CompressionError::FileNotFound(path.to_path_buf()))?;
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_type_for_extension)
            .unwrap_or("application/octet-stream");

        let bytes = fs::read(path)?;
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the contents, for handing to worker threads.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_source_image_accessors() {
        let image = SourceImage::new("a.png", "image/png", vec![1u8, 2, 3]);
        assert_eq!(image.name(), "a.png");
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.bytes(), &[1, 2, 3]);
        assert_eq!(image.size(), 3);
    }

    #[test]
    fn test_from_path_not_found() {
        let result = SourceImage::from_path(Path::new("nonexistent.jpg"));
        assert!(matches!(result, Err(CompressionError::FileNotFound(_))));
    }

    #[test]
    fn test_from_path_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("photo.JPG");
        let mut file = File::create(&test_file).unwrap();
        file.write_all(b"fake image data").unwrap();

        let image = SourceImage::from_path(&test_file).unwrap();
        assert_eq!(image.name(), "photo.JPG");
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.size(), 15);
    }

    #[test]
    fn test_from_path_unknown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("blob.bin");
        File::create(&test_file).unwrap();

        let image = SourceImage::from_path(&test_file).unwrap();
        assert_eq!(image.mime_type(), "application/octet-stream");
        assert_eq!(image.size(), 0);
    }
}
