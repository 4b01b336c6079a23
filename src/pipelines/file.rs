use super::text;
use crate::blob_store::BlobStore;
use crate::error::FlowError;
use log::{debug, warn};
use std::path::Path;

/// Read an uploaded file as UTF-8 recipe text and delete it.
///
/// The file is removed whether or not reading and decoding succeed.
pub async fn process(store: &dyn BlobStore, upload: &Path) -> Result<String, FlowError> {
    let result = read_text(store, upload).await;

    match store.remove(upload).await {
        Ok(()) => debug!("Removed uploaded file {}", upload.display()),
        Err(e) => warn!("Could not remove uploaded file {}: {}", upload.display(), e),
    }

    result
}

async fn read_text(store: &dyn BlobStore, upload: &Path) -> Result<String, FlowError> {
    let bytes = store.read(upload).await?;
    let content = String::from_utf8(bytes).map_err(|_| {
        FlowError::InvalidInput("Uploaded file is not valid UTF-8 text".to_string())
    })?;
    text::process(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_store::FsBlobStore;

    #[tokio::test]
    async fn test_reads_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let upload = dir.path().join("upload-1");
        std::fs::write(&upload, "Pancakes\n\n1 cup flour\n").unwrap();

        let text = process(&FsBlobStore, &upload).await.unwrap();
        assert_eq!(text, "Pancakes\n\n1 cup flour");
        assert!(!upload.exists());
    }

    #[tokio::test]
    async fn test_removed_on_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let upload = dir.path().join("upload-2");
        std::fs::write(&upload, [0xff, 0xfe, 0x00]).unwrap();

        let result = process(&FsBlobStore, &upload).await;
        assert!(matches!(result, Err(FlowError::InvalidInput(_))));
        assert!(!upload.exists());
    }

    #[tokio::test]
    async fn test_removed_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let upload = dir.path().join("upload-3");
        std::fs::write(&upload, "   \n").unwrap();

        assert!(process(&FsBlobStore, &upload).await.is_err());
        assert!(!upload.exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = process(&FsBlobStore, &dir.path().join("gone")).await;
        assert!(matches!(result, Err(FlowError::Io(_))));
    }
}
