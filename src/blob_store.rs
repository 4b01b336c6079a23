use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::fs;

/// Minimal file storage used for generated images and upload cleanup
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    async fn exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents
    async fn mkdir(&self, path: &Path) -> io::Result<()>;

    async fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Local filesystem store
#[derive(Debug, Default, Clone, Copy)]
pub struct FsBlobStore;

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path).await
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes).await
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn mkdir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }
}
