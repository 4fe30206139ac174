//! File backed asset store.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tracing::debug;

const PARTIAL_SUFFIX: &str = ".part";

/// Stores finished and in-flight book assets under one directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    directory: PathBuf,
}

impl AssetStore {
    /// Creates a store rooted at `directory`. The directory is created lazily.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Where the finished asset of `identifier` lives.
    pub fn asset_path(&self, identifier: &str) -> PathBuf {
        self.directory.join(file_name(identifier))
    }

    /// Where the in-flight bytes of `identifier` are written.
    pub fn partial_path(&self, identifier: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}", file_name(identifier), PARTIAL_SUFFIX))
    }

    /// Whether a finished asset exists for `identifier`.
    pub fn contains(&self, identifier: &str) -> bool {
        self.asset_path(identifier).is_file()
    }

    /// Size of the partial file, 0 when there is none.
    pub async fn partial_len(&self, identifier: &str) -> io::Result<u64> {
        match fs::metadata(self.partial_path(identifier)).await {
            Ok(m) => Ok(m.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Opens the partial file for writing, appending to what is already
    /// there when `append` is set and truncating it otherwise.
    pub async fn open_partial(&self, identifier: &str, append: bool) -> io::Result<File> {
        debug!("Creating destination directory {:?}", self.directory);
        fs::create_dir_all(&self.directory).await?;

        let path = self.partial_path(identifier);
        debug!("Opening partial file {:?} (append: {})", path, append);
        OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .await
    }

    /// Promotes the partial file of `identifier` to the finished asset.
    pub async fn commit(&self, identifier: &str) -> io::Result<PathBuf> {
        let asset = self.asset_path(identifier);
        fs::rename(self.partial_path(identifier), &asset).await?;
        debug!("Stored asset {:?}", asset);
        Ok(asset)
    }

    /// Deletes both the finished asset and the partial file, if present.
    pub async fn remove(&self, identifier: &str) -> io::Result<()> {
        remove_if_exists(&self.asset_path(identifier)).await?;
        remove_if_exists(&self.partial_path(identifier)).await
    }

    /// Deletes the partial file only.
    pub async fn discard_partial(&self, identifier: &str) -> io::Result<()> {
        remove_if_exists(&self.partial_path(identifier)).await
    }
}

async fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!("Removed {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Percent-encodes an identifier into a single safe path component.
fn file_name(identifier: &str) -> String {
    let mut name: String = form_urlencoded::byte_serialize(identifier.as_bytes()).collect();
    // "." and ".." survive the encoding untouched.
    if name.starts_with('.') {
        name.replace_range(0..1, "%2E");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_file_name_is_a_single_component() {
        assert_eq!(file_name("book-42"), "book-42");
        assert_eq!(
            file_name("urn:isbn/978 0"),
            "urn%3Aisbn%2F978+0"
        );
        assert_eq!(file_name(".."), "%2E.");
    }

    #[test]
    fn test_partial_and_asset_paths_differ() {
        let store = AssetStore::new("/tmp/books");
        assert_ne!(store.asset_path("a"), store.partial_path("a"));
        assert!(store.partial_path("a").to_string_lossy().ends_with("a.part"));
    }

    #[tokio::test]
    async fn test_partial_commit_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path().join("nested"));

        assert_eq!(store.partial_len("book").await.unwrap(), 0);

        let mut file = store.open_partial("book", false).await.unwrap();
        file.write_all(b"hello").await.unwrap();
        file.flush().await.unwrap();
        drop(file);

        let mut file = store.open_partial("book", true).await.unwrap();
        file.write_all(b" world").await.unwrap();
        file.flush().await.unwrap();
        drop(file);

        assert_eq!(store.partial_len("book").await.unwrap(), 11);
        assert!(!store.contains("book"));

        let path = store.commit("book").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
        assert!(store.contains("book"));
        assert_eq!(store.partial_len("book").await.unwrap(), 0);

        store.remove("book").await.unwrap();
        assert!(!store.contains("book"));
        store.remove("book").await.unwrap();
    }

    #[tokio::test]
    async fn test_open_partial_truncates_without_append() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());

        let mut file = store.open_partial("b", false).await.unwrap();
        file.write_all(b"0123456789").await.unwrap();
        file.flush().await.unwrap();
        drop(file);

        let file = store.open_partial("b", false).await.unwrap();
        drop(file);
        assert_eq!(store.partial_len("b").await.unwrap(), 0);
    }
}
