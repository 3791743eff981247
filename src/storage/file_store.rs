use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use futures::future::{BoxFuture, FutureExt};
use crate::core::error::Result;
use crate::storage::KeyValueStore;

const EXTENSION: &str = "bin";

/// One file per key under a single directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    pub directory: PathBuf,
}

impl FileStore {
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(FileStore { directory })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.directory.join(format!("{}.{}", name, EXTENSION))
    }

    fn is_entry(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION)
    }
}

impl KeyValueStore for FileStore {
    fn put(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<()>> {
        let path = self.path_for(key);
        async move {
            // Write-then-rename so readers never see a torn file.
            let tmp = path.with_extension("tmp");
            tokio::fs::write(&tmp, &value).await?;
            tokio::fs::rename(&tmp, &path).await?;
            Ok(())
        }
        .boxed()
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>>> {
        let path = self.path_for(key);
        async move {
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<()>> {
        let path = self.path_for(key);
        async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }

    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        async move {
            let mut keys = Vec::new();
            let mut entries = tokio::fs::read_dir(&self.directory).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if !Self::is_entry(&path) {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
            keys.sort();
            Ok(keys)
        }
        .boxed()
    }

    fn clear(&self) -> BoxFuture<'_, Result<()>> {
        async move {
            let mut entries = tokio::fs::read_dir(&self.directory).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if Self::is_entry(&path) {
                    tokio::fs::remove_file(&path).await?;
                }
            }
            Ok(())
        }
        .boxed()
    }
}
