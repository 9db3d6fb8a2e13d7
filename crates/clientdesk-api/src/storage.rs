use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use clientdesk_types::Bucket;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid object key: {0}")]
    InvalidKey(String),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Relative, slash separated object key that cannot escape its bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        if raw.is_empty() {
            return Err(StorageError::InvalidKey("key is empty".to_string()));
        }
        if raw.starts_with('/') || raw.contains('\\') {
            return Err(StorageError::InvalidKey(format!("'{raw}' must be a relative path")));
        }
        for segment in raw.split('/') {
            match segment {
                "" => {
                    return Err(StorageError::InvalidKey(format!(
                        "'{raw}' contains an empty segment"
                    )));
                }
                "." | ".." => {
                    return Err(StorageError::InvalidKey(format!(
                        "'{raw}' contains a relative segment"
                    )));
                }
                _ => {}
            }
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ObjectInfo {
    pub bucket: Bucket,
    pub key: String,
    pub size: u64,
}

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, bucket: Bucket, key: &ObjectKey, bytes: &[u8])
    -> Result<ObjectInfo, StorageError>;

    async fn get(&self, bucket: Bucket, key: &ObjectKey) -> Result<Vec<u8>, StorageError>;

    async fn delete(&self, bucket: Bucket, key: &ObjectKey) -> Result<(), StorageError>;

    async fn list(&self, bucket: Bucket, prefix: Option<&str>)
    -> Result<Vec<ObjectInfo>, StorageError>;
}

/// Filesystem store laid out as `<root>/<bucket>/<key>`.
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.as_str())
    }

    fn object_path(&self, bucket: Bucket, key: &ObjectKey) -> PathBuf {
        key.as_str()
            .split('/')
            .fold(self.bucket_dir(bucket), |path, segment| path.join(segment))
    }
}

fn not_found(key: &ObjectKey) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |e| {
        if e.kind() == ErrorKind::NotFound {
            StorageError::NotFound(key.as_str().to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

fn relative_key(bucket_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_dir).ok()?;
    let segments: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(segments.join("/"))
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        bucket: Bucket,
        key: &ObjectKey,
        bytes: &[u8],
    ) -> Result<ObjectInfo, StorageError> {
        let path = self.object_path(bucket, key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(%bucket, key = key.as_str(), size = bytes.len(), "Stored object");
        Ok(ObjectInfo {
            bucket,
            key: key.as_str().to_string(),
            size: bytes.len() as u64,
        })
    }

    async fn get(&self, bucket: Bucket, key: &ObjectKey) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(self.object_path(bucket, key))
            .await
            .map_err(not_found(key))
    }

    async fn delete(&self, bucket: Bucket, key: &ObjectKey) -> Result<(), StorageError> {
        tokio::fs::remove_file(self.object_path(bucket, key))
            .await
            .map_err(not_found(key))
    }

    async fn list(
        &self,
        bucket: Bucket,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectInfo>, StorageError> {
        let bucket_dir = self.bucket_dir(bucket);
        let mut pending = vec![bucket_dir.clone()];
        let mut objects = Vec::new();

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let metadata = entry.metadata().await?;
                let path = entry.path();
                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(key) = relative_key(&bucket_dir, &path) else {
                    continue;
                };
                if prefix.is_none_or(|p| key.starts_with(p)) {
                    objects.push(ObjectInfo {
                        bucket,
                        key,
                        size: metadata.len(),
                    });
                }
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new() -> Self {
            Self(std::env::temp_dir().join(format!("clientdesk-store-{}", uuid::Uuid::new_v4())))
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn keys_cannot_escape_the_bucket() {
        for bad in ["", "/etc/passwd", "../secret", "a/../../b", "a//b", "a/./b", "a\\b", "a/"] {
            assert!(ObjectKey::parse(bad).is_err(), "{bad} should be rejected");
        }
        assert_eq!(
            ObjectKey::parse("projects/42/brief.pdf").unwrap().as_str(),
            "projects/42/brief.pdf"
        );
    }

    #[tokio::test]
    async fn put_get_list_delete() {
        let scratch = ScratchDir::new();
        let store = LocalObjectStore::new(&scratch.0);
        let brief = ObjectKey::parse("p1/brief.pdf").unwrap();
        let logo = ObjectKey::parse("acme.png").unwrap();

        let info = store
            .put(Bucket::ProjectDocuments, &brief, b"%PDF")
            .await
            .unwrap();
        assert_eq!(info.size, 4);
        store.put(Bucket::ClientLogos, &logo, b"png").await.unwrap();

        assert_eq!(
            store.get(Bucket::ProjectDocuments, &brief).await.unwrap(),
            b"%PDF"
        );

        let listed = store.list(Bucket::ProjectDocuments, Some("p1/")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, "p1/brief.pdf");
        assert!(store.list(Bucket::ProjectDocuments, Some("p2/")).await.unwrap().is_empty());

        store.delete(Bucket::ProjectDocuments, &brief).await.unwrap();
        assert!(matches!(
            store.get(Bucket::ProjectDocuments, &brief).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn listing_an_untouched_bucket_is_empty() {
        let scratch = ScratchDir::new();
        let store = LocalObjectStore::new(&scratch.0);
        assert!(store.list(Bucket::ClientLogos, None).await.unwrap().is_empty());
    }
}
