//! Filesystem bucket.
//!
//! Each object is a body file named after its key, next to a
//! `<key>.meta.json` sidecar holding the metadata, ACL and content type.
//! Writes are staged in a sibling `.<bucket>.staging` directory and renamed
//! into place, so a failed write leaves the previous object untouched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use super::{ObjectAcl, ObjectMetadata, ObjectStore, PutObjectRequest, StoredObject};
use crate::error::StoreError;

const SIDECAR_SUFFIX: &str = ".meta.json";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize, Deserialize)]
struct Sidecar {
    #[serde(default)]
    metadata: ObjectMetadata,
    #[serde(default)]
    acl: ObjectAcl,
    content_type: String,
    last_modified: DateTime<Utc>,
}

// == Filesystem Object Store ==
/// A bucket stored as a directory on local disk.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    bucket: String,
    dir: PathBuf,
    staging: PathBuf,
    next_stage: Arc<AtomicU64>,
}

impl FsObjectStore {
    /// Opens the bucket `<root>/<bucket>`, creating the directory if needed.
    pub async fn open(root: impl AsRef<Path>, bucket: impl Into<String>) -> Result<Self, StoreError> {
        let bucket = bucket.into();
        if !is_addressable(&bucket) {
            return Err(StoreError::InvalidKey(bucket));
        }

        let dir = root.as_ref().join(&bucket);
        let staging = root.as_ref().join(format!(".{bucket}.staging"));
        fs::create_dir_all(&dir).await?;
        fs::create_dir_all(&staging).await?;
        info!(bucket = %bucket, dir = %dir.display(), "opened filesystem bucket");

        Ok(Self {
            bucket,
            dir,
            staging,
            next_stage: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Directory holding the bucket's objects.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn paths(&self, key: &str) -> Result<(PathBuf, PathBuf), StoreError> {
        if !is_addressable(key) || key.ends_with(SIDECAR_SUFFIX) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let body = self.dir.join(key);
        let sidecar = self.dir.join(format!("{key}{SIDECAR_SUFFIX}"));
        Ok((body, sidecar))
    }

    /// Unique staging paths for one write of `key`.
    fn stage_paths(&self, key: &str) -> (PathBuf, PathBuf) {
        let seq = self.next_stage.fetch_add(1, Ordering::Relaxed);
        let stem = format!("{key}.{}.{seq}", std::process::id());
        (
            self.staging.join(format!("{stem}.body")),
            self.staging.join(format!("{stem}.meta")),
        )
    }

    async fn install(
        &self,
        staged: &(PathBuf, PathBuf),
        body_path: &Path,
        sidecar_path: &Path,
        body: &[u8],
        sidecar: &[u8],
    ) -> Result<(), StoreError> {
        let (staged_body, staged_sidecar) = staged;
        fs::write(staged_body, body).await?;
        fs::write(staged_sidecar, sidecar).await?;
        fs::rename(staged_body, body_path).await?;
        fs::rename(staged_sidecar, sidecar_path).await?;
        Ok(())
    }
}

/// Removes whatever staging files a failed write left behind.
async fn discard(staged: &(PathBuf, PathBuf)) {
    for path in [&staged.0, &staged.1] {
        match fs::remove_file(path).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(path = %path.display(), error = %err, "could not remove staged file"),
        }
    }
}

/// Rejects names that would leave the bucket directory.
fn is_addressable(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn not_found_or(key: &str, err: std::io::Error) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound(key.to_string())
    } else {
        StoreError::Io(err)
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(&self, request: PutObjectRequest) -> Result<(), StoreError> {
        let (body_path, sidecar_path) = self.paths(&request.key)?;

        let sidecar = Sidecar {
            metadata: request.metadata,
            acl: request.acl,
            content_type: request.content_type,
            last_modified: Utc::now(),
        };
        let sidecar = serde_json::to_vec(&sidecar)?;

        let staged = self.stage_paths(&request.key);
        if let Err(err) = self
            .install(&staged, &body_path, &sidecar_path, &request.body, &sidecar)
            .await
        {
            discard(&staged).await;
            return Err(err);
        }

        debug!(
            bucket = %self.bucket,
            key = %request.key,
            size = request.body.len(),
            acl = request.acl.as_str(),
            "wrote object"
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<StoredObject, StoreError> {
        let (body_path, sidecar_path) = self.paths(key)?;

        let body = fs::read(&body_path)
            .await
            .map_err(|err| not_found_or(key, err))?;

        let sidecar = match fs::read(&sidecar_path).await {
            Ok(bytes) => serde_json::from_slice::<Sidecar>(&bytes)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let modified = fs::metadata(&body_path).await?.modified()?;
                Sidecar {
                    metadata: ObjectMetadata::new(),
                    acl: ObjectAcl::default(),
                    content_type: FALLBACK_CONTENT_TYPE.to_string(),
                    last_modified: DateTime::<Utc>::from(modified),
                }
            }
            Err(err) => return Err(err.into()),
        };

        Ok(StoredObject {
            body,
            metadata: sidecar.metadata,
            acl: sidecar.acl,
            content_type: sidecar.content_type,
            last_modified: sidecar.last_modified,
        })
    }

    async fn delete_object(&self, key: &str) -> Result<(), StoreError> {
        let (body_path, sidecar_path) = self.paths(key)?;

        fs::remove_file(&body_path)
            .await
            .map_err(|err| not_found_or(key, err))?;

        match fs::remove_file(&sidecar_path).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        debug!(bucket = %self.bucket, key, "deleted object");
        Ok(())
    }

    async fn object_exists(&self, key: &str) -> Result<bool, StoreError> {
        let (body_path, _) = self.paths(key)?;
        Ok(fs::try_exists(&body_path).await?)
    }
}
