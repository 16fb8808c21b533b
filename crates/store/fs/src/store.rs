use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use fragments_core::{FragmentRecord, OwnerId};
use fragments_store::error::StoreError;
use fragments_store::key::FragmentKey;
use fragments_store::store::{FragmentListing, FragmentStore};

use crate::config::FsConfig;
use crate::layout;

/// Local-disk implementation of [`FragmentStore`].
///
/// Each owner gets a directory under the configured root. Metadata is kept
/// as one JSON document per fragment next to a raw payload file. Writes land
/// in a hidden temp file first and are renamed into place, so a reader sees
/// either the previous or the new content and concurrent writers to the same
/// key resolve to whichever rename happens last.
#[derive(Debug, Clone)]
pub struct FsFragmentStore {
    root: PathBuf,
}

impl FsFragmentStore {
    /// Create a store rooted at `config.root`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the root cannot be created.
    pub async fn new(config: FsConfig) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(&config.root).await?;
        debug!(root = %config.root.display(), "opened local fragment store");
        Ok(Self { root: config.root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write_atomic(&self, target: &Path, contents: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = layout::temp_path(target);
        if let Err(e) = tokio::fs::write(&tmp, contents).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Read a whole file, mapping a missing file to `None`.
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove a file, returning whether it existed.
async fn remove_optional(path: &Path) -> Result<bool, StoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl FragmentStore for FsFragmentStore {
    async fn write_fragment(&self, record: &FragmentRecord) -> Result<(), StoreError> {
        let path = layout::metadata_path(&self.root, &FragmentKey::of(record));
        let json = serde_json::to_vec(record)?;
        self.write_atomic(&path, &json).await
    }

    async fn read_fragment(&self, key: &FragmentKey) -> Result<Option<FragmentRecord>, StoreError> {
        let path = layout::metadata_path(&self.root, key);
        let Some(contents) = read_optional(&path).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&contents)?))
    }

    async fn write_fragment_data(&self, key: &FragmentKey, data: Bytes) -> Result<(), StoreError> {
        let path = layout::data_path(&self.root, key);
        self.write_atomic(&path, &data).await
    }

    async fn read_fragment_data(&self, key: &FragmentKey) -> Result<Option<Bytes>, StoreError> {
        let path = layout::data_path(&self.root, key);
        Ok(read_optional(&path).await?.map(Bytes::from))
    }

    async fn list_fragments(
        &self,
        owner_id: &OwnerId,
        expand: bool,
    ) -> Result<FragmentListing, StoreError> {
        let dir = layout::owner_dir(&self.root, owner_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(FragmentListing::empty(expand));
            }
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            match layout::id_from_metadata_name(name) {
                Some(id) => ids.push(id),
                None if name.ends_with(layout::METADATA_EXT) => {
                    warn!(file = name, "skipping undecodable metadata file name");
                }
                None => {}
            }
        }
        ids.sort();

        if !expand {
            return Ok(FragmentListing::Ids(ids));
        }

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            // A concurrent delete between the scan and the read is not an error.
            if let Some(record) = self
                .read_fragment(&FragmentKey::new(owner_id.clone(), id))
                .await?
            {
                records.push(record);
            }
        }
        Ok(FragmentListing::Records(records))
    }

    async fn delete_fragment(&self, key: &FragmentKey) -> Result<bool, StoreError> {
        let had_metadata = remove_optional(&layout::metadata_path(&self.root, key)).await?;
        let had_data = remove_optional(&layout::data_path(&self.root, key)).await?;
        debug!(key = %key, existed = had_metadata || had_data, "deleted fragment files");
        Ok(had_metadata || had_data)
    }
}
