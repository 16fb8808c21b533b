use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use fragments_convert::Converted;
use fragments_core::{FragmentError, FragmentId, FragmentRecord, MediaType, OwnerId, SupportedType};
use fragments_store::{FragmentKey, FragmentStore};

/// Input for [`Fragments::construct`](crate::Fragments::construct).
///
/// Only `owner_id` and `fragment_type` are required; everything else is
/// generated when absent.
#[derive(Debug, Clone, Default)]
pub struct FragmentDraft {
    pub owner_id: OwnerId,
    pub fragment_type: String,
    pub id: Option<FragmentId>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    /// Signed so that a negative value can be reported instead of wrapping.
    pub size: Option<i64>,
}

impl FragmentDraft {
    pub fn new(owner_id: impl Into<OwnerId>, fragment_type: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            fragment_type: fragment_type.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_record(self) -> Result<(FragmentRecord, MediaType), FragmentError> {
        if self.owner_id.is_empty() {
            return Err(FragmentError::Validation("ownerId is required".into()));
        }
        if self.fragment_type.trim().is_empty() {
            return Err(FragmentError::Validation("type is required".into()));
        }
        let size = match self.size {
            None => 0,
            Some(n) => u64::try_from(n).map_err(|_| {
                FragmentError::Validation(format!("size must be non-negative, got {n}"))
            })?,
        };

        let media = MediaType::parse(&self.fragment_type)?;
        if media.supported().is_none() {
            return Err(FragmentError::UnsupportedType(self.fragment_type));
        }

        let now = Utc::now();
        let record = FragmentRecord {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(FragmentId::generate),
            owner_id: self.owner_id,
            created: self.created.unwrap_or(now),
            updated: self.updated.unwrap_or(now),
            fragment_type: self.fragment_type,
            size,
        };
        Ok((record, media))
    }
}

/// A transient view of one stored fragment.
///
/// Holds a copy of the metadata record and a handle to the store. Mutations
/// go straight to the store; nothing is cached between requests.
pub struct Fragment {
    record: FragmentRecord,
    media: MediaType,
    store: Arc<dyn FragmentStore>,
}

impl std::fmt::Debug for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragment")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl Fragment {
    pub(crate) fn new(
        record: FragmentRecord,
        media: MediaType,
        store: Arc<dyn FragmentStore>,
    ) -> Self {
        Self {
            record,
            media,
            store,
        }
    }

    /// Rehydrate a view from a stored record. Membership in the supported
    /// set is not checked again.
    pub(crate) fn from_stored(
        record: FragmentRecord,
        store: Arc<dyn FragmentStore>,
    ) -> Result<Self, FragmentError> {
        let media = MediaType::parse(&record.fragment_type).map_err(|e| {
            FragmentError::Storage(format!("stored fragment {} has a corrupt type: {e}", record.id))
        })?;
        Ok(Self::new(record, media, store))
    }

    pub fn id(&self) -> &FragmentId {
        &self.record.id
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.record.owner_id
    }

    /// The full type string, parameters included.
    pub fn fragment_type(&self) -> &str {
        &self.record.fragment_type
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.record.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.record.updated
    }

    pub fn size(&self) -> u64 {
        self.record.size
    }

    pub fn record(&self) -> &FragmentRecord {
        &self.record
    }

    pub fn into_record(self) -> FragmentRecord {
        self.record
    }

    fn key(&self) -> FragmentKey {
        FragmentKey::of(&self.record)
    }

    /// Base type without parameters, e.g. `text/html`.
    pub fn mime_type(&self) -> &str {
        self.media.essence()
    }

    pub fn is_text(&self) -> bool {
        self.media.is_text()
    }

    /// Media types this fragment can be served as, by base type.
    pub fn formats(&self) -> Vec<String> {
        let mut formats = vec![self.mime_type().to_owned()];
        if self.media.supported() == Some(SupportedType::TextMarkdown) {
            formats.push(SupportedType::TextHtml.essence().to_owned());
        }
        formats
    }

    /// Refresh `updated` and persist the metadata record.
    ///
    /// # Errors
    ///
    /// [`FragmentError::Storage`] if the backend write fails.
    pub async fn save(&mut self) -> Result<(), FragmentError> {
        self.record.updated = Utc::now();
        self.store.write_fragment(&self.record).await?;
        debug!(owner_id = %self.record.owner_id, fragment_id = %self.record.id, "saved fragment metadata");
        Ok(())
    }

    /// Read the current payload.
    ///
    /// # Errors
    ///
    /// [`FragmentError::NotFound`] if no payload was ever written.
    pub async fn get_data(&self) -> Result<Bytes, FragmentError> {
        self.store
            .read_fragment_data(&self.key())
            .await?
            .ok_or_else(|| FragmentError::not_found(self.owner_id().as_str(), self.id().as_str()))
    }

    /// Replace the payload, then update `size` and `updated` in memory.
    ///
    /// The metadata record is not persisted; call [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// [`FragmentError::Storage`] if the backend write fails, in which case
    /// the in-memory record is left unchanged.
    pub async fn set_data(&mut self, data: Bytes) -> Result<(), FragmentError> {
        let size = data.len() as u64;
        self.store.write_fragment_data(&self.key(), data).await?;
        self.record.size = size;
        self.record.updated = Utc::now();
        debug!(owner_id = %self.record.owner_id, fragment_id = %self.record.id, size, "wrote fragment data");
        Ok(())
    }

    /// Read the payload and render it for `extension`.
    ///
    /// Image transforms are CPU bound and run on the blocking pool.
    ///
    /// # Errors
    ///
    /// - [`FragmentError::NotFound`] if there is no payload.
    /// - [`FragmentError::UnsupportedConversion`] for a pair outside the
    ///   conversion matrix.
    /// - [`FragmentError::Conversion`] if the transform fails.
    pub async fn convert(&self, extension: Option<&str>) -> Result<Converted, FragmentError> {
        let data = self.get_data().await?;
        let media = self.media.clone();
        let extension = extension.map(str::to_owned);
        tokio::task::spawn_blocking(move || {
            fragments_convert::convert(data, &media, extension.as_deref())
        })
        .await
        .map_err(|e| FragmentError::Conversion(format!("conversion task failed: {e}")))?
    }
}
