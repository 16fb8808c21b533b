use bytes::Bytes;
use tracing::{info, warn};

use fragments_convert::Converted;
use fragments_core::{FragmentError, FragmentId, FragmentRecord, MediaType, OwnerId};

use crate::fragment::FragmentDraft;
use crate::repository::{FragmentList, Fragments};

/// A fragment payload ready to be sent back to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub data: Bytes,
    pub content_type: String,
}

impl From<Converted> for Rendered {
    fn from(converted: Converted) -> Self {
        Self {
            data: converted.data,
            content_type: converted.content_type,
        }
    }
}

/// The operations a transport exposes, composed from [`Fragments`].
///
/// Writes always store the payload before the metadata record.
#[derive(Debug, Clone)]
pub struct FragmentService {
    fragments: Fragments,
}

impl FragmentService {
    pub fn new(fragments: Fragments) -> Self {
        Self { fragments }
    }

    pub fn fragments(&self) -> &Fragments {
        &self.fragments
    }

    /// Create a fragment from a raw body and its declared Content-Type.
    pub async fn create(
        &self,
        owner_id: &OwnerId,
        content_type: &str,
        data: Bytes,
    ) -> Result<FragmentRecord, FragmentError> {
        // An absent header is unsupported rather than malformed.
        if content_type.trim().is_empty()
            || MediaType::parse(content_type)?.supported().is_none()
        {
            warn!(owner_id = %owner_id, content_type, "rejected unsupported content type");
            return Err(FragmentError::UnsupportedType(content_type.to_owned()));
        }

        let mut fragment = self
            .fragments
            .construct(FragmentDraft::new(owner_id.clone(), content_type))?;
        fragment.set_data(data).await?;
        fragment.save().await?;

        info!(
            owner_id = %owner_id,
            fragment_id = %fragment.id(),
            content_type,
            size = fragment.size(),
            "created fragment"
        );
        Ok(fragment.into_record())
    }

    /// Replace the payload of an existing fragment.
    ///
    /// `content_type` must equal the stored type string exactly; on mismatch
    /// nothing is written.
    pub async fn update(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
        content_type: &str,
        data: Bytes,
    ) -> Result<FragmentRecord, FragmentError> {
        let mut fragment = self.fragments.by_id(owner_id, id).await?;
        if fragment.fragment_type() != content_type {
            warn!(
                owner_id = %owner_id,
                fragment_id = %id,
                expected = fragment.fragment_type(),
                content_type,
                "rejected update with a different content type"
            );
            return Err(FragmentError::TypeMismatch {
                expected: fragment.fragment_type().to_owned(),
                actual: content_type.to_owned(),
            });
        }

        fragment.set_data(data).await?;
        fragment.save().await?;

        info!(owner_id = %owner_id, fragment_id = %id, size = fragment.size(), "updated fragment");
        Ok(fragment.into_record())
    }

    /// Fetch a fragment's payload, converted when `extension` is given.
    pub async fn read(
        &self,
        owner_id: &OwnerId,
        id: &FragmentId,
        extension: Option<&str>,
    ) -> Result<Rendered, FragmentError> {
        let fragment = self.fragments.by_id(owner_id, id).await?;
        let converted = fragment.convert(extension).await?;
        info!(
            owner_id = %owner_id,
            fragment_id = %id,
            extension = extension.unwrap_or_default(),
            content_type = %converted.content_type,
            "read fragment"
        );
        Ok(converted.into())
    }

    /// Metadata of one fragment.
    pub async fn info(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<FragmentRecord, FragmentError> {
        Ok(self.fragments.by_id(owner_id, id).await?.into_record())
    }

    pub async fn list(&self, owner_id: &OwnerId, expand: bool) -> Result<FragmentList, FragmentError> {
        self.fragments.by_user(owner_id, expand).await
    }

    /// Delete a fragment, reporting [`FragmentError::NotFound`] if it does
    /// not exist.
    pub async fn delete(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<(), FragmentError> {
        self.fragments.by_id(owner_id, id).await?;
        self.fragments.delete(owner_id, id).await
    }
}
