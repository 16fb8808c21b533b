use std::sync::Arc;

use tracing::{debug, info};

use fragments_core::{FragmentError, FragmentId, FragmentRecord, OwnerId};
use fragments_store::{FragmentKey, FragmentListing, FragmentStore};

use crate::fragment::{Fragment, FragmentDraft};

/// Result of [`Fragments::by_user`].
#[derive(Debug)]
pub enum FragmentList {
    Ids(Vec<String>),
    Fragments(Vec<Fragment>),
}

impl FragmentList {
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Fragments(fragments) => fragments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the store handles, keeping the listing shape.
    pub fn into_listing(self) -> FragmentListing {
        match self {
            Self::Ids(ids) => FragmentListing::Ids(ids),
            Self::Fragments(fragments) => FragmentListing::Records(
                fragments.into_iter().map(Fragment::into_record).collect(),
            ),
        }
    }
}

/// Repository handle over an injected store.
///
/// Cheap to clone; every clone shares the same backend.
#[derive(Clone)]
pub struct Fragments {
    store: Arc<dyn FragmentStore>,
}

impl std::fmt::Debug for Fragments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragments").finish_non_exhaustive()
    }
}

impl Fragments {
    pub fn new(store: Arc<dyn FragmentStore>) -> Self {
        Self { store }
    }

    /// Validate a draft and build an unsaved fragment. No I/O.
    pub fn construct(&self, draft: FragmentDraft) -> Result<Fragment, FragmentError> {
        let (record, media) = draft.into_record()?;
        Ok(Fragment::new(record, media, Arc::clone(&self.store)))
    }

    /// Every fragment owned by `owner_id`, as ids or full views.
    pub async fn by_user(
        &self,
        owner_id: &OwnerId,
        expand: bool,
    ) -> Result<FragmentList, FragmentError> {
        let listing = self.store.list_fragments(owner_id, expand).await?;
        debug!(owner_id = %owner_id, count = listing.len(), expand, "listed fragments");
        match listing {
            FragmentListing::Ids(ids) => Ok(FragmentList::Ids(ids)),
            FragmentListing::Records(records) => records
                .into_iter()
                .map(|record: FragmentRecord| Fragment::from_stored(record, Arc::clone(&self.store)))
                .collect::<Result<Vec<_>, _>>()
                .map(FragmentList::Fragments),
        }
    }

    /// Look up one fragment.
    pub async fn by_id(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<Fragment, FragmentError> {
        let key = FragmentKey::new(owner_id.clone(), id.clone());
        let record = self
            .store
            .read_fragment(&key)
            .await?
            .ok_or_else(|| FragmentError::not_found(owner_id.as_str(), id.as_str()))?;
        Fragment::from_stored(record, Arc::clone(&self.store))
    }

    /// Remove metadata and payload. Deleting an absent fragment succeeds.
    pub async fn delete(&self, owner_id: &OwnerId, id: &FragmentId) -> Result<(), FragmentError> {
        let key = FragmentKey::new(owner_id.clone(), id.clone());
        let existed = self.store.delete_fragment(&key).await?;
        info!(owner_id = %owner_id, fragment_id = %id, existed, "deleted fragment");
        Ok(())
    }
}
