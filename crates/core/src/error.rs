use thiserror::Error;

/// Every failure the fragment model, the conversion engine and the storage
/// backends can surface to a caller.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// Malformed input: missing owner or type, negative size, or an
    /// unparseable Content-Type.
    #[error("validation error: {0}")]
    Validation(String),

    /// The base media type is not in the supported set.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// No metadata or payload exists for the key.
    #[error("fragment not found: owner={owner_id}, id={id}")]
    NotFound { owner_id: String, id: String },

    /// The requested extension is not a legal rendering of the stored type.
    #[error("unsupported conversion: {from} to .{extension}")]
    UnsupportedConversion { from: String, extension: String },

    /// An update declared a Content-Type different from the stored one.
    #[error("type mismatch: fragment is {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A legal conversion failed on the stored bytes.
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl FragmentError {
    /// Build a [`FragmentError::NotFound`] for the given key parts.
    pub fn not_found(owner_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            owner_id: owner_id.into(),
            id: id.into(),
        }
    }

    /// Returns `true` if the caller can fix the request and retry.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Conversion(_) | Self::Storage(_))
    }
}
