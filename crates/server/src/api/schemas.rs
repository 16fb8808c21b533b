use serde::Serialize;

use fragments_core::FragmentRecord;
use fragments_store::FragmentListing;

/// Success envelope: `{"status":"ok", ...body}`.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub status: &'static str,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Success<T> {
    pub fn new(body: T) -> Self {
        Self { status: "ok", body }
    }
}

/// Health check body.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub version: &'static str,
}

/// A single fragment's metadata.
#[derive(Debug, Serialize)]
pub struct FragmentBody {
    pub fragment: FragmentRecord,
}

/// An owner's fragments, as ids or records.
#[derive(Debug, Serialize)]
pub struct ListBody {
    pub fragments: FragmentListing,
}

/// Confirmation of a delete.
#[derive(Debug, Serialize)]
pub struct DeleteBody {
    pub message: String,
}
