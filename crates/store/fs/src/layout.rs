//! On-disk layout: `<root>/<owner>/<id>.json` and `<root>/<owner>/<id>.data`.
//!
//! Owner and id components are percent-encoded so opaque identifiers can
//! never contain a path separator or a leading dot.

use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use fragments_store::key::FragmentKey;

pub(crate) const METADATA_EXT: &str = "json";
pub(crate) const DATA_EXT: &str = "data";

/// Everything except `[A-Za-z0-9_-]` is encoded; `.` is encoded so the
/// extension split below is unambiguous.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

pub(crate) fn encode(component: &str) -> String {
    utf8_percent_encode(component, COMPONENT).to_string()
}

pub(crate) fn decode(component: &str) -> Option<String> {
    percent_decode_str(component)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

pub(crate) fn owner_dir(root: &Path, owner_id: &str) -> PathBuf {
    root.join(encode(owner_id))
}

pub(crate) fn metadata_path(root: &Path, key: &FragmentKey) -> PathBuf {
    owner_dir(root, &key.owner_id).join(format!("{}.{METADATA_EXT}", encode(&key.id)))
}

pub(crate) fn data_path(root: &Path, key: &FragmentKey) -> PathBuf {
    owner_dir(root, &key.owner_id).join(format!("{}.{DATA_EXT}", encode(&key.id)))
}

/// Temp files start with `.` which no encoded component can, so listings
/// skip them.
pub(crate) fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}

/// Decode the fragment id from a metadata file name, if it is one.
pub(crate) fn id_from_metadata_name(file_name: &str) -> Option<String> {
    if file_name.starts_with('.') {
        return None;
    }
    let stem = file_name.strip_suffix(METADATA_EXT)?.strip_suffix('.')?;
    decode(stem)
}
