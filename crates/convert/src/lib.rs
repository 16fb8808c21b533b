//! Representation negotiation for stored fragments.
//!
//! [`registry`] holds the conversion matrix: for every supported stored type,
//! the extensions it may be rendered as, the media type emitted and the
//! transform used. [`convert`] applies it to a payload.

pub mod engine;
mod markdown;
mod raster;
pub mod registry;

pub use engine::{Converted, convert};
pub use registry::{KNOWN_EXTENSIONS, Target, Transform, lookup, normalize_extension, targets};
