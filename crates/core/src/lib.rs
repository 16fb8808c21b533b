pub mod error;
pub mod fragment;
pub mod media_type;
pub mod types;

pub use error::FragmentError;
pub use fragment::FragmentRecord;
pub use media_type::{MediaType, SupportedType, is_supported_type};
pub use types::{FragmentId, OwnerId};
