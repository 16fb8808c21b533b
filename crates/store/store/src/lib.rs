pub mod error;
pub mod key;
pub mod store;
pub mod testing;

pub use error::StoreError;
pub use key::FragmentKey;
pub use store::{FragmentListing, FragmentStore};
