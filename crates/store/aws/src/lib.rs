mod config;
mod item;
mod store;
mod table;

pub use config::AwsStoreConfig;
pub use store::{AwsFragmentStore, build_clients};
pub use table::create_table;
