mod config;
mod layout;
mod store;

pub use config::FsConfig;
pub use store::FsFragmentStore;
