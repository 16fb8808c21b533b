mod store;

pub use store::MemoryFragmentStore;
