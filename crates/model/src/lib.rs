//! The fragment model.
//!
//! [`Fragments`] is the repository over an injected [`FragmentStore`], handing
//! out transient [`Fragment`] views rehydrated on every lookup.
//! [`FragmentService`] composes them into the create/read/update/delete flows
//! a transport calls.
//!
//! [`FragmentStore`]: fragments_store::FragmentStore

mod fragment;
mod repository;
mod service;

pub use fragment::{Fragment, FragmentDraft};
pub use repository::{FragmentList, Fragments};
pub use service::{FragmentService, Rendered};
