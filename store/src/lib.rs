//! Abstract storage traits for callscope.
//!
//! Every storage backend (in-memory today, a relational engine tomorrow)
//! implements these traits. The rest of the workspace depends only on the
//! traits.

pub mod blocklist;
pub mod calls;
pub mod error;

pub use blocklist::BlocklistStore;
pub use calls::{CallFilter, CallStore, NewCall};
pub use error::StoreError;
