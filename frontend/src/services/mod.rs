//! # Services
//!
//! Seams to the outside world: the remote dashboard API and the session store.

pub mod api;
pub mod session;
pub mod snapshot_file;

pub use api::DashboardApi;
pub use session::{FileSessionStore, InMemorySessionStore, SessionStore};
pub use snapshot_file::SnapshotFileApi;
