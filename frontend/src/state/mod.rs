//! # State Modules
//!
//! - **view_state**: user-controlled filter, search, date range, sort and paging
//! - **list_state**: the owned transaction collection and its deletion lifecycle

pub mod list_state;
pub mod view_state;

pub use list_state::{DeletionState, ListState};
pub use view_state::{CategoryFilter, SortOrder, ViewState};
