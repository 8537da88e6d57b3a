//! # Finance Dashboard Frontend Core
//!
//! The UI-agnostic part of the personal-finance dashboard: the transaction
//! list view model and everything it needs.
//!
//! ## Architecture
//!
//! ```text
//! UI layer (rendering, routing)
//!     ↓
//! view_model   (TransactionListViewModel: view state, optimistic delete)
//!     ↓
//! domain       (mapping, formatting, projection; pure)
//!     ↓
//! services     (DashboardApi, SessionStore)
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod services;
pub mod state;
pub mod view_model;

pub use config::{DashboardConfig, DateDisplayConfig};
pub use domain::{project, Page, TransactionProjector};
pub use errors::{ApiError, DashboardError};
pub use state::{CategoryFilter, DeletionState, SortOrder, ViewState};
pub use view_model::{DeleteOutcome, TransactionListViewModel};
