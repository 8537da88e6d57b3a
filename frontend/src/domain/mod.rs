//! # Domain Module
//!
//! Pure, UI-agnostic logic for the transaction dashboard.
//!
//! - **transaction_mapper**: validates wire records into transactions
//! - **transaction_table**: display formatting shared by the list and search
//! - **transaction_list**: filter, sort and paginate a transaction collection

pub mod transaction_list;
pub mod transaction_mapper;
pub mod transaction_table;

pub use transaction_list::{project, Page, TransactionProjector};
pub use transaction_mapper::{MappedRecords, TransactionMapper};
pub use transaction_table::{FormattedTransaction, TransactionTableService};
