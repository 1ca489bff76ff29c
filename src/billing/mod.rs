//! Bill-sheet core: service-date validation, duplicate/hold detection,
//! unit-block accounting, billed amounts, page filters and the
//! create/update workflow that ties them together in one transaction.

pub mod amount;
pub mod duplicate;
pub mod filter;
pub mod ledger;
pub mod pager;
pub mod service_date;
pub mod workflow;

pub use amount::compute_billed_amount;
pub use filter::{BillSheetFilter, FilterCondition};
pub use pager::{BillSheetPage, Pager};
pub use workflow::BillSheetWrite;

use crate::db::DatabaseError;

/// Closing sentence of conflicts only an administrator can resolve.
pub(crate) const SEE_ADMINISTRATOR: &str = "Please see the billing administrator.";

/// Failures of a bill-sheet operation, one variant per kind of caller error.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// Illegal or malformed service date.
    #[error("{0}")]
    Validation(String),
    /// Duplicate entry, too many hold matches, or an overdrawn unit block.
    #[error("{0}")]
    Conflict(String),
    /// The consumer has no unit block for the service code.
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    NotFound(String),
    /// A page filter names a field, operator or value that is not allowed.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error(transparent)]
    Persistence(#[from] DatabaseError),
}

impl From<rusqlite::Error> for BillingError {
    fn from(err: rusqlite::Error) -> Self {
        BillingError::Persistence(DatabaseError::Sqlite(err))
    }
}
