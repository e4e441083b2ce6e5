pub mod errors;
pub mod loan_ledger;
pub mod record_store;

pub use errors::StoreError;
pub use loan_ledger::*;
pub use record_store::*;
