//! Services and the persistence-aware facade over the ledger.

pub mod ledger_manager;
pub mod services;
pub mod utils;

pub use ledger_manager::{LedgerManager, LoadMetadata};
