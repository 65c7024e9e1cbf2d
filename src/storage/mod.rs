pub mod json_backend;
pub mod record;

use crate::{
    errors::Result,
    ledger::{Entry, FixedBill, YearMonth},
};

/// Result of a soft-failing load: the value that could be recovered plus
/// anything the caller should tell the user about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> LoadReport<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }
}

/// Persistence contract for the entry store, the fixed-bill registry, and the
/// monthly generation checkpoint.
///
/// Loads never fail: a missing file yields an empty value and a corrupt one
/// yields an empty value with a warning. Saves overwrite whole collections.
pub trait StorageBackend: Send + Sync {
    fn load_entries(&self) -> LoadReport<Vec<Entry>>;
    fn load_fixed_bills(&self) -> LoadReport<Vec<FixedBill>>;
    fn load_checkpoint(&self) -> LoadReport<Option<YearMonth>>;

    /// Overwrites both collections. When `checkpoint` is given it is committed
    /// together with them.
    fn save_all(
        &self,
        entries: &[Entry],
        fixed_bills: &[FixedBill],
        checkpoint: Option<YearMonth>,
    ) -> Result<()>;

    fn save_checkpoint(&self, period: YearMonth) -> Result<()>;
}

pub use json_backend::JsonStorage;
