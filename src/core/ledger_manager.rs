use chrono::NaiveDate;

use crate::core::services::{
    EntryService, FixedBillService, GenerationReport, InstallmentService, SummaryService,
};
use crate::errors::Result;
use crate::ledger::{
    CategoryBreakdown, Entry, EntryDraft, EntryId, FixedBill, FixedBillRemoval, InstallmentGroup,
    InstallmentIntent, Ledger, MonthlyTotals, PaymentStatus, Summary, YearMonth,
};
use crate::storage::StorageBackend;

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone, Default)]
pub struct LoadMetadata {
    pub warnings: Vec<String>,
    pub entries: usize,
    pub fixed_bills: usize,
    pub last_generated: Option<YearMonth>,
}

/// Facade that owns the ledger and writes it through to storage after every
/// mutation.
///
/// When a save fails the in-memory change is kept and the error is returned,
/// so callers can warn that the change was not stored. The monthly generation
/// run is the exception: it is rolled back in memory when its save fails.
pub struct LedgerManager {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            ledger: Ledger::new(),
            storage,
        }
    }

    /// Loads entries, fixed bills and the checkpoint. Never fails; anything
    /// that could not be read is reported in the returned warnings.
    pub fn open(storage: Box<dyn StorageBackend>) -> (Self, LoadMetadata) {
        let entries = storage.load_entries();
        let bills = storage.load_fixed_bills();
        let checkpoint = storage.load_checkpoint();

        let mut warnings = entries.warnings;
        warnings.extend(bills.warnings);
        warnings.extend(checkpoint.warnings);
        let metadata = LoadMetadata {
            warnings,
            entries: entries.value.len(),
            fixed_bills: bills.value.len(),
            last_generated: checkpoint.value,
        };
        tracing::info!(
            entries = metadata.entries,
            fixed_bills = metadata.fixed_bills,
            warnings = metadata.warnings.len(),
            "ledger loaded"
        );

        let ledger = Ledger::from_parts(entries.value, bills.value, checkpoint.value);
        (Self { ledger, storage }, metadata)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn add_entry(&mut self, draft: EntryDraft) -> Result<EntryId> {
        let recurring = draft.recurring;
        let id = EntryService::add(&mut self.ledger, draft)?;
        tracing::info!(entry = id, recurring, "entry added");
        self.persist()?;
        Ok(id)
    }

    /// Splits the purchase into installments and returns the group id.
    pub fn add_installment_purchase(&mut self, intent: &InstallmentIntent) -> Result<EntryId> {
        let group_id = InstallmentService::add_purchase(&mut self.ledger, intent)?;
        tracing::info!(
            group = group_id,
            installments = intent.installments,
            "installment purchase added"
        );
        self.persist()?;
        Ok(group_id)
    }

    pub fn delete_entry(&mut self, id: EntryId) -> Result<Option<Entry>> {
        let removed = EntryService::remove(&mut self.ledger, id);
        if removed.is_some() {
            tracing::info!(entry = id, "entry deleted");
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn delete_installment_group(&mut self, group_id: EntryId) -> Result<usize> {
        let removed = InstallmentService::remove_group(&mut self.ledger, group_id);
        if removed > 0 {
            tracing::info!(group = group_id, removed, "installment group deleted");
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn delete_fixed_bill(&mut self, bill_id: EntryId) -> Result<FixedBillRemoval> {
        let removal = FixedBillService::remove(&mut self.ledger, bill_id);
        if removal.bill.is_some() || removal.entries_removed > 0 {
            tracing::info!(
                bill = bill_id,
                entries_removed = removal.entries_removed,
                "fixed bill deleted"
            );
            self.persist()?;
        }
        Ok(removal)
    }

    pub fn set_payment_status(&mut self, id: EntryId, status: PaymentStatus) -> Result<()> {
        EntryService::set_status(&mut self.ledger, id, status)?;
        tracing::info!(entry = id, %status, "payment status changed");
        self.persist()
    }

    pub fn mark_paid(&mut self, id: EntryId) -> Result<()> {
        self.set_payment_status(id, PaymentStatus::Paid)
    }

    /// Runs the monthly fixed-bill generation for the month of `today`.
    ///
    /// The new entries and the checkpoint are saved together; if that save
    /// fails both are rolled back so the next attempt starts over.
    pub fn run_monthly_generation(&mut self, today: NaiveDate) -> Result<GenerationReport> {
        let entry_count = self.ledger.entries.len();
        let previous = self.ledger.last_generated;

        let report = FixedBillService::generate_for_month(&mut self.ledger, today);
        if !report.is_mutation() {
            tracing::debug!(period = %report.period, outcome = ?report.outcome, "generation skipped");
            return Ok(report);
        }

        let saved = self.storage.save_all(
            &self.ledger.entries,
            &self.ledger.fixed_bills,
            Some(report.period),
        );
        if let Err(err) = saved {
            self.ledger.entries.truncate(entry_count);
            self.ledger.last_generated = previous;
            tracing::warn!(period = %report.period, error = %err, "generation rolled back");
            return Err(err);
        }
        tracing::info!(
            period = %report.period,
            created = report.created(),
            "fixed bills generated"
        );
        Ok(report)
    }

    pub fn summary(&self) -> Summary {
        SummaryService::totals(&self.ledger)
    }

    pub fn category_breakdown(&self) -> Vec<CategoryBreakdown> {
        SummaryService::by_category(&self.ledger)
    }

    pub fn installment_groups(&self) -> Vec<InstallmentGroup> {
        InstallmentService::groups(&self.ledger)
    }

    pub fn monthly_totals(&self) -> Vec<MonthlyTotals> {
        SummaryService::monthly(&self.ledger)
    }

    pub fn current_month_entries(&self, today: NaiveDate) -> Vec<&Entry> {
        SummaryService::current_month(&self.ledger, today)
    }

    pub fn entries_in_period(&self, period: YearMonth) -> Vec<&Entry> {
        SummaryService::period(&self.ledger, period)
    }

    pub fn fixed_bills(&self) -> Vec<&FixedBill> {
        FixedBillService::list(&self.ledger)
    }

    fn persist(&self) -> Result<()> {
        self.storage
            .save_all(&self.ledger.entries, &self.ledger.fixed_bills, None)
            .inspect_err(|err| tracing::error!(error = %err, "ledger changes were not saved"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use crate::ledger::{Amount, Category};
    use crate::storage::LoadReport;
    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    };

    #[derive(Default)]
    struct FlakyStorage {
        fail: Arc<AtomicBool>,
        saves: Arc<AtomicUsize>,
    }

    impl StorageBackend for FlakyStorage {
        fn load_entries(&self) -> LoadReport<Vec<Entry>> {
            LoadReport::clean(Vec::new())
        }

        fn load_fixed_bills(&self) -> LoadReport<Vec<FixedBill>> {
            LoadReport::clean(Vec::new())
        }

        fn load_checkpoint(&self) -> LoadReport<Option<YearMonth>> {
            LoadReport::clean(None)
        }

        fn save_all(&self, _: &[Entry], _: &[FixedBill], _: Option<YearMonth>) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(LedgerError::Storage("disk full".into()));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn save_checkpoint(&self, _: YearMonth) -> Result<()> {
            Ok(())
        }
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn failed_generation_save_rolls_back() {
        let storage = FlakyStorage::default();
        let fail = storage.fail.clone();
        let mut manager = LedgerManager::new(Box::new(storage));
        let draft = EntryDraft::new(june(1), "Gym", Category::Health, Amount::expense(8_000))
            .recurring(true);
        manager.add_entry(draft).unwrap();

        fail.store(true, Ordering::SeqCst);
        let july = NaiveDate::from_ymd_opt(2025, 7, 3).unwrap();
        let err = manager.run_monthly_generation(july).expect_err("save fails");
        assert!(matches!(err, LedgerError::Storage(_)));
        assert_eq!(manager.ledger().entries.len(), 1);
        assert_eq!(manager.ledger().last_generated, None);

        fail.store(false, Ordering::SeqCst);
        let report = manager.run_monthly_generation(july).unwrap();
        assert_eq!(report.created(), 1);
        assert_eq!(manager.ledger().entries.len(), 2);
    }

    #[test]
    fn failed_save_keeps_in_memory_change_and_reports_error() {
        let storage = FlakyStorage::default();
        storage.fail.store(true, Ordering::SeqCst);
        let mut manager = LedgerManager::new(Box::new(storage));
        let draft = EntryDraft::new(june(2), "Fuel", Category::Transport, Amount::expense(20_000));
        let err = manager.add_entry(draft).expect_err("save fails");
        assert!(matches!(err, LedgerError::Storage(_)));
        assert_eq!(manager.ledger().entries.len(), 1);
    }

    #[test]
    fn no_op_deletes_do_not_write() {
        let storage = FlakyStorage::default();
        let saves = storage.saves.clone();
        let mut manager = LedgerManager::new(Box::new(storage));
        assert!(manager.delete_entry(99).unwrap().is_none());
        assert_eq!(manager.delete_installment_group(99).unwrap(), 0);
        assert_eq!(manager.delete_fixed_bill(99).unwrap().entries_removed, 0);
        assert_eq!(saves.load(Ordering::SeqCst), 0);
    }
}
