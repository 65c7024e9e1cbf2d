//! Business logic helpers for single ledger entries.

use crate::core::services::ServiceResult;
use crate::ledger::{Entry, EntryDraft, EntryId, Ledger, PaymentStatus, Provenance};

/// Validated add/remove/status helpers for entries.
pub struct EntryService;

impl EntryService {
    /// Adds a single-payment entry and returns its identifier. A recurring
    /// draft also registers a fixed bill, and the entry becomes its first
    /// occurrence.
    pub fn add(ledger: &mut Ledger, draft: EntryDraft) -> ServiceResult<EntryId> {
        draft.validate()?;
        let bill = draft
            .recurring
            .then(|| draft.to_fixed_bill(ledger.next_id()));
        let mut entry = draft.into_entry(ledger.next_id());
        if let Some(bill) = bill {
            entry.provenance = Some(Provenance::FixedBill { bill_id: bill.id });
            ledger.add_fixed_bill(bill);
        }
        Ok(ledger.add_entry(entry))
    }

    /// Removes exactly the entry identified by `id`, if present.
    pub fn remove(ledger: &mut Ledger, id: EntryId) -> Option<Entry> {
        ledger.remove_entry(id)
    }

    /// Changes the status of one entry without touching siblings or templates.
    pub fn set_status(ledger: &mut Ledger, id: EntryId, status: PaymentStatus) -> ServiceResult<()> {
        ledger.set_status(id, status)
    }
}
