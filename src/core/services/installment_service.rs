use crate::core::services::ServiceResult;
use crate::ledger::{
    installment_groups, split_purchase, EntryId, InstallmentGroup, InstallmentIntent, Ledger,
};

pub struct InstallmentService;

impl InstallmentService {
    /// Splits the purchase and appends every installment. Returns the group id.
    pub fn add_purchase(ledger: &mut Ledger, intent: &InstallmentIntent) -> ServiceResult<EntryId> {
        intent.validate()?;
        let group_id = ledger.next_id();
        let installments = split_purchase(intent, group_id, || ledger.next_id())?;
        for entry in installments {
            ledger.add_entry(entry);
        }
        Ok(group_id)
    }

    /// Removes all remaining members of the group; removing an empty or
    /// unknown group is a no-op.
    pub fn remove_group(ledger: &mut Ledger, group_id: EntryId) -> usize {
        ledger.remove_installment_group(group_id)
    }

    pub fn groups(ledger: &Ledger) -> Vec<InstallmentGroup> {
        installment_groups(&ledger.entries)
    }
}
