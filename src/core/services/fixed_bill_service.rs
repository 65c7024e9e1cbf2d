//! Fixed-bill maintenance and the monthly generation run.

use chrono::NaiveDate;

use crate::ledger::{
    materialize_fixed_bills, EntryId, FixedBill, FixedBillRemoval, Ledger, YearMonth,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The checkpoint already names this month.
    AlreadyGenerated,
    /// No fixed bill exists; the checkpoint is left as it was.
    NoFixedBills,
    /// Entries created for this month (possibly none when every bill
    /// already had one).
    Generated(Vec<EntryId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub period: YearMonth,
    pub outcome: GenerationOutcome,
}

impl GenerationReport {
    pub fn created(&self) -> usize {
        match &self.outcome {
            GenerationOutcome::Generated(ids) => ids.len(),
            _ => 0,
        }
    }

    /// Whether the run changed the ledger or its checkpoint.
    pub fn is_mutation(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Generated(_))
    }
}

pub struct FixedBillService;

impl FixedBillService {
    pub fn list(ledger: &Ledger) -> Vec<&FixedBill> {
        ledger.fixed_bills.iter().collect()
    }

    /// Removes the bill and every entry it generated.
    pub fn remove(ledger: &mut Ledger, bill_id: EntryId) -> FixedBillRemoval {
        ledger.remove_fixed_bill(bill_id)
    }

    /// Materializes this month's fixed-bill entries in memory and advances the
    /// checkpoint. Running it again in the same month does nothing, even if
    /// new fixed bills were registered in between.
    pub fn generate_for_month(ledger: &mut Ledger, today: NaiveDate) -> GenerationReport {
        let period = YearMonth::of(today);
        if ledger.last_generated == Some(period) {
            return GenerationReport {
                period,
                outcome: GenerationOutcome::AlreadyGenerated,
            };
        }
        if ledger.fixed_bills.is_empty() {
            return GenerationReport {
                period,
                outcome: GenerationOutcome::NoFixedBills,
            };
        }

        let mut ids = ledger.ids().clone();
        let created =
            materialize_fixed_bills(today, &ledger.fixed_bills, &ledger.entries, || ids.next_id());
        *ledger.ids_mut() = ids;
        let ids = created.iter().map(|entry| entry.id).collect();
        for entry in created {
            ledger.add_entry(entry);
        }
        ledger.last_generated = Some(period);
        GenerationReport {
            period,
            outcome: GenerationOutcome::Generated(ids),
        }
    }
}
