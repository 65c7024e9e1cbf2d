use chrono::Utc;

use super::{
    entry::{Entry, EntryId, PaymentStatus},
    fixed_bill::FixedBill,
    period::YearMonth,
};
use crate::errors::{LedgerError, Result};

/// Issues integer ids from the millisecond clock, strictly increasing even
/// when several are requested within the same millisecond.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn seeded(last: u64) -> Self {
        Self { last }
    }

    pub fn next_id(&mut self) -> EntryId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.next_at(now)
    }

    pub fn next_at(&mut self, now_ms: u64) -> EntryId {
        let id = now_ms.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}

/// Outcome of removing a fixed bill together with its generated entries.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBillRemoval {
    pub bill: Option<FixedBill>,
    pub entries_removed: usize,
}

/// In-memory entry store and fixed-bill registry.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub entries: Vec<Entry>,
    pub fixed_bills: Vec<FixedBill>,
    /// Last month for which fixed bills were materialized.
    pub last_generated: Option<YearMonth>,
    ids: IdGenerator,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from persisted collections, seeding the id generator
    /// past every id already in use.
    pub fn from_parts(
        entries: Vec<Entry>,
        fixed_bills: Vec<FixedBill>,
        last_generated: Option<YearMonth>,
    ) -> Self {
        let highest = entries
            .iter()
            .flat_map(|entry| [Some(entry.id), entry.installment_group_id()])
            .flatten()
            .chain(fixed_bills.iter().map(|bill| bill.id))
            .max()
            .unwrap_or_default();
        Self {
            entries,
            fixed_bills,
            last_generated,
            ids: IdGenerator::seeded(highest),
        }
    }

    pub fn next_id(&mut self) -> EntryId {
        self.ids.next_id()
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    pub fn add_entry(&mut self, entry: Entry) -> EntryId {
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    pub fn add_fixed_bill(&mut self, bill: FixedBill) -> EntryId {
        let id = bill.id;
        self.fixed_bills.push(bill);
        id
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn fixed_bill(&self, id: EntryId) -> Option<&FixedBill> {
        self.fixed_bills.iter().find(|bill| bill.id == id)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Removes exactly one entry; siblings and templates are left untouched.
    pub fn remove_entry(&mut self, id: EntryId) -> Option<Entry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Removes every entry belonging to the installment group.
    pub fn remove_installment_group(&mut self, group_id: EntryId) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.installment_group_id() != Some(group_id));
        before - self.entries.len()
    }

    /// Removes the bill and every entry generated from it, across all months.
    pub fn remove_fixed_bill(&mut self, bill_id: EntryId) -> FixedBillRemoval {
        let bill = self
            .fixed_bills
            .iter()
            .position(|bill| bill.id == bill_id)
            .map(|index| self.fixed_bills.remove(index));
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.fixed_bill_id() != Some(bill_id));
        FixedBillRemoval {
            bill,
            entries_removed: before - self.entries.len(),
        }
    }

    pub fn set_status(&mut self, id: EntryId, status: PaymentStatus) -> Result<()> {
        let entry = self
            .entry_mut(id)
            .ok_or_else(|| LedgerError::NotFound(format!("entry {id}")))?;
        entry.status = status;
        Ok(())
    }
}
