use chrono::NaiveDate;

use super::{
    entry::{Entry, EntryId},
    fixed_bill::FixedBill,
    period::YearMonth,
};

/// Builds the missing monthly occurrences of every fixed bill for the month of
/// `today`. A bill that already has an entry in that month is skipped, which
/// keeps a rerun after a partial earlier run from duplicating entries.
pub fn materialize_fixed_bills(
    today: NaiveDate,
    fixed_bills: &[FixedBill],
    entries: &[Entry],
    mut next_id: impl FnMut() -> EntryId,
) -> Vec<Entry> {
    let period = YearMonth::of(today);

    fixed_bills
        .iter()
        .filter(|bill| !has_occurrence(entries, bill.id, period))
        .map(|bill| bill.occurrence(next_id(), today))
        .collect()
}

fn has_occurrence(entries: &[Entry], bill_id: EntryId, period: YearMonth) -> bool {
    entries
        .iter()
        .any(|entry| entry.fixed_bill_id() == Some(bill_id) && period.contains(entry.date))
}
