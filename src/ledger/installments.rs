//! Installment splitting and the derived per-group view.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use super::{
    amount::AmountKind,
    category::Category,
    draft::InstallmentIntent,
    entry::{Entry, EntryId, PaymentStatus, Provenance},
};
use crate::errors::{LedgerError, Result};

/// Days between consecutive installments.
pub const INSTALLMENT_STRIDE_DAYS: i64 = 30;

/// Expands a purchase into `intent.installments` entries sharing `group_id`.
///
/// Each installment gets `total / n` cents and the last one also takes the
/// remainder, so the parts always add up to the purchase amount. Only the
/// first installment keeps the requested payment status.
pub fn split_purchase(
    intent: &InstallmentIntent,
    group_id: EntryId,
    mut next_id: impl FnMut() -> EntryId,
) -> Result<Vec<Entry>> {
    intent.validate()?;
    let total = intent.installments;
    let count = i64::from(total);
    let base = intent.amount.cents / count;
    let remainder = intent.amount.cents % count;
    let description = intent.description.trim();

    (0..total)
        .map(|index| {
            let offset = Duration::days(INSTALLMENT_STRIDE_DAYS * i64::from(index));
            let date = intent.date.checked_add_signed(offset).ok_or_else(|| {
                LedgerError::invalid(format!(
                    "installment {} of {} falls outside the supported calendar",
                    index + 1,
                    total
                ))
            })?;
            let is_last = index + 1 == total;
            let cents = if is_last { base + remainder } else { base };
            let status = if index == 0 {
                intent.status
            } else {
                PaymentStatus::Unpaid
            };
            Ok(Entry {
                id: next_id(),
                date,
                description: format!("{} ({}/{})", description, index + 1, total),
                category: intent.category,
                amount: intent.amount.with_cents(cents),
                status,
                unnecessary: intent.unnecessary,
                provenance: Some(Provenance::Installment {
                    group_id,
                    index,
                    total,
                    original_description: description.to_string(),
                }),
            })
        })
        .collect()
}

/// Read-only view over the live members of one installment group.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentGroup {
    pub group_id: EntryId,
    pub description: String,
    pub category: Category,
    pub kind: AmountKind,
    pub per_installment: i64,
    pub total_installments: u32,
    /// Members ordered by date.
    pub members: Vec<Entry>,
    pub paid_installments: usize,
    pub total_value: i64,
    pub paid_value: i64,
    pub remaining_value: i64,
}

impl InstallmentGroup {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.members.first().map(|entry| entry.date)
    }

    /// Installments of the original plan that no longer exist.
    pub fn missing_installments(&self) -> usize {
        (self.total_installments as usize).saturating_sub(self.members.len())
    }

    pub fn is_settled(&self) -> bool {
        self.remaining_value == 0
    }
}

/// Groups entries by installment group id, ordered by first installment date.
pub fn installment_groups(entries: &[Entry]) -> Vec<InstallmentGroup> {
    let mut buckets: BTreeMap<EntryId, Vec<&Entry>> = BTreeMap::new();
    for entry in entries {
        if let Some(group_id) = entry.installment_group_id() {
            buckets.entry(group_id).or_default().push(entry);
        }
    }

    let mut groups: Vec<InstallmentGroup> = buckets
        .into_iter()
        .filter_map(|(group_id, mut members)| {
            members.sort_by_key(|entry| (entry.date, entry.id));
            build_group(group_id, &members)
        })
        .collect();
    groups.sort_by_key(|group| (group.start_date(), group.group_id));
    groups
}

fn build_group(group_id: EntryId, members: &[&Entry]) -> Option<InstallmentGroup> {
    let first = members.first()?;
    let (description, total_installments) = match &first.provenance {
        Some(Provenance::Installment {
            original_description,
            total,
            ..
        }) => (original_description.clone(), *total),
        _ => (strip_installment_suffix(&first.description), 0),
    };
    let paid: Vec<&&Entry> = members.iter().filter(|entry| entry.is_paid()).collect();
    let total_value: i64 = members.iter().map(|entry| entry.amount.cents).sum();
    let paid_value: i64 = paid.iter().map(|entry| entry.amount.cents).sum();

    Some(InstallmentGroup {
        group_id,
        description,
        category: first.category,
        kind: first.amount.kind,
        per_installment: first.amount.cents,
        total_installments,
        members: members.iter().map(|entry| (*entry).clone()).collect(),
        paid_installments: paid.len(),
        total_value,
        paid_value,
        remaining_value: total_value - paid_value,
    })
}

fn strip_installment_suffix(description: &str) -> String {
    description
        .split(" (")
        .next()
        .unwrap_or(description)
        .to_string()
}
