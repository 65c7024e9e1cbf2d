use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    amount::Amount,
    category::Category,
    entry::{Entry, EntryId, PaymentStatus, Provenance},
};

/// Template for an obligation that produces one entry per month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedBill {
    pub id: EntryId,
    pub description: String,
    pub category: Category,
    pub amount: Amount,
    pub unnecessary: bool,
}

impl FixedBill {
    pub fn new(
        id: EntryId,
        description: impl Into<String>,
        category: Category,
        amount: Amount,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            category,
            amount,
            unnecessary: false,
        }
    }

    /// Builds the unpaid monthly occurrence of this bill.
    pub fn occurrence(&self, id: EntryId, date: NaiveDate) -> Entry {
        Entry {
            id,
            date,
            description: self.description.clone(),
            category: self.category,
            amount: self.amount,
            status: PaymentStatus::Unpaid,
            unnecessary: false,
            provenance: Some(Provenance::FixedBill { bill_id: self.id }),
        }
    }
}
