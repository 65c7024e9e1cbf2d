use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{amount::Amount, category::Category, period::YearMonth};

pub type EntryId = u64;

/// A single ledger record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub unnecessary: bool,
    pub provenance: Option<Provenance>,
}

impl Entry {
    pub fn new(
        id: EntryId,
        date: NaiveDate,
        description: impl Into<String>,
        category: Category,
        amount: Amount,
    ) -> Self {
        Self {
            id,
            date,
            description: description.into(),
            category,
            amount,
            status: PaymentStatus::Unpaid,
            unnecessary: false,
            provenance: None,
        }
    }

    pub fn period(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    pub fn fixed_bill_id(&self) -> Option<EntryId> {
        match self.provenance {
            Some(Provenance::FixedBill { bill_id }) => Some(bill_id),
            _ => None,
        }
    }

    pub fn installment_group_id(&self) -> Option<EntryId> {
        match self.provenance {
            Some(Provenance::Installment { group_id, .. }) => Some(group_id),
            _ => None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    InstallmentPending,
}

impl PaymentStatus {
    /// Persisted identifier of the status.
    pub fn key(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::InstallmentPending => "installment-pending",
        }
    }

    /// Accepts persisted keys and the legacy Portuguese keys.
    pub fn parse(value: &str) -> Option<PaymentStatus> {
        match value.trim().to_lowercase().as_str() {
            "unpaid" | "nao-paga" => Some(PaymentStatus::Unpaid),
            "paid" | "paga" => Some(PaymentStatus::Paid),
            "installment-pending" | "pending" | "parcelada" => {
                Some(PaymentStatus::InstallmentPending)
            }
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Link from a generated entry back to whatever produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Provenance {
    FixedBill {
        bill_id: EntryId,
    },
    Installment {
        group_id: EntryId,
        /// Zero-based position inside the group.
        index: u32,
        total: u32,
        original_description: String,
    },
}
