//! User intents that the ledger turns into one or more persisted entries.

use chrono::NaiveDate;

use super::{
    amount::Amount,
    category::Category,
    entry::{Entry, EntryId, PaymentStatus},
    fixed_bill::FixedBill,
};
use crate::errors::{LedgerError, Result};

/// Upper bound on the installments of one purchase (thirty years of months).
pub const MAX_INSTALLMENTS: u32 = 360;

/// A single-payment entry, optionally registered as a monthly fixed bill.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub amount: Amount,
    pub status: PaymentStatus,
    pub unnecessary: bool,
    pub recurring: bool,
}

impl EntryDraft {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: Category,
        amount: Amount,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            category,
            amount,
            status: PaymentStatus::Unpaid,
            unnecessary: false,
            recurring: false,
        }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn unnecessary(mut self, unnecessary: bool) -> Self {
        self.unnecessary = unnecessary;
        self
    }

    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_common(&self.description, &self.amount)
    }

    pub fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            date: self.date,
            description: self.description.trim().to_string(),
            category: self.category,
            amount: self.amount,
            status: self.status,
            unnecessary: self.unnecessary,
            provenance: None,
        }
    }

    pub fn to_fixed_bill(&self, id: EntryId) -> FixedBill {
        FixedBill {
            id,
            description: self.description.trim().to_string(),
            category: self.category,
            amount: self.amount,
            unnecessary: self.unnecessary,
        }
    }
}

/// A purchase paid in `installments` monthly parts.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentIntent {
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    /// Total purchase amount.
    pub amount: Amount,
    pub installments: u32,
    pub status: PaymentStatus,
    pub unnecessary: bool,
}

impl InstallmentIntent {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: Category,
        amount: Amount,
        installments: u32,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            category,
            amount,
            installments,
            status: PaymentStatus::Unpaid,
            unnecessary: false,
        }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn unnecessary(mut self, unnecessary: bool) -> Self {
        self.unnecessary = unnecessary;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.installments < 2 {
            return Err(LedgerError::invalid(format!(
                "installment purchases need at least 2 installments, got {}",
                self.installments
            )));
        }
        if self.installments > MAX_INSTALLMENTS {
            return Err(LedgerError::invalid(format!(
                "installment purchases allow at most {MAX_INSTALLMENTS} installments, got {}",
                self.installments
            )));
        }
        validate_common(&self.description, &self.amount)
    }
}

fn validate_common(description: &str, amount: &Amount) -> Result<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::invalid("description must not be empty"));
    }
    if !amount.is_positive() {
        return Err(LedgerError::invalid(format!(
            "{} amount must be greater than zero",
            amount.kind
        )));
    }
    Ok(())
}
