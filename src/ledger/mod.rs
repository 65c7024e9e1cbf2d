//! Ledger domain models, expansion algorithms, and aggregations.

pub mod amount;
pub mod category;
pub mod draft;
pub mod entry;
pub mod fixed_bill;
pub mod installments;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;
pub mod recurring;
pub mod summary;

pub use amount::{Amount, AmountKind};
pub use category::Category;
pub use draft::{EntryDraft, InstallmentIntent, MAX_INSTALLMENTS};
pub use entry::{Entry, EntryId, PaymentStatus, Provenance};
pub use fixed_bill::FixedBill;
pub use installments::{installment_groups, split_purchase, InstallmentGroup};
pub use ledger::{FixedBillRemoval, IdGenerator, Ledger};
pub use period::YearMonth;
pub use recurring::materialize_fixed_bills;
pub use summary::{
    by_category, current_month_entries, entries_in_period, monthly_totals, summarize,
    CategoryBreakdown, FinancialHealth, MonthlyTotals, Summary,
};
