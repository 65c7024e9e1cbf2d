pub mod entry_service;
pub mod fixed_bill_service;
pub mod installment_service;
pub mod summary_service;

pub use entry_service::EntryService;
pub use fixed_bill_service::{FixedBillService, GenerationOutcome, GenerationReport};
pub use installment_service::InstallmentService;
pub use summary_service::SummaryService;

pub type ServiceResult<T> = crate::errors::Result<T>;
