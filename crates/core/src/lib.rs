pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod quotation_service;
pub mod validation;

pub use domain::customer::{Customer, CustomerId, CustomerInfo, CustomerResolution};
pub use domain::draft::{DraftEdit, DraftOpeningId, OpeningChange, QuotationDraft, SurchargeChange};
pub use domain::opening::{FrameStyle, MountType, Opening, OpeningType, OperatingSystem};
pub use domain::quotation::{
    MonthlyRevenue, NewQuotation, QuotationId, QuotationRecord, QuotationSummary, SubmitOutcome,
    SubmitRequest,
};
pub use domain::surcharge::{CountedSurcharge, PercentSurcharge, SurchargeSelections};
pub use errors::{ApplicationError, DomainError, FieldViolation, InterfaceError};
pub use pricing::{DeterministicPricingEngine, PricingBreakdown, PricingEngine};
pub use quotation_service::{QuotationService, QuotationServiceSettings, QuotationStore};
