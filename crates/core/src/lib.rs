pub mod config;
pub mod domain;
pub mod draft;
pub mod errors;
pub mod pricing;
pub mod resolver;
pub mod search;
pub mod submission;

pub use domain::client::{Client, ClientId, ClientRef};
pub use domain::product::{ProductDetail, ProductDetailId, WarehouseId};
pub use domain::sale::{Discount, DiscountKind, SaleId, SaleLine, UnitBasis};
pub use draft::{SaleDraft, Totals, WarehouseSwitch};
pub use errors::DomainError;
pub use resolver::ClientResolver;
pub use search::{Acceptance, SearchSession, SearchState, SearchTicket};
pub use submission::{plan_submission, SaleDetailPlan, SaleHeader, SubmissionPlan};
