//! REST backend client for caja.
//!
//! Everything backend-shaped lives here: the wire DTOs with the backend's
//! own field names, the id codec, the gateway traits and their HTTP
//! implementations, the debounced search plumbing, and the two-phase sale
//! submission runner. The domain crate never sees a wire type.

pub mod catalog;
pub mod client;
pub mod clients;
pub mod error;
pub mod ids;
pub mod sales;
pub mod search;
pub mod submit;
mod wire;

pub use catalog::{CatalogLookup, HttpCatalog};
pub use client::BackendClient;
pub use clients::{ClientDirectory, HttpClientDirectory};
pub use error::GatewayError;
pub use sales::{HttpSaleGateway, SaleGateway};
pub use search::DebouncedSearch;
pub use submit::{FailedDetail, SaleSubmitter, SubmitError, SubmitOutcome, SubmitState};
