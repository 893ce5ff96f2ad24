//! The two-phase sale submission runner.
//!
//! Phase one creates the sale header and yields the sale id; phase two
//! posts every line concurrently and waits for all of them to settle.
//! There is no rollback: a detail failure after the header exists leaves a
//! partial sale on the backend, so the error names exactly which lines
//! failed and `retry_details` can replay just those.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

use caja_core::{
    plan_submission, DomainError, ProductDetail, ProductDetailId, SaleDetailPlan, SaleDraft,
    SaleId, SubmissionPlan,
};

use crate::error::GatewayError;
use crate::sales::SaleGateway;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// One line that did not make it to the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct FailedDetail {
    pub detail: SaleDetailPlan,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// A previous submission never settled (its future was dropped
    /// mid-flight). The sale may or may not exist on the backend; the
    /// caller must acknowledge with [`SaleSubmitter::reset`].
    #[error("a submission is already in flight")]
    InFlight,
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error("creating the sale failed: {0}")]
    CreateSale(#[source] GatewayError),
    #[error("sale was created but {} of its lines failed", failed.len())]
    PartialDetails { sale: SaleId, failed: Vec<FailedDetail> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub sale: SaleId,
}

/// Drives one sale at a time through the backend. Not re-entrant: the
/// state machine refuses to start while a previous run is unresolved.
pub struct SaleSubmitter<G> {
    gateway: Arc<G>,
    state: SubmitState,
}

impl<G: SaleGateway + 'static> SaleSubmitter<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway: Arc::new(gateway), state: SubmitState::Idle }
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Acknowledges an unresolved previous run so a new one may start.
    pub fn reset(&mut self) {
        self.state = SubmitState::Idle;
    }

    /// Validates the draft, creates the sale, then posts every detail
    /// concurrently. On success the caller is expected to clear the draft.
    pub async fn submit(
        &mut self,
        draft: &SaleDraft,
        products: &HashMap<ProductDetailId, ProductDetail>,
    ) -> Result<SubmitOutcome, SubmitError> {
        if matches!(self.state, SubmitState::Validating | SubmitState::Submitting) {
            return Err(SubmitError::InFlight);
        }

        self.state = SubmitState::Validating;
        let plan = match plan_submission(draft, products) {
            Ok(plan) => plan,
            Err(error) => {
                self.state = SubmitState::Failed;
                return Err(error.into());
            }
        };

        self.state = SubmitState::Submitting;
        let outcome = self.run(&plan).await;
        self.state =
            if outcome.is_ok() { SubmitState::Succeeded } else { SubmitState::Failed };
        outcome
    }

    /// Replays only the given details against an already-created sale,
    /// after a partial failure.
    pub async fn retry_details(
        &mut self,
        sale: SaleId,
        details: &[SaleDetailPlan],
    ) -> Result<SubmitOutcome, SubmitError> {
        if matches!(self.state, SubmitState::Validating | SubmitState::Submitting) {
            return Err(SubmitError::InFlight);
        }

        self.state = SubmitState::Submitting;
        let failed = self.post_details(sale, details).await;
        if failed.is_empty() {
            self.state = SubmitState::Succeeded;
            info!(sale = sale.0, "sale details completed on retry");
            Ok(SubmitOutcome { sale })
        } else {
            self.state = SubmitState::Failed;
            Err(SubmitError::PartialDetails { sale, failed })
        }
    }

    async fn run(&self, plan: &SubmissionPlan) -> Result<SubmitOutcome, SubmitError> {
        let sale =
            self.gateway.create_sale(&plan.header).await.map_err(SubmitError::CreateSale)?;

        let failed = self.post_details(sale, &plan.details).await;
        if failed.is_empty() {
            info!(sale = sale.0, lines = plan.details.len(), "sale submitted");
            Ok(SubmitOutcome { sale })
        } else {
            warn!(sale = sale.0, failed = failed.len(), "sale submitted partially");
            Err(SubmitError::PartialDetails { sale, failed })
        }
    }

    async fn post_details(&self, sale: SaleId, details: &[SaleDetailPlan]) -> Vec<FailedDetail> {
        let mut tasks = JoinSet::new();
        let mut pending = HashMap::new();
        for (index, detail) in details.iter().cloned().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let task = detail.clone();
            let handle = tasks.spawn(async move {
                let result = gateway.create_sale_detail(&task, sale).await;
                (index, task, result)
            });
            pending.insert(handle.id(), (index, detail));
        }

        let mut failed = Vec::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, (index, detail, Err(error)))) => {
                    pending.remove(&id);
                    failed.push((index, FailedDetail { detail, error: error.to_string() }));
                }
                Ok((id, _)) => {
                    pending.remove(&id);
                }
                Err(join_error) => {
                    // A panicked task still counts as a failed line.
                    if let Some((index, detail)) = pending.remove(&join_error.id()) {
                        failed.push((
                            index,
                            FailedDetail { detail, error: join_error.to_string() },
                        ));
                    }
                }
            }
        }

        failed.sort_by_key(|(index, _)| *index);
        failed.into_iter().map(|(_, detail)| detail).collect()
    }
}
