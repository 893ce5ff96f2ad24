//! Debounced search driving.
//!
//! Keystrokes arrive on a channel; a query is only sent to the backend
//! once the input has been quiet for the configured interval, and every
//! response is routed through a `SearchSession` so a superseded reply can
//! never repopulate the list. A gateway failure logs a warning and leaves
//! the user with an empty list, never an error state.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::warn;

use caja_core::config::SearchConfig;
use caja_core::{Client, ProductDetail, SearchSession};

use crate::catalog::CatalogLookup;
use crate::clients::ClientDirectory;

/// Waits for the input to settle: the value returned is the last one seen
/// before a full quiet interval passed (or before the channel closed).
/// `None` once the channel is closed and drained.
pub async fn next_settled(
    input: &mut mpsc::Receiver<String>,
    quiet: Duration,
) -> Option<String> {
    let mut latest = input.recv().await?;
    loop {
        tokio::select! {
            next = input.recv() => match next {
                Some(value) => latest = value,
                None => return Some(latest),
            },
            _ = sleep(quiet) => return Some(latest),
        }
    }
}

/// Runs settled queries against a gateway, one session per result list.
#[derive(Clone, Copy, Debug)]
pub struct DebouncedSearch {
    quiet: Duration,
}

impl DebouncedSearch {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(Duration::from_millis(config.debounce_ms))
    }

    /// Consumes keystrokes until the channel closes, searching the catalog
    /// for each settled query under the session's current warehouse.
    pub async fn drive_catalog<G: CatalogLookup>(
        &self,
        gateway: &G,
        session: &mut SearchSession<ProductDetail>,
        keystrokes: &mut mpsc::Receiver<String>,
    ) {
        while let Some(query) = next_settled(keystrokes, self.quiet).await {
            let Some(warehouse) = session.warehouse() else {
                continue;
            };
            let ticket = session.begin();
            match gateway.search_products(warehouse, &query).await {
                Ok(results) => {
                    session.accept(ticket, results);
                }
                Err(error) => {
                    warn!(%error, query, "catalog search failed");
                    session.fail(ticket);
                }
            }
        }
    }

    /// Same loop against the registered-client directory.
    pub async fn drive_clients<G: ClientDirectory>(
        &self,
        gateway: &G,
        session: &mut SearchSession<Client>,
        keystrokes: &mut mpsc::Receiver<String>,
    ) {
        while let Some(query) = next_settled(keystrokes, self.quiet).await {
            let ticket = session.begin();
            match gateway.search_clients(&query).await {
                Ok(results) => {
                    session.accept(ticket, results);
                }
                Err(error) => {
                    warn!(%error, query, "client search failed");
                    session.fail(ticket);
                }
            }
        }
    }
}
