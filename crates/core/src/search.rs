//! Stale-result discarding for backend searches.
//!
//! Responses may arrive out of order, and a warehouse change invalidates
//! everything still in flight. `SearchSession` solves both with a single
//! monotonic sequence number: each request gets a ticket, and only the
//! ticket matching the latest sequence (and the current warehouse) may
//! install results. Everything else is reported stale and discarded.
//!
//! The session is transport-agnostic; the async plumbing that actually
//! issues requests lives with the backend gateways.

use crate::domain::product::WarehouseId;

/// Handle for one issued search request. Carries enough context to decide,
/// on completion, whether the response is still the one the user wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    warehouse: Option<WarehouseId>,
}

/// Verdict on a completed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acceptance {
    /// The response was current and its results were installed.
    Applied,
    /// A newer request or a warehouse switch superseded this response.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// No search issued yet, or the session was reset.
    Idle,
    /// The latest request has not settled.
    Searching,
    /// The latest request settled and its results are current.
    Resolved,
}

/// Search lifecycle for one result list, optionally scoped to a warehouse.
#[derive(Clone, Debug)]
pub struct SearchSession<T> {
    warehouse: Option<WarehouseId>,
    seq: u64,
    state: SearchState,
    results: Vec<T>,
}

impl<T> SearchSession<T> {
    /// A warehouse-scoped session (product catalog).
    pub fn for_warehouse(warehouse: WarehouseId) -> Self {
        Self { warehouse: Some(warehouse), seq: 0, state: SearchState::Idle, results: Vec::new() }
    }

    /// An unscoped session (client directory).
    pub fn unscoped() -> Self {
        Self { warehouse: None, seq: 0, state: SearchState::Idle, results: Vec::new() }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn warehouse(&self) -> Option<WarehouseId> {
        self.warehouse
    }

    /// The currently installed results. Empty while idle or until the first
    /// request resolves.
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Registers a new outgoing request, superseding any still in flight.
    pub fn begin(&mut self) -> SearchTicket {
        self.seq += 1;
        self.state = SearchState::Searching;
        SearchTicket { seq: self.seq, warehouse: self.warehouse }
    }

    /// Installs results if the ticket is still the latest one for the
    /// current warehouse; otherwise discards them.
    pub fn accept(&mut self, ticket: SearchTicket, results: Vec<T>) -> Acceptance {
        if !self.is_current(ticket) {
            return Acceptance::Stale;
        }
        self.results = results;
        self.state = SearchState::Resolved;
        Acceptance::Applied
    }

    /// Marks the request failed. A current failure empties the list and
    /// returns the session to idle; a stale one changes nothing.
    pub fn fail(&mut self, ticket: SearchTicket) -> Acceptance {
        if !self.is_current(ticket) {
            return Acceptance::Stale;
        }
        self.results.clear();
        self.state = SearchState::Idle;
        Acceptance::Applied
    }

    /// Adopts a new warehouse scope. Installed results belong to the old
    /// warehouse, so they are dropped and every outstanding ticket becomes
    /// stale.
    pub fn switch_warehouse(&mut self, warehouse: WarehouseId) {
        if self.warehouse == Some(warehouse) {
            return;
        }
        self.warehouse = Some(warehouse);
        self.seq += 1;
        self.state = SearchState::Idle;
        self.results.clear();
    }

    /// Drops installed results and outstanding tickets without changing
    /// scope (a cleared search box).
    pub fn reset(&mut self) {
        self.seq += 1;
        self.state = SearchState::Idle;
        self.results.clear();
    }

    fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.seq == self.seq && ticket.warehouse == self.warehouse
    }
}
