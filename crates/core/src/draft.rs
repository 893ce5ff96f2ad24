//! The in-progress sale draft: an ordered set of sale lines plus the
//! order-level fields (client, global discount, comment, date).
//!
//! The draft is plain in-memory state owned by the UI thread; nothing in
//! here performs I/O. Line operations on an unknown product id are ignored
//! rather than erroring, matching how a form tolerates half-finished edits.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::client::ClientRef;
use crate::domain::product::{ProductDetail, ProductDetailId, WarehouseId};
use crate::domain::sale::{Discount, SaleLine, UnitBasis};
use crate::pricing;

/// Subtotal/total snapshot for the current draft state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub total: Decimal,
}

/// Outcome of asking to change the active warehouse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarehouseSwitch {
    /// The warehouse changed; nothing needed discarding.
    Switched,
    /// Lines are selected: switching discards them, so the caller must
    /// confirm with [`SaleDraft::confirm_warehouse_switch`].
    ConfirmationRequired,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SaleDraft {
    warehouse: WarehouseId,
    lines: Vec<SaleLine>,
    client: Option<ClientRef>,
    global_discount: Discount,
    comment: Option<String>,
    sale_date: NaiveDate,
}

impl SaleDraft {
    /// An empty draft for the given warehouse, dated today in local time.
    pub fn new(warehouse: WarehouseId) -> Self {
        Self {
            warehouse,
            lines: Vec::new(),
            client: None,
            global_discount: Discount::None,
            comment: None,
            sale_date: Local::now().date_naive(),
        }
    }

    pub fn warehouse(&self) -> WarehouseId {
        self.warehouse
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn client(&self) -> Option<&ClientRef> {
        self.client.as_ref()
    }

    pub fn global_discount(&self) -> Discount {
        self.global_discount
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn sale_date(&self) -> NaiveDate {
        self.sale_date
    }

    /// Appends a line for the product with defaults (quantity 1, per unit,
    /// no discount). Re-selecting an already-added product is a no-op;
    /// returns whether a line was actually added.
    pub fn add_line(&mut self, product: &ProductDetail) -> bool {
        if self.lines.iter().any(|line| line.product == product.id) {
            return false;
        }
        self.lines.push(SaleLine::new(product.id));
        true
    }

    /// Removes the line for the product; idempotent when absent.
    pub fn remove_line(&mut self, product: ProductDetailId) {
        self.lines.retain(|line| line.product != product);
    }

    /// Overwrites the quantity. Zero is ignored: a cleared quantity field
    /// mid-edit must not destroy the line's previous value.
    pub fn set_quantity(&mut self, product: ProductDetailId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.line_mut(product) {
            line.quantity = quantity;
        }
    }

    /// Switches the price basis, leaving quantity and discount untouched.
    pub fn set_unit_basis(&mut self, product: ProductDetailId, basis: UnitBasis) {
        if let Some(line) = self.line_mut(product) {
            line.basis = basis;
        }
    }

    /// Overwrites kind and value atomically.
    pub fn set_discount(&mut self, product: ProductDetailId, discount: Discount) {
        if let Some(line) = self.line_mut(product) {
            line.discount = discount;
        }
    }

    pub fn set_global_discount(&mut self, discount: Discount) {
        self.global_discount = discount;
    }

    /// Resolving a client replaces any previous resolution; registered and
    /// walk-in references cannot coexist.
    pub fn set_client(&mut self, client: ClientRef) {
        self.client = Some(client);
    }

    pub fn clear_client(&mut self) {
        self.client = None;
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment.filter(|text| !text.trim().is_empty());
    }

    pub fn set_sale_date(&mut self, date: NaiveDate) {
        self.sale_date = date;
    }

    /// Asks to change the active warehouse. With lines selected this is
    /// destructive, so the caller gets `ConfirmationRequired` and nothing
    /// changes until it confirms.
    pub fn request_warehouse_switch(&mut self, warehouse: WarehouseId) -> WarehouseSwitch {
        if warehouse == self.warehouse {
            return WarehouseSwitch::Switched;
        }
        if !self.lines.is_empty() {
            return WarehouseSwitch::ConfirmationRequired;
        }
        self.warehouse = warehouse;
        WarehouseSwitch::Switched
    }

    /// Confirms a destructive switch: the draft is discarded and restarted
    /// empty under the new warehouse.
    pub fn confirm_warehouse_switch(&mut self, warehouse: WarehouseId) {
        *self = SaleDraft::new(warehouse);
    }

    /// Resets everything back to a fresh draft for the same warehouse.
    /// Used after a successful submission.
    pub fn clear(&mut self) {
        *self = SaleDraft::new(self.warehouse);
    }

    pub fn totals(&self, products: &HashMap<ProductDetailId, ProductDetail>) -> Totals {
        let subtotal = pricing::order_subtotal(&self.lines, products);
        Totals { subtotal, total: pricing::order_total(subtotal, self.global_discount) }
    }

    fn line_mut(&mut self, product: ProductDetailId) -> Option<&mut SaleLine> {
        self.lines.iter_mut().find(|line| line.product == product)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{SaleDraft, WarehouseSwitch};
    use crate::domain::client::{ClientId, ClientRef};
    use crate::domain::product::{ProductDetail, ProductDetailId, WarehouseId};
    use crate::domain::sale::{Discount, UnitBasis};

    fn product(id: i64) -> ProductDetail {
        ProductDetail {
            id: ProductDetailId(id),
            name: format!("producto {id}"),
            stock_units: 20,
            units_per_presentation: 6,
            price_per_presentation: Decimal::new(9_000, 2),
            price_per_unit: Decimal::new(1_000, 2),
            expiration: None,
            warehouse: WarehouseId(1),
        }
    }

    fn catalog(ids: &[i64]) -> HashMap<ProductDetailId, ProductDetail> {
        ids.iter().map(|&id| (ProductDetailId(id), product(id))).collect()
    }

    #[test]
    fn adding_the_same_product_twice_keeps_one_line() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        assert!(draft.add_line(&product(5)));
        assert!(!draft.add_line(&product(5)));
        assert_eq!(draft.lines().len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.add_line(&product(5));
        draft.remove_line(ProductDetailId(5));
        draft.remove_line(ProductDetailId(5));
        assert!(draft.is_empty());
    }

    #[test]
    fn zero_quantity_is_ignored() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.add_line(&product(5));
        draft.set_quantity(ProductDetailId(5), 4);
        draft.set_quantity(ProductDetailId(5), 0);
        assert_eq!(draft.lines()[0].quantity, 4);
    }

    #[test]
    fn basis_change_keeps_quantity_and_discount() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.add_line(&product(5));
        draft.set_quantity(ProductDetailId(5), 3);
        draft.set_discount(ProductDetailId(5), Discount::Amount(Decimal::from(2)));
        draft.set_unit_basis(ProductDetailId(5), UnitBasis::PerPresentation);

        let line = &draft.lines()[0];
        assert_eq!(line.basis, UnitBasis::PerPresentation);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.discount, Discount::Amount(Decimal::from(2)));
    }

    #[test]
    fn basis_selects_which_price_feeds_the_subtotal() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.add_line(&product(5));
        let products = catalog(&[5]);

        assert_eq!(draft.totals(&products).subtotal, Decimal::new(1_000, 2));
        draft.set_unit_basis(ProductDetailId(5), UnitBasis::PerPresentation);
        assert_eq!(draft.totals(&products).subtotal, Decimal::new(9_000, 2));
    }

    #[test]
    fn operations_on_unknown_lines_are_ignored() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.set_quantity(ProductDetailId(9), 3);
        draft.set_unit_basis(ProductDetailId(9), UnitBasis::PerPresentation);
        draft.set_discount(ProductDetailId(9), Discount::Amount(Decimal::ONE));
        assert!(draft.is_empty());
    }

    #[test]
    fn switching_warehouse_with_lines_requires_confirmation() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.add_line(&product(5));

        assert_eq!(
            draft.request_warehouse_switch(WarehouseId(2)),
            WarehouseSwitch::ConfirmationRequired
        );
        assert_eq!(draft.warehouse(), WarehouseId(1));
        assert_eq!(draft.lines().len(), 1);

        draft.confirm_warehouse_switch(WarehouseId(2));
        assert_eq!(draft.warehouse(), WarehouseId(2));
        assert!(draft.is_empty());
    }

    #[test]
    fn switching_an_empty_draft_needs_no_confirmation() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        assert_eq!(draft.request_warehouse_switch(WarehouseId(2)), WarehouseSwitch::Switched);
        assert_eq!(draft.warehouse(), WarehouseId(2));
    }

    #[test]
    fn switching_to_the_same_warehouse_is_a_no_op() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.add_line(&product(5));
        assert_eq!(draft.request_warehouse_switch(WarehouseId(1)), WarehouseSwitch::Switched);
        assert_eq!(draft.lines().len(), 1);
    }

    #[test]
    fn clear_resets_every_order_level_field() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.add_line(&product(5));
        draft.set_client(ClientRef::Registered(ClientId(3)));
        draft.set_global_discount(Discount::Percentage(Decimal::from(5)));
        draft.set_comment(Some("entrega el viernes".to_owned()));
        draft.set_sale_date(NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"));

        draft.clear();

        assert!(draft.is_empty());
        assert!(draft.client().is_none());
        assert_eq!(draft.global_discount(), Discount::None);
        assert!(draft.comment().is_none());
        assert_eq!(draft.warehouse(), WarehouseId(1));
        assert_eq!(draft.sale_date(), chrono::Local::now().date_naive());
    }

    #[test]
    fn blank_comments_are_dropped() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.set_comment(Some("   ".to_owned()));
        assert!(draft.comment().is_none());
    }

    #[test]
    fn totals_apply_the_global_discount_once() {
        let mut draft = SaleDraft::new(WarehouseId(1));
        draft.add_line(&product(5));
        draft.set_quantity(ProductDetailId(5), 5);
        draft.set_discount(ProductDetailId(5), Discount::Percentage(Decimal::from(10)));
        draft.set_global_discount(Discount::Amount(Decimal::from(5)));

        let totals = draft.totals(&catalog(&[5]));
        assert_eq!(totals.subtotal, Decimal::new(4_500, 2));
        assert_eq!(totals.total, Decimal::new(4_000, 2));
    }
}
