//! Sale pricing arithmetic.
//!
//! All computation stays in full `Decimal` precision; rounding to two
//! decimal places happens only where values leave the core (display or
//! submission payloads). Discounts apply once per level: each line applies
//! its own discount, and the global discount applies once to the sum of
//! the already-discounted line subtotals.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::product::{ProductDetail, ProductDetailId};
use crate::domain::sale::{Discount, SaleLine, UnitBasis};

/// The unit price a line actually sells at, per its chosen basis.
pub fn basis_price(line: &SaleLine, product: &ProductDetail) -> Decimal {
    match line.basis {
        UnitBasis::PerUnit => product.price_per_unit,
        UnitBasis::PerPresentation => product.price_per_presentation,
    }
}

/// Subtotal for one line: basis price times quantity, then the line
/// discount. A quantity of zero (a line mid-edit) yields zero.
pub fn line_subtotal(line: &SaleLine, product: &ProductDetail) -> Decimal {
    let base = basis_price(line, product) * Decimal::from(line.quantity);
    apply_discount(base, line.discount)
}

/// Sum of line subtotals. A line whose product is missing from the map
/// contributes zero rather than failing the whole order.
pub fn order_subtotal(
    lines: &[SaleLine],
    products: &HashMap<ProductDetailId, ProductDetail>,
) -> Decimal {
    lines
        .iter()
        .map(|line| {
            products.get(&line.product).map(|product| line_subtotal(line, product)).unwrap_or(Decimal::ZERO)
        })
        .sum()
}

/// The order total: the global discount applied once to the aggregate
/// subtotal.
pub fn order_total(subtotal: Decimal, global_discount: Discount) -> Decimal {
    apply_discount(subtotal, global_discount)
}

/// Rounds a monetary value for display or submission.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(2)
}

fn apply_discount(base: Decimal, discount: Discount) -> Decimal {
    match discount {
        Discount::None => base,
        // Percentage is deliberately not clamped to [0, 100]; bounding the
        // input is the caller's job and >100% legitimately goes negative.
        Discount::Percentage(pct) => base * (Decimal::ONE - pct / Decimal::ONE_HUNDRED),
        Discount::Amount(amount) => (base - amount).max(Decimal::ZERO),
    }
}
