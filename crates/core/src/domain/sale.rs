use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductDetailId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(pub i64);

/// Which price field of the product feeds the line: the per-unit price or
/// the per-presentation (pack) price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitBasis {
    #[default]
    PerUnit,
    PerPresentation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    None,
    Percentage,
    Amount,
}

/// A discount with its value bound to its kind, so a stale value can never
/// survive a kind change and a kind can never be read without its value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Discount {
    #[default]
    None,
    Percentage(Decimal),
    Amount(Decimal),
}

impl Discount {
    /// Builds a discount from raw form input. Non-finite or negative values
    /// collapse to zero so a half-edited numeric field cannot poison totals.
    pub fn from_raw(kind: DiscountKind, value: f64) -> Self {
        let value = Decimal::from_f64(value)
            .filter(|value| !value.is_sign_negative())
            .unwrap_or(Decimal::ZERO);
        match kind {
            DiscountKind::None => Discount::None,
            DiscountKind::Percentage => Discount::Percentage(value),
            DiscountKind::Amount => Discount::Amount(value),
        }
    }

    pub fn kind(&self) -> DiscountKind {
        match self {
            Discount::None => DiscountKind::None,
            Discount::Percentage(_) => DiscountKind::Percentage,
            Discount::Amount(_) => DiscountKind::Amount,
        }
    }

    /// The discount value, zero for `None`.
    pub fn value(&self) -> Decimal {
        match self {
            Discount::None => Decimal::ZERO,
            Discount::Percentage(value) | Discount::Amount(value) => *value,
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, Discount::Percentage(_))
    }
}

/// One product entry within an in-progress sale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product: ProductDetailId,
    pub quantity: u32,
    pub basis: UnitBasis,
    pub discount: Discount,
}

impl SaleLine {
    /// A fresh line with the defaults a just-selected product gets: one
    /// unit, priced per unit, undiscounted.
    pub fn new(product: ProductDetailId) -> Self {
        Self { product, quantity: 1, basis: UnitBasis::default(), discount: Discount::default() }
    }
}
