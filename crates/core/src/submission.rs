//! Turning a draft into a submission plan.
//!
//! Planning is pure: it validates the draft and computes every value the
//! backend expects, but performs no I/O. Monetary values are rounded to
//! two places here, at the boundary; everything upstream stays in full
//! precision.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientRef;
use crate::domain::product::{ProductDetail, ProductDetailId};
use crate::domain::sale::UnitBasis;
use crate::draft::SaleDraft;
use crate::errors::DomainError;
use crate::pricing;

/// Order-level values for the create-sale request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleHeader {
    pub client: ClientRef,
    /// Sum of discounted line subtotals, before the global discount.
    pub subtotal: Decimal,
    pub discount_value: Decimal,
    pub discount_is_percentage: bool,
    pub total: Decimal,
    pub sale_date: NaiveDate,
    pub comment: Option<String>,
}

/// One line of the sale, ready for a detail request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleDetailPlan {
    pub product: ProductDetailId,
    pub quantity: u32,
    pub basis: UnitBasis,
    pub discount_value: Decimal,
    pub discount_is_percentage: bool,
    /// The price the line actually sold at for its chosen basis, taken
    /// straight from the catalog record, never recomputed.
    pub unit_price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPlan {
    pub header: SaleHeader,
    pub details: Vec<SaleDetailPlan>,
}

/// Validates the draft and lays out the requests a submission will make.
///
/// Lines whose product is missing from the map are dropped, matching how
/// the pricing engine values them at zero.
pub fn plan_submission(
    draft: &SaleDraft,
    products: &HashMap<ProductDetailId, ProductDetail>,
) -> Result<SubmissionPlan, DomainError> {
    if draft.is_empty() {
        return Err(DomainError::EmptySale);
    }
    let client = draft.client().cloned().ok_or(DomainError::UnresolvedClient)?;

    let totals = draft.totals(products);
    let global = draft.global_discount();
    let header = SaleHeader {
        client,
        subtotal: pricing::round_money(totals.subtotal),
        discount_value: global.value(),
        discount_is_percentage: global.is_percentage(),
        total: pricing::round_money(totals.total),
        sale_date: draft.sale_date(),
        comment: draft.comment().map(str::to_owned),
    };

    let details = draft
        .lines()
        .iter()
        .filter_map(|line| {
            let product = products.get(&line.product)?;
            Some(SaleDetailPlan {
                product: line.product,
                quantity: line.quantity,
                basis: line.basis,
                discount_value: line.discount.value(),
                discount_is_percentage: line.discount.is_percentage(),
                unit_price: pricing::round_money(pricing::basis_price(line, product)),
            })
        })
        .collect();

    Ok(SubmissionPlan { header, details })
}
