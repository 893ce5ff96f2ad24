use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WarehouseId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductDetailId(pub i64);

/// A catalog record as the backend reports it for one warehouse.
///
/// `price_per_presentation` and `price_per_unit` are independent fields
/// maintained separately on the backend; neither may be derived from the
/// other times the pack size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: ProductDetailId,
    pub name: String,
    /// Remaining stock, counted in individual units.
    pub stock_units: i64,
    /// Units bundled into one sellable presentation (pack).
    pub units_per_presentation: i64,
    pub price_per_presentation: Decimal,
    pub price_per_unit: Decimal,
    pub expiration: Option<NaiveDate>,
    pub warehouse: WarehouseId,
}
