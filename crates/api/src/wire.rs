//! Wire DTOs, kept byte-for-byte faithful to the backend's JSON.
//!
//! Field names stay in the backend's Spanish, prices on catalog records
//! arrive as strings, paginated envelopes differ per endpoint, and ids
//! travel base64-encoded. All of that stops here; conversions hand the
//! domain plain numeric ids and `Decimal` prices.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use caja_core::{
    Client, ClientId, ClientRef, ProductDetail, ProductDetailId, SaleDetailPlan, SaleHeader,
    SaleId, UnitBasis, WarehouseId,
};

use crate::ids::decode_id;

#[derive(Debug, Deserialize)]
pub(crate) struct ProductDetailDto {
    pub id: i64,
    pub n_producto: String,
    pub unidades_por_presentacion: i64,
    pub total_unidades: i64,
    pub almacen: i64,
    pub precio_venta_presentacion: String,
    pub precio_venta_unidades: String,
    #[serde(default)]
    pub fecha_expiracion: Option<String>,
}

impl ProductDetailDto {
    pub(crate) fn into_domain(self) -> Result<ProductDetail, String> {
        Ok(ProductDetail {
            id: ProductDetailId(self.id),
            name: self.n_producto,
            stock_units: self.total_unidades,
            units_per_presentation: self.unidades_por_presentacion,
            price_per_presentation: parse_price(
                "precio_venta_presentacion",
                &self.precio_venta_presentacion,
            )?,
            price_per_unit: parse_price("precio_venta_unidades", &self.precio_venta_unidades)?,
            // Tolerate absent or malformed dates; expiration is advisory.
            expiration: self
                .fecha_expiracion
                .as_deref()
                .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()),
            warehouse: WarehouseId(self.almacen),
        })
    }
}

fn parse_price(field: &str, raw: &str) -> Result<Decimal, String> {
    raw.trim().parse().map_err(|_| format!("{field} is not a decimal number: `{raw}`"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogPageDto {
    pub config: Vec<ProductDetailDto>,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub total_config: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClientDto {
    pub encrypted_id: String,
    pub nombre: String,
}

impl ClientDto {
    pub(crate) fn into_domain(self) -> Result<Client, String> {
        let id = decode_id(&self.encrypted_id)
            .map_err(|err| format!("encrypted_id `{}`: {err}", self.encrypted_id))?;
        Ok(Client { id: ClientId(id), name: self.nombre })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClientPageDto {
    pub users: Vec<ClientDto>,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub total_users: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSaleDto {
    pub cliente: Option<i64>,
    pub cliente_nombre: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sin_descuento: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub descuento: Decimal,
    pub descuento_porcentual: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_venta: Decimal,
    pub fecha_venta: NaiveDate,
    pub comentario: Option<String>,
}

impl CreateSaleDto {
    pub(crate) fn from_header(header: &SaleHeader) -> Self {
        let (cliente, cliente_nombre) = match &header.client {
            ClientRef::Registered(id) => (Some(id.0), None),
            ClientRef::WalkIn(name) => (None, Some(name.clone())),
        };
        Self {
            cliente,
            cliente_nombre,
            total_sin_descuento: header.subtotal,
            descuento: header.discount_value,
            descuento_porcentual: header.discount_is_percentage,
            total_venta: header.total,
            fecha_venta: header.sale_date,
            comentario: header.comment.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSaleResponseDto {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSaleDetailDto {
    pub producto_detalle: i64,
    pub venta: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub descuento: Decimal,
    pub cantidad: u32,
    /// True when the line sold per unit, false when per presentation.
    pub unidades: bool,
    pub descuento_porcentual: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub precio_venta: Decimal,
}

impl CreateSaleDetailDto {
    pub(crate) fn from_plan(detail: &SaleDetailPlan, sale: SaleId) -> Self {
        Self {
            producto_detalle: detail.product.0,
            venta: sale.0,
            descuento: detail.discount_value,
            cantidad: detail.quantity,
            unidades: matches!(detail.basis, UnitBasis::PerUnit),
            descuento_porcentual: detail.discount_is_percentage,
            precio_venta: detail.unit_price,
        }
    }
}
