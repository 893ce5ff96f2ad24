use async_trait::async_trait;
use tracing::info;

use caja_core::{SaleDetailPlan, SaleHeader, SaleId};

use crate::client::BackendClient;
use crate::error::GatewayError;
use crate::wire::{CreateSaleDetailDto, CreateSaleDto, CreateSaleResponseDto};

const CREATE_ENDPOINT: &str = "/api/ventas/ventasCreate/";
const DETAIL_ENDPOINT: &str = "/api/ventas/ventasDetalleCreate/";

/// The two-phase sale write: one header create, then one request per line.
#[async_trait]
pub trait SaleGateway: Send + Sync {
    async fn create_sale(&self, header: &SaleHeader) -> Result<SaleId, GatewayError>;
    async fn create_sale_detail(
        &self,
        detail: &SaleDetailPlan,
        sale: SaleId,
    ) -> Result<(), GatewayError>;
}

#[derive(Clone, Debug)]
pub struct HttpSaleGateway {
    client: BackendClient,
}

impl HttpSaleGateway {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SaleGateway for HttpSaleGateway {
    async fn create_sale(&self, header: &SaleHeader) -> Result<SaleId, GatewayError> {
        let body = CreateSaleDto::from_header(header);
        let response: CreateSaleResponseDto =
            self.client.post_json(CREATE_ENDPOINT, &body).await?;
        info!(sale = response.id, "sale created");
        Ok(SaleId(response.id))
    }

    async fn create_sale_detail(
        &self,
        detail: &SaleDetailPlan,
        sale: SaleId,
    ) -> Result<(), GatewayError> {
        let body = CreateSaleDetailDto::from_plan(detail, sale);
        self.client.post_unit(DETAIL_ENDPOINT, &body).await
    }
}
