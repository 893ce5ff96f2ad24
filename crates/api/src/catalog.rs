use async_trait::async_trait;
use tracing::debug;

use caja_core::{ProductDetail, WarehouseId};

use crate::client::BackendClient;
use crate::error::GatewayError;
use crate::wire::CatalogPageDto;

const ENDPOINT: &str = "/api/inv/productoDetalle/index/";

/// Warehouse-scoped product search.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn search_products(
        &self,
        warehouse: WarehouseId,
        query: &str,
    ) -> Result<Vec<ProductDetail>, GatewayError>;
}

#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: BackendClient,
    page_size: u32,
}

impl HttpCatalog {
    pub fn new(client: BackendClient, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

#[async_trait]
impl CatalogLookup for HttpCatalog {
    async fn search_products(
        &self,
        warehouse: WarehouseId,
        query: &str,
    ) -> Result<Vec<ProductDetail>, GatewayError> {
        let params = [
            ("page", "1".to_owned()),
            ("page_size", self.page_size.to_string()),
            ("search", query.to_owned()),
            ("almacen", warehouse.0.to_string()),
        ];
        let page: CatalogPageDto = self.client.get_json(ENDPOINT, &params).await?;
        debug!(
            total = page.total_config,
            pages = page.total_pages,
            page = page.current_page,
            page_size = page.page_size,
            warehouse = warehouse.0,
            "catalog page fetched"
        );

        page.config
            .into_iter()
            .map(|dto| {
                dto.into_domain()
                    .map_err(|message| GatewayError::Malformed { endpoint: ENDPOINT, message })
            })
            .collect()
    }
}
