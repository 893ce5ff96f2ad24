use async_trait::async_trait;
use tracing::debug;

use caja_core::Client;

use crate::client::BackendClient;
use crate::error::GatewayError;
use crate::wire::ClientPageDto;

const ENDPOINT: &str = "/api/user/cliente/index/";

/// Registered-client directory search.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    async fn search_clients(&self, query: &str) -> Result<Vec<Client>, GatewayError>;
}

#[derive(Clone, Debug)]
pub struct HttpClientDirectory {
    client: BackendClient,
    page_size: u32,
}

impl HttpClientDirectory {
    pub fn new(client: BackendClient, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

#[async_trait]
impl ClientDirectory for HttpClientDirectory {
    async fn search_clients(&self, query: &str) -> Result<Vec<Client>, GatewayError> {
        let mut params = vec![
            ("page", "1".to_owned()),
            ("page_size", self.page_size.to_string()),
        ];
        if !query.is_empty() {
            params.push(("search", query.to_owned()));
        }

        let page: ClientPageDto = self.client.get_json(ENDPOINT, &params).await?;
        debug!(
            total = page.total_users,
            pages = page.total_pages,
            page = page.current_page,
            page_size = page.page_size,
            "client page fetched"
        );

        page.users
            .into_iter()
            .map(|dto| {
                dto.into_domain()
                    .map_err(|message| GatewayError::Malformed { endpoint: ENDPOINT, message })
            })
            .collect()
    }
}
