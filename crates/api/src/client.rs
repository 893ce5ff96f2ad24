use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;

use caja_core::config::BackendConfig;

use crate::error::GatewayError;

/// One configured `reqwest` client shared by every gateway.
///
/// The backend expects the raw token in the `Authorization` header, with
/// no `Bearer` prefix.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GatewayError::Build)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .http
            .get(url)
            .query(query)
            .header(AUTHORIZATION, self.token.expose_secret())
            .send()
            .await
            .map_err(|source| GatewayError::Request { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status { endpoint, status });
        }
        response.json().await.map_err(|source| GatewayError::Decode { endpoint, source })
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let response = self.post_raw(endpoint, body).await?;
        response.json().await.map_err(|source| GatewayError::Decode { endpoint, source })
    }

    /// POST where only the status matters.
    pub(crate) async fn post_unit<B: Serialize>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<(), GatewayError> {
        self.post_raw(endpoint, body).await.map(|_| ())
    }

    async fn post_raw<B: Serialize>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<reqwest::Response, GatewayError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|source| GatewayError::Request { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status { endpoint, status });
        }
        Ok(response)
    }
}
