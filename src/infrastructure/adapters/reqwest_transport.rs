use crate::domain::errors::{DomainError, DomainResult};
use crate::infrastructure::config::GatewayConfig;
use crate::ports::GatewayTransport;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// 基于 reqwest 的网关传输实现
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &GatewayConfig) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTransport for ReqwestTransport {
    async fn post(&self, url: &str, form: &[(String, String)]) -> DomainResult<Vec<u8>> {
        debug!("Gateway POST {} ({} form fields)", url, form.len());

        let response = self.client.post(url).form(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gateway HTTP error: {} - {}", status, error_text);
            return Err(DomainError::TransportError(format!(
                "gateway returned {}: {}",
                status, error_text
            )));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}
