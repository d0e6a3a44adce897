//! HTTP access to the config backend.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ConfigPayload, PciDevice},
    error::ErrorBody,
    protocol::{ExecuteResponse, OutputResponse, PciDevicesResponse, UpdateConfigResponse},
};
use thiserror::Error;
use tracing::info;
use url::Url;

pub const UPDATE_CONFIG_PATH: &str = "/update_config";
pub const EXECUTE_PLATFORM_PATH: &str = "/execute_platform";
pub const GET_CONFIG_PATH: &str = "/get_config";
pub const GET_OUTPUT_PATH: &str = "/get_output";
pub const PCI_DEVICES_PATH: &str = "/api/get-pci-devices";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {message}")]
    Api {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
    #[error("{endpoint} returned an unreadable body: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Operations the form needs from the backend.
#[async_trait]
pub trait ConfigBackend: Send + Sync {
    /// Any non-success status is a failure, even when the body is JSON: the
    /// backend reports a failed write as `500 {"error": ...}`.
    async fn update_config(
        &self,
        payload: &ConfigPayload,
    ) -> Result<UpdateConfigResponse, ClientError>;
    /// Parses the reply body whatever the status; failures arrive as `error`.
    async fn execute_platform(&self) -> Result<ExecuteResponse, ClientError>;
    async fn get_config(&self) -> Result<ConfigPayload, ClientError>;
    async fn get_output(&self) -> Result<String, ClientError>;
    async fn list_pci_devices(&self) -> Result<Vec<PciDevice>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ConfigClient {
    http: Client,
    base_url: Url,
}

impl ConfigClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(server_url.trim()).map_err(|source| ClientError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path or a redirect target against the server url.
    pub fn resolve(&self, target: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(target)
            .map_err(|source| ClientError::InvalidUrl {
                url: target.to_string(),
                source,
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .get(self.resolve(endpoint)?)
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        read_json(endpoint, response).await
    }
}

/// Decodes a success body, or turns a failure status into [`ClientError::Api`]
/// using the backend's `{"error": ...}` body when there is one.
async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        return Err(ClientError::Api {
            endpoint,
            status: status.as_u16(),
            message,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|source| ClientError::Decode { endpoint, source })
}

#[async_trait]
impl ConfigBackend for ConfigClient {
    async fn update_config(
        &self,
        payload: &ConfigPayload,
    ) -> Result<UpdateConfigResponse, ClientError> {
        let endpoint = UPDATE_CONFIG_PATH;
        info!(nodes = payload.node_count, "submitting node config");
        let response = self
            .http
            .post(self.resolve(endpoint)?)
            .json(payload)
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        read_json(endpoint, response).await
    }

    async fn execute_platform(&self) -> Result<ExecuteResponse, ClientError> {
        let endpoint = EXECUTE_PLATFORM_PATH;
        info!("requesting platform execution");
        let response = self
            .http
            .post(self.resolve(endpoint)?)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| ClientError::Transport { endpoint, source })?;
        response
            .json::<ExecuteResponse>()
            .await
            .map_err(|source| ClientError::Decode { endpoint, source })
    }

    async fn get_config(&self) -> Result<ConfigPayload, ClientError> {
        self.get_json(GET_CONFIG_PATH).await
    }

    async fn get_output(&self) -> Result<String, ClientError> {
        let body: OutputResponse = self.get_json(GET_OUTPUT_PATH).await?;
        match (body.output, body.error) {
            (Some(output), _) => Ok(output),
            (None, error) => Err(ClientError::Api {
                endpoint: GET_OUTPUT_PATH,
                status: 200,
                message: error.unwrap_or_else(|| "response carried no output".to_string()),
            }),
        }
    }

    async fn list_pci_devices(&self) -> Result<Vec<PciDevice>, ClientError> {
        let body: PciDevicesResponse = self.get_json(PCI_DEVICES_PATH).await?;
        Ok(body.pci_devices)
    }
}
