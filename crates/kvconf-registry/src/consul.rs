//! Consul registry host
//!
//! Delegates every operation to the Consul HTTP KV API. There is no local
//! caching: each call is one round trip, and consistency is whatever the
//! agent provides.
//!
//! | operation | request |
//! |---|---|
//! | `put` | `PUT /v1/kv/{key}` with the raw value as body |
//! | `get` | `GET /v1/kv/{key}?raw` (404 means absent) |
//! | `delete` | `DELETE /v1/kv/{key}` |
//! | `list_keys_with_prefix` | `GET /v1/kv/{prefix}?keys` (404 means empty) |

use async_trait::async_trait;
use kvconf_core::host::is_proper_child;
use kvconf_core::{RegistryError, RegistryHost, RegistryResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::settings::{ConsulSettings, SetupError};

/// Header carrying the Consul ACL token
pub const CONSUL_TOKEN_HEADER: &str = "X-Consul-Token";

/// Registry host backed by a Consul agent's KV store
#[derive(Debug, Clone)]
pub struct ConsulRegistryHost {
    client: Client,
    address: Url,
    datacenter: Option<String>,
    token: Option<SecretString>,
}

impl ConsulRegistryHost {
    /// Create a host for the agent described by `settings`
    pub fn new(settings: &ConsulSettings) -> Result<Self, SetupError> {
        let address = Url::parse(&settings.address).map_err(|e| SetupError::InvalidAddress {
            address: settings.address.clone(),
            reason: e.to_string(),
        })?;
        if address.cannot_be_a_base() {
            return Err(SetupError::InvalidAddress {
                address: settings.address.clone(),
                reason: "address cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| SetupError::Client(e.to_string()))?;

        Ok(Self {
            client,
            address,
            datacenter: settings.datacenter.clone(),
            token: settings.token.clone(),
        })
    }

    /// Agent address this host talks to
    pub fn address(&self) -> &Url {
        &self.address
    }

    /// Build `/v1/kv/{key}`, percent-encoding each key segment.
    ///
    /// A trailing `/` in `key` is kept so folder prefixes stay folder prefixes.
    fn kv_url(&self, key: &str) -> Url {
        let mut url = self.address.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v1", "kv"]).extend(key.split('/'));
        }
        if let Some(dc) = &self.datacenter {
            url.query_pairs_mut().append_pair("dc", dc);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(CONSUL_TOKEN_HEADER, token.expose_secret().as_str()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> RegistryResult<Response> {
        self.authorize(request)
            .send()
            .await
            .map_err(RegistryError::connection)
    }
}

/// Turn a non-success status into [`RegistryError::Backend`]
async fn ensure_success(response: Response) -> RegistryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    warn!(status = %status, message = %message, "Consul rejected request");
    Err(RegistryError::Backend {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RegistryHost for ConsulRegistryHost {
    #[instrument(skip(self, value))]
    async fn put(&self, key: &str, value: &str) -> RegistryResult<()> {
        let request = self.client.put(self.kv_url(key)).body(value.to_string());
        let response = ensure_success(self.send(request).await?).await?;

        let body = response.bytes().await.map_err(RegistryError::connection)?;
        let stored: bool = serde_json::from_slice(&body)
            .map_err(|e| RegistryError::InvalidResponse(format!("put acknowledgement: {}", e)))?;
        if !stored {
            return Err(RegistryError::Backend {
                status: StatusCode::OK.as_u16(),
                message: format!("write of '{}' was not applied", key),
            });
        }

        debug!(key = %key, "Stored Consul entry");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        let mut url = self.kv_url(key);
        url.query_pairs_mut().append_key_only("raw");

        let response = self.send(self.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(key = %key, "Consul entry not found");
            return Ok(None);
        }

        let value = ensure_success(response)
            .await?
            .text()
            .await
            .map_err(RegistryError::connection)?;
        Ok(Some(value))
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> RegistryResult<()> {
        let response = self.send(self.client.delete(self.kv_url(key))).await?;
        ensure_success(response).await?;
        debug!(key = %key, "Removed Consul entry");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_keys_with_prefix(&self, prefix: &str) -> RegistryResult<Vec<String>> {
        let mut url = self.kv_url(prefix);
        url.query_pairs_mut().append_key_only("keys");

        let response = self.send(self.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(RegistryError::connection)?;
        let listed: Vec<String> = serde_json::from_slice(&body)
            .map_err(|e| RegistryError::InvalidResponse(format!("key listing: {}", e)))?;

        // The agent already sorts and prefix-filters, but it also returns the
        // prefix itself when it exists as a folder key.
        let mut keys: Vec<String> = listed
            .into_iter()
            .filter(|key| is_proper_child(key, prefix))
            .collect();
        keys.sort();

        debug!(prefix = %prefix, count = keys.len(), "Listed Consul keys");
        Ok(keys)
    }
}
