//! HTTP client for the hosted tabular service.

pub mod records;

use url::Url;

use crate::config::Settings;
use crate::error::{ClientError, Result};

/// HTTP client for one base of the tabular service.
#[derive(Debug, Clone)]
pub struct TableClient {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl TableClient {
    /// Create a client for the base described by `settings`.
    ///
    /// Fails with a configuration error, before any request, if the base ID,
    /// token or API URL are missing or malformed.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_url = settings.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connection.timeout {
            builder = builder.timeout(timeout);
        }

        let mut base_url = api_url;
        base_url
            .path_segments_mut()
            .map_err(|_| ClientError::InvalidInput("API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&settings.connection.base_id);

        Ok(Self {
            client: builder.build()?,
            base_url,
            token: settings.connection.token.clone(),
        })
    }

    /// Get the base URL (API URL plus base ID).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the URL of a table; the name is percent-encoded.
    fn table_url(&self, table: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(table);
        }
        url
    }

    /// Handle error responses.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        table: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(ClientError::from)
        } else if status.as_u16() == 404 {
            Err(ClientError::NotFound {
                resource: format!("table '{}'", table),
            })
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }
}
