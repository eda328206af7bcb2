use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::AssetConfig;

/// A file received through a multipart form, on its way to the asset host.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset host request failed: {0}")]
    Request(String),

    #[error("asset host returned {0}")]
    Api(u16),

    #[error("asset url has no derivable public id: {0}")]
    BadUrl(String),
}

/// Client for the external asset host. Uploads return the stable secure URL
/// stored on entities; deletes take that URL back and derive the public id.
///
/// Upload-then-write is not transactional: a write failure after a successful
/// upload leaves an orphaned asset on the host. Accepted degradation.
#[derive(Clone)]
pub struct AssetClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for AssetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl AssetClient {
    pub fn new(config: &AssetConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Upload one file, returning the secure URL to persist on the entity.
    pub async fn upload(&self, file: UploadFile) -> Result<String, AssetError> {
        let part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AssetError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssetError::Api(response.status().as_u16()));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AssetError::Request(e.to_string()))?;

        tracing::debug!(url = %uploaded.secure_url, "asset uploaded");
        Ok(uploaded.secure_url)
    }

    /// Delete the asset behind a previously stored URL.
    pub async fn delete(&self, url: &str) -> Result<(), AssetError> {
        let public_id =
            public_id_from_url(url).ok_or_else(|| AssetError::BadUrl(url.to_string()))?;

        let response = self
            .client
            .delete(format!("{}/assets/{}", self.base_url, public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AssetError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssetError::Api(response.status().as_u16()));
        }

        Ok(())
    }
}

/// The public id is the last path segment without its extension.
pub fn public_id_from_url(url: &str) -> Option<&str> {
    let segment = url.rsplit('/').next().filter(|s| !s.is_empty())?;
    let id = segment.split('.').next().filter(|s| !s.is_empty())?;
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_strips_path_and_extension() {
        assert_eq!(
            public_id_from_url("https://assets.example.com/v1/abc123.webp"),
            Some("abc123")
        );
    }

    #[test]
    fn public_id_handles_missing_extension() {
        assert_eq!(
            public_id_from_url("https://assets.example.com/v1/abc123"),
            Some("abc123")
        );
    }

    #[test]
    fn public_id_rejects_bare_host() {
        assert_eq!(public_id_from_url("https://assets.example.com/"), None);
    }
}
