use crate::core::{ConfigProvider, PredictionApi};
use crate::domain::model::{PredictionRequest, SelectedFile};
use crate::utils::error::{FormError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const PREDICT_PATH: &str = "predict";
pub const UPLOAD_PATH: &str = "upload";
pub const UPLOAD_FIELD: &str = "file";

/// reqwest client for the `/predict` and `/upload` endpoints.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    client: Client,
    base_url: Url,
}

impl HttpPredictionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // 確保以 "/" 結尾，join 時才會保留路徑前綴
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| FormError::InvalidConfigValueError {
            field: "server.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| FormError::ConfigError {
                message: format!("Cannot build endpoint '{}': {}", path, e),
            })
    }

    /// The server answers errors with a JSON body and a 4xx/5xx status, so
    /// the body is decoded whatever the status is.
    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);
        let bytes = response.bytes().await?;
        if !status.is_success() {
            tracing::warn!("⚠️ Server answered {} ({} bytes)", status, bytes.len());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<serde_json::Value> {
        let url = self.endpoint(PREDICT_PATH)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.post(url).json(request).send().await?;
        Self::read_json(response).await
    }

    async fn upload(&self, file: &SelectedFile) -> Result<serde_json::Value> {
        let url = self.endpoint(UPLOAD_PATH)?;
        tracing::debug!("Uploading {} to: {}", file.name, url);

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str("text/csv")?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self.client.post(url).multipart(form).send().await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let client = HttpPredictionClient::new("http://localhost:5000/app", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint(PREDICT_PATH).unwrap().as_str(),
            "http://localhost:5000/app/predict"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpPredictionClient::new("not a url", Duration::from_secs(5)).is_err());
    }

    #[tokio::test]
    async fn test_error_body_is_decoded_on_bad_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/predict");
            then.status(400)
                .header("Content-Type", "application/json")
                .json_body(json!({"error": "could not convert string to float: 'abc'"}));
        });

        let client = HttpPredictionClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let response = client.predict(&PredictionRequest::default()).await.unwrap();

        mock.assert();
        assert_eq!(
            response["error"],
            json!("could not convert string to float: 'abc'")
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_parse_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/predict");
            then.status(502).body("<html>Bad Gateway</html>");
        });

        let client = HttpPredictionClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let err = client.predict(&PredictionRequest::default()).await.unwrap_err();
        assert!(err.is_transport());
    }
}
