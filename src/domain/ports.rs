use crate::domain::model::{PredictionRequest, SelectedFile};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn render_mode(&self) -> RenderMode;
    fn batch_row_limit(&self) -> usize;
}

/// 結果區塊的呈現方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RenderMode {
    /// Animated circular gauge with Welcome/Result/Batch panels.
    #[default]
    Gauge,
    /// Static text result in a single container.
    Plain,
}

/// The two remote endpoints the form talks to.
///
/// Both calls return the decoded body even for non-2xx statuses; the server
/// reports application errors through an `error` field.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<serde_json::Value>;
    async fn upload(&self, file: &SelectedFile) -> Result<serde_json::Value>;
}
