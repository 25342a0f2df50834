// Downloader backend trait definition

use async_trait::async_trait;

use super::errors::GrabError;
use super::models::BackendConfig;

/// Performs one download (plus merge/post-processing) for a single URL
#[async_trait]
pub trait DownloaderBackend: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Write the result to `config.output`; failures map to `DownloadFailed`
    async fn download(&self, url: &str, config: &BackendConfig) -> Result<(), GrabError>;
}
