// InfoExtractor trait

use async_trait::async_trait;

use crate::downloader::errors::GrabError;
use crate::downloader::models::MediaInfo;

/// Fetches title and raw format list for a URL without downloading
#[async_trait]
pub trait InfoExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Failures come back as `GrabError::ExtractionFailed` (or `ToolNotFound`)
    async fn extract(&self, url: &str) -> Result<MediaInfo, GrabError>;
}
