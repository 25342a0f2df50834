// Error types for the grab pipeline

use std::path::PathBuf;

use thiserror::Error;

use super::extractors::BlockingReason;

#[derive(Debug, Error)]
pub enum GrabError {
    /// Metadata fetch or parse failed (unreachable URL, unsupported site, removed video)
    #[error("Could not read stream info for {url}: {message}")]
    ExtractionFailed {
        url: String,
        message: String,
        reason: Option<BlockingReason>,
    },

    /// The selection does not match the menu that was presented
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// yt-dlp download, merge or transcode step failed
    #[error("Download of {url} with format '{selector}' failed: {message}")]
    DownloadFailed {
        url: String,
        selector: String,
        message: String,
        reason: Option<BlockingReason>,
    },

    /// Backend reported success but nothing usable was written
    #[error("No output file found in {}", .dir.display())]
    ArtifactMissing { dir: PathBuf },

    /// More than one candidate output file and the policy demands exactly one
    #[error("Expected a single output file in {}, found: {}", .dir.display(), .files.join(", "))]
    AmbiguousArtifact { dir: PathBuf, files: Vec<String> },

    /// yt-dlp could not be started
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GrabError {
    pub fn extraction(url: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let reason = super::extractors::diagnose_error(&message);
        Self::ExtractionFailed {
            url: url.to_string(),
            message,
            reason,
        }
    }

    pub fn download(url: &str, selector: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let reason = super::extractors::diagnose_error(&message);
        Self::DownloadFailed {
            url: url.to_string(),
            selector: selector.to_string(),
            message,
            reason,
        }
    }

    /// Diagnosed backend blocking reason, if any
    pub fn blocking_reason(&self) -> Option<BlockingReason> {
        match self {
            Self::ExtractionFailed { reason, .. } | Self::DownloadFailed { reason, .. } => *reason,
            _ => None,
        }
    }

    /// Actionable hint for the caller to render next to the message
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ToolNotFound(_) => Some(
                "Install yt-dlp (pip3 install yt-dlp, or brew install yt-dlp) and make sure \
                 ffmpeg is on PATH."
                    .to_string(),
            ),
            Self::InvalidSelection(_) => {
                Some("Pick one of the listed formats and try again.".to_string())
            }
            Self::ArtifactMissing { .. } | Self::AmbiguousArtifact { .. } => Some(
                "yt-dlp finished without a single usable file. Check that ffmpeg is installed."
                    .to_string(),
            ),
            _ => self
                .blocking_reason()
                .map(|reason| reason.suggestion().to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GrabError>;
