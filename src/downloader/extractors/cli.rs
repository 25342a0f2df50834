// CLI InfoExtractor - runs `yt-dlp --dump-json` and parses the result

use async_trait::async_trait;

use super::traits::InfoExtractor;
use crate::downloader::config::GrabberConfig;
use crate::downloader::errors::GrabError;
use crate::downloader::models::MediaInfo;
use crate::downloader::utils::{network_args, run_output_with_timeout, stderr_summary, RunError};

pub struct CliInfoExtractor {
    ytdlp_path: String,
    config: GrabberConfig,
}

impl CliInfoExtractor {
    pub fn new(config: GrabberConfig) -> Self {
        Self {
            ytdlp_path: config.resolve_ytdlp(),
            config,
        }
    }

    /// Build command arguments
    fn build_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
        ];
        args.extend(network_args(&self.config));
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Parse `--dump-json` output
    pub fn parse_json(url: &str, stdout: &[u8]) -> Result<MediaInfo, GrabError> {
        serde_json::from_slice::<MediaInfo>(stdout)
            .map_err(|e| GrabError::extraction(url, format!("Invalid JSON from yt-dlp: {}", e)))
    }
}

#[async_trait]
impl InfoExtractor for CliInfoExtractor {
    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }

    async fn extract(&self, url: &str) -> Result<MediaInfo, GrabError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(GrabError::extraction(url, "URL is empty"));
        }

        let args = self.build_args(url);
        tracing::debug!("[CliExtractor] {} {}", self.ytdlp_path, args.join(" "));

        let output =
            match run_output_with_timeout(&self.ytdlp_path, &args, self.config.extract_timeout_secs)
                .await
            {
                Ok(out) => out,
                Err(RunError::Spawn(msg)) => return Err(GrabError::ToolNotFound(msg)),
                Err(e) => return Err(GrabError::extraction(url, e.to_string())),
            };

        if !output.status.success() {
            let message = stderr_summary(&output.stderr);
            tracing::warn!("[CliExtractor] yt-dlp failed for {}: {}", url, message);
            return Err(GrabError::extraction(url, message));
        }

        let info = Self::parse_json(url, &output.stdout)?;
        tracing::info!(
            "[CliExtractor] '{}' has {} formats",
            info.title,
            info.formats.len()
        );
        Ok(info)
    }
}
