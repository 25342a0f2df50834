use async_trait::async_trait;

use crate::downloader::config::GrabberConfig;
use crate::downloader::errors::GrabError;
use crate::downloader::models::{BackendConfig, PostProcessor};
use crate::downloader::traits::DownloaderBackend;
use crate::downloader::utils::{network_args, run_output_with_timeout, stderr_summary, RunError};

pub struct YtDlpBackend {
    ytdlp_bin: String,
    config: GrabberConfig,
}

impl YtDlpBackend {
    pub fn new(config: GrabberConfig) -> Self {
        Self {
            ytdlp_bin: config.resolve_ytdlp(),
            config,
        }
    }

    /// Translate the typed backend config into yt-dlp arguments
    pub fn build_args(&self, url: &str, backend: &BackendConfig) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            backend.format_selector.clone(),
            "-o".to_string(),
            backend.output.as_arg(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--quiet".to_string(),
            "--no-progress".to_string(),
            "--no-part".to_string(),
        ];

        if let Some(format) = &backend.merge_output_format {
            args.push("--merge-output-format".to_string());
            args.push(format.clone());
        }

        match backend.post_processor {
            PostProcessor::None => {}
            PostProcessor::ExtractAudioToMp3 { quality_kbps } => {
                args.extend([
                    "-x".to_string(),
                    "--audio-format".to_string(),
                    "mp3".to_string(),
                    "--audio-quality".to_string(),
                    format!("{}K", quality_kbps),
                ]);
            }
            PostProcessor::TranscodeToMp4 => {
                args.push("--recode-video".to_string());
                args.push("mp4".to_string());
            }
        }

        if let Some(location) = &self.config.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(location.clone());
        }

        args.extend(network_args(&self.config));
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl DownloaderBackend for YtDlpBackend {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn download(&self, url: &str, backend: &BackendConfig) -> Result<(), GrabError> {
        let args = self.build_args(url, backend);
        tracing::debug!("[YtDlpBackend] {} {}", self.ytdlp_bin, args.join(" "));

        let output =
            match run_output_with_timeout(&self.ytdlp_bin, &args, self.config.download_timeout_secs)
                .await
            {
                Ok(out) => out,
                Err(RunError::Spawn(msg)) => return Err(GrabError::ToolNotFound(msg)),
                Err(e) => {
                    return Err(GrabError::download(
                        url,
                        &backend.format_selector,
                        e.to_string(),
                    ))
                }
            };

        if output.status.success() {
            Ok(())
        } else {
            Err(GrabError::download(
                url,
                &backend.format_selector,
                stderr_summary(&output.stderr),
            ))
        }
    }
}
