// Runtime configuration for the extractor, backend and orchestrator

use super::format_selector::DEFAULT_MP3_QUALITY_KBPS;
use super::models::{ArtifactPolicy, MenuPolicy};
use super::utils::find_ytdlp;

pub const ENV_YTDLP: &str = "VIDEO_GRABBER_YTDLP";
pub const ENV_FFMPEG: &str = "VIDEO_GRABBER_FFMPEG";
pub const ENV_PROXY: &str = "VIDEO_GRABBER_PROXY";

#[derive(Debug, Clone)]
pub struct GrabberConfig {
    /// yt-dlp binary; `None` means look in the usual install paths
    pub ytdlp_path: Option<String>,
    /// Passed to yt-dlp as `--ffmpeg-location`
    pub ffmpeg_location: Option<String>,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Path to cookies.txt file
    pub cookies_path: Option<String>,
    /// Browser to read cookies from (e.g., "chrome")
    pub cookies_from_browser: Option<String>,
    pub socket_timeout_secs: u32,
    /// Upper bound for the metadata call
    pub extract_timeout_secs: u64,
    /// Upper bound for download + merge/transcode
    pub download_timeout_secs: u64,
    pub menu_policy: MenuPolicy,
    pub artifact_policy: ArtifactPolicy,
    pub mp3_quality_kbps: u32,
}

impl Default for GrabberConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            ffmpeg_location: None,
            proxy: None,
            cookies_path: None,
            cookies_from_browser: None,
            socket_timeout_secs: 30,
            extract_timeout_secs: 60,
            download_timeout_secs: 30 * 60,
            menu_policy: MenuPolicy::PerStream,
            artifact_policy: ArtifactPolicy::RequireSingle,
            mp3_quality_kbps: DEFAULT_MP3_QUALITY_KBPS,
        }
    }
}

impl GrabberConfig {
    /// Defaults with overrides from `VIDEO_GRABBER_*` variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty(ENV_YTDLP) {
            self.ytdlp_path = Some(path);
        }
        if let Some(path) = non_empty(ENV_FFMPEG) {
            self.ffmpeg_location = Some(path);
        }
        if let Some(proxy) = non_empty(ENV_PROXY) {
            self.proxy = Some(proxy);
        }
        self
    }

    /// Configured yt-dlp binary or the discovered one
    pub fn resolve_ytdlp(&self) -> String {
        self.ytdlp_path.clone().unwrap_or_else(find_ytdlp)
    }

    pub fn with_ytdlp_path(mut self, path: Option<String>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_ffmpeg_location(mut self, path: Option<String>) -> Self {
        self.ffmpeg_location = path;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_cookies_path(mut self, path: Option<String>) -> Self {
        self.cookies_path = path;
        self
    }

    pub fn with_cookies_from_browser(mut self, browser: Option<String>) -> Self {
        self.cookies_from_browser = browser;
        self
    }

    pub fn with_socket_timeout(mut self, seconds: u32) -> Self {
        self.socket_timeout_secs = seconds;
        self
    }

    pub fn with_extract_timeout(mut self, seconds: u64) -> Self {
        self.extract_timeout_secs = seconds;
        self
    }

    pub fn with_download_timeout(mut self, seconds: u64) -> Self {
        self.download_timeout_secs = seconds;
        self
    }

    pub fn with_menu_policy(mut self, policy: MenuPolicy) -> Self {
        self.menu_policy = policy;
        self
    }

    pub fn with_artifact_policy(mut self, policy: ArtifactPolicy) -> Self {
        self.artifact_policy = policy;
        self
    }

    pub fn with_mp3_quality(mut self, kbps: u32) -> Self {
        self.mp3_quality_kbps = kbps;
        self
    }
}
