// Failure diagnostics - classifies yt-dlp stderr into a known reason
//
// The reason travels with ExtractionFailed / DownloadFailed so the caller
// can show a hint instead of a raw traceback.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // "[youtube] dQw4w9WgXcQ:" style prefixes carry ids that must not be matched
    static ref EXTRACTOR_PREFIX_RE: Regex = Regex::new(r"\[[^\]\s]+\]\s*[^\s:]+:").unwrap();
    static ref DRM_RE: Regex = Regex::new(r"\bdrm\b").unwrap();
    static ref HTTP_429_RE: Regex = Regex::new(r"\b429\b").unwrap();
    static ref HTTP_403_RE: Regex = Regex::new(r"\b403\b").unwrap();
}

/// Known reasons a yt-dlp run gets refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockingReason {
    /// HTTP 403 Forbidden
    Http403Forbidden,
    /// Age-gated content, needs a logged-in session
    AgeRestricted,
    GeoBlocked,
    /// Socket or process timeout
    NetworkTimeout,
    /// HTTP 429 or similar
    RateLimited,
    /// "Sign in to confirm you're not a bot" and friends
    BotDetection,
    PrivateVideo,
    /// Deleted, removed for copyright, never existed
    VideoUnavailable,
    /// DRM, Premium or paid content; no workaround
    DrmProtected,
    MembersOnly,
    /// Site or URL yt-dlp has no extractor for
    UnsupportedUrl,
    /// Merge/transcode step could not run
    FfmpegMissing,
    /// Selector named a format the site does not offer
    FormatUnavailable,
    Unknown,
}

impl BlockingReason {
    /// Permanent restrictions cannot be fixed by retrying with other settings
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::DrmProtected | Self::VideoUnavailable | Self::UnsupportedUrl
        )
    }

    pub fn proxy_might_help(&self) -> bool {
        matches!(
            self,
            Self::Http403Forbidden
                | Self::GeoBlocked
                | Self::NetworkTimeout
                | Self::RateLimited
                | Self::BotDetection
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geographic restriction",
            Self::NetworkTimeout => "Network timeout",
            Self::RateLimited => "Rate limited",
            Self::BotDetection => "Bot detection triggered",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::DrmProtected => "DRM-protected content",
            Self::MembersOnly => "Members-only content",
            Self::UnsupportedUrl => "Unsupported URL",
            Self::FfmpegMissing => "ffmpeg not available",
            Self::FormatUnavailable => "Requested format not available",
            Self::Unknown => "Unknown failure",
        }
    }

    /// What the user can try next
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Http403Forbidden => {
                "What to try:\n\
                 1) Use a VPN/Proxy (SOCKS5)\n\
                 2) Refresh cookies (re-login in the browser)\n\
                 3) Wait and try again later"
            }
            Self::AgeRestricted => {
                "Video is age-restricted.\n\
                 Pass cookies from a logged-in browser (--cookies-from-browser)."
            }
            Self::GeoBlocked => {
                "Video is blocked in your country.\n\
                 Use a proxy or VPN in an allowed region."
            }
            Self::NetworkTimeout => {
                "Network timeout.\n\
                 Check the connection, or raise the timeout and try again."
            }
            Self::RateLimited => "The site is rate-limiting requests. Wait 10-15 minutes.",
            Self::BotDetection => {
                "Automated access was detected.\n\
                 Use cookies from a logged-in browser or a fresh proxy."
            }
            Self::PrivateVideo => "Video is private. Cookies from an authorized account are needed.",
            Self::VideoUnavailable => "Video is unavailable (deleted, removed or made private).",
            Self::DrmProtected => "Content is DRM-protected and cannot be downloaded as a file.",
            Self::MembersOnly => "Video requires channel membership. Use cookies from a member account.",
            Self::UnsupportedUrl => "yt-dlp does not support this URL. Check the link.",
            Self::FfmpegMissing => {
                "Merging and audio extraction need ffmpeg.\n\
                 Install ffmpeg or point --ffmpeg-location at it."
            }
            Self::FormatUnavailable => "That format is gone. Inspect the URL again and pick another.",
            Self::Unknown => "Check the URL and try again.",
        }
    }
}

/// Classify a yt-dlp error message
pub fn diagnose_error(error: &str) -> Option<BlockingReason> {
    if error.trim().is_empty() {
        return None;
    }

    let lower = error.to_lowercase();
    let lower = EXTRACTOR_PREFIX_RE.replace_all(&lower, "");

    // Most specific first
    if DRM_RE.is_match(&lower)
        || lower.contains("widevine")
        || lower.contains("youtube premium")
        || lower.contains("requires purchase")
        || lower.contains("rental")
    {
        return Some(BlockingReason::DrmProtected);
    }

    if lower.contains("members only")
        || lower.contains("members-only")
        || lower.contains("join this channel")
        || lower.contains("available to members")
    {
        return Some(BlockingReason::MembersOnly);
    }

    if lower.contains("ffmpeg not found")
        || lower.contains("ffmpeg is not installed")
        || lower.contains("ffprobe and ffmpeg not found")
        || lower.contains("ffmpeg could not be found")
    {
        return Some(BlockingReason::FfmpegMissing);
    }

    if lower.contains("requested format is not available") {
        return Some(BlockingReason::FormatUnavailable);
    }

    if lower.contains("unsupported url") {
        return Some(BlockingReason::UnsupportedUrl);
    }

    if lower.contains("age-restricted")
        || lower.contains("sign in to confirm your age")
        || lower.contains("age_verification")
    {
        return Some(BlockingReason::AgeRestricted);
    }

    if lower.contains("private video") || lower.contains("video is private") {
        return Some(BlockingReason::PrivateVideo);
    }

    if lower.contains("video unavailable")
        || lower.contains("video has been removed")
        || lower.contains("no longer available")
    {
        return Some(BlockingReason::VideoUnavailable);
    }

    if lower.contains("not available in your country") || lower.contains("blocked in your country")
    {
        return Some(BlockingReason::GeoBlocked);
    }

    if HTTP_429_RE.is_match(&lower)
        || lower.contains("rate limit")
        || lower.contains("too many requests")
    {
        return Some(BlockingReason::RateLimited);
    }

    if lower.contains("not a bot") || lower.contains("captcha") || lower.contains("unusual traffic") {
        return Some(BlockingReason::BotDetection);
    }

    if HTTP_403_RE.is_match(&lower) || lower.contains("forbidden") {
        return Some(BlockingReason::Http403Forbidden);
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection refused")
        || lower.contains("network unreachable")
    {
        return Some(BlockingReason::NetworkTimeout);
    }

    Some(BlockingReason::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_403_detection() {
        let error = "ERROR: HTTP Error 403: Forbidden";
        assert_eq!(diagnose_error(error), Some(BlockingReason::Http403Forbidden));
    }

    #[test]
    fn test_age_restricted_detection() {
        let error = "Sign in to confirm your age";
        assert_eq!(diagnose_error(error), Some(BlockingReason::AgeRestricted));
    }

    #[test]
    fn test_timeout_detection() {
        let error = "Timed out after 30s";
        assert_eq!(diagnose_error(error), Some(BlockingReason::NetworkTimeout));
    }

    #[test]
    fn test_ffmpeg_missing_detection() {
        let error = "ERROR: You have requested merging of multiple formats but ffmpeg is not installed. Aborting due to --abort-on-error";
        assert_eq!(diagnose_error(error), Some(BlockingReason::FfmpegMissing));
    }

    #[test]
    fn test_unsupported_url_detection() {
        let error = "ERROR: Unsupported URL: https://example.com/";
        let reason = diagnose_error(error).unwrap();
        assert_eq!(reason, BlockingReason::UnsupportedUrl);
        assert!(reason.is_permanent());
    }

    #[test]
    fn test_format_unavailable_detection() {
        let error = "ERROR: [youtube] abc: Requested format is not available";
        assert_eq!(diagnose_error(error), Some(BlockingReason::FormatUnavailable));
    }

    #[test]
    fn test_video_id_digits_are_ignored() {
        let error = "ERROR: [youtube] x429AbCdEfG: Sign in to confirm you're not a bot";
        assert_eq!(diagnose_error(error), Some(BlockingReason::BotDetection));

        let error = "ERROR: [youtube] k403LmNoPqR: Private video";
        assert_eq!(diagnose_error(error), Some(BlockingReason::PrivateVideo));
    }

    #[test]
    fn test_video_id_letters_are_ignored() {
        let error = "ERROR: [youtube] aDrMq1w2e3r: Video unavailable";
        let reason = diagnose_error(error).unwrap();
        assert_eq!(reason, BlockingReason::VideoUnavailable);

        let error = "ERROR: [youtube] abc: This video is DRM protected";
        assert_eq!(diagnose_error(error), Some(BlockingReason::DrmProtected));
    }

    #[test]
    fn test_429_detection() {
        let error = "ERROR: [youtube] abc: HTTP Error 429: Too Many Requests";
        assert_eq!(diagnose_error(error), Some(BlockingReason::RateLimited));
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(diagnose_error("   "), None);
        assert_eq!(diagnose_error("something odd"), Some(BlockingReason::Unknown));
    }

    #[test]
    fn test_proxy_hint() {
        assert!(BlockingReason::GeoBlocked.proxy_might_help());
        assert!(!BlockingReason::DrmProtected.proxy_might_help());
    }
}
