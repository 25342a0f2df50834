// Front-end facing entry points
//
// Thin wrappers around `Downloader` that turn typed failures into the
// message + hint text a UI shows to the user.

use crate::downloader::{
    Downloader, DownloadResult, GrabError, GrabberConfig, Inspection, Menu, Selection,
};

/// Full user-facing text for a failure
pub fn describe_error(err: &GrabError, proxy: Option<&str>) -> String {
    let mut text = err.to_string();

    if let Some(reason) = err.blocking_reason() {
        text.push_str(&format!("\n\n⚠️ Detected: {}", reason.description()));
    }

    if let Some(suggestion) = err.suggestion() {
        text.push('\n');
        text.push_str(&suggestion);
    }

    // Add proxy info (but not for permanent restrictions)
    if let Some(reason) = err.blocking_reason() {
        if !reason.is_permanent() {
            if let Some(p) = proxy {
                text.push_str(&format!("\n\nProxy in use: {}", p));
            } else if reason.proxy_might_help() {
                text.push_str("\n\n💡 Tip: No proxy configured. Try --proxy socks5://...");
            }
        }
    }

    text
}

/// Inspect a URL and return its menu
pub async fn get_video_info(url: &str, config: &GrabberConfig) -> Result<Inspection, String> {
    let downloader = Downloader::new(config.clone());
    downloader
        .inspect(url)
        .await
        .map_err(|e| describe_error(&e, config.proxy.as_deref()))
}

/// Download the selected combination and return the artifact
pub async fn download_video(
    url: &str,
    selection: &Selection,
    config: &GrabberConfig,
) -> Result<DownloadResult, String> {
    let downloader = Downloader::new(config.clone());
    downloader
        .fetch(url, selection)
        .await
        .map_err(|e| describe_error(&e, config.proxy.as_deref()))
}

/// Menu rendered as text lines, one entry per line
pub fn render_menu(inspection: &Inspection) -> Vec<String> {
    let mut lines = vec![format!("🎬 {}", inspection.title)];

    match &inspection.menu {
        Menu::PerStream { video, audio } => {
            lines.push(format!("Video streams ({}):", video.len()));
            lines.extend(video.iter().map(|c| format!("  {}", c.display_label)));
            lines.push(format!("Audio streams ({}):", audio.len()));
            lines.extend(audio.iter().map(|c| format!("  {}", c.display_label)));
        }
        Menu::Ladder { options } => {
            lines.push("Options:".to_string());
            lines.extend(options.iter().map(|o| format!("  {}", o.label)));
        }
    }

    lines
}
