// Helper functions shared by the extractor and the download backend

use std::process::Stdio;
use std::process::Command as StdCommand;

use regex::Regex;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration};

use super::config::GrabberConfig;

/// Why a subprocess run did not produce an exit status
#[derive(Debug, Error)]
pub enum RunError {
    /// The program could not be started at all
    #[error("{0}")]
    Spawn(String),
    /// Pipes or wait failed mid-run
    #[error("{0}")]
    Io(String),
    #[error("Timed out after {0}s")]
    TimedOut(u64),
}

/// Run command with timeout, capturing stdout and stderr.
///
/// The child is killed on timeout and whenever the returned future is dropped.
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<std::process::Output, RunError> {
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| RunError::Spawn(format!("Failed to start {}: {}", program, e)))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| RunError::Io(format!("Failed to capture stdout from {}", program)))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| RunError::Io(format!("Failed to capture stderr from {}", program)))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stdout: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stderr: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });

    match timeout(Duration::from_secs(timeout_secs), child.wait()).await {
        Ok(status_res) => {
            let status = status_res
                .map_err(|e| RunError::Io(format!("Failed to wait for {}: {}", program, e)))?;
            let stdout = stdout_task
                .await
                .map_err(|e| RunError::Io(format!("stdout task failed: {}", e)))?
                .map_err(RunError::Io)?;
            let stderr = stderr_task
                .await
                .map_err(|e| RunError::Io(format!("stderr task failed: {}", e)))?
                .map_err(RunError::Io)?;
            Ok(std::process::Output {
                status,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(RunError::TimedOut(timeout_secs))
        }
    }
}

/// Find yt-dlp executable in common paths
pub fn find_ytdlp() -> String {
    find_binary("yt-dlp")
}

pub(crate) fn find_binary(name: &str) -> String {
    let common_paths = [
        format!("/opt/homebrew/bin/{}", name), // Homebrew on Apple Silicon
        format!("/usr/local/bin/{}", name),    // Homebrew on Intel Mac
        format!("/usr/bin/{}", name),
    ];

    for path in &common_paths {
        if std::path::Path::new(path).exists() {
            return path.clone();
        }
    }

    if let Ok(output) = StdCommand::new("which").arg(name).output() {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
    }

    // Last resort: hope it's in PATH
    name.to_string()
}

/// Proxy, cookie and socket arguments common to every yt-dlp call
pub fn network_args(config: &GrabberConfig) -> Vec<String> {
    let mut args = vec![
        "--socket-timeout".to_string(),
        config.socket_timeout_secs.to_string(),
    ];

    if let Some(proxy) = &config.proxy {
        args.push("--proxy".to_string());
        args.push(proxy.clone());
    }

    if let Some(path) = &config.cookies_path {
        args.push("--cookies".to_string());
        args.push(path.clone());
    } else if let Some(browser) = &config.cookies_from_browser {
        args.push("--cookies-from-browser".to_string());
        args.push(browser.clone());
    }

    args
}

/// Make a video title safe to use as a file name
pub fn sanitize_filename(title: &str) -> String {
    lazy_static::lazy_static! {
        static ref ILLEGAL_RE: Regex = Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).unwrap();
        static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    }

    let replaced = ILLEGAL_RE.replace_all(title, "_");
    let collapsed = SPACE_RE.replace_all(replaced.trim(), " ");
    let cleaned = collapsed.trim_matches('.').trim();

    if cleaned.is_empty() {
        "video".to_string()
    } else {
        cleaned.chars().take(200).collect()
    }
}

/// Keep the last few meaningful stderr lines for error messages
pub fn stderr_summary(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let important: Vec<&str> = text
        .lines()
        .map(|l| l.trim())
        .filter(|l| l.starts_with("ERROR:"))
        .take(3)
        .collect();

    if !important.is_empty() {
        return important.join(" | ");
    }

    text.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().to_string())
        .unwrap_or_else(|| "yt-dlp exited without an error message".to_string())
}
