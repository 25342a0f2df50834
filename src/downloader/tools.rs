use serde::{Deserialize, Serialize};
use std::process::Command;

use super::config::GrabberConfig;
use super::utils::find_binary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ToolType {
    YtDlp,
    /// Needed for merging and post-processing
    Ffmpeg,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    fn version_arg(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "--version",
            ToolType::Ffmpeg => "-version",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub tool_type: ToolType,
    pub version: Option<String>,
    pub path: String,
    pub is_available: bool,
}

pub struct ToolManager {
    config: GrabberConfig,
}

impl ToolManager {
    pub fn new(config: GrabberConfig) -> Self {
        Self { config }
    }

    pub fn get_tool_info(&self, tool_type: ToolType) -> ToolInfo {
        let path = self.binary_for(tool_type);
        let version = Self::get_version(&path, tool_type);

        ToolInfo {
            name: tool_type.as_str().to_string(),
            tool_type,
            is_available: version.is_some(),
            version,
            path,
        }
    }

    pub fn get_all_tools(&self) -> Vec<ToolInfo> {
        vec![
            self.get_tool_info(ToolType::YtDlp),
            self.get_tool_info(ToolType::Ffmpeg),
        ]
    }

    fn binary_for(&self, tool_type: ToolType) -> String {
        match tool_type {
            ToolType::YtDlp => self.config.resolve_ytdlp(),
            ToolType::Ffmpeg => match &self.config.ffmpeg_location {
                // --ffmpeg-location may name the binary or its directory
                Some(loc) if std::path::Path::new(loc).is_dir() => std::path::Path::new(loc)
                    .join("ffmpeg")
                    .to_string_lossy()
                    .to_string(),
                Some(loc) => loc.clone(),
                None => find_binary("ffmpeg"),
            },
        }
    }

    fn get_version(path: &str, tool_type: ToolType) -> Option<String> {
        match Command::new(path).arg(tool_type.version_arg()).output() {
            Ok(output) if output.status.success() => {
                // ffmpeg prints a banner; the first line carries the version
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .map(|l| l.trim().to_string())
            }
            _ => None,
        }
    }
}
