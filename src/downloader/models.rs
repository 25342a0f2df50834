// Common data models for the grab pipeline

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One row of yt-dlp format metadata (`formats[]` in `--dump-json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatRecord {
    /// Format ID (e.g., "137", "140", "hls-720p")
    #[serde(default)]
    pub format_id: String,
    /// File extension (mp4, webm, m4a)
    #[serde(default)]
    pub ext: String,
    /// Video codec, "none" for audio-only streams
    #[serde(default)]
    pub vcodec: Option<String>,
    /// Audio codec, "none" for video-only streams
    #[serde(default)]
    pub acodec: Option<String>,
    /// Resolution string (e.g., "1920x1080", "audio only")
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Audio bitrate in kbps
    #[serde(default)]
    pub abr: Option<f64>,
    /// Total bitrate in kbps
    #[serde(default)]
    pub tbr: Option<f64>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub format_note: Option<String>,
}

impl FormatRecord {
    /// Whether the record carries a video stream (missing or empty codec counts as "none")
    pub fn has_video(&self) -> bool {
        codec_present(self.vcodec.as_deref())
    }

    pub fn has_audio(&self) -> bool {
        codec_present(self.acodec.as_deref())
    }
}

fn codec_present(codec: Option<&str>) -> bool {
    codec.map_or(false, |c| !c.is_empty() && c != "none")
}

/// Title plus raw formats, as returned by the extraction backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub formats: Vec<FormatRecord>,
}

fn default_title() -> String {
    "video".to_string()
}

/// What a stream (or a finished artifact) carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Audio,
}

/// A single selectable stream in a per-stream menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub extension: String,
    pub display_label: String,
    pub kind: MediaKind,
}

/// A synthesized entry in a resolution-ladder menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderOption {
    /// Target height; `None` for the best-audio entry
    pub height: Option<u32>,
    pub label: String,
    pub selector: String,
}

impl LadderOption {
    pub fn is_audio(&self) -> bool {
        self.height.is_none()
    }
}

/// How the menu is constructed from raw formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuPolicy {
    /// Every video-only and audio-only stream listed on its own
    #[default]
    PerStream,
    /// Fixed resolution ladder, each rung merging best video + best audio
    ResolutionLadder,
}

/// The option set presented to the user; built by exactly one policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Menu {
    PerStream {
        video: Vec<Candidate>,
        audio: Vec<Candidate>,
    },
    Ladder {
        options: Vec<LadderOption>,
    },
}

impl Menu {
    pub fn policy(&self) -> MenuPolicy {
        match self {
            Self::PerStream { .. } => MenuPolicy::PerStream,
            Self::Ladder { .. } => MenuPolicy::ResolutionLadder,
        }
    }

    /// Display labels in presentation order
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::PerStream { video, audio } => video
                .iter()
                .chain(audio.iter())
                .map(|c| c.display_label.as_str())
                .collect(),
            Self::Ladder { options } => options.iter().map(|o| o.label.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Merge one video and one audio stream into mp4
    CombinedBestQuality,
    VideoOnly,
    AudioOnly,
}

impl SelectionMode {
    /// Whether the mode consumes a video candidate from a per-stream menu
    pub fn needs_video(&self) -> bool {
        matches!(self, Self::CombinedBestQuality | Self::VideoOnly)
    }

    pub fn needs_audio(&self) -> bool {
        matches!(self, Self::CombinedBestQuality | Self::AudioOnly)
    }
}

/// What the UI hands back after the user picked from a menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub mode: SelectionMode,
    /// Chosen video stream; `None` takes the first listed
    pub video_id: Option<String>,
    /// Chosen audio stream; `None` takes the first listed
    pub audio_id: Option<String>,
    /// Ladder rung; `None` takes the highest available
    pub height: Option<u32>,
}

impl Selection {
    pub fn combined(video_id: impl Into<String>, audio_id: impl Into<String>) -> Self {
        Self {
            mode: SelectionMode::CombinedBestQuality,
            video_id: Some(video_id.into()),
            audio_id: Some(audio_id.into()),
            height: None,
        }
    }

    pub fn video_only(video_id: impl Into<String>) -> Self {
        Self {
            mode: SelectionMode::VideoOnly,
            video_id: Some(video_id.into()),
            audio_id: None,
            height: None,
        }
    }

    pub fn audio_only(audio_id: impl Into<String>) -> Self {
        Self {
            mode: SelectionMode::AudioOnly,
            video_id: None,
            audio_id: Some(audio_id.into()),
            height: None,
        }
    }

    /// Ladder rung at `height` (combined) or, with `None`, the best-audio entry
    pub fn ladder(height: Option<u32>) -> Self {
        Self {
            mode: match height {
                Some(_) => SelectionMode::CombinedBestQuality,
                None => SelectionMode::AudioOnly,
            },
            video_id: None,
            audio_id: None,
            height,
        }
    }

    /// Mode only; every choice falls back to the menu default
    pub fn defaults(mode: SelectionMode) -> Self {
        Self {
            mode,
            video_id: None,
            audio_id: None,
            height: None,
        }
    }
}

/// Post-download step; at most one per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PostProcessor {
    #[default]
    None,
    ExtractAudioToMp3 { quality_kbps: u32 },
    TranscodeToMp4,
}

/// Where the backend writes its output inside the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputTarget {
    /// `output.{extension}`, known before the download starts
    Fixed { extension: String },
    /// `%(title)s.%(ext)s`, the backend decides the final extension
    Template,
}

/// Selector builder output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorPlan {
    pub selector: String,
    pub output_extension: String,
    pub merge_required: bool,
    pub post_processor: PostProcessor,
    pub output: OutputTarget,
    /// Video-bearing or audio-only result, drives the MIME type
    pub kind: MediaKind,
}

/// One user action, ready to hand to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source_url: String,
    pub title: String,
    pub plan: SelectorPlan,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>, title: impl Into<String>, plan: SelectorPlan) -> Self {
        Self {
            source_url: source_url.into(),
            title: title.into(),
            plan,
        }
    }

    pub fn selector_expression(&self) -> &str {
        &self.plan.selector
    }

    pub fn output_extension_hint(&self) -> &str {
        &self.plan.output_extension
    }

    pub fn merge_required(&self) -> bool {
        self.plan.merge_required
    }

    pub fn post_processing(&self) -> PostProcessor {
        self.plan.post_processor
    }
}

/// Output path handed to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPath {
    Path(PathBuf),
    Template(String),
}

impl OutputPath {
    /// Value for `-o`; yt-dlp expands `%` in it, so literal paths are escaped
    pub fn as_arg(&self) -> String {
        match self {
            Self::Path(path) => escape_template(&path.to_string_lossy()),
            Self::Template(template) => template.clone(),
        }
    }
}

/// Escape text so yt-dlp's output template treats it literally
pub fn escape_template(literal: &str) -> String {
    literal.replace('%', "%%")
}

/// Typed configuration for one backend download call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub format_selector: String,
    pub output: OutputPath,
    pub merge_output_format: Option<String>,
    pub post_processor: PostProcessor,
}

/// Rule for picking the artifact when the backend chose its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArtifactPolicy {
    /// Exactly one output file, otherwise AmbiguousArtifact
    #[default]
    RequireSingle,
    /// Newest modification time wins, ties broken by file name
    NewestModified,
}

/// The finished deliverable of one request
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// Where the file lived inside the (now released) workspace
    pub artifact_path: PathBuf,
    pub suggested_filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Menu plus title, returned from inspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub title: String,
    pub menu: Menu,
}
