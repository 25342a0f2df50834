// Downloader module - format resolution and download orchestration

pub mod artifact;
pub mod backends;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod models;
pub mod orchestrator;
pub mod tools;
pub mod traits;
pub mod utils;
pub mod workspace;

pub use config::GrabberConfig;
pub use errors::{GrabError, Result};
pub use format_selector::FormatSelector;
pub use models::{
    ArtifactPolicy, BackendConfig, Candidate, DownloadRequest, DownloadResult, FormatRecord,
    Inspection, LadderOption, MediaInfo, MediaKind, Menu, MenuPolicy, PostProcessor, Selection,
    SelectionMode, SelectorPlan,
};
pub use orchestrator::Downloader;
pub use traits::DownloaderBackend;
