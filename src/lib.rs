pub mod commands;
pub mod downloader;
pub mod logging;

pub use downloader::{
    Downloader, DownloadRequest, DownloadResult, GrabError, GrabberConfig, Menu, MenuPolicy,
    Selection, SelectionMode,
};
