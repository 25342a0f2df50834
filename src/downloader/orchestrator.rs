// Orchestrator - inspect, plan, download once, locate, hand back bytes

use tracing::{info, warn};

use super::artifact;
use super::backends::YtDlpBackend;
use super::classifier::build_menu;
use super::config::GrabberConfig;
use super::errors::Result;
use super::extractors::{CliInfoExtractor, InfoExtractor};
use super::format_selector::{FormatSelector, MERGE_CONTAINER};
use super::models::{
    BackendConfig, DownloadRequest, DownloadResult, Inspection, Menu, Selection, SelectorPlan,
};
use super::traits::DownloaderBackend;
use super::workspace::Workspace;

pub struct Downloader {
    extractor: Box<dyn InfoExtractor>,
    backend: Box<dyn DownloaderBackend>,
    selector: FormatSelector,
    config: GrabberConfig,
}

impl Downloader {
    /// yt-dlp for both extraction and download
    pub fn new(config: GrabberConfig) -> Self {
        Self::with_components(
            config.clone(),
            Box::new(CliInfoExtractor::new(config.clone())),
            Box::new(YtDlpBackend::new(config)),
        )
    }

    pub fn with_components(
        config: GrabberConfig,
        extractor: Box<dyn InfoExtractor>,
        backend: Box<dyn DownloaderBackend>,
    ) -> Self {
        Self {
            extractor,
            backend,
            selector: FormatSelector::new(config.mp3_quality_kbps),
            config,
        }
    }

    /// Fetch metadata and build the menu with the configured policy
    pub async fn inspect(&self, url: &str) -> Result<Inspection> {
        info!("[Downloader] Inspecting {} with {}", url, self.extractor.name());
        let media = self.extractor.extract(url).await?;
        let menu = build_menu(&media.formats, self.config.menu_policy);
        info!(
            "[Downloader] '{}': {} menu entries ({:?})",
            media.title,
            menu.labels().len(),
            menu.policy()
        );
        Ok(Inspection {
            title: media.title,
            menu,
        })
    }

    /// Turn a selection into a plan; pure
    pub fn plan(&self, menu: &Menu, selection: &Selection) -> Result<SelectorPlan> {
        self.selector.resolve(menu, selection)
    }

    /// Run one download inside a fresh workspace and return the artifact bytes.
    ///
    /// The workspace is gone by the time this returns, whatever the outcome.
    pub async fn execute(&self, request: &DownloadRequest) -> Result<DownloadResult> {
        let workspace = Workspace::acquire()?;
        let plan = &request.plan;
        let (output, expected) = workspace.output_for(&plan.output);

        let backend_config = BackendConfig {
            format_selector: plan.selector.clone(),
            output,
            merge_output_format: plan.merge_required.then(|| MERGE_CONTAINER.to_string()),
            post_processor: plan.post_processor,
        };

        info!(
            "[Downloader] {} -> format '{}' via {} (merge: {}, post: {:?})",
            request.source_url,
            plan.selector,
            self.backend.name(),
            plan.merge_required,
            plan.post_processor
        );

        if let Err(e) = self
            .backend
            .download(&request.source_url, &backend_config)
            .await
        {
            warn!("[Downloader] ✗ {} failed: {}", self.backend.name(), e);
            return Err(e);
        }

        let located = artifact::locate(
            workspace.path(),
            expected.as_deref(),
            plan.kind,
            self.config.artifact_policy,
        )?;
        let data = tokio::fs::read(&located.path).await?;

        let result = DownloadResult {
            suggested_filename: located.suggested_filename(&request.title),
            mime_type: located.mime_type,
            artifact_path: located.path,
            data,
        };

        if let Err(e) = workspace.release() {
            warn!("[Downloader] Could not remove workspace: {}", e);
        }

        info!(
            "[Downloader] ✓ {} ({}, {} bytes)",
            result.suggested_filename,
            result.mime_type,
            result.data.len()
        );
        Ok(result)
    }

    /// Inspect, resolve the selection and download in one call
    pub async fn fetch(&self, url: &str, selection: &Selection) -> Result<DownloadResult> {
        let inspection = self.inspect(url).await?;
        let plan = self.plan(&inspection.menu, selection)?;
        let request = DownloadRequest::new(url, inspection.title, plan);
        self.execute(&request).await
    }
}
