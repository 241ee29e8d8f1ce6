use crate::assets::{AssetRef, SOURCE_ATTR, locate_assets};
use crate::error::{ArchiveError, Result};
use crate::page::Page;
use crate::report::{ArchiveSummary, AssetOutcome};
use crate::resolve::{checked_filename, resolve_source};
use glitchdl_fetch::Fetcher;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub const OUTPUT_DIR: &str = "glitch_download";
pub const ASSETS_DIR: &str = "assets";
pub const INDEX_FILE: &str = "index.html";

/// Where the rewritten page and its assets are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    root: PathBuf,
}

impl ArchiveLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(ASSETS_DIR)
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn asset_path(&self, filename: &str) -> PathBuf {
        self.assets_dir().join(filename)
    }

    /// The `src` value a rewritten element points at, relative to the index.
    pub fn local_src(filename: &str) -> String {
        format!("{}/{}", ASSETS_DIR, filename)
    }

    /// Create the output and assets directories if missing.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(self.assets_dir())?;
        Ok(())
    }
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self::new(OUTPUT_DIR)
    }
}

/// Options for an archive run
pub struct ArchiveOptions {
    pub url: Url,
    pub layout: ArchiveLayout,
}

impl ArchiveOptions {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            layout: ArchiveLayout::default(),
        }
    }
}

/// Progress notifications emitted while a run proceeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveEvent {
    PageFetched { url: String, bytes: usize },
    AssetsLocated { count: usize },
    AssetStarted { index: usize, total: usize, filename: String },
    AssetSaved { filename: String, bytes: u64 },
    AssetFailed { src: String, reason: String },
    PageSaved { path: PathBuf },
}

/// Callback for reporting archive progress
pub type ArchiveProgressCallback = Arc<dyn Fn(ArchiveEvent) + Send + Sync>;

fn notify(progress: Option<&ArchiveProgressCallback>, event: ArchiveEvent) {
    if let Some(callback) = progress {
        callback(event);
    }
}

/// Run the whole pipeline: fetch the page, download its assets, rewrite and
/// save it. Only a failed page fetch or a failed write of the final page is
/// an error; individual asset failures are recorded in the summary.
pub fn execute_archive(
    options: ArchiveOptions,
    progress: Option<ArchiveProgressCallback>,
) -> Result<ArchiveSummary> {
    let ArchiveOptions { url, layout } = options;
    let progress = progress.as_ref();

    layout.prepare()?;

    info!("Fetching {}", url);
    let fetcher = Fetcher::new()?;
    let response = fetcher
        .fetch(&url)
        .map_err(|source| ArchiveError::PageFetchError {
            url: url.to_string(),
            source,
        })?;
    notify(
        progress,
        ArchiveEvent::PageFetched {
            url: url.to_string(),
            bytes: response.body.len(),
        },
    );

    if !response.is_html() {
        warn!(
            "{} was served as {}, parsing it as HTML anyway",
            url,
            response.content_type.as_deref().unwrap_or_default()
        );
    }

    let mut page = Page::parse(&response.text());

    let outcomes = download_and_rewrite(&mut page, &fetcher, &url, &layout, progress);

    let index_path = save_page(&page, &layout)?;
    notify(
        progress,
        ArchiveEvent::PageSaved {
            path: index_path.clone(),
        },
    );

    let summary = ArchiveSummary {
        page_url: url.to_string(),
        index_path,
        assets_dir: layout.assets_dir(),
        parse_warnings: page.parse_warnings().len(),
        outcomes,
    };

    info!(
        "Archive complete: {} downloaded, {} failed",
        summary.downloaded().count(),
        summary.failed().count()
    );
    Ok(summary)
}

/// Download every located asset in document order and point its `src` at
/// the local copy. A failed asset keeps its original `src` and never stops
/// the loop.
pub fn download_and_rewrite(
    page: &mut Page,
    fetcher: &Fetcher,
    page_url: &Url,
    layout: &ArchiveLayout,
    progress: Option<&ArchiveProgressCallback>,
) -> Vec<AssetOutcome> {
    let assets = locate_assets(page);
    let total = assets.len();
    info!("Found {} asset(s) to download", total);
    notify(progress, ArchiveEvent::AssetsLocated { count: total });

    let mut outcomes = Vec::with_capacity(total);

    for (index, asset) in assets.into_iter().enumerate() {
        match download_asset(&asset, fetcher, page_url, layout, index, total, progress) {
            Ok((filename, bytes)) => {
                let local_src = ArchiveLayout::local_src(&filename);
                page.set_attr(asset.node, SOURCE_ATTR, local_src.clone());
                debug!("Rewrote {} -> {}", asset.src, local_src);

                notify(progress, ArchiveEvent::AssetSaved { filename, bytes });
                outcomes.push(AssetOutcome::downloaded(asset.kind, asset.src, local_src, bytes));
            }
            Err(e) => {
                warn!("Failed to download {}: {}", asset.src, e);

                notify(
                    progress,
                    ArchiveEvent::AssetFailed {
                        src: asset.src.clone(),
                        reason: e.to_string(),
                    },
                );
                outcomes.push(AssetOutcome::failed(asset.kind, asset.src, e.to_string()));
            }
        }
    }

    outcomes
}

fn download_asset(
    asset: &AssetRef,
    fetcher: &Fetcher,
    page_url: &Url,
    layout: &ArchiveLayout,
    index: usize,
    total: usize,
    progress: Option<&ArchiveProgressCallback>,
) -> Result<(String, u64)> {
    let url = resolve_source(page_url, &asset.src)?;
    let filename = checked_filename(&url)?;

    info!("Downloading: {}", filename);
    notify(
        progress,
        ArchiveEvent::AssetStarted {
            index,
            total,
            filename: filename.clone(),
        },
    );

    let response = fetcher.fetch(&url)?;

    // Existing files with the same name are overwritten
    let path = layout.asset_path(&filename);
    fs::write(&path, &response.body).map_err(|source| ArchiveError::WriteError {
        path: path.clone(),
        source,
    })?;

    Ok((filename, response.body.len() as u64))
}

/// Write the prettified page to the layout's index path, replacing any
/// previous output.
pub fn save_page(page: &Page, layout: &ArchiveLayout) -> Result<PathBuf> {
    let path = layout.index_path();
    fs::write(&path, page.prettify()).map_err(|source| ArchiveError::WriteError {
        path: path.clone(),
        source,
    })?;
    info!("Saved rewritten page to {}", path.display());
    Ok(path)
}
