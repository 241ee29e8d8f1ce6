pub mod archive;
pub mod assets;
pub mod error;
pub mod page;
pub mod prettify;
pub mod report;
pub mod resolve;

pub use archive::{
    ArchiveEvent, ArchiveLayout, ArchiveOptions, ArchiveProgressCallback, download_and_rewrite,
    execute_archive, save_page,
};
pub use assets::{AssetKind, AssetRef, locate_assets};
pub use error::ArchiveError;
pub use page::{ElementNamespace, NodeId, Page};
pub use report::{ArchiveSummary, AssetOutcome, AssetStatus, generate_archive_report};
pub use resolve::{checked_filename, local_filename, resolve_source};
