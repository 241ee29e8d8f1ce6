use crate::commands::command_argument_builder;
use clap::error::ErrorKind;
use colored::Colorize;
use glitchdl_core::archive::{
    ArchiveEvent, ArchiveOptions, ArchiveProgressCallback, execute_archive,
};
use glitchdl_core::report::ArchiveSummary;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::ffi::OsString;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

pub const EXAMPLE_URL: &str = "https://resonance-concise-centipedes.glitch.me";

/// Parse the command line into the page URL to archive
pub fn parse_arguments<I, T>(args: I) -> Result<Url, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = command_argument_builder();
    let matches = command.try_get_matches_from_mut(args)?;

    matches.get_one::<Url>("URL").cloned().ok_or_else(|| {
        command.error(
            ErrorKind::MissingRequiredArgument,
            "the page URL is required",
        )
    })
}

/// Help and version requests surface as clap errors but are not failures
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

pub fn usage_example() -> String {
    format!("Example: glitchdl {}", EXAMPLE_URL)
}

/// Log to stderr. `RUST_LOG` overrides the default of errors only, which
/// keeps the progress output readable.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn progress_callback(progress_bar: ProgressBar) -> ArchiveProgressCallback {
    Arc::new(move |event: ArchiveEvent| match event {
        ArchiveEvent::PageFetched { url, bytes } => progress_bar.suspend(|| {
            println!(
                "{} Fetched {} ({} bytes)",
                "✓".green().bold(),
                url.bright_white(),
                bytes
            )
        }),
        ArchiveEvent::AssetsLocated { count } => {
            progress_bar.suspend(|| println!("{} Found {} asset(s)", "→".blue(), count));
            if count > 0 {
                progress_bar.set_length(count as u64);
                progress_bar.set_draw_target(ProgressDrawTarget::stderr());
            }
        }
        ArchiveEvent::AssetStarted { filename, .. } => {
            progress_bar.set_message(format!("Downloading: {}", filename));
        }
        ArchiveEvent::AssetSaved { .. } => progress_bar.inc(1),
        ArchiveEvent::AssetFailed { src, reason } => {
            progress_bar.suspend(|| {
                eprintln!(
                    "{} Failed to download {}: {}",
                    "⚠".yellow().bold(),
                    src,
                    reason
                )
            });
            progress_bar.inc(1);
        }
        ArchiveEvent::PageSaved { .. } => progress_bar.finish_and_clear(),
    })
}

/// Archive a page into ./glitch_download, showing progress on the terminal
pub fn handle_archive(url: &Url) -> anyhow::Result<ArchiveSummary> {
    debug!("Archiving {}", url);
    println!("\n{} Fetching {}...", "→".blue().bold(), url.as_str().bright_white());

    // Drawn only once the asset count is known
    let progress_bar = ProgressBar::hidden();
    progress_bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let result = execute_archive(
        ArchiveOptions::new(url.clone()),
        Some(progress_callback(progress_bar.clone())),
    );

    if !progress_bar.is_finished() {
        progress_bar.finish_and_clear();
    }

    Ok(result?)
}
