// Per-run summary of downloaded and failed assets

use crate::assets::AssetKind;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Downloaded { local_src: String, bytes: u64 },
    Failed { reason: String },
}

/// What happened to one asset element during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetOutcome {
    pub kind: AssetKind,
    pub src: String,
    pub status: AssetStatus,
}

impl AssetOutcome {
    pub fn downloaded(kind: AssetKind, src: String, local_src: String, bytes: u64) -> Self {
        Self {
            kind,
            src,
            status: AssetStatus::Downloaded { local_src, bytes },
        }
    }

    pub fn failed(kind: AssetKind, src: String, reason: String) -> Self {
        Self {
            kind,
            src,
            status: AssetStatus::Failed { reason },
        }
    }

    pub fn is_downloaded(&self) -> bool {
        matches!(self.status, AssetStatus::Downloaded { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub page_url: String,
    pub index_path: PathBuf,
    pub assets_dir: PathBuf,
    pub parse_warnings: usize,
    pub outcomes: Vec<AssetOutcome>,
}

impl ArchiveSummary {
    pub fn downloaded(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.outcomes.iter().filter(|o| o.is_downloaded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.outcomes.iter().filter(|o| !o.is_downloaded())
    }

    pub fn total_bytes(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                AssetStatus::Downloaded { bytes, .. } => bytes,
                AssetStatus::Failed { .. } => 0,
            })
            .sum()
    }
}

/// Generate a plain-text report of an archive run
pub fn generate_archive_report(summary: &ArchiveSummary) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Page: {}\n", summary.page_url));
    report.push_str(&format!("  Assets found: {}\n", summary.outcomes.len()));
    report.push_str(&format!(
        "  Downloaded: {} ({} bytes)\n",
        summary.downloaded().count(),
        summary.total_bytes()
    ));
    report.push_str(&format!("  Failed: {}\n", summary.failed().count()));
    if summary.parse_warnings > 0 {
        report.push_str(&format!(
            "  Markup issues recovered: {}\n",
            summary.parse_warnings
        ));
    }

    if !summary.outcomes.is_empty() {
        report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
        report.push_str("## Assets\n");

        for outcome in &summary.outcomes {
            let line = match &outcome.status {
                AssetStatus::Downloaded { local_src, .. } => format!(
                    "  {} {} {} {}",
                    "✓".green(),
                    outcome.kind.tag().dimmed(),
                    outcome.src,
                    format!("→ {}", local_src).cyan()
                ),
                AssetStatus::Failed { reason } => format!(
                    "  {} {} {} {}",
                    "✗".red(),
                    outcome.kind.tag().dimmed(),
                    outcome.src,
                    reason.yellow()
                ),
            };
            report.push_str(&line);
            report.push('\n');
        }
    }

    report.push('\n');
    report.push_str(&format!("  Local HTML: {}\n", summary.index_path.display()));
    report.push_str(&format!("  Assets saved to: {}\n", summary.assets_dir.display()));

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(outcomes: Vec<AssetOutcome>) -> ArchiveSummary {
        ArchiveSummary {
            page_url: "https://resonance-concise-centipedes.glitch.me/".to_string(),
            index_path: PathBuf::from("glitch_download/index.html"),
            assets_dir: PathBuf::from("glitch_download/assets"),
            parse_warnings: 0,
            outcomes,
        }
    }

    #[test]
    fn test_summary_counts() {
        let s = summary(vec![
            AssetOutcome::downloaded(
                AssetKind::Image,
                "https://host/img/cat.png".to_string(),
                "assets/cat.png".to_string(),
                1024,
            ),
            AssetOutcome::failed(
                AssetKind::Audio,
                "https://host/theme.mp3".to_string(),
                "HTTP status 404".to_string(),
            ),
            AssetOutcome::downloaded(
                AssetKind::AssetItem,
                "https://host/tree.glb".to_string(),
                "assets/tree.glb".to_string(),
                76,
            ),
        ]);

        assert_eq!(s.downloaded().count(), 2);
        assert_eq!(s.failed().count(), 1);
        assert_eq!(s.total_bytes(), 1100);
    }

    #[test]
    fn test_generate_archive_report() {
        let s = summary(vec![
            AssetOutcome::downloaded(
                AssetKind::Image,
                "https://host/img/cat.png".to_string(),
                "assets/cat.png".to_string(),
                10,
            ),
            AssetOutcome::failed(
                AssetKind::Audio,
                "https://host/theme.mp3".to_string(),
                "HTTP status 404 for https://host/theme.mp3".to_string(),
            ),
        ]);

        let report = generate_archive_report(&s);

        assert!(report.contains("Assets found: 2"));
        assert!(report.contains("Downloaded: 1 (10 bytes)"));
        assert!(report.contains("Failed: 1"));
        assert!(report.contains("https://host/img/cat.png"));
        assert!(report.contains("assets/cat.png"));
        assert!(report.contains("HTTP status 404"));
        assert!(report.contains("glitch_download/index.html"));
        assert!(report.contains("glitch_download/assets"));
        assert!(!report.contains("Markup issues"));
    }

    #[test]
    fn test_generate_archive_report_no_assets() {
        let mut s = summary(Vec::new());
        s.parse_warnings = 3;

        let report = generate_archive_report(&s);

        assert!(report.contains("Assets found: 0"));
        assert!(report.contains("Markup issues recovered: 3"));
        assert!(!report.contains("## Assets"));
    }
}
