// Discovery of downloadable media elements

use crate::page::{NodeId, Page};
use tracing::debug;

/// Tags whose `src` attribute references a downloadable asset.
pub const ASSET_TAGS: [&str; 3] = ["a-asset-item", "audio", "img"];

pub const SOURCE_ATTR: &str = "src";

/// Prefix of an inline data URI, which is never downloaded.
pub const INLINE_DATA_PREFIX: &str = "data:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// A-Frame `<a-asset-item>` (models, textures, arbitrary files)
    AssetItem,
    Audio,
    Image,
}

impl AssetKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "a-asset-item" => Some(AssetKind::AssetItem),
            "audio" => Some(AssetKind::Audio),
            "img" => Some(AssetKind::Image),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            AssetKind::AssetItem => "a-asset-item",
            AssetKind::Audio => "audio",
            AssetKind::Image => "img",
        }
    }
}

/// An element of the page that references a remote asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub node: NodeId,
    pub kind: AssetKind,
    pub src: String,
}

/// Whether a `src` value should be downloaded at all.
pub fn is_downloadable(src: &str) -> bool {
    !src.is_empty() && !src.starts_with(INLINE_DATA_PREFIX)
}

/// Find every asset element in document order, skipping those with a
/// missing, empty or inline `src`.
pub fn locate_assets(page: &Page) -> Vec<AssetRef> {
    let mut assets = Vec::new();

    for node in page.elements_by_tag(&ASSET_TAGS) {
        let Some(kind) = page.tag_name(node).and_then(AssetKind::from_tag) else {
            continue;
        };

        match page.attr(node, SOURCE_ATTR) {
            Some(src) if is_downloadable(src) => {
                debug!("Found {} asset: {}", kind.tag(), src);
                assets.push(AssetRef {
                    node,
                    kind,
                    src: src.to_string(),
                });
            }
            Some(src) if !src.is_empty() => {
                debug!("Skipping inline {} asset", kind.tag());
            }
            _ => {
                debug!("Skipping {} without a source", kind.tag());
            }
        }
    }

    assets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_round_trip_tags() {
        for tag in ASSET_TAGS {
            let kind = AssetKind::from_tag(tag).unwrap();
            assert_eq!(kind.tag(), tag);
        }
        assert_eq!(AssetKind::from_tag("video"), None);
    }

    #[test]
    fn test_is_downloadable() {
        assert!(is_downloadable("https://host/img/cat.png"));
        assert!(is_downloadable("img/cat.png"));
        assert!(!is_downloadable(""));
        assert!(!is_downloadable("data:audio/wav;base64,AAAA"));
        assert!(!is_downloadable("data:image/png;base64,iVBORw0KGgo="));
    }

    #[test]
    fn test_locate_assets_all_kinds_in_order() {
        let page = Page::parse(
            r#"<body>
                <a-scene>
                    <a-assets>
                        <a-asset-item id="tree" src="https://cdn.glitch.me/tree.glb"></a-asset-item>
                    </a-assets>
                </a-scene>
                <audio src="https://cdn.glitch.me/theme.mp3"></audio>
                <img src="https://host/img/cat.png">
            </body>"#,
        );

        let assets = locate_assets(&page);
        assert_eq!(assets.len(), 3);
        assert_eq!(assets[0].kind, AssetKind::AssetItem);
        assert_eq!(assets[0].src, "https://cdn.glitch.me/tree.glb");
        assert_eq!(assets[1].kind, AssetKind::Audio);
        assert_eq!(assets[2].kind, AssetKind::Image);
        assert_eq!(assets[2].src, "https://host/img/cat.png");
    }

    #[test]
    fn test_locate_assets_skips_missing_empty_and_inline() {
        let page = Page::parse(
            r#"<body>
                <img alt="no src">
                <img src="">
                <audio src="data:audio/wav;base64,AAAA"></audio>
                <img src="https://host/ok.png">
            </body>"#,
        );

        let assets = locate_assets(&page);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].src, "https://host/ok.png");
    }

    #[test]
    fn test_locate_assets_ignores_other_tags() {
        let page = Page::parse(
            r#"<body>
                <script src="https://host/app.js"></script>
                <video src="https://host/clip.mp4"></video>
                <source src="https://host/clip.webm">
                <a href="https://host/page.html">link</a>
            </body>"#,
        );

        assert!(locate_assets(&page).is_empty());
    }

    #[test]
    fn test_locate_assets_keeps_relative_sources() {
        let page = Page::parse(r#"<img src="img/local.png">"#);

        let assets = locate_assets(&page);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].src, "img/local.png");
    }

    #[test]
    fn test_locate_assets_inside_noscript_and_template() {
        let page = Page::parse(
            r#"<body>
                <noscript><img src="https://h/ns.png"></noscript>
                <template><img src="https://h/t.png"></template>
                <noscript><audio src="https://h/fallback.mp3"></audio></noscript>
            </body>"#,
        );

        let srcs: Vec<_> = locate_assets(&page).into_iter().map(|a| a.src).collect();
        assert_eq!(
            srcs,
            vec!["https://h/ns.png", "https://h/t.png", "https://h/fallback.mp3"]
        );
    }
}
