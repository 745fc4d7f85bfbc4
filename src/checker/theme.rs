//! Theme metadata extraction from HTML.
//!
//! # Responsibilities
//! - Locate the theme metadata element with a configured CSS selector
//! - Resolve the theme version from an attribute or, failing that, from the
//!   theme URL through an ordered list of extraction strategies
//! - Support the legacy Volantis `<head hexo-theme="...">` marker
//!
//! # Design Decisions
//! - Inspection is synchronous and pure (`&str → Option<ThemeInfo>`); the
//!   parsed document never crosses an await point
//! - Selectors are parsed once at construction; a bad selector is a config error

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::config::ThemeConfig;

/// Selector value that switches to the legacy Volantis head-attribute check.
pub const LEGACY_VOLANTIS_SELECTOR: &str = "volantis";

const VOLANTIS_REPO_FRAGMENT: &str = "/volantis-x/hexo-theme-volantis/";
const VOLANTIS_THEME_NAME: &str = "Volantis";

static TREE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/tree/([\d.]+(?:-[\w.]+)?)").expect("valid regex"));
static BARE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+(?:-[\w.]+)?$").expect("valid regex"));
static FRAGMENT_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/#([\d.]+(?:-[\w.]+)?)").expect("valid regex"));
static HEAD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("head").expect("valid selector"));

/// Pulls a version out of a theme URL or attribute value.
pub type VersionStrategy = fn(&str) -> Option<String>;

/// Fallback chain used when the version attribute is missing, in priority order.
pub const VERSION_STRATEGIES: &[VersionStrategy] = &[version_from_tree_path, bare_version];

/// `https://github.com/xaoxuu/hexo-theme-stellar/tree/1.29.1` → `1.29.1`
pub fn version_from_tree_path(content: &str) -> Option<String> {
    TREE_VERSION
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// `1.29.1` or `2.0.0-rc.1` as the whole value.
pub fn bare_version(content: &str) -> Option<String> {
    BARE_VERSION.find(content).map(|m| m.as_str().to_string())
}

/// `https://github.com/volantis-x/hexo-theme-volantis/#6.0.0-alpha.0` → `6.0.0-alpha.0`
pub fn version_from_fragment(content: &str) -> Option<String> {
    FRAGMENT_VERSION
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Run the strategies in order and return the first hit.
pub fn resolve_version(content: &str) -> Option<String> {
    VERSION_STRATEGIES.iter().find_map(|strategy| strategy(content))
}

/// Theme metadata found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeInfo {
    pub name: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone)]
enum Lookup {
    LegacyVolantis,
    Meta {
        selector: Selector,
        content_attr: String,
        version_attr: String,
    },
}

/// Extracts theme name and version from an HTML document.
#[derive(Debug, Clone)]
pub struct ThemeInspector {
    lookup: Lookup,
}

impl ThemeInspector {
    pub fn new(config: &ThemeConfig) -> Result<Self, String> {
        let lookup = if config.meta_selector == LEGACY_VOLANTIS_SELECTOR {
            Lookup::LegacyVolantis
        } else {
            let selector = Selector::parse(&config.meta_selector).map_err(|e| {
                format!("invalid theme selector '{}': {:?}", config.meta_selector, e)
            })?;
            Lookup::Meta {
                selector,
                content_attr: config.content_attr.clone(),
                version_attr: config.version_attr.clone(),
            }
        };
        Ok(Self { lookup })
    }

    /// Return the theme found in `html`, or `None` when the page carries no
    /// usable metadata.
    pub fn inspect(&self, html: &str) -> Option<ThemeInfo> {
        let document = Html::parse_document(html);
        match &self.lookup {
            Lookup::LegacyVolantis => inspect_volantis(&document),
            Lookup::Meta {
                selector,
                content_attr,
                version_attr,
            } => {
                let element = document.select(selector).next()?;
                let attrs = element.value();
                let content = attrs.attr(content_attr).filter(|c| !c.is_empty())?;
                let version = attrs
                    .attr(version_attr)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .or_else(|| resolve_version(content))?;
                Some(ThemeInfo {
                    name: attrs.attr("theme-name").map(str::to_string),
                    version,
                })
            }
        }
    }
}

fn inspect_volantis(document: &Html) -> Option<ThemeInfo> {
    let theme_url = document
        .select(&HEAD)
        .next()
        .and_then(|head| head.value().attr("hexo-theme"))
        .filter(|url| url.contains(VOLANTIS_REPO_FRAGMENT));

    let Some(theme_url) = theme_url else {
        tracing::debug!("Volantis head marker not found");
        return None;
    };

    version_from_fragment(theme_url).map(|version| ThemeInfo {
        name: Some(VOLANTIS_THEME_NAME.to_string()),
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stellar() -> ThemeInspector {
        ThemeInspector::new(&ThemeConfig::default()).unwrap()
    }

    fn volantis() -> ThemeInspector {
        ThemeInspector::new(&ThemeConfig {
            meta_selector: LEGACY_VOLANTIS_SELECTOR.to_string(),
            ..ThemeConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_version_strategies() {
        assert_eq!(
            version_from_tree_path("https://github.com/xaoxuu/hexo-theme-stellar/tree/1.29.1"),
            Some("1.29.1".to_string())
        );
        assert_eq!(version_from_tree_path("https://github.com/xaoxuu/hexo-theme-stellar"), None);
        assert_eq!(bare_version("2.0.0-rc.1"), Some("2.0.0-rc.1".to_string()));
        assert_eq!(bare_version("v2.0.0"), None);
        assert_eq!(bare_version("see 2.0.0"), None);
        assert_eq!(
            version_from_fragment(
                "https://github.com/volantis-x/hexo-theme-volantis/#6.0.0-alpha.0"
            ),
            Some("6.0.0-alpha.0".to_string())
        );
    }

    #[test]
    fn test_tree_path_wins_over_bare_version() {
        assert_eq!(resolve_version("https://x/tree/1.2.3"), Some("1.2.3".to_string()));
        assert_eq!(resolve_version("1.2.3"), Some("1.2.3".to_string()));
        assert_eq!(resolve_version("https://x/releases"), None);
    }

    #[test]
    fn test_version_attribute_preferred() {
        let html = r#"<html><head>
            <meta name="hexo-theme" content="https://github.com/xaoxuu/hexo-theme-stellar/tree/1.0.0"
                  theme-name="Stellar" theme-version="1.30.0">
        </head><body></body></html>"#;
        let info = stellar().inspect(html).unwrap();
        assert_eq!(info.name.as_deref(), Some("Stellar"));
        assert_eq!(info.version, "1.30.0");
    }

    #[test]
    fn test_version_from_content_tree_path() {
        let html = r#"<html><head>
            <meta name="hexo-theme" content="https://github.com/xaoxuu/hexo-theme-stellar/tree/2.0.1"
                  theme-name="Stellar">
        </head></html>"#;
        let info = stellar().inspect(html).unwrap();
        assert_eq!(info.version, "2.0.1");
    }

    #[test]
    fn test_empty_version_attribute_falls_back() {
        let html = r#"<meta content="1.4.2" theme-name="Stellar" theme-version="">"#;
        assert_eq!(stellar().inspect(html).unwrap().version, "1.4.2");
    }

    #[test]
    fn test_missing_metadata() {
        // No matching element.
        assert!(stellar().inspect("<html><head></head></html>").is_none());
        // Content without a resolvable version.
        let html = r#"<meta content="https://github.com/xaoxuu/hexo-theme-stellar" theme-name="Stellar">"#;
        assert!(stellar().inspect(html).is_none());
        // Version without content.
        let html = r#"<meta theme-name="Stellar" theme-version="1.0.0">"#;
        assert!(stellar().inspect(html).is_none());
    }

    #[test]
    fn test_volantis_head_attribute() {
        let html = r#"<html><head hexo-theme="https://github.com/volantis-x/hexo-theme-volantis/#5.8.0"></head></html>"#;
        let info = volantis().inspect(html).unwrap();
        assert_eq!(info.name.as_deref(), Some("Volantis"));
        assert_eq!(info.version, "5.8.0");

        let other = r#"<html><head hexo-theme="https://github.com/someone/hexo-theme-x/#1.0.0"></head></html>"#;
        assert!(volantis().inspect(other).is_none());

        let no_version = r#"<html><head hexo-theme="https://github.com/volantis-x/hexo-theme-volantis/"></head></html>"#;
        assert!(volantis().inspect(no_version).is_none());
    }

    #[test]
    fn test_invalid_selector() {
        let config = ThemeConfig {
            meta_selector: "meta[[".to_string(),
            ..ThemeConfig::default()
        };
        assert!(ThemeInspector::new(&config).is_err());
    }
}
