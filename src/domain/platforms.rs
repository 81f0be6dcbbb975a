use crate::domain::model::{Category, PlatformDefinition};
use crate::utils::error::{OsintError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_unique_names, validate_url_template, Validate,
};
use serde::Deserialize;
use std::path::Path;

use crate::domain::model::Category::{Developer, International, Social};

/// Immutable, ordered set of platforms a probe run draws from.
///
/// Declaration order is the report order, so it must stay stable between
/// runs. Build one at startup and hand it to the prober; tests use small
/// fixture catalogs instead of the built-in one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCatalog {
    platforms: Vec<PlatformDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(rename = "platform", default)]
    platforms: Vec<PlatformDefinition>,
}

impl PlatformCatalog {
    pub fn new(platforms: Vec<PlatformDefinition>) -> Result<Self> {
        let catalog = Self { platforms };
        catalog.validate()?;
        Ok(catalog)
    }

    /// 從 TOML 檔案載入平台清單 (取代內建清單)
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            OsintError::config(format!(
                "cannot read platform file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| OsintError::config(format!("Platform file parsing error: {}", e)))?;
        Self::new(file.platforms)
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Platforms in `category`, in declaration order.
    pub fn select(&self, category: Category) -> Vec<PlatformDefinition> {
        self.platforms
            .iter()
            .filter(|p| p.belongs_to(category))
            .cloned()
            .collect()
    }

    /// Like [`select`](Self::select), further narrowed to `names` when any
    /// are given. Unknown names are rejected rather than skipped.
    pub fn select_named(&self, category: Category, names: &[String]) -> Result<Vec<PlatformDefinition>> {
        if names.is_empty() {
            return Ok(self.select(category));
        }

        if let Some(unknown) = names.iter().find(|n| self.find(n).is_none()) {
            return Err(OsintError::InvalidConfigValueError {
                field: "platform".to_string(),
                value: unknown.clone(),
                reason: "Not in the platform catalog".to_string(),
            });
        }

        Ok(self
            .platforms
            .iter()
            .filter(|p| p.belongs_to(category))
            .filter(|p| names.iter().any(|n| p.name.eq_ignore_ascii_case(n)))
            .cloned()
            .collect())
    }
}

impl Validate for PlatformCatalog {
    fn validate(&self) -> Result<()> {
        for platform in &self.platforms {
            validate_non_empty_string("platform.name", &platform.name)?;
            validate_url_template(
                &format!("platform.{}.url_template", platform.name),
                &platform.url_template,
            )?;
            if let Some(marker) = &platform.absence_marker {
                validate_non_empty_string(
                    &format!("platform.{}.absence_marker", platform.name),
                    marker,
                )?;
            }
        }
        validate_unique_names("platform.name", self.platforms.iter().map(|p| p.name.as_str()))
    }
}

impl Default for PlatformCatalog {
    fn default() -> Self {
        Self {
            platforms: default_platforms(),
        }
    }
}

fn default_platforms() -> Vec<PlatformDefinition> {
    // 無公開個人頁網址的服務 (WeChat、Line、QQ、Viber、WhatsApp ...) 不列入
    vec![
        PlatformDefinition::new("VK", "https://vk.com/{}").in_categories(&[International, Social]),
        PlatformDefinition::new("OK", "https://ok.ru/{}").in_categories(&[International]),
        PlatformDefinition::new("Telegram", "https://t.me/{}")
            .with_marker("<title>Telegram Messenger</title>")
            .in_categories(&[International]),
        PlatformDefinition::new("Weibo", "https://weibo.com/{}").in_categories(&[International]),
        PlatformDefinition::new("Baidu", "https://tieba.baidu.com/home/main?un={}")
            .in_categories(&[International]),
        PlatformDefinition::new("Skype", "https://web.skype.com/{}").in_categories(&[International]),
        PlatformDefinition::new("500px", "https://500px.com/p/{}"),
        PlatformDefinition::new("AboutMe", "https://about.me/{}"),
        PlatformDefinition::new("DeviantArt", "https://www.deviantart.com/{}"),
        PlatformDefinition::new("Facebook", "https://www.facebook.com/{}")
            .with_marker("This content isn't available right now")
            .in_categories(&[Social]),
        PlatformDefinition::new("Flickr", "https://www.flickr.com/people/{}"),
        PlatformDefinition::new("GitHub", "https://github.com/{}").in_categories(&[Developer]),
        PlatformDefinition::new("GitLab", "https://gitlab.com/{}").in_categories(&[Developer]),
        PlatformDefinition::new("Instagram", "https://www.instagram.com/{}")
            .with_marker("Sorry, this page isn't available.")
            .in_categories(&[Social]),
        PlatformDefinition::new("LinkedIn", "https://www.linkedin.com/in/{}"),
        PlatformDefinition::new("Medium", "https://medium.com/@{}"),
        PlatformDefinition::new("Pinterest", "https://www.pinterest.com/{}"),
        PlatformDefinition::new("Reddit", "https://www.reddit.com/user/{}")
            .with_marker("Sorry, nobody on Reddit goes by that name."),
        PlatformDefinition::new("Snapchat", "https://www.snapchat.com/add/{}").in_categories(&[Social]),
        PlatformDefinition::new("SoundCloud", "https://soundcloud.com/{}"),
        PlatformDefinition::new("Spotify", "https://open.spotify.com/user/{}"),
        PlatformDefinition::new("Stack Overflow", "https://stackoverflow.com/users/filter?search={}")
            .with_marker("No users matched your search")
            .in_categories(&[Developer]),
        PlatformDefinition::new("Steam", "https://steamcommunity.com/id/{}")
            .with_marker("The specified profile could not be found."),
        PlatformDefinition::new("TikTok", "https://www.tiktok.com/@{}")
            .with_marker("Couldn't find this account")
            .in_categories(&[Social]),
        PlatformDefinition::new("Twitch", "https://www.twitch.tv/{}"),
        PlatformDefinition::new("Twitter", "https://twitter.com/{}").in_categories(&[Social]),
        PlatformDefinition::new("Vimeo", "https://vimeo.com/{}"),
        PlatformDefinition::new("YouTube", "https://www.youtube.com/@{}"),
        PlatformDefinition::new("Behance", "https://www.behance.net/{}").in_categories(&[Developer]),
        PlatformDefinition::new("Dribbble", "https://dribbble.com/{}")
            .with_marker("Whoops, that page is gone.")
            .in_categories(&[Developer]),
        PlatformDefinition::new("Tumblr", "https://{}.tumblr.com"),
        PlatformDefinition::new("WordPress", "https://{}.wordpress.com")
            .with_marker("Do you want to register"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;

    fn names(platforms: &[PlatformDefinition]) -> Vec<&str> {
        platforms.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = PlatformCatalog::default();
        assert!(catalog.validate().is_ok());
        assert!(catalog.len() >= 30);
    }

    #[test]
    fn test_select_keeps_declaration_order() {
        let catalog = PlatformCatalog::default();

        assert_eq!(
            names(&catalog.select(Category::International)),
            vec!["VK", "OK", "Telegram", "Weibo", "Baidu", "Skype"]
        );
        assert_eq!(
            names(&catalog.select(Category::Social)),
            vec!["VK", "Facebook", "Instagram", "Snapchat", "TikTok", "Twitter"]
        );
        assert_eq!(
            names(&catalog.select(Category::Developer)),
            vec!["GitHub", "GitLab", "Stack Overflow", "Behance", "Dribbble"]
        );
        assert_eq!(catalog.select(Category::All).len(), catalog.len());
    }

    #[test]
    fn test_select_named_ignores_request_order() {
        let catalog = PlatformCatalog::default();
        let selected = catalog
            .select_named(
                Category::All,
                &["gitlab".to_string(), "GitHub".to_string(), "VK".to_string()],
            )
            .unwrap();
        assert_eq!(names(&selected), vec!["VK", "GitHub", "GitLab"]);
    }

    #[test]
    fn test_select_named_rejects_unknown_platform() {
        let catalog = PlatformCatalog::default();
        assert!(catalog
            .select_named(Category::All, &["MySpace".to_string()])
            .is_err());
    }

    #[test]
    fn test_select_named_respects_category() {
        let catalog = PlatformCatalog::default();
        let selected = catalog
            .select_named(Category::Developer, &["VK".to_string()])
            .unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_catalog_from_toml() {
        let content = r#"
[[platform]]
name = "GitHub"
url_template = "https://github.com/{}"
categories = ["developer"]

[[platform]]
name = "ExampleSite"
url_template = "https://example.com/u/{}"
absence_marker = "User not found"
"#;
        let catalog = PlatformCatalog::from_toml_str(content).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.find("examplesite").unwrap().absence_marker.as_deref(),
            Some("User not found")
        );
        assert_eq!(names(&catalog.select(Category::Developer)), vec!["GitHub"]);
    }

    #[test]
    fn test_catalog_rejects_bad_templates() {
        let none = r#"
[[platform]]
name = "Broken"
url_template = "https://example.com/profile"
"#;
        assert!(PlatformCatalog::from_toml_str(none).is_err());

        let two = r#"
[[platform]]
name = "Broken"
url_template = "https://{}.example.com/{}"
"#;
        assert!(PlatformCatalog::from_toml_str(two).is_err());
    }

    #[test]
    fn test_catalog_rejects_misspelled_keys() {
        let typo = r#"
[[platform]]
name = "ExampleSite"
url_template = "https://example.com/u/{}"
absence_maker = "User not found"
"#;
        let err = PlatformCatalog::from_toml_str(typo).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.to_string().contains("absence_maker"));

        let top_level = r#"
[[platforms]]
name = "ExampleSite"
url_template = "https://example.com/u/{}"
"#;
        assert!(PlatformCatalog::from_toml_str(top_level).is_err());
    }

    #[test]
    fn test_missing_platform_file_is_config_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("platforms.toml");

        let err = PlatformCatalog::from_toml_file(&path).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.to_string().contains("platforms.toml"));
    }

    #[test]
    fn test_catalog_rejects_duplicate_names() {
        let result = PlatformCatalog::new(vec![
            PlatformDefinition::new("GitHub", "https://github.com/{}"),
            PlatformDefinition::new("github", "https://github.com/{}"),
        ]);
        assert!(result.is_err());
    }
}
