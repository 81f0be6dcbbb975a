use crate::utils::error::{OsintError, Result};
use crate::utils::validation::{validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// On-disk configuration. Every field is optional; unset values fall back to
/// the built-in defaults in [`AppConfig`](crate::config::AppConfig).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub probe: ProbeSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    pub timeout_seconds: Option<u64>,
    pub max_in_flight: Option<usize>,
    pub max_redirects: Option<usize>,
    pub user_agent: Option<String>,
    pub platforms_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    pub database_path: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            OsintError::config(format!(
                "cannot read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| OsintError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.storage.database_path {
            validate_path("storage.database_path", &path.to_string_lossy())?;
        }
        if let Some(path) = &self.storage.results_dir {
            validate_path("storage.results_dir", &path.to_string_lossy())?;
        }
        if let Some(path) = &self.probe.platforms_file {
            validate_path("probe.platforms_file", &path.to_string_lossy())?;
        }
        Ok(())
    }
}
