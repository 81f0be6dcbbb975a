use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform groups offered to the user. `All` selects the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    International,
    Social,
    Developer,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::International => "international",
            Category::Social => "social",
            Category::Developer => "developer",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Category::All),
            "international" | "intl" => Ok(Category::International),
            "social" => Ok(Category::Social),
            "developer" | "dev" => Ok(Category::Developer),
            other => Err(format!(
                "unknown category '{}', expected one of: all, international, social, developer",
                other
            )),
        }
    }
}

/// A site with a known profile URL pattern.
///
/// `absence_marker` is the text the site renders only when the profile does
/// not exist. It is matched verbatim against the final response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformDefinition {
    pub name: String,
    pub url_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absence_marker: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl PlatformDefinition {
    pub fn new(name: &str, url_template: &str) -> Self {
        Self {
            name: name.to_string(),
            url_template: url_template.to_string(),
            absence_marker: None,
            categories: Vec::new(),
        }
    }

    pub fn with_marker(mut self, marker: &str) -> Self {
        self.absence_marker = Some(marker.to_string());
        self
    }

    pub fn in_categories(mut self, categories: &[Category]) -> Self {
        self.categories = categories.to_vec();
        self
    }

    pub fn belongs_to(&self, category: Category) -> bool {
        category == Category::All || self.categories.contains(&category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Found,
    NotFound,
    Error,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Found => "found",
            ProbeStatus::NotFound => "not_found",
            ProbeStatus::Error => "error",
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ProbeStatus::Found)
    }
}

impl FromStr for ProbeStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "found" => Ok(ProbeStatus::Found),
            "not_found" => Ok(ProbeStatus::NotFound),
            "error" => Ok(ProbeStatus::Error),
            other => Err(format!("unknown probe status '{}'", other)),
        }
    }
}

/// Why a probe never produced a response to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailure {
    Timeout,
    Connect,
    Redirect,
    Body,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub platform: String,
    pub url: String,
    pub status: ProbeStatus,
    pub http_status: Option<u16>,
    pub failure: Option<TransportFailure>,
    pub reason: String,
    pub checked_at: DateTime<Utc>,
}

impl ProbeResult {
    pub fn found(&self) -> bool {
        self.status.is_found()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub username: String,
    pub category: Category,
    pub results: Vec<ProbeResult>,
    /// Set when the run was cut short; `results` then only holds the
    /// platforms classified before the interrupt.
    pub interrupted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ProbeReport {
    pub fn found_count(&self) -> usize {
        self.results.iter().filter(|r| r.found()).count()
    }

    pub fn found(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| r.found())
    }

    pub fn error_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == ProbeStatus::Error)
            .count()
    }
}

/// One stored `people_searches` row, as read back for history and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSearch {
    pub id: i64,
    pub username: String,
    pub platform: String,
    pub url: String,
    pub found: bool,
    pub status: String,
    pub additional_info: String,
    pub checked_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSessionRecord {
    pub id: i64,
    pub search_type: String,
    pub query: String,
    pub results_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameSummary {
    pub username: String,
    pub total: i64,
    pub found_count: i64,
}
