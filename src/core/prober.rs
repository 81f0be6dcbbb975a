use crate::core::classify::classify;
use crate::core::target::build_profile_url;
use crate::domain::model::{Category, PlatformDefinition, ProbeReport, ProbeResult, ProbeStatus};
use crate::domain::platforms::PlatformCatalog;
use crate::domain::ports::{ConfigProvider, FetchRequest, HttpTransport};
use crate::utils::error::{OsintError, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub max_in_flight: usize,
    pub headers: Vec<(String, String)>,
}

impl ProbeSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            timeout: config.request_timeout(),
            max_in_flight: config.max_in_flight(),
            headers: browser_headers(config.user_agent()),
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            headers: browser_headers(DEFAULT_USER_AGENT),
        }
    }
}

pub fn browser_headers(user_agent: &str) -> Vec<(String, String)> {
    vec![
        ("User-Agent".to_string(), user_agent.to_string()),
        (
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        ),
        ("Accept-Language".to_string(), "en-US,en;q=0.9".to_string()),
    ]
}

/// Checks one username against every platform of a selection.
///
/// Probes run concurrently, at most `max_in_flight` at a time. Each probe
/// owns one pre-allocated slot keyed by its declaration index, so the report
/// order never depends on which site answers first.
pub struct Prober<T: HttpTransport> {
    transport: T,
    catalog: PlatformCatalog,
    settings: ProbeSettings,
}

impl<T: HttpTransport> Prober<T> {
    pub fn new(transport: T, catalog: PlatformCatalog, settings: ProbeSettings) -> Self {
        Self {
            transport,
            catalog,
            settings,
        }
    }

    pub fn catalog(&self) -> &PlatformCatalog {
        &self.catalog
    }

    pub async fn probe(&self, username: &str, category: Category) -> Result<ProbeReport> {
        let platforms = self.catalog.select(category);
        self.probe_platforms(username, category, &platforms, std::future::pending())
            .await
    }

    /// Probes `platforms` until all are classified or `interrupt` resolves.
    ///
    /// On interrupt, outstanding requests are dropped and the report holds
    /// only the platforms already classified, still in declaration order.
    pub async fn probe_platforms<F>(
        &self,
        username: &str,
        category: Category,
        platforms: &[PlatformDefinition],
        interrupt: F,
    ) -> Result<ProbeReport>
    where
        F: Future<Output = ()>,
    {
        let username = username.trim();
        if username.is_empty() {
            return Err(OsintError::input("username must not be empty"));
        }
        if platforms.is_empty() {
            return Err(OsintError::input(format!(
                "no platforms selected for category '{}'",
                category
            )));
        }

        tracing::info!(
            "🔍 Probing '{}' on {} platforms (category: {}, max in flight: {})",
            username,
            platforms.len(),
            category,
            self.settings.max_in_flight.max(1)
        );

        let started_at = Utc::now();
        let mut slots: Vec<Option<ProbeResult>> = vec![None; platforms.len()];
        let mut interrupted = false;

        {
            let mut checks = stream::iter(platforms.iter().enumerate())
                .map(|(index, platform)| async move {
                    (index, self.probe_one(username, platform).await)
                })
                .buffer_unordered(self.settings.max_in_flight.max(1));

            tokio::pin!(interrupt);

            loop {
                tokio::select! {
                    next = checks.next() => match next {
                        Some((index, result)) => {
                            debug_assert!(slots[index].is_none());
                            slots[index] = Some(result);
                        }
                        None => break,
                    },
                    _ = &mut interrupt => {
                        interrupted = true;
                        break;
                    }
                }
            }
        }

        let results: Vec<ProbeResult> = slots.into_iter().flatten().collect();
        if interrupted {
            tracing::warn!(
                "⚠️ Probe interrupted after {}/{} platforms",
                results.len(),
                platforms.len()
            );
        }

        let report = ProbeReport {
            username: username.to_string(),
            category,
            results,
            interrupted,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "✅ Probe finished: {} found, {} errors, {} checked",
            report.found_count(),
            report.error_count(),
            report.results.len()
        );

        Ok(report)
    }

    async fn probe_one(&self, username: &str, platform: &PlatformDefinition) -> ProbeResult {
        let url = build_profile_url(&platform.url_template, username);
        let request = FetchRequest {
            url: url.clone(),
            timeout: self.settings.timeout,
            headers: self.settings.headers.clone(),
        };

        let outcome = self.transport.fetch(&request).await;
        let classification = classify(&outcome, platform.absence_marker.as_deref());

        match classification.status {
            ProbeStatus::Error => tracing::warn!(
                "❌ {}: {} ({})",
                platform.name,
                classification.reason,
                url
            ),
            status => tracing::debug!("{}: {:?} - {}", platform.name, status, classification.reason),
        }

        ProbeResult {
            platform: platform.name.clone(),
            url,
            status: classification.status,
            http_status: classification.http_status,
            failure: classification.failure,
            reason: classification.reason,
            checked_at: Utc::now(),
        }
    }
}
