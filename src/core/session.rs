use crate::adapters::sqlite::SearchStore;
use crate::core::prober::Prober;
use crate::domain::model::{Category, ProbeReport, ProbeStatus};
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use std::fmt::Write;
use std::future::Future;

pub struct SessionOutcome {
    pub report: ProbeReport,
    /// `search_sessions` id, when the report was persisted.
    pub session_id: Option<i64>,
}

/// One user-initiated username search: probe, then persist.
pub struct SearchSession<T: HttpTransport> {
    prober: Prober<T>,
    store: Option<SearchStore>,
}

impl<T: HttpTransport> SearchSession<T> {
    pub fn new(prober: Prober<T>, store: Option<SearchStore>) -> Self {
        Self { prober, store }
    }

    pub fn store(&self) -> Option<&SearchStore> {
        self.store.as_ref()
    }

    pub async fn run<F>(
        &mut self,
        username: &str,
        category: Category,
        platform_names: &[String],
        interrupt: F,
    ) -> Result<SessionOutcome>
    where
        F: Future<Output = ()>,
    {
        let platforms = self.prober.catalog().select_named(category, platform_names)?;
        let report = self
            .prober
            .probe_platforms(username, category, &platforms, interrupt)
            .await?;

        let session_id = match self.store.as_mut() {
            Some(store) if !report.results.is_empty() => Some(store.save_report(&report)?),
            Some(_) => None,
            None => {
                tracing::debug!("Persistence disabled, report not saved");
                None
            }
        };

        Ok(SessionOutcome { report, session_id })
    }
}

/// Human-readable rendition of a report, one line per platform.
pub fn render_report(report: &ProbeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[*] Searching for username: {}\n", report.username);

    for result in &report.results {
        match result.status {
            ProbeStatus::Found => {
                let _ = writeln!(out, "[*] Checking {}... FOUND!", result.platform);
                let _ = writeln!(out, "    {}", result.url);
            }
            ProbeStatus::NotFound => {
                let _ = writeln!(out, "[*] Checking {}... Not found", result.platform);
            }
            ProbeStatus::Error => {
                let _ = writeln!(out, "[*] Checking {}... Error ({})", result.platform, result.reason);
            }
        }
    }

    let _ = writeln!(
        out,
        "\n[+] Found on {}/{} platforms",
        report.found_count(),
        report.results.len()
    );
    if report.interrupted {
        let _ = writeln!(
            out,
            "[!] Interrupted by user: only {} platforms were checked",
            report.results.len()
        );
    }

    out
}
