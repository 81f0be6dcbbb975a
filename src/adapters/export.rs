use crate::adapters::sqlite::SearchStore;
use crate::domain::model::{StoredSearch, UsernameSummary};
use crate::domain::ports::Storage;
use crate::utils::error::{OsintError, Result};
use chrono::{DateTime, Local};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn file_name(&self, generated_at: &DateTime<Local>) -> String {
        let stamp = generated_at.format("%Y%m%d_%H%M%S");
        match self {
            ExportFormat::Json => format!("username_searches_{}.json", stamp),
            ExportFormat::Csv => format!("username_searches_{}.csv", stamp),
            ExportFormat::Markdown => format!("osint_report_{}.md", stamp),
        }
    }
}

/// Writes stored search history into the results directory.
pub struct Exporter<S: Storage> {
    storage: S,
}

impl<S: Storage> Exporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns where the export was written.
    pub async fn export(
        &self,
        store: &SearchStore,
        format: ExportFormat,
        generated_at: DateTime<Local>,
    ) -> Result<String> {
        let content = match format {
            ExportFormat::Json => render_json(&store.username_searches()?)?,
            ExportFormat::Csv => render_csv(&store.username_searches()?)?,
            ExportFormat::Markdown => {
                let mut sections = Vec::new();
                for summary in store.username_summaries()? {
                    let profiles = store.found_profiles(&summary.username)?;
                    sections.push((summary, profiles));
                }
                render_markdown(&sections, &generated_at)
            }
        };

        let file_name = format.file_name(&generated_at);
        tracing::debug!("Writing {:?} export ({} bytes) to {}", format, content.len(), file_name);
        self.storage.write_file(&file_name, content.as_bytes()).await?;

        Ok(self.storage.location_of(&file_name))
    }
}

pub fn render_json(rows: &[StoredSearch]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

pub fn parse_json_export(data: &str) -> Result<Vec<StoredSearch>> {
    Ok(serde_json::from_str(data)?)
}

pub fn render_csv(rows: &[StoredSearch]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| OsintError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| OsintError::ValidationError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

pub fn render_markdown(
    sections: &[(UsernameSummary, Vec<StoredSearch>)],
    generated_at: &DateTime<Local>,
) -> String {
    let mut out = String::new();
    out.push_str("# International OSINT Report\n\n");
    let _ = writeln!(
        out,
        "**Generated:** {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    out.push_str("## Username Searches\n\n");

    if sections.is_empty() {
        out.push_str("_No username searches recorded._\n");
        return out;
    }

    for (summary, profiles) in sections {
        let _ = writeln!(out, "### {}", summary.username);
        let _ = writeln!(
            out,
            "- **Found on:** {} / {} platforms\n",
            summary.found_count, summary.total
        );

        if !profiles.is_empty() {
            out.push_str("**Profiles found:**\n");
            for profile in profiles {
                let _ = writeln!(out, "- [{}]({})", profile.platform, profile.url);
            }
            out.push('\n');
        }
    }

    out
}
