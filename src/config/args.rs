use crate::adapters::export::ExportFormat;
use crate::config::toml_config::TomlConfig;
use crate::config::AppConfig;
use crate::domain::model::Category;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "osint-intl")]
#[command(about = "Username presence checks across international platforms")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database holding search history
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Directory exports are written to
    #[arg(long, global = true)]
    pub results_dir: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check whether a username exists on each platform
    Probe(ProbeArgs),
    /// Show recent searches
    History {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Export stored searches to the results directory
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
    },
    /// List the platforms a probe would check
    Platforms {
        #[arg(short, long, default_value = "all")]
        category: Category,

        #[arg(long)]
        platforms_file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ProbeArgs {
    pub username: String,

    /// all, international, social or developer
    #[arg(short, long, default_value = "all")]
    pub category: Category,

    /// Only check these platforms (repeatable)
    #[arg(short, long = "platform")]
    pub platforms: Vec<String>,

    /// TOML file replacing the built-in platform list
    #[arg(long)]
    pub platforms_file: Option<PathBuf>,

    /// Maximum number of requests in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    pub max_redirects: Option<usize>,

    /// Do not store results in the database
    #[arg(long)]
    pub no_save: bool,
}

impl CliConfig {
    /// Defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                AppConfig::from_toml(&file)
            }
            None => AppConfig::default(),
        };

        if let Some(path) = &self.database {
            config.database_path = path.clone();
        }
        if let Some(path) = &self.results_dir {
            config.results_dir = path.clone();
        }

        match &self.command {
            Command::Probe(args) => {
                if let Some(n) = args.concurrency {
                    config.max_in_flight = n;
                }
                if let Some(secs) = args.timeout_secs {
                    config.timeout = Duration::from_secs(secs);
                }
                if let Some(n) = args.max_redirects {
                    config.max_redirects = n;
                }
                if let Some(path) = &args.platforms_file {
                    config.platforms_file = Some(path.clone());
                }
            }
            Command::Platforms {
                platforms_file: Some(path),
                ..
            } => {
                config.platforms_file = Some(path.clone());
            }
            _ => {}
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_probe_command() {
        let cli = CliConfig::try_parse_from([
            "osint-intl",
            "probe",
            "octocat",
            "--category",
            "developer",
            "--platform",
            "GitHub",
            "--platform",
            "GitLab",
            "--no-save",
        ])
        .unwrap();

        match &cli.command {
            Command::Probe(args) => {
                assert_eq!(args.username, "octocat");
                assert_eq!(args.category, Category::Developer);
                assert_eq!(args.platforms, vec!["GitHub", "GitLab"]);
                assert!(args.no_save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_category_is_rejected() {
        assert!(CliConfig::try_parse_from(["osint-intl", "probe", "x", "-c", "gaming"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[probe]\nmax_in_flight = 2\ntimeout_seconds = 9\n\n[storage]\ndatabase_path = \"/tmp/from-file.db\"\n")
            .unwrap();
        let config_path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "osint-intl",
            "--config",
            config_path.as_str(),
            "--database",
            "/tmp/from-flag.db",
            "probe",
            "octocat",
            "--concurrency",
            "6",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.max_in_flight, 6);
        assert_eq!(config.timeout, Duration::from_secs(9));
        assert_eq!(config.database_path, PathBuf::from("/tmp/from-flag.db"));
    }

    #[test]
    fn test_resolve_rejects_zero_timeout() {
        let cli = CliConfig::try_parse_from(["osint-intl", "probe", "octocat", "--timeout-secs", "0"])
            .unwrap();
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn test_export_format_parsing() {
        let cli = CliConfig::try_parse_from(["osint-intl", "export", "markdown"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Export {
                format: ExportFormat::Markdown
            }
        ));
    }
}
