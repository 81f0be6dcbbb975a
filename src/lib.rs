pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::args::CliConfig;
pub use config::{cli::LocalStorage, AppConfig};

pub use crate::adapters::{
    export::{ExportFormat, Exporter},
    http::ReqwestTransport,
    sqlite::SearchStore,
};
pub use crate::core::{
    prober::{ProbeSettings, Prober},
    session::{render_report, SearchSession},
};
pub use domain::platforms::PlatformCatalog;
pub use utils::error::{OsintError, Result};
