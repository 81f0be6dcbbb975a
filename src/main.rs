use chrono::Local;
use clap::Parser;
use osint_intl::config::args::{Command, ProbeArgs};
use osint_intl::utils::error::ErrorSeverity;
use osint_intl::utils::logger;
use osint_intl::{
    render_report, AppConfig, CliConfig, ExportFormat, Exporter, LocalStorage, OsintError,
    PlatformCatalog, ProbeSettings, Prober, ReqwestTransport, SearchSession, SearchStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let result = match cli.resolve() {
        Ok(config) => run(&cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: &Command, config: AppConfig) -> Result<(), OsintError> {
    match command {
        Command::Probe(args) => probe(args, config).await,
        Command::History { limit } => history(*limit, &config),
        Command::Export { format } => export(*format, &config).await,
        Command::Platforms { category, .. } => {
            let catalog = load_catalog(&config)?;
            for platform in catalog.select(*category) {
                let marker = platform.absence_marker.as_deref().unwrap_or("-");
                println!("{:<16} {:<50} {}", platform.name, platform.url_template, marker);
            }
            Ok(())
        }
    }
}

fn load_catalog(config: &AppConfig) -> Result<PlatformCatalog, OsintError> {
    match &config.platforms_file {
        Some(path) => {
            tracing::info!("📁 Loading platforms from: {}", path.display());
            PlatformCatalog::from_toml_file(path)
        }
        None => Ok(PlatformCatalog::default()),
    }
}

async fn probe(args: &ProbeArgs, config: AppConfig) -> Result<(), OsintError> {
    let catalog = load_catalog(&config)?;
    let transport = ReqwestTransport::new(config.max_redirects)?;
    let prober = Prober::new(transport, catalog, ProbeSettings::from_config(&config));

    let store = if args.no_save {
        None
    } else {
        Some(SearchStore::open(&config.database_path)?)
    };
    let mut session = SearchSession::new(prober, store);

    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // 無法註冊訊號處理時，不中斷搜尋
            std::future::pending::<()>().await;
        }
    };

    let outcome = session
        .run(&args.username, args.category, &args.platforms, interrupt)
        .await?;

    print!("{}", render_report(&outcome.report));
    if let Some(id) = outcome.session_id {
        tracing::info!(
            "💾 Saved session {} to {}",
            id,
            config.database_path.display()
        );
    }

    Ok(())
}

fn history(limit: usize, config: &AppConfig) -> Result<(), OsintError> {
    let Some(store) = SearchStore::open_existing(&config.database_path)? else {
        println!("No searches yet");
        return Ok(());
    };
    let sessions = store.recent_sessions(limit)?;

    if sessions.is_empty() {
        println!("No searches yet");
        return Ok(());
    }

    for s in sessions {
        println!("\n{}", s.created_at);
        println!("  Type: {}", s.search_type);
        println!("  Query: {}", s.query);
        println!("  Results: {}", s.results_count);
    }
    Ok(())
}

async fn export(format: ExportFormat, config: &AppConfig) -> Result<(), OsintError> {
    let Some(store) = SearchStore::open_existing(&config.database_path)? else {
        println!("No searches yet");
        return Ok(());
    };
    let exporter = Exporter::new(LocalStorage::new(config.results_dir.clone()));

    let location = exporter.export(&store, format, Local::now()).await?;
    println!("[+] Exported to: {}", location);
    Ok(())
}
