use anyhow::{anyhow, bail, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use patient_intake::api::rest::dto::{CreatePatientReq, PatientDto};
use patient_intake::form::FormState;
use patient_intake::{config::PatientIntakeConfig, PatientIntakeModule};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    // sqlx refuses to create a missing file unless asked to
    match query {
        Some(q) => {
            out.push('?');
            out.push_str(q);
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// Only SQLite is compiled into the persistence stack.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim().to_owned();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(&raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Patient intake server - collects patient and medical aid details
#[derive(Parser)]
#[command(name = "intake-server")]
#[command(about = "Patient intake server - collects patient and medical aid details")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
    /// Submit one intake form read from a JSON file
    Submit {
        /// Form values in the same shape POST /patients accepts
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("Patient intake server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config).await,
        Commands::Submit { file } => submit_file(config, &file).await,
    }
}

async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("No database configuration found (set database.url or use --mock)"))?;
    let backend = detect_from_dsn(db_config)?;

    let dsn = absolutize_sqlite_dsn(db_config.url.trim(), &config.home_dir(), true)?;

    let mut opts = ConnectOptions::new(dsn.clone());
    if let Some(max) = db_config.max_conns {
        opts.max_connections(max);
    }
    if let Some(secs) = db_config.acquire_timeout_sec {
        opts.acquire_timeout(Duration::from_secs(secs));
    }
    // statements are traced by the repository spans instead
    opts.sqlx_logging(false);

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {backend} database"))?;
    tracing::info!("Connected DB backend: {}", backend);
    Ok(db)
}

async fn init_module(config: &AppConfig) -> Result<PatientIntakeModule> {
    let module_cfg: PatientIntakeConfig = config.module_config("patient_intake")?;
    let db = connect_database(config).await?;
    PatientIntakeModule::init(db, module_cfg).await
}

fn shutdown_on_signals(cancel: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut term) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {},
                        _ = term.recv() => {},
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl-C");
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        tracing::info!("Shutdown signal received");
        cancel.cancel();
    });
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let mut ingress_cfg: ApiIngressConfig = config.module_config("api_ingress")?;
    if config.server.timeout_sec > 0 {
        ingress_cfg.request_timeout_secs = config.server.timeout_sec;
    }

    let module = init_module(&config).await?;
    let ingress = ApiIngress::new(ingress_cfg);
    let router = ingress.build_router(module.register_rest(axum::Router::new()), module.openapi());

    let cancel = CancellationToken::new();
    shutdown_on_signals(cancel.clone());

    ingress.serve(router, addr, cancel).await?;
    tracing::info!("Patient intake server stopped");
    Ok(())
}

async fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db) = &config.database {
        detect_from_dsn(db)?;
    }
    let _: PatientIntakeConfig = config.module_config("patient_intake")?;
    let _: ApiIngressConfig = config.module_config("api_ingress")?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}

/// Drive one payload through the form controller exactly as the UI would.
async fn submit_file(config: AppConfig, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read form file {}", file.display()))?;
    let req: CreatePatientReq = serde_json::from_str(&raw)
        .with_context(|| format!("cannot parse form file {}", file.display()))?;

    let module = init_module(&config).await?;
    let state = FormState::with_values(req.form, req.has_dependants).begin_submit();
    println!("{}", state.submit_label());
    let submission = module.form_controller().submit(state).await;

    if let Some(notification) = submission.state.notification {
        println!("{}", notification.message());
    }

    match submission.result {
        Ok(patient) => {
            println!("{}", serde_json::to_string_pretty(&PatientDto::from(patient))?);
            Ok(())
        }
        Err(e) => bail!("submission failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn db(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_conns: None,
            acquire_timeout_sec: None,
        }
    }

    #[test]
    fn memory_dsn_is_kept() {
        let base = Path::new("/unused");
        assert_eq!(
            absolutize_sqlite_dsn("sqlite://:memory:", base, false).unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            absolutize_sqlite_dsn("sqlite::memory:", base, false).unwrap(),
            "sqlite::memory:"
        );
    }

    #[test]
    fn relative_dsn_lands_under_home_dir() {
        let tmp = tempdir().unwrap();
        let dsn = absolutize_sqlite_dsn("sqlite://database/intake.db", tmp.path(), true).unwrap();

        let expected = tmp.path().join("database/intake.db");
        assert_eq!(
            dsn,
            format!(
                "sqlite://{}?mode=rwc",
                expected.to_string_lossy().replace('\\', "/")
            )
        );
        assert!(tmp.path().join("database").is_dir());
    }

    #[test]
    fn explicit_query_is_preserved() {
        let tmp = tempdir().unwrap();
        let dsn =
            absolutize_sqlite_dsn("sqlite://intake.db?mode=ro", tmp.path(), false).unwrap();
        assert!(dsn.ends_with("intake.db?mode=ro"));
    }

    #[test]
    fn non_sqlite_dsn_is_rejected() {
        assert!(absolutize_sqlite_dsn("postgres://localhost/x", Path::new("/"), false).is_err());
        assert!(absolutize_sqlite_dsn("sqlite://", Path::new("/"), false).is_err());
    }

    #[test]
    fn backend_detection() {
        assert_eq!(detect_from_dsn(&db("sqlite::memory:")).unwrap(), "sqlite");
        assert_eq!(detect_from_dsn(&db("sqlite://data/x.db")).unwrap(), "sqlite");
        assert!(detect_from_dsn(&db("postgresql://localhost/x")).is_err());
        assert!(detect_from_dsn(&db("  ")).is_err());
    }
}
