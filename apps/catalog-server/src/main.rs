use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use api_ingress::{ApiIngress, ApiIngressConfig};
use items::{ItemsConfig, ItemsModule};
use modkit::{DbModule, RestfulModule};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const MEMORY_DSN: &str = "sqlite::memory:";
const INGRESS_MODULE: &str = "api_ingress";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` so a missing database file is created.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
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
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create database directory {}", dir.display()))?;
        }
    }

    // Rebuild DSN with absolute path and normalized slashes
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) if q.contains("mode=") => {
            out.push('?');
            out.push_str(q);
        }
        Some(q) => {
            out.push('?');
            out.push_str(q);
            out.push_str("&mode=rwc");
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// Catalog Server - item catalog over HTTP
#[derive(Parser)]
#[command(name = "catalog-server")]
#[command(about = "Catalog Server - item catalog over HTTP")]
#[command(version)]
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

    /// Use an in-memory database
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
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);

    // Print config and exit if requested; stdout stays pure YAML
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Catalog Server starting");

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(&config),
    }
}

/// Detect DB backend from URL scheme (sqlite/postgres).
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim().to_owned();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(&raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// DSN to connect to: in-memory when mocking, otherwise the configured URL
/// with sqlite paths resolved against `base_dir`.
fn resolve_dsn(config: Option<&DatabaseConfig>, mock: bool, base_dir: &Path) -> Result<String> {
    if mock {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_config = config.ok_or_else(|| {
        anyhow!("No database configuration found; add a `database` section or pass --mock")
    })?;
    detect_from_dsn(db_config)?;

    let dsn = db_config.url.trim();
    if dsn.starts_with("sqlite:") {
        absolutize_sqlite_dsn(dsn, base_dir, true)
    } else {
        Ok(dsn.to_owned())
    }
}

async fn connect(dsn: &str, db_config: Option<&DatabaseConfig>) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(dsn.to_owned());
    opts.sqlx_logging(false);
    if dsn == MEMORY_DSN {
        // Every pooled connection would otherwise open its own empty database.
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(db_config.and_then(|c| c.max_conns).unwrap_or(10));
    }
    let acquire = db_config.and_then(|c| c.acquire_timeout_sec).unwrap_or(5);
    opts.acquire_timeout(Duration::from_secs(acquire));

    tracing::info!("Connecting to database: {}", redact_dsn(dsn));
    let db = Database::connect(opts)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());
    Ok(db)
}

/// Strip credentials before logging a DSN.
fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        _ => dsn.to_owned(),
    }
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    // Typed module sections; a bad section aborts startup
    let items_cfg: ItemsConfig = config.module_config(ItemsModule::NAME)?;
    let ingress_cfg: ApiIngressConfig = config.module_config(INGRESS_MODULE)?;

    // Base dir for resolving relative sqlite paths (already absolute & created)
    let base_dir = PathBuf::from(&config.server.home_dir);
    let dsn = resolve_dsn(config.database.as_ref(), args.mock, &base_dir)?;
    let db = connect(&dsn, config.database.as_ref()).await?;

    let items = Arc::new(ItemsModule::new(db, items_cfg));

    // DB phase: schema must be current before any route is reachable
    let db_modules: Vec<Arc<dyn DbModule>> = vec![items.clone()];
    for module in &db_modules {
        module.migrate().await?;
    }

    // REST phase
    let rest_modules: Vec<Arc<dyn RestfulModule>> = vec![items];
    let ingress = ApiIngress::new(ingress_cfg)
        .with_request_timeout(Duration::from_secs(config.server.timeout_sec));
    let router = ingress.build_router(&rest_modules)?;

    let bind = (config.server.host.as_str(), config.server.port);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}:{}", bind.0, bind.1))?;

    api_ingress::serve(listener, router, runtime::shutdown_token()).await?;
    tracing::info!("Catalog Server stopped");
    Ok(())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    if let Some(db) = &config.database {
        let backend = detect_from_dsn(db)?;
        println!("Database backend: {backend}");
    }
    let _: ItemsConfig = config.module_config(ItemsModule::NAME)?;
    let _: ApiIngressConfig = config.module_config(INGRESS_MODULE)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
