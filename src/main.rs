//! Engine service entry point.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use engine_service::api::{create_router, AppState};
use engine_service::config::{Config, VERBOSE_LOG_DIRECTIVES};
use engine_service::currency::{ConversionRequest, RateTable};
use engine_service::metrics;
use engine_service::utils::shutdown_signal;
use engine_service::ServiceError;

/// Engine service: health checks and currency conversion over HTTP.
#[derive(Parser, Debug)]
#[command(name = "engine-service")]
#[command(about = "Core engine service exposing health and currency conversion endpoints")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true, env = "VERBOSE")]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "LOG_JSON")]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// HTTP bind address (overrides HOST).
    #[arg(long)]
    host: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// HTTP bind address (overrides HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Convert an amount once and print the result.
    Convert {
        /// Amount to convert.
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,

        /// Source currency code.
        from: String,

        /// Target currency code.
        to: String,
    },

    /// Print the fixed rate table.
    Rates,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env feeds both clap's env fallbacks and Config::load
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();
    let config = Config::load();

    // Initialize logging
    let filter = match &config {
        _ if args.verbose => EnvFilter::new(VERBOSE_LOG_DIRECTIVES),
        Ok(config) => {
            EnvFilter::try_new(config.log_directives()).unwrap_or_else(|_| EnvFilter::new("info"))
        }
        Err(_) => EnvFilter::new("info"),
    };

    // Production always logs JSON lines
    let json_logs = args.json_logs || config.as_ref().is_ok_and(Config::is_production);

    let fmt_layer = if json_logs {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Convert { amount, from, to }) => cmd_convert(amount, from, to),
        Some(Command::Rates) => cmd_rates(),
        Some(Command::Serve { port, host }) => cmd_serve(config, port, host).await,
        None => cmd_serve(config, args.port, args.host).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: Result<Config, envy::Error>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ENGINE SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match config {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Resolving bind address... ");
    match config.bind_addr() {
        Ok(addr) => {
            println!("OK");
            println!("  Address: {}", addr);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Bind address invalid"));
        }
    }

    print!("Validating rate table... ");
    match RateTable::fixed() {
        Ok(_) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(ServiceError::from(e).into());
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Environment: {}", config.environment);
    println!("  Log Level: {}", config.rust_log);
    println!("  Verbose: {}", config.verbose);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("  Sentry: {}", if config.sentry_dsn().is_some() { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Convert a single amount and print the result.
fn cmd_convert(amount: Decimal, from: String, to: String) -> anyhow::Result<()> {
    let rates = RateTable::fixed().map_err(ServiceError::from)?;
    let result = ConversionRequest::new(amount, from, to).execute(rates)?;

    println!(
        "{} {} = {} {} (rate {})",
        amount, result.from, result.converted_amount, result.to, result.exchange_rate
    );

    Ok(())
}

/// Print the fixed rate table.
fn cmd_rates() -> anyhow::Result<()> {
    println!("Code  Units per USD");
    println!("----  -------------");
    for (currency, rate) in RateTable::fixed().map_err(ServiceError::from)?.iter() {
        println!("{:<4}  {}", currency, rate);
    }
    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(
    config: Result<Config, envy::Error>,
    port_override: Option<u16>,
    host_override: Option<String>,
) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        ServiceError::from(e)
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(host) = host_override {
        config.host = host;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");
    info!("Environment: {}", config.environment);

    // Held until the server stops so buffered events are flushed
    let _sentry = init_sentry(&config)?;

    let rates = RateTable::fixed().map_err(|e| {
        error!("Invalid rate table: {}", e);
        ServiceError::from(e)
    })?;

    // Create app state
    let mut app_state = AppState::new(rates);

    if config.metrics_enabled {
        match metrics::install_prometheus() {
            Ok(handle) => {
                info!("Prometheus metrics enabled at /metrics");
                app_state = app_state.with_metrics(handle);
            }
            Err(e) => warn!("Metrics disabled: {}", e),
        }
    }

    for (currency, rate) in app_state.rates.iter() {
        tracing::debug!(%currency, %rate, "Loaded rate");
    }

    // Start HTTP server
    let addr = config.bind_addr().map_err(|e| anyhow::anyhow!(e))?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Start Sentry error reporting when a DSN is configured.
fn init_sentry(config: &Config) -> anyhow::Result<Option<sentry::ClientInitGuard>> {
    let Some(dsn) = config.sentry_dsn() else {
        return Ok(None);
    };

    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(dsn.parse()?),
        release: sentry::release_name!(),
        environment: Some(config.environment_lower().into()),
        traces_sample_rate: 0.1,
        ..Default::default()
    });

    info!("Sentry error reporting enabled");
    Ok(Some(guard))
}
