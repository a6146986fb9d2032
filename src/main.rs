//! `sdk-config`: inspect the bundled SDK configuration and check it against
//! published compatibility metadata.
//!
//! ```text
//! sdk-config [--settings settings.toml] [--document sdk-config.json] <command>
//!
//!   namespaces          list top-level namespaces
//!   get <namespace>     print one namespace's configuration
//!   endpoint            show the compatibility bucket, if any
//!   validate            compare local versions with remote metadata
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use sdk_config::config::{load_settings, Settings};
use sdk_config::observability::{init_logging, metrics};
use sdk_config::ConfigStore;

#[derive(Parser)]
#[command(name = "sdk-config")]
#[command(about = "Inspect and validate the bundled SDK configuration", long_about = None)]
struct Cli {
    /// Runtime settings file (TOML).
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Configuration document, overriding `document.path` from settings.
    #[arg(short, long)]
    document: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List top-level namespaces
    Namespaces,
    /// Print the configuration of one namespace
    Get { namespace: String },
    /// Show the compatibility metadata bucket
    Endpoint,
    /// Check local service versions against remote metadata
    Validate {
        /// Per-call deadline, overriding settings
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    init_logging(&settings.observability);
    metrics::init_metrics(settings.observability.metrics_enabled);

    let document_path = cli
        .document
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.document.path));
    let store = Arc::new(ConfigStore::open(&document_path));

    match cli.command {
        Commands::Namespaces => {
            for namespace in store.namespaces() {
                println!("{}", namespace);
            }
        }
        Commands::Get { namespace } => match store.get_config_set(&namespace) {
            Some(set) => println!("{}", serde_json::to_string_pretty(set)?),
            None => {
                eprintln!("Namespace '{}' not found", namespace);
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Endpoint => match store.object_store_endpoint() {
            Some(endpoint) => println!("region={} bucket={}", endpoint.region, endpoint.bucket),
            None => println!("No compatibility bucket configured"),
        },
        Commands::Validate { timeout_secs } => {
            if let Some(secs) = timeout_secs {
                settings.object_store.request_timeout_secs = secs;
            }
            return validate(store, &settings).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "s3-backend")]
async fn validate(
    store: Arc<ConfigStore>,
    settings: &Settings,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use sdk_config::compat::{CompatibilityValidator, ValidatorSettings};
    use sdk_config::store::S3Provider;
    use tokio_util::sync::CancellationToken;

    let provider = Arc::new(S3Provider::new(settings.object_store.endpoint_url.clone()));
    let validator =
        CompatibilityValidator::new(store, provider, ValidatorSettings::from_settings(settings));

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let result = validator.validate_config_with_cancellation(&cancel).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if result.has_incompatible() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(not(feature = "s3-backend"))]
async fn validate(
    _store: Arc<ConfigStore>,
    _settings: &Settings,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    Err("built without the `s3-backend` feature; validation is unavailable".into())
}
