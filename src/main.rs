use clap::{Parser, Subcommand};
use pulse::api::{self, types::PredictionResponse, AppState};
use pulse::config::AppConfig;
use pulse::error::{PulseError, Result};
use pulse::inference::Classifier;
use pulse::ml::{LabelEncoder, OnnxModel};
use pulse::services::fetch_artifacts;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pulse", version, about = "ECG arrhythmia classification service")]
struct Cli {
    /// Configuration directory
    #[arg(long, default_value = "config")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP/WebSocket inference service
    Serve,
    /// Download the model and label-encoder artifacts
    FetchArtifacts {
        /// Re-download even if the files already exist
        #[arg(long)]
        force: bool,
    },
    /// Classify a single CSV file and print the result
    Predict {
        /// Single-column CSV of ECG samples, no header
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match AppConfig::load_from(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration ({e}), using defaults");
            AppConfig::default_config()
        }
    };

    match cli.command {
        Some(Commands::FetchArtifacts { force }) => {
            init_logging_simple();
            fetch_artifacts(&config, force).await
        }
        Some(Commands::Predict { file }) => {
            init_logging_simple();
            predict_file(&config, &file)
        }
        Some(Commands::Serve) | None => {
            init_logging(&config);
            run_server(config).await
        }
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    info!("Starting ECG inference service (pulse)");

    if let Err(errors) = config.validate() {
        for e in &errors {
            error!("Configuration: {e}");
        }
        return Err(PulseError::Validation(errors.join("; ")));
    }

    // Artifact loading is fatal: the process must not accept traffic with a
    // missing or inconsistent model.
    let classifier = Arc::new(load_classifier(&config)?);
    info!(
        "Model loaded: {} -> {} samples, encoder: {}",
        config.model.model_path,
        classifier.signal_len(),
        config.model.encoder_path
    );

    let addr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            PulseError::Validation(format!(
                "invalid listen address {}:{}: {e}",
                config.server.host, config.server.port
            ))
        })?;

    let state = AppState::new(classifier);
    let uptime_state = state.clone();
    api::serve(addr, state, shutdown_signal()).await?;

    info!(
        "Shutdown complete after {}s",
        uptime_state.uptime_seconds()
    );
    Ok(())
}

fn load_classifier(config: &AppConfig) -> Result<Classifier> {
    let model = OnnxModel::load(&config.model.model_path, config.model.signal_len)?;
    let encoder = LabelEncoder::from_file(&config.model.encoder_path)?;
    Classifier::new(Arc::new(model), encoder, config.model.signal_len)
}

/// One-shot CLI classification of a CSV file.
fn predict_file(config: &AppConfig, file: &PathBuf) -> Result<()> {
    let classifier = load_classifier(config)?;

    let body = std::fs::read_to_string(file)?;
    let samples = pulse::signal::parse_csv_column(&body)?;
    let prediction = classifier.classify(&samples)?;

    let payload = PredictionResponse::new(prediction, classifier.signal_len());
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn init_logging(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},pulse=debug", config.logging.level)));

    // Optional daily-rolling file output.
    //
    // Important: `tracing_appender::rolling::daily` will panic (and in our
    // release build, abort) if it can't create the initial log file. So we
    // must preflight writability.
    let file_layer = config.logging.dir.as_deref().and_then(|log_dir| {
        if std::fs::create_dir_all(log_dir).is_err() {
            eprintln!("Warning: Could not create log directory {log_dir}, file logging disabled");
            return None;
        }
        let test_path = std::path::Path::new(log_dir).join(".pulse_write_test");
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&test_path)
        {
            Ok(_) => {
                let _ = std::fs::remove_file(&test_path);

                let file_appender = tracing_appender::rolling::daily(log_dir, "pulse.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                // Keep the guard alive for the process lifetime.
                Box::leak(Box::new(guard));

                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not write to log directory {log_dir} ({e}), file logging disabled"
                );
                None
            }
        }
    });

    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
        }))
        .with(file_layer)
        .init();
}

fn init_logging_simple() {
    // Minimal logging for CLI commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
