//! `bulk-fetch`: GET a list of URLs as one batch and print each outcome.
//!
//! ```text
//! bulk-fetch --timeout-ms 1500 http://127.0.0.1:3000/a http://127.0.0.1:3000/b
//! 0 200 OK 12
//! 1 error: request ignored
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use bytes::Bytes;
use clap::Parser;
use http_body_util::Full;

use bulk_http_client::config::{load_config, ClientConfig};
use bulk_http_client::observability::{logging, metrics};
use bulk_http_client::{BulkClient, HyperTransport, RoundTrip};

#[derive(Debug, Parser)]
#[command(name = "bulk-fetch", version, about = "Fetch many URLs under one deadline")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the batch deadline in milliseconds.
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// URLs to fetch, in output order.
    #[arg(required = true)]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("bulk-fetch: {e}");
                return ExitCode::from(2);
            }
        },
        None => ClientConfig::default(),
    };
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeouts.batch_ms = timeout_ms;
    }
    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("bulk-fetch: logging unavailable: {e}");
    }

    let client = match BulkClient::from_config(HyperTransport::new(), &config) {
        Ok(client) => client,
        Err(errors) => {
            for e in errors {
                eprintln!("bulk-fetch: {e}");
            }
            return ExitCode::from(2);
        }
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::info!(
        urls = cli.urls.len(),
        timeout = ?Duration::from_millis(config.timeouts.batch_ms),
        "Configuration loaded"
    );

    let mut batch = RoundTrip::new();
    for url in &cli.urls {
        match http::Request::get(url.as_str()).body(Full::new(Bytes::new())) {
            Ok(request) => {
                batch.add_request(request);
            }
            Err(e) => {
                eprintln!("bulk-fetch: invalid url '{url}': {e}");
                return ExitCode::from(2);
            }
        }
    }

    let mut failed = false;

    match client.execute(&mut batch).await {
        Ok((responses, errors)) => {
            for (index, (response, error)) in responses.iter().zip(errors).enumerate() {
                match (response, error) {
                    (Some(response), _) => {
                        println!("{index} {} {}", response.status_line(), response.body().len());
                    }
                    (None, Some(error)) => {
                        failed = true;
                        println!("{index} error: {error}");
                    }
                    (None, None) => {
                        failed = true;
                        println!("{index} error: no outcome");
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("bulk-fetch: {e}");
            failed = true;
        }
    }

    batch.close_all_responses();
    client.shutdown().await;

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
