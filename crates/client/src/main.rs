//! `sparkrest` -- submit, inspect, and kill Spark drivers over the master's REST API.
//!
//! Connection settings come from flags or from the environment (a `.env`
//! file is loaded first):
//!
//! | Variable                     | Flag                | Default  |
//! |------------------------------|---------------------|----------|
//! | `SPARK_MASTER_HOST`          | `--host`            | required |
//! | `SPARK_MASTER_REST_PORT`     | `--port`            | `6066`   |
//! | `SPARK_MASTER_SECURE`        | `--secure`          | `false`  |
//! | `SPARK_REST_MAX_CONNECTIONS` | `--max-connections` | `1`      |
//! | `SPARK_CLIENT_VERSION`       | `--spark-version`   | required |
//! | `SPARK_REST_TIMEOUT_SECS`    | `--timeout-secs`    | unset    |

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sparkrest_client::{ApiResponse, ClientConfig, SubmissionClient, SubmitOptions};
use sparkrest_core::config::{DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT};
use sparkrest_core::submission::DEFAULT_MAIN_CLASS;

#[derive(Parser, Debug)]
#[command(name = "sparkrest")]
#[command(version)]
#[command(about = "Submit, inspect and kill Spark drivers through the master REST API")]
#[command(propagate_version = true)]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct ConnectionArgs {
    /// Spark master host
    #[arg(long, env = "SPARK_MASTER_HOST", global = true)]
    host: Option<String>,

    /// Spark master REST port
    #[arg(long, env = "SPARK_MASTER_REST_PORT", default_value_t = DEFAULT_PORT, global = true)]
    port: u16,

    /// Use https instead of http
    #[arg(long, env = "SPARK_MASTER_SECURE", global = true)]
    secure: bool,

    /// Maximum concurrent connections to the master
    #[arg(long, env = "SPARK_REST_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS, global = true)]
    max_connections: usize,

    /// Spark version reported on submissions
    #[arg(long, env = "SPARK_CLIENT_VERSION", global = true)]
    spark_version: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SPARK_REST_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Submit a new driver
    Submit(SubmitArgs),

    /// Show the state of a driver
    Status {
        /// Submission id returned by `submit`
        driver_id: String,
    },

    /// Kill a driver
    Kill {
        /// Submission id returned by `submit`
        driver_id: String,
    },
}

#[derive(clap::Args, Debug)]
struct SubmitArgs {
    /// Application jar or script, e.g. hdfs:///apps/job.jar
    #[arg(long)]
    app_resource: String,

    /// Entry-point class
    #[arg(long, default_value = DEFAULT_MAIN_CLASS)]
    main_class: String,

    /// Spark property, repeatable (format: key=value)
    #[arg(long = "conf", value_parser = parse_key_val)]
    conf: Vec<(String, String)>,

    /// Driver environment variable, repeatable (format: KEY=value)
    #[arg(long = "env", value_parser = parse_key_val)]
    env: Vec<(String, String)>,

    /// Application arguments, passed after `--`
    #[arg(last = true)]
    app_args: Vec<String>,
}

impl ConnectionArgs {
    fn into_config(self) -> anyhow::Result<ClientConfig> {
        let host = self
            .host
            .ok_or_else(|| anyhow::anyhow!("--host or SPARK_MASTER_HOST is required"))?;
        let spark_version = self
            .spark_version
            .ok_or_else(|| anyhow::anyhow!("--spark-version or SPARK_CLIENT_VERSION is required"))?;

        let mut config = ClientConfig::new(host, spark_version)
            .with_port(self.port)
            .with_secure(self.secure)
            .with_max_connections(self.max_connections);
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

impl SubmitArgs {
    fn into_options(self) -> SubmitOptions {
        let properties: BTreeMap<String, String> = self.conf.into_iter().collect();
        let env: BTreeMap<String, String> = self.env.into_iter().collect();

        SubmitOptions::new(self.app_resource, properties)
            .with_main_class(self.main_class)
            .with_environment_variables(env)
            .with_app_args(self.app_args)
    }
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sparkrest=info,sparkrest_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let client = SubmissionClient::new(args.connection.into_config()?)?;

    let succeeded = match args.command {
        Commands::Submit(submit) => {
            let response = client.submit_with(&submit.into_options()).await?;
            if let Some(id) = response.result().and_then(|r| r.submission_id.as_deref()) {
                tracing::info!(submission_id = %id, "Driver submitted");
            }
            report(response)?
        }
        Commands::Status { driver_id } => {
            let response = client.status(&driver_id).await?;
            if let Some(state) = response.result().and_then(|r| r.state()) {
                tracing::info!(driver_id = %driver_id, state = %state, terminal = state.is_terminal(), "Driver status");
            }
            report(response)?
        }
        Commands::Kill { driver_id } => report(client.kill(&driver_id).await?)?,
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print the decoded record, or the raw failure, and report which it was.
fn report<T: Serialize>(response: ApiResponse<T>) -> anyhow::Result<bool> {
    if let Some(result) = response.result() {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(true);
    }

    match response.error_response().and_then(|e| e.message) {
        Some(message) => eprintln!("HTTP {}: {message}", response.status),
        None => eprintln!("HTTP {}: {}", response.status, response.body_text()),
    }
    Ok(false)
}
