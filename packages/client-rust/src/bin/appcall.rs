//! `appcall` -- call a remote application function from the command line.
//!
//! ```bash
//! APPCALL_APP_ID=my-app APPCALL_ACCESS_TOKEN=... appcall sum '[1, 2]'
//! appcall --service twilio1 send '[{"to":"+1555","from":"+1666","body":"hi"}]'
//! ```
//!
//! The decoded result is printed to stdout as pretty JSON; logs go to stderr.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use appcall_client::{
    AppClient, ClientConfig, Codec, FunctionCall, StaticTokenProvider, Value,
};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "appcall")]
#[command(about = "Invoke a named function of a backend application")]
struct Args {
    /// Function to call
    function: String,

    /// Arguments as a JSON array
    #[arg(default_value = "[]")]
    args: String,

    /// Platform base URL
    #[arg(long, env = "APPCALL_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Application identifier
    #[arg(long, env = "APPCALL_APP_ID")]
    app_id: String,

    /// Bearer access token
    #[arg(long, env = "APPCALL_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Call the function on behalf of this named service
    #[arg(long)]
    service: Option<String>,

    /// Per-call timeout in milliseconds (client default when omitted)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Body encoding: json or msgpack
    #[arg(long, default_value = "json")]
    codec: Codec,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let call_args: Vec<Value> = match serde_json::from_str::<Value>(&args.args)
        .context("ARGS must be valid JSON")?
    {
        Value::Array(items) => items,
        other => bail!("ARGS must be a JSON array, got: {other:?}"),
    };

    let config = ClientConfig::new(args.app_id)
        .with_base_url(args.base_url)
        .with_codec(args.codec);
    let auth = Arc::new(StaticTokenProvider::new(args.access_token));
    let client = AppClient::new(config, auth)?;

    let invoker = match args.service.as_deref() {
        Some(name) => client.service(name),
        None => client.functions(),
    };

    let mut call = FunctionCall::with_args(args.function, call_args);
    if let Some(ms) = args.timeout_ms {
        call = call.timeout(Duration::from_millis(ms));
    }

    let result: Value = invoker.call_function(call).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
