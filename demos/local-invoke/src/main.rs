//! Local Invoke Demo
//!
//! Builds a router from `switchyard.toml`, reads one event from disk and
//! invokes the router with it, the way a serverless host would.
//!
//! # Usage
//!
//! ```bash
//! cd demos/local-invoke
//! cargo run -- --event events/http-echo.json
//! cargo run -- --event events/queue-orders.json --request-id req-7
//! cargo run -- --event events/unrouted.json   # exits non-zero
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Value, json};
use switchyard::prelude::*;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(version, about = "Invoke a Switchyard router once with an event file")]
struct Args {
    /// Configuration file (defaults to switchyard.toml in the working directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file holding the event payload.
    #[arg(short, long)]
    event: PathBuf,

    /// Request id placed in the invocation context.
    #[arg(long, default_value = "local-invoke")]
    request_id: String,

    /// Configuration profile.
    #[arg(long)]
    profile: Option<String>,
}

/// Returns the action payload together with the request id.
async fn echo(payload: Value, ctx: InvocationContext) -> ProcessorResult<Value> {
    Ok(json!({ "echo": payload, "requestId": ctx.request_id }))
}

async fn ok(_payload: Value, _ctx: InvocationContext) -> ProcessorResult<Value> {
    Ok(json!({ "status": "ok" }))
}

fn build_runtime(args: &Args) -> Result<SwitchyardRuntime> {
    let mut builder = SwitchyardRuntime::builder()
        .action("echo", echo)
        .action("ok", ok)
        .on_error(|err, _event, ctx| async move {
            error!(request_id = %ctx.request_id, error = %err, "Invocation failed");
            None
        });

    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &args.profile {
        builder = builder.profile(profile);
    }

    builder.build().context("failed to build the router")
}

async fn read_event(path: &PathBuf) -> Result<Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read event file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("event file {} is not valid JSON", path.display()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let runtime = build_runtime(&args)?;
    let event = read_event(&args.event).await?;

    info!(event = %args.event.display(), request_id = %args.request_id, "Invoking router");
    let ctx = InvocationContext::new(args.request_id).with_function_name("local-invoke");

    match runtime.invoke(event, ctx).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(message) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
    }
}
