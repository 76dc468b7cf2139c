//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dxhttp` library that handles:
//! - Command-line argument parsing
//! - Reading the JSON input (argument, file or stdin)
//! - Logger initialization
//! - Printing the response
//!
//! All request handling is implemented in the library crate.

use std::io::Read;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;

use dxhttp::initialization::init_logger_with;
use dxhttp::{ApiClient, CliArgs, RequestSpec, ResponseBody};

/// Loads the method input from `--input` if given, otherwise from the positional argument.
fn read_input(args: &CliArgs) -> Result<Value> {
    let raw = match &args.input {
        Some(path) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read input from stdin")?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?,
        None => args.input_json.clone(),
    };
    serde_json::from_str(&raw).context("Input is not valid JSON")
}

async fn run(args: CliArgs) -> Result<ResponseBody> {
    let input = read_input(&args)?;
    let client = ApiClient::from_env().context("Failed to initialize HTTP client")?;

    let spec = RequestSpec::new(format!("/{}/{}", args.resource, args.method))
        .payload(input)
        .always_retry(args.always_retry)
        .max_retries(args.max_retries)
        .timeout(Duration::from_secs(args.timeout_seconds))
        .auth(!args.no_auth);

    let response = client.execute(&spec).await?;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    init_logger_with(args.log_level.into(), args.log_format)
        .context("Failed to initialize logger")?;

    match run(args).await {
        Ok(ResponseBody::Json(value)) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&value).context("Failed to format response")?
            );
            Ok(())
        }
        Ok(ResponseBody::Text(text)) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            eprintln!("dxhttp error: {:#}", e);
            process::exit(1);
        }
    }
}
