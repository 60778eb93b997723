#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI that probes a backend's email-fetch action and prints the exchange

use clap::Parser;
use email_fetch_probe::{FetchEmailsRequest, ProbeClient, ProbeConfig, report};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "email-fetch-probe", version)]
#[command(
    about = "POST to /actions/fetch_emails and print the full response"
)]
struct Args {
    /// User whose emails are fetched (usually an email address)
    #[arg(allow_hyphen_values = true)]
    user_id: Option<String>,

    /// Maximum number of emails to request [default: 5]
    #[arg(allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Anything after the limit is ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    _rest: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let Some(user_id) = args.user_id else {
        print_usage();
        std::process::exit(1);
    };

    let request = FetchEmailsRequest::new(user_id, args.limit);
    let mut stdout = io::stdout().lock();

    // Everything past argument handling is reported, never propagated.
    if let Err(err) = run(&request, &mut stdout).await {
        report::write_failure(&mut stdout, &err)?;
    }

    stdout.flush()?;
    Ok(())
}

async fn run<W: Write>(
    request: &FetchEmailsRequest,
    out: &mut W,
) -> email_fetch_probe::Result<()> {
    let config = ProbeConfig::from_env()?;
    let client = ProbeClient::new(config);
    client.probe(request, out).await
}

fn print_usage() {
    println!("Usage: email-fetch-probe <user_email> [limit]");
    println!("Example: email-fetch-probe user@example.com 5");
}
