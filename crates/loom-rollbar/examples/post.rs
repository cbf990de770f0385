// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: Post an error report from the command line.
//!
//! Run with:
//!   ROLLBAR_TOKEN=... cargo run --example post -p loom-rollbar -- disk full on /var

use clap::Parser;
use loom_rollbar::RollbarClient;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rollbar-post", about = "Post an error report to Rollbar")]
struct Args {
	/// Project access token
	#[arg(long, env = "ROLLBAR_TOKEN")]
	token: String,

	/// Environment name attached to the report
	#[arg(long)]
	environment: Option<String>,

	/// Use the plain HTTP endpoint
	#[arg(long)]
	use_http: bool,

	/// Words joined into the error message
	#[arg(trailing_var_arg = true)]
	message: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("loom_rollbar=debug")))
		.with(fmt::layer().compact())
		.init();

	let args = Args::parse();

	let mut builder = RollbarClient::builder()
		.access_token(args.token)
		.use_http(args.use_http);
	if let Some(environment) = args.environment {
		builder = builder.environment(environment);
	}
	let client = builder.build()?;

	let error = std::io::Error::other(args.message.join(" "));
	client.post_error(&error).await?;

	println!("Report posted to {}", client.endpoint());
	Ok(())
}
