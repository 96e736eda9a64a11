//! `predict`: query one prediction service for a name and print the result.
//!
//! # Usage
//!
//! ```
//! predict michael
//! predict michael --service nationality
//! predict michael --service gender --url http://localhost:9000/
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use persona_predict::{
  AGIFY_URL, AgifyClient, GENDERIZE_URL, GenderizeClient, NATIONALIZE_URL,
  NationalizeClient,
};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Service {
  Age,
  Gender,
  Nationality,
}

#[derive(Parser, Debug)]
#[command(name = "predict", about = "Query a name prediction service")]
struct Args {
  /// Name to look up.
  name: String,

  /// Which service to query.
  #[arg(short, long, value_enum, default_value_t = Service::Age)]
  service: Service,

  /// Override the service base URL.
  #[arg(long)]
  url: Option<String>,

  /// Request timeout in seconds.
  #[arg(long, default_value_t = 10)]
  timeout: u64,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let timeout = Duration::from_secs(args.timeout);

  let out = match args.service {
    Service::Age => {
      let url = args.url.as_deref().unwrap_or(AGIFY_URL);
      let client = AgifyClient::agify(url, timeout)?;
      serde_json::to_string_pretty(&client.get(&args.name).await?)
    }
    Service::Gender => {
      let url = args.url.as_deref().unwrap_or(GENDERIZE_URL);
      let client = GenderizeClient::genderize(url, timeout)?;
      serde_json::to_string_pretty(&client.get(&args.name).await?)
    }
    Service::Nationality => {
      let url = args.url.as_deref().unwrap_or(NATIONALIZE_URL);
      let client = NationalizeClient::nationalize(url, timeout)?;
      serde_json::to_string_pretty(&client.get(&args.name).await?)
    }
  }
  .context("serialising prediction")?;

  println!("{out}");
  Ok(())
}
