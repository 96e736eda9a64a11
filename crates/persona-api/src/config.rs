//! Runtime server configuration, deserialised from `config.toml` and
//! `PERSONA_*` environment variables.

use std::{path::PathBuf, time::Duration};

use persona_predict::{AGIFY_URL, GENDERIZE_URL, NATIONALIZE_URL};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  pub pool_size:            u32,
  /// Drop and recreate all tables at startup.
  pub force_drop:           bool,
  /// Requests per hour per client address, per endpoint.
  pub limit_per_hour:       u32,
  /// Largest accepted request body, in bytes.
  pub max_body_len:         usize,
  pub agify_url:            String,
  pub genderize_url:        String,
  pub nationalize_url:      String,
  pub request_timeout_secs: u64,
}

impl ServerConfig {
  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "0.0.0.0".to_string(),
      port:                 8080,
      store_path:           PathBuf::from("persona.db"),
      pool_size:            10,
      force_drop:           false,
      limit_per_hour:       100,
      max_body_len:         1024,
      agify_url:            AGIFY_URL.to_string(),
      genderize_url:        GENDERIZE_URL.to_string(),
      nationalize_url:      NATIONALIZE_URL.to_string(),
      request_timeout_secs: 10,
    }
  }
}
