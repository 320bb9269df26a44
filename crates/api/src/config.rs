use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::gql::SchemaOptions;

const DEFAULT_SCHEMA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/schema.graphqls");

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub schema_path: PathBuf,
    pub introspection: bool,
    /// `None` disables the depth limit.
    pub depth_limit: Option<usize>,
    pub max_body_bytes: usize,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            introspection: false,
            depth_limit: Some(15),
            max_body_bytes: 2 * 1024 * 1024,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let depth_limit = match env::var("GQL_DEPTH_LIMIT") {
            Ok(raw) => match raw.parse::<usize>().context("GQL_DEPTH_LIMIT must be a number")? {
                0 => None,
                depth => Some(depth),
            },
            Err(_) => defaults.depth_limit,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .context("PORT must be a valid port number")?,
            schema_path: env::var("SCHEMA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.schema_path),
            introspection: env::var("GQL_INTROSPECTION")
                .map(|v| v == "true")
                .unwrap_or(defaults.introspection),
            depth_limit,
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.allowed_origins),
        })
    }

    pub fn schema_options(&self) -> SchemaOptions {
        SchemaOptions {
            depth_limit: self.depth_limit,
            introspection: self.introspection,
        }
    }
}
