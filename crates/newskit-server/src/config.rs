use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    // Storage directories
    pub templates_dir: PathBuf,
    pub content_dir: PathBuf,
    pub preview_dir: PathBuf,

    // CORS configuration
    pub cors_origins: Vec<String>,

    // Development settings
    pub debug: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT".to_string()))?,

            templates_dir: env::var("TEMPLATES_DIR")
                .unwrap_or_else(|_| "data/templates".to_string())
                .into(),
            content_dir: env::var("CONTENT_DIR")
                .unwrap_or_else(|_| "data/content".to_string())
                .into(),
            preview_dir: env::var("PREVIEW_DIR")
                .unwrap_or_else(|_| "data/preview".to_string())
                .into(),

            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),

            debug: env::var("DEBUG")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            templates_dir: "data/templates".into(),
            content_dir: "data/content".into(),
            preview_dir: "data/preview".into(),
            cors_origins: vec!["*".to_string()],
            debug: false,
        }
    }
}
