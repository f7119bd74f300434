//! Configuración de variables de entorno
//!
//! Este módulo maneja la selección del backend de persistencia y sus
//! parámetros. Variables reconocidas:
//!   FLEET_BACKEND        local | remote (por defecto local)
//!   FLEET_DB_PATH        archivo JSON del backend local (opcional; sin
//!                        path el backend local es solo memoria)
//!   FLEET_REMOTE_URL     base URL del document store remoto
//!   FLEET_REMOTE_API_KEY bearer token opcional del store remoto

use std::env;
use std::path::PathBuf;

use crate::utils::errors::{bad_request_error, AppResult};

/// Estrategia de persistencia seleccionada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub backend: BackendKind,
    pub db_path: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub remote_api_key: Option<String>,
}

impl EnvironmentConfig {
    /// Cargar configuración desde el entorno (y .env si existe)
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let backend = match env::var("FLEET_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "local" => BackendKind::Local,
            "remote" => BackendKind::Remote,
            other => {
                return Err(bad_request_error(&format!(
                    "FLEET_BACKEND must be 'local' or 'remote', got '{}'",
                    other
                )))
            }
        };

        let config = Self {
            backend,
            db_path: env::var("FLEET_DB_PATH").ok().map(PathBuf::from),
            remote_url: env::var("FLEET_REMOTE_URL").ok(),
            remote_api_key: env::var("FLEET_REMOTE_API_KEY").ok(),
        };

        if config.backend == BackendKind::Remote && config.remote_url.is_none() {
            return Err(bad_request_error(
                "FLEET_REMOTE_URL must be set when FLEET_BACKEND is 'remote'",
            ));
        }
        Ok(config)
    }

    /// Configuración local en memoria, útil para tests y demos
    pub fn in_memory() -> Self {
        Self {
            backend: BackendKind::Local,
            db_path: None,
            remote_url: None,
            remote_api_key: None,
        }
    }
}
