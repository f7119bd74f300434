//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema.
//! La ausencia de un registro (not-found) se reporta como `Ok(None)` /
//! `Ok(false)` en los repositorios; `AppError::NotFound` existe para los
//! callers que quieran escalarla.

use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de persistencia
pub fn persistence_error(operation: &str, detail: impl std::fmt::Display) -> AppError {
    AppError::Persistence(format!("Error {}: {}", operation, detail))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
