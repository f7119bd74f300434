//! Modelo de Notification
//!
//! Las notificaciones nacen sin leer y solo mutan para marcar `is_read`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Notification principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// Referencia débil al usuario destinatario
    pub user_id: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Request para crear una notificación nueva
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    /// Identificador explícito; si falta se genera uno con prefijo `N-`
    pub id: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub user_id: String,

    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub message: String,
}
