//! Modelo de Warehouse
//!
//! Los transportes referencian almacenes como origen/destino mediante
//! referencias débiles; borrar un almacén no cascada sobre los transportes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Warehouse principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un nuevo almacén
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWarehouseRequest {
    /// Identificador explícito; si falta se genera uno con prefijo `WH-`
    pub id: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub name: String,

    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub address: String,
}

/// Patch tipado para actualizar un almacén existente
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WarehousePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub address: Option<String>,
}
