//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD.
//! Un solo schema canónico por entidad: `plate_number` es el nombre
//! definitivo del campo de matrícula.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::InUse => "in_use",
            VehicleStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub plate_number: String,
    pub vehicle_type: String,
    pub capacity_kg: Option<f64>,
    pub status: VehicleStatus,
    pub assigned_driver_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un nuevo vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    /// Identificador explícito; si falta se genera uno con prefijo `V-`
    pub id: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_plate_number")]
    pub plate_number: String,

    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: String,

    #[validate(range(min = 0.0))]
    pub capacity_kg: Option<f64>,

    /// Estado inicial; por defecto `available`
    pub status: Option<VehicleStatus>,

    pub assigned_driver_id: Option<String>,
}

/// Patch tipado para actualizar un vehículo existente.
/// Los campos ausentes no se tocan; los presentes sobreescriben.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VehiclePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::utils::validation::validate_plate_number")]
    pub plate_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub capacity_kg: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_driver_id: Option<String>,
}
