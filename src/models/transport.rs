//! Modelo de Transport
//!
//! Este módulo contiene el struct Transport, su máquina de estados y los
//! filtros de búsqueda. No hay grafo de transiciones impuesto: cualquier
//! estado es alcanzable vía update, pero los efectos laterales sobre el
//! vehículo solo disparan en aristas concretas (ver TransportRepository).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Estado del transporte
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportStatus {
    Pending,
    InTransit,
    Completed,
    Cancelled,
}

impl TransportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportStatus::Pending => "pending",
            TransportStatus::InTransit => "in_transit",
            TransportStatus::Completed => "completed",
            TransportStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detalle de la carga transportada
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CargoDetail {
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub description: String,

    #[validate(range(min = 0.0))]
    pub weight_kg: Option<f64>,
}

/// Transport principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transport {
    pub id: String,
    pub status: TransportStatus,
    /// Referencia débil al vehículo asignado
    pub vehicle_id: Option<String>,
    /// Referencias débiles a almacenes origen/destino
    pub origin_id: Option<String>,
    pub destination_id: Option<String>,
    /// Nombre del conductor tal como se muestra
    pub driver: Option<String>,
    /// Referencia débil al usuario conductor
    pub driver_id: Option<String>,
    pub cargo: Option<CargoDetail>,
    /// Fecha programada del transporte; los filtros de rango operan sobre ella
    pub date: Option<NaiveDate>,
    pub cost: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Sellados una sola vez al entrar en `completed`
    pub completed_date: Option<NaiveDate>,
    pub completed_time: Option<NaiveTime>,
}

/// Request para crear un nuevo transporte
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTransportRequest {
    /// Identificador explícito; si falta se genera uno con prefijo `T-`
    pub id: Option<String>,

    /// Estado inicial; por defecto `pending`
    pub status: Option<TransportStatus>,

    pub vehicle_id: Option<String>,
    pub origin_id: Option<String>,
    pub destination_id: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub driver: String,

    pub driver_id: Option<String>,

    #[validate]
    pub cargo: Option<CargoDetail>,

    pub date: NaiveDate,

    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,
}

/// Patch tipado para actualizar un transporte existente
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TransportPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransportStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub driver: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate]
    pub cargo: Option<CargoDetail>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,
}

/// Filtros para búsqueda de transportes. Los campos presentes componen en AND;
/// los ausentes no restringen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransportFilters {
    pub status: Option<TransportStatus>,
    pub vehicle_id: Option<String>,
    pub origin_id: Option<String>,
    pub destination_id: Option<String>,
    pub driver_id: Option<String>,
    /// Cota inferior inclusiva sobre `date`
    pub date_from: Option<NaiveDate>,
    /// Cota superior inclusiva sobre `date`
    pub date_to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        let value = serde_json::to_value(TransportStatus::InTransit).unwrap();
        assert_eq!(value, serde_json::json!("in_transit"));
        let back: TransportStatus = serde_json::from_value(value).unwrap();
        assert_eq!(back, TransportStatus::InTransit);
    }

    #[test]
    fn test_create_request_rejects_blank_driver() {
        let req = CreateTransportRequest {
            id: None,
            status: None,
            vehicle_id: None,
            origin_id: None,
            destination_id: None,
            driver: "   ".to_string(),
            driver_id: None,
            cargo: None,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            cost: None,
        };
        assert!(validator::Validate::validate(&req).is_err());
    }

    #[test]
    fn test_create_request_rejects_negative_cost() {
        let req = CreateTransportRequest {
            id: None,
            status: None,
            vehicle_id: None,
            origin_id: None,
            destination_id: None,
            driver: "Somchai".to_string(),
            driver_id: None,
            cargo: None,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            cost: Some(-10.0),
        };
        assert!(validator::Validate::validate(&req).is_err());
    }

    #[test]
    fn test_patch_only_serializes_present_fields() {
        let patch = TransportPatch {
            status: Some(TransportStatus::Completed),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "completed" }));
    }
}
