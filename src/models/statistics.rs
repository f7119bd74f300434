//! Modelo de Statistics
//!
//! Rollup derivado: conteos por estado recomputados a partir del contenido
//! actual de las colecciones. Nunca se muta directamente; `compute` es una
//! función pura y total sobre el snapshot que recibe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::transport::{Transport, TransportStatus};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::models::warehouse::Warehouse;

/// Snapshot de estadísticas agregadas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub total_transports: usize,
    pub pending_transports: usize,
    pub in_transit_transports: usize,
    pub completed_transports: usize,
    pub cancelled_transports: usize,

    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub in_use_vehicles: usize,
    pub maintenance_vehicles: usize,

    pub total_warehouses: usize,

    pub last_updated: DateTime<Utc>,
}

impl Statistics {
    /// Computar el rollup a partir del snapshot actual de las colecciones
    pub fn compute(
        vehicles: &[Vehicle],
        transports: &[Transport],
        warehouses: &[Warehouse],
    ) -> Self {
        let count_transports = |status: TransportStatus| {
            transports.iter().filter(|t| t.status == status).count()
        };
        let count_vehicles = |status: VehicleStatus| {
            vehicles.iter().filter(|v| v.status == status).count()
        };

        Self {
            total_transports: transports.len(),
            pending_transports: count_transports(TransportStatus::Pending),
            in_transit_transports: count_transports(TransportStatus::InTransit),
            completed_transports: count_transports(TransportStatus::Completed),
            cancelled_transports: count_transports(TransportStatus::Cancelled),
            total_vehicles: vehicles.len(),
            available_vehicles: count_vehicles(VehicleStatus::Available),
            in_use_vehicles: count_vehicles(VehicleStatus::InUse),
            maintenance_vehicles: count_vehicles(VehicleStatus::Maintenance),
            total_warehouses: warehouses.len(),
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn vehicle(id: &str, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            plate_number: format!("PL-{}", id),
            vehicle_type: "truck".to_string(),
            capacity_kg: None,
            status,
            assigned_driver_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn transport(id: &str, status: TransportStatus) -> Transport {
        Transport {
            id: id.to_string(),
            status,
            vehicle_id: None,
            origin_id: None,
            destination_id: None,
            driver: Some("Somchai".to_string()),
            driver_id: None,
            cargo: None,
            date: NaiveDate::from_ymd_opt(2024, 2, 1),
            cost: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            completed_date: None,
            completed_time: None,
        }
    }

    #[test]
    fn test_per_status_counts_sum_to_totals() {
        let vehicles = vec![
            vehicle("V-1", VehicleStatus::Available),
            vehicle("V-2", VehicleStatus::InUse),
            vehicle("V-3", VehicleStatus::Maintenance),
            vehicle("V-4", VehicleStatus::Available),
        ];
        let transports = vec![
            transport("T-1", TransportStatus::Pending),
            transport("T-2", TransportStatus::InTransit),
            transport("T-3", TransportStatus::Completed),
            transport("T-4", TransportStatus::Cancelled),
            transport("T-5", TransportStatus::Pending),
        ];

        let stats = Statistics::compute(&vehicles, &transports, &[]);

        assert_eq!(
            stats.pending_transports
                + stats.in_transit_transports
                + stats.completed_transports
                + stats.cancelled_transports,
            stats.total_transports
        );
        assert_eq!(
            stats.available_vehicles + stats.in_use_vehicles + stats.maintenance_vehicles,
            stats.total_vehicles
        );
        assert_eq!(stats.total_transports, 5);
        assert_eq!(stats.pending_transports, 2);
        assert_eq!(stats.total_vehicles, 4);
        assert_eq!(stats.total_warehouses, 0);
    }

    #[test]
    fn test_compute_on_empty_collections() {
        let stats = Statistics::compute(&[], &[], &[]);
        assert_eq!(stats.total_transports, 0);
        assert_eq!(stats.total_vehicles, 0);
        assert_eq!(stats.total_warehouses, 0);
    }
}
