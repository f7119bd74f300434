//! Servicio de búsqueda y filtrado de transportes
//!
//! `search` hace matching de substring case-insensitive sobre el transporte
//! y sus referencias resueltas (vehículo, almacenes origen/destino). Una
//! query vacía devuelve lista vacía: es un short-circuit deliberado, no un
//! "listar todo". `filter` compone predicados opcionales en AND.

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::{Collection, StorageBackend};
use crate::models::transport::{Transport, TransportFilters};
use crate::models::vehicle::Vehicle;
use crate::models::warehouse::Warehouse;
use crate::repositories::decode_docs;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn StorageBackend>,
}

impl SearchService {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Substring case-insensitive sobre id, conductor, descripción de carga,
    /// id del vehículo referenciado y nombres de los almacenes referenciados.
    /// Las referencias colgantes simplemente no aportan texto.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Transport>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let transports: Vec<Transport> =
            decode_docs(self.backend.list(Collection::Transports).await?)?;
        let vehicles: Vec<Vehicle> = decode_docs(self.backend.list(Collection::Vehicles).await?)?;
        let warehouses: Vec<Warehouse> =
            decode_docs(self.backend.list(Collection::Warehouses).await?)?;

        let vehicle_ids: HashMap<&str, &Vehicle> =
            vehicles.iter().map(|v| (v.id.as_str(), v)).collect();
        let warehouse_names: HashMap<&str, &str> = warehouses
            .iter()
            .map(|w| (w.id.as_str(), w.name.as_str()))
            .collect();

        let matches = |t: &Transport| -> bool {
            if t.id.to_lowercase().contains(&needle) {
                return true;
            }
            if let Some(driver) = &t.driver {
                if driver.to_lowercase().contains(&needle) {
                    return true;
                }
            }
            if let Some(cargo) = &t.cargo {
                if cargo.description.to_lowercase().contains(&needle) {
                    return true;
                }
            }
            if let Some(vehicle_id) = t.vehicle_id.as_deref() {
                if let Some(vehicle) = vehicle_ids.get(vehicle_id) {
                    if vehicle.id.to_lowercase().contains(&needle) {
                        return true;
                    }
                }
            }
            for warehouse_ref in [t.origin_id.as_deref(), t.destination_id.as_deref()] {
                if let Some(name) = warehouse_ref.and_then(|id| warehouse_names.get(id)) {
                    if name.to_lowercase().contains(&needle) {
                        return true;
                    }
                }
            }
            false
        };

        Ok(transports.into_iter().filter(|t| matches(t)).collect())
    }

    /// Filtros conjuntivos: igualdad exacta sobre status/vehículo/almacenes/
    /// conductor y rango inclusivo sobre la fecha programada. Un transporte
    /// sin fecha no pasa ninguna cota presente.
    pub async fn filter(&self, criteria: &TransportFilters) -> AppResult<Vec<Transport>> {
        let transports: Vec<Transport> =
            decode_docs(self.backend.list(Collection::Transports).await?)?;

        Ok(transports
            .into_iter()
            .filter(|t| {
                if let Some(status) = criteria.status {
                    if t.status != status {
                        return false;
                    }
                }
                if let Some(vehicle_id) = &criteria.vehicle_id {
                    if t.vehicle_id.as_deref() != Some(vehicle_id.as_str()) {
                        return false;
                    }
                }
                if let Some(origin_id) = &criteria.origin_id {
                    if t.origin_id.as_deref() != Some(origin_id.as_str()) {
                        return false;
                    }
                }
                if let Some(destination_id) = &criteria.destination_id {
                    if t.destination_id.as_deref() != Some(destination_id.as_str()) {
                        return false;
                    }
                }
                if let Some(driver_id) = &criteria.driver_id {
                    if t.driver_id.as_deref() != Some(driver_id.as_str()) {
                        return false;
                    }
                }
                if let Some(from) = criteria.date_from {
                    match t.date {
                        Some(date) if date >= from => {}
                        _ => return false,
                    }
                }
                if let Some(to) = criteria.date_to {
                    match t.date {
                        Some(date) if date <= to => {}
                        _ => return false,
                    }
                }
                true
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use crate::models::transport::{CreateTransportRequest, TransportStatus};
    use crate::models::warehouse::CreateWarehouseRequest;
    use crate::repositories::{TransportRepository, WarehouseRepository};
    use chrono::NaiveDate;

    struct Fixture {
        search: SearchService,
        transports: TransportRepository,
        warehouses: WarehouseRepository,
    }

    fn fixture() -> Fixture {
        let backend: Arc<dyn StorageBackend> = Arc::new(LocalBackend::new());
        Fixture {
            search: SearchService::new(backend.clone()),
            transports: TransportRepository::new(backend.clone()),
            warehouses: WarehouseRepository::new(backend),
        }
    }

    fn transport_request(driver: &str, date: NaiveDate) -> CreateTransportRequest {
        CreateTransportRequest {
            id: None,
            status: None,
            vehicle_id: None,
            origin_id: None,
            destination_id: None,
            driver: driver.to_string(),
            driver_id: None,
            cargo: None,
            date,
            cost: None,
        }
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let fx = fixture();
        fx.transports
            .add(transport_request("Somchai", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()))
            .await
            .unwrap();
        assert!(fx.search.search("").await.unwrap().is_empty());
        assert!(fx.search.search("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_on_driver_and_id() {
        let fx = fixture();
        let t = fx
            .transports
            .add(transport_request("Somchai", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()))
            .await
            .unwrap();

        let by_driver = fx.search.search("SOMCH").await.unwrap();
        assert_eq!(by_driver.len(), 1);

        // substring parcial del id generado
        let fragment = &t.id[2..6];
        let by_id = fx.search.search(fragment).await.unwrap();
        assert!(by_id.iter().any(|found| found.id == t.id));
    }

    #[tokio::test]
    async fn test_search_matches_linked_warehouse_name() {
        let fx = fixture();
        let warehouse = fx
            .warehouses
            .add(CreateWarehouseRequest {
                id: None,
                name: "Bangkok Central".to_string(),
                address: "1 Port Rd".to_string(),
            })
            .await
            .unwrap();
        let mut request =
            transport_request("Somchai", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        request.origin_id = Some(warehouse.id.clone());
        fx.transports.add(request).await.unwrap();

        let found = fx.search.search("bangkok").await.unwrap();
        assert_eq!(found.len(), 1);

        // referencia colgante: no matchea pero tampoco falla
        fx.warehouses.delete(&warehouse.id).await.unwrap();
        assert!(fx.search.search("bangkok").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_composes_status_and_date_range() {
        let fx = fixture();
        fx.transports
            .add(transport_request("Somchai", NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()))
            .await
            .unwrap();
        fx.transports
            .add(transport_request("Anan", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()))
            .await
            .unwrap();

        let criteria = TransportFilters {
            status: Some(TransportStatus::Pending),
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        let found = fx.search.filter(&criteria).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].driver.as_deref(), Some("Anan"));
    }

    #[tokio::test]
    async fn test_empty_criteria_imposes_no_constraint() {
        let fx = fixture();
        fx.transports
            .add(transport_request("Somchai", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()))
            .await
            .unwrap();
        let found = fx.search.filter(&TransportFilters::default()).await.unwrap();
        assert_eq!(found.len(), 1);
    }
}
