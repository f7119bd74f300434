//! Repositorio de vehículos

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::backend::{Collection, StorageBackend};
use crate::models::vehicle::{CreateVehicleRequest, Vehicle, VehiclePatch, VehicleStatus};
use crate::repositories::{decode_doc, decode_docs, id_or_generate};
use crate::utils::errors::AppResult;
use crate::utils::ids::VEHICLE_PREFIX;

#[derive(Clone)]
pub struct VehicleRepository {
    backend: Arc<dyn StorageBackend>,
}

impl VehicleRepository {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        decode_docs(self.backend.list(Collection::Vehicles).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Vehicle>> {
        match self.backend.get(Collection::Vehicles, id).await? {
            Some(doc) => Ok(Some(decode_doc(doc)?)),
            None => Ok(None),
        }
    }

    /// Vehículos en estado `available`
    pub async fn available(&self) -> AppResult<Vec<Vehicle>> {
        decode_docs(
            self.backend
                .query(Collection::Vehicles, "status", &json!("available"))
                .await?,
        )
    }

    /// Vehículo asignado a un conductor, si lo hay y no está en mantenimiento
    pub async fn assigned_to_driver(&self, driver_id: &str) -> AppResult<Option<Vehicle>> {
        let vehicles = self.list().await?;
        Ok(vehicles.into_iter().find(|v| {
            v.assigned_driver_id.as_deref() == Some(driver_id)
                && v.status != VehicleStatus::Maintenance
        }))
    }

    pub async fn add(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        request.validate()?;
        let now = Utc::now();
        let vehicle = Vehicle {
            id: id_or_generate(request.id, VEHICLE_PREFIX),
            plate_number: request.plate_number,
            vehicle_type: request.vehicle_type,
            capacity_kg: request.capacity_kg,
            status: request.status.unwrap_or(VehicleStatus::Available),
            assigned_driver_id: request.assigned_driver_id,
            created_at: now,
            updated_at: now,
        };
        self.backend
            .add(Collection::Vehicles, serde_json::to_value(&vehicle)?)
            .await?;
        info!("🚗 Vehículo creado: {} ({})", vehicle.id, vehicle.plate_number);
        Ok(vehicle)
    }

    pub async fn update(&self, id: &str, patch: VehiclePatch) -> AppResult<Option<Vehicle>> {
        patch.validate()?;
        let mut partial = serde_json::to_value(&patch)?;
        if let Some(map) = partial.as_object_mut() {
            map.insert("updated_at".to_string(), json!(Utc::now()));
        }
        if !self.backend.update(Collection::Vehicles, id, partial).await? {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Transición directa de estado, usada por los efectos laterales de
    /// transporte
    pub async fn set_status(&self, id: &str, status: VehicleStatus) -> AppResult<bool> {
        let partial = json!({ "status": status, "updated_at": Utc::now() });
        self.backend.update(Collection::Vehicles, id, partial).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let removed = self.backend.delete(Collection::Vehicles, id).await?;
        if removed {
            info!("🚗 Vehículo eliminado: {}", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;

    fn repo() -> VehicleRepository {
        VehicleRepository::new(Arc::new(LocalBackend::new()))
    }

    fn create_request(plate: &str) -> CreateVehicleRequest {
        CreateVehicleRequest {
            id: None,
            plate_number: plate.to_string(),
            vehicle_type: "truck".to_string(),
            capacity_kg: Some(3500.0),
            status: None,
            assigned_driver_id: None,
        }
    }

    #[tokio::test]
    async fn test_add_defaults_to_available_and_generates_id() {
        let repo = repo();
        let vehicle = repo.add(create_request("AB-1234")).await.unwrap();
        assert!(vehicle.id.starts_with("V-"));
        assert_eq!(vehicle.status, VehicleStatus::Available);
    }

    #[tokio::test]
    async fn test_update_merges_only_present_fields() {
        let repo = repo();
        let vehicle = repo.add(create_request("AB-1234")).await.unwrap();
        let patch = VehiclePatch {
            status: Some(VehicleStatus::Maintenance),
            ..Default::default()
        };
        let updated = repo.update(&vehicle.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.status, VehicleStatus::Maintenance);
        assert_eq!(updated.plate_number, "AB-1234");
    }

    #[tokio::test]
    async fn test_update_missing_vehicle_is_none() {
        let repo = repo();
        let result = repo.update("V-missing", VehiclePatch::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_available_filters_by_status() {
        let repo = repo();
        let a = repo.add(create_request("AA-1111")).await.unwrap();
        let b = repo.add(create_request("BB-2222")).await.unwrap();
        repo.set_status(&b.id, VehicleStatus::InUse).await.unwrap();

        let available = repo.available().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, a.id);
    }

    #[tokio::test]
    async fn test_assigned_to_driver_skips_maintenance() {
        let repo = repo();
        let mut request = create_request("CC-3333");
        request.assigned_driver_id = Some("U-drv".to_string());
        let vehicle = repo.add(request).await.unwrap();

        assert!(repo.assigned_to_driver("U-drv").await.unwrap().is_some());
        repo.set_status(&vehicle.id, VehicleStatus::Maintenance).await.unwrap();
        assert!(repo.assigned_to_driver("U-drv").await.unwrap().is_none());
    }
}
