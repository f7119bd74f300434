//! Shared application state
//!
//! Este módulo define el agregado que conecta el backend de persistencia
//! con los repositorios y servicios. No hay estado global: el backend se
//! inyecta en la construcción y todo lo demás se deriva de él.

use std::sync::Arc;

use tracing::info;

use crate::backend::{LocalBackend, RemoteBackend, StorageBackend};
use crate::config::{BackendKind, EnvironmentConfig};
use crate::models::{
    CreateNotificationRequest, CreateTransportRequest, CreateUserRequest, CreateVehicleRequest,
    CreateWarehouseRequest, Notification, Statistics, Transport, TransportPatch,
    UserPatch, UserResponse, Vehicle, VehiclePatch, Warehouse, WarehousePatch,
};
use crate::repositories::{
    NotificationRepository, TransportRepository, UserRepository, VehicleRepository,
    WarehouseRepository,
};
use crate::services::{
    AuthService, ExportService, MemorySessionStore, SearchService, StatisticsService,
};
use crate::utils::errors::{not_found_error, AppResult};

/// Estado compartido de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn StorageBackend>,
    pub vehicles: VehicleRepository,
    pub warehouses: WarehouseRepository,
    pub transports: TransportRepository,
    pub users: UserRepository,
    pub notifications: NotificationRepository,
    pub statistics: Arc<StatisticsService>,
    pub search: SearchService,
    pub auth: AuthService,
    pub backup: ExportService,
}

impl AppState {
    /// Construir el estado sobre un backend ya inicializado
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            vehicles: VehicleRepository::new(backend.clone()),
            warehouses: WarehouseRepository::new(backend.clone()),
            transports: TransportRepository::new(backend.clone()),
            users: UserRepository::new(backend.clone()),
            notifications: NotificationRepository::new(backend.clone()),
            statistics: Arc::new(StatisticsService::new(backend.clone())),
            search: SearchService::new(backend.clone()),
            auth: AuthService::new(
                UserRepository::new(backend.clone()),
                Arc::new(MemorySessionStore::new()),
            ),
            backup: ExportService::new(backend.clone()),
            backend,
        }
    }

    /// Construir el estado según la configuración del entorno
    pub fn from_env() -> AppResult<Self> {
        let config = EnvironmentConfig::from_env()?;
        let backend: Arc<dyn StorageBackend> = match config.backend {
            BackendKind::Local => match &config.db_path {
                Some(path) => {
                    info!("💾 Local backend with file persistence: {}", path.display());
                    Arc::new(LocalBackend::with_file(path)?)
                }
                None => {
                    info!("💾 Local backend (in-memory only)");
                    Arc::new(LocalBackend::new())
                }
            },
            BackendKind::Remote => {
                // from_env ya garantiza que remote_url está presente
                let url = config.remote_url.clone().unwrap_or_default();
                info!("🌐 Remote backend: {}", url);
                Arc::new(RemoteBackend::new(&url, config.remote_api_key.clone()))
            }
        };
        Ok(Self::new(backend))
    }

    /// Estadísticas actuales (calcula en el primer acceso)
    pub async fn statistics(&self) -> AppResult<Statistics> {
        self.statistics.current().await
    }

    // --- Vehículos ---

    pub async fn add_vehicle(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        let vehicle = self.vehicles.add(request).await?;
        self.statistics.refresh().await?;
        Ok(vehicle)
    }

    pub async fn update_vehicle(
        &self,
        id: &str,
        patch: VehiclePatch,
    ) -> AppResult<Option<Vehicle>> {
        let updated = self.vehicles.update(id, patch).await?;
        if updated.is_some() {
            self.statistics.refresh().await?;
        }
        Ok(updated)
    }

    pub async fn delete_vehicle(&self, id: &str) -> AppResult<bool> {
        let removed = self.vehicles.delete(id).await?;
        if removed {
            self.statistics.refresh().await?;
        }
        Ok(removed)
    }

    // --- Almacenes ---

    pub async fn add_warehouse(&self, request: CreateWarehouseRequest) -> AppResult<Warehouse> {
        let warehouse = self.warehouses.add(request).await?;
        self.statistics.refresh().await?;
        Ok(warehouse)
    }

    pub async fn update_warehouse(
        &self,
        id: &str,
        patch: WarehousePatch,
    ) -> AppResult<Option<Warehouse>> {
        let updated = self.warehouses.update(id, patch).await?;
        if updated.is_some() {
            self.statistics.refresh().await?;
        }
        Ok(updated)
    }

    pub async fn delete_warehouse(&self, id: &str) -> AppResult<bool> {
        let removed = self.warehouses.delete(id).await?;
        if removed {
            self.statistics.refresh().await?;
        }
        Ok(removed)
    }

    // --- Transportes ---

    pub async fn add_transport(&self, request: CreateTransportRequest) -> AppResult<Transport> {
        let transport = self.transports.add(request).await?;
        self.statistics.refresh().await?;
        Ok(transport)
    }

    pub async fn update_transport(
        &self,
        id: &str,
        patch: TransportPatch,
    ) -> AppResult<Option<Transport>> {
        let updated = self.transports.update(id, patch).await?;
        if updated.is_some() {
            self.statistics.refresh().await?;
        }
        Ok(updated)
    }

    pub async fn delete_transport(&self, id: &str) -> AppResult<bool> {
        let removed = self.transports.delete(id).await?;
        if removed {
            self.statistics.refresh().await?;
        }
        Ok(removed)
    }

    /// Transporte por id, escalando la ausencia a `AppError::NotFound` para
    /// los callers que no quieren el sentinel `Ok(None)`
    pub async fn require_transport(&self, id: &str) -> AppResult<Transport> {
        self.transports
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Transport", id))
    }

    // --- Usuarios ---
    // Los usuarios no entran en las estadísticas, no hace falta refrescar.

    pub async fn add_user(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        self.users.add(request).await
    }

    pub async fn update_user(&self, id: &str, patch: UserPatch) -> AppResult<Option<UserResponse>> {
        self.users.update(id, patch).await
    }

    pub async fn delete_user(&self, id: &str) -> AppResult<bool> {
        self.users.delete(id).await
    }

    // --- Notificaciones ---

    pub async fn add_notification(
        &self,
        request: CreateNotificationRequest,
    ) -> AppResult<Notification> {
        self.notifications.add(request).await
    }

    pub async fn delete_notification(&self, id: &str) -> AppResult<bool> {
        self.notifications.delete(id).await
    }

    // --- Exportar / importar ---

    pub async fn export_all(&self) -> AppResult<String> {
        self.backup.export_all().await
    }

    /// Importar un respaldo completo y refrescar las estadísticas
    pub async fn import_all(&self, raw: &str) -> AppResult<()> {
        self.backup.import_all(raw).await?;
        self.statistics.refresh().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransportStatus, VehicleStatus};

    fn in_memory_state() -> AppState {
        AppState::new(Arc::new(LocalBackend::new()))
    }

    fn vehicle_request(plate: &str) -> CreateVehicleRequest {
        CreateVehicleRequest {
            id: None,
            plate_number: plate.to_string(),
            vehicle_type: "truck".to_string(),
            capacity_kg: Some(24000.0),
            status: None,
            assigned_driver_id: None,
        }
    }

    #[tokio::test]
    async fn test_mutations_refresh_statistics() {
        let state = in_memory_state();

        let stats = state.statistics().await.unwrap();
        assert_eq!(stats.total_vehicles, 0);

        state.add_vehicle(vehicle_request("AB-123-CD")).await.unwrap();
        let stats = state.statistics().await.unwrap();
        assert_eq!(stats.total_vehicles, 1);
        assert_eq!(stats.available_vehicles, 1);

        let vehicle = state.vehicles.list().await.unwrap().remove(0);
        state
            .update_vehicle(
                &vehicle.id,
                VehiclePatch {
                    status: Some(VehicleStatus::Maintenance),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let stats = state.statistics().await.unwrap();
        assert_eq!(stats.available_vehicles, 0);
        assert_eq!(stats.maintenance_vehicles, 1);

        assert!(state.delete_vehicle(&vehicle.id).await.unwrap());
        let stats = state.statistics().await.unwrap();
        assert_eq!(stats.total_vehicles, 0);
    }

    #[tokio::test]
    async fn test_transport_lifecycle_through_state() {
        let state = in_memory_state();
        let vehicle = state.add_vehicle(vehicle_request("EF-456-GH")).await.unwrap();

        let transport = state
            .add_transport(CreateTransportRequest {
                id: None,
                vehicle_id: Some(vehicle.id.clone()),
                origin_id: None,
                destination_id: None,
                driver: "Laura Ortiz".to_string(),
                driver_id: None,
                cargo: None,
                date: chrono::NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                cost: Some(420.0),
                status: Some(TransportStatus::InTransit),
            })
            .await
            .unwrap();

        // crear en tránsito reclama el vehículo
        let claimed = state.vehicles.get_by_id(&vehicle.id).await.unwrap().unwrap();
        assert_eq!(claimed.status, VehicleStatus::InUse);
        let stats = state.statistics().await.unwrap();
        assert_eq!(stats.in_transit_transports, 1);
        assert_eq!(stats.in_use_vehicles, 1);

        state
            .update_transport(
                &transport.id,
                TransportPatch {
                    status: Some(TransportStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let released = state.vehicles.get_by_id(&vehicle.id).await.unwrap().unwrap();
        assert_eq!(released.status, VehicleStatus::Available);
        let stats = state.statistics().await.unwrap();
        assert_eq!(stats.completed_transports, 1);
        assert_eq!(stats.available_vehicles, 1);
    }

    #[tokio::test]
    async fn test_require_transport_escalates_missing_id() {
        let state = in_memory_state();
        let err = state.require_transport("T-missing").await.unwrap_err();
        assert!(matches!(err, crate::utils::errors::AppError::NotFound(_)));

        let created = state
            .add_transport(CreateTransportRequest {
                id: None,
                status: None,
                vehicle_id: None,
                origin_id: None,
                destination_id: None,
                driver: "Marta Gil".to_string(),
                driver_id: None,
                cargo: None,
                date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                cost: None,
            })
            .await
            .unwrap();
        let found = state.require_transport(&created.id).await.unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_update_missing_entity_does_not_refresh() {
        let state = in_memory_state();
        let result = state
            .update_warehouse("WH-does-not-exist", WarehousePatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
