//! Servicio de export/import
//!
//! `export_all` serializa un snapshot tipado de las cinco colecciones más
//! las estadísticas recién computadas. `import_all` hace parse estricto:
//! un payload malformado aborta sin reemplazar nada; uno válido reemplaza
//! el contenido completo (sin merge).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::{DatabaseSnapshot, StorageBackend};
use crate::models::notification::Notification;
use crate::models::statistics::Statistics;
use crate::models::transport::Transport;
use crate::models::user::User;
use crate::models::vehicle::Vehicle;
use crate::models::warehouse::Warehouse;
use crate::repositories::decode_docs;
use crate::utils::errors::{AppError, AppResult};

/// Snapshot exportable completo. Los usuarios van con su hash bcrypt para
/// que un import restaure los logins; nunca hay contraseñas en claro.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseExport {
    pub vehicles: Vec<Vehicle>,
    pub warehouses: Vec<Warehouse>,
    pub transports: Vec<Transport>,
    pub users: Vec<User>,
    pub notifications: Vec<Notification>,
    pub statistics: Statistics,
    pub exported_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ExportService {
    backend: Arc<dyn StorageBackend>,
}

impl ExportService {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub async fn export_all(&self) -> AppResult<String> {
        let snapshot = self.backend.export_snapshot().await?;
        let vehicles: Vec<Vehicle> = decode_docs(snapshot.vehicles)?;
        let warehouses: Vec<Warehouse> = decode_docs(snapshot.warehouses)?;
        let transports: Vec<Transport> = decode_docs(snapshot.transports)?;
        let users: Vec<User> = decode_docs(snapshot.users)?;
        let notifications: Vec<Notification> = decode_docs(snapshot.notifications)?;

        let statistics = Statistics::compute(&vehicles, &transports, &warehouses);
        let export = DatabaseExport {
            vehicles,
            warehouses,
            transports,
            users,
            notifications,
            statistics,
            exported_at: Utc::now(),
        };
        info!(
            "📦 Export generado: {} transportes, {} vehículos, {} usuarios",
            export.transports.len(),
            export.vehicles.len(),
            export.users.len()
        );
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Reemplazo total del contenido del repositorio. Parse estricto: si el
    /// payload no es un export válido, no se toca nada.
    pub async fn import_all(&self, raw: &str) -> AppResult<()> {
        let export: DatabaseExport = serde_json::from_str(raw).map_err(|e| {
            AppError::BadRequest(format!("import payload is not a valid database export: {}", e))
        })?;

        let mut snapshot = DatabaseSnapshot::default();
        for vehicle in &export.vehicles {
            snapshot.vehicles.push(serde_json::to_value(vehicle)?);
        }
        for warehouse in &export.warehouses {
            snapshot.warehouses.push(serde_json::to_value(warehouse)?);
        }
        for transport in &export.transports {
            snapshot.transports.push(serde_json::to_value(transport)?);
        }
        for user in &export.users {
            snapshot.users.push(serde_json::to_value(user)?);
        }
        for notification in &export.notifications {
            snapshot.notifications.push(serde_json::to_value(notification)?);
        }

        self.backend.import_snapshot(snapshot).await?;
        info!(
            "📦 Import aplicado: {} transportes, {} vehículos, {} usuarios",
            export.transports.len(),
            export.vehicles.len(),
            export.users.len()
        );
        Ok(())
    }

}
