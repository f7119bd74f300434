//! Repositorio de transportes
//!
//! Además del CRUD, este repositorio es el dueño de los efectos laterales
//! transporte→vehículo:
//!   - entrar en `in_transit` con vehículo asignado pone ese vehículo en
//!     `in_use`
//!   - entrar en `completed` desde cualquier otro estado sella
//!     `completed_date`/`completed_time` una sola vez y libera el vehículo
//!     que venía asignado
//!   - borrar un transporte `in_transit` libera su vehículo
//!   - entrar en `cancelled` no tiene efecto lateral definido
//!
//! Las referencias a vehículos son débiles: un vehicle_id colgante se
//! registra como warning y la operación sigue.

use std::sync::Arc;

use chrono::{Local, Timelike, Utc};
use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use crate::backend::{Collection, StorageBackend};
use crate::models::transport::{
    CreateTransportRequest, Transport, TransportPatch, TransportStatus,
};
use crate::models::vehicle::VehicleStatus;
use crate::repositories::{decode_doc, decode_docs, id_or_generate};
use crate::utils::errors::AppResult;
use crate::utils::ids::TRANSPORT_PREFIX;

#[derive(Clone)]
pub struct TransportRepository {
    backend: Arc<dyn StorageBackend>,
}

impl TransportRepository {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> AppResult<Vec<Transport>> {
        decode_docs(self.backend.list(Collection::Transports).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Transport>> {
        match self.backend.get(Collection::Transports, id).await? {
            Some(doc) => Ok(Some(decode_doc(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn by_status(&self, status: TransportStatus) -> AppResult<Vec<Transport>> {
        decode_docs(
            self.backend
                .query(Collection::Transports, "status", &json!(status))
                .await?,
        )
    }

    /// Vista "recientes": ordenada por created_at descendente
    pub async fn recent(&self, limit: usize) -> AppResult<Vec<Transport>> {
        let mut transports = self.list().await?;
        transports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        transports.truncate(limit);
        Ok(transports)
    }

    /// Transportes de un conductor, más recientes primero
    pub async fn by_driver(&self, driver_id: &str) -> AppResult<Vec<Transport>> {
        let mut transports = decode_docs::<Transport>(
            self.backend
                .query(Collection::Transports, "driver_id", &json!(driver_id))
                .await?,
        )?;
        transports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(transports)
    }

    pub async fn add(&self, request: CreateTransportRequest) -> AppResult<Transport> {
        request.validate()?;
        let now = Utc::now();
        let transport = Transport {
            id: id_or_generate(request.id, TRANSPORT_PREFIX),
            status: request.status.unwrap_or(TransportStatus::Pending),
            vehicle_id: request.vehicle_id,
            origin_id: request.origin_id,
            destination_id: request.destination_id,
            driver: Some(request.driver),
            driver_id: request.driver_id,
            cargo: request.cargo,
            date: Some(request.date),
            cost: request.cost,
            created_at: now,
            updated_at: now,
            completed_date: None,
            completed_time: None,
        };
        self.backend
            .add(Collection::Transports, serde_json::to_value(&transport)?)
            .await?;
        info!("🚚 Transporte creado: {} [{}]", transport.id, transport.status);

        // Alta directa en in_transit: el vehículo queda ocupado
        if transport.status == TransportStatus::InTransit {
            if let Some(vehicle_id) = transport.vehicle_id.as_deref() {
                self.claim_vehicle(vehicle_id, &transport.id).await?;
            }
        }
        Ok(transport)
    }

    pub async fn update(&self, id: &str, patch: TransportPatch) -> AppResult<Option<Transport>> {
        patch.validate()?;
        let previous = match self.get_by_id(id).await? {
            Some(t) => t,
            None => return Ok(None),
        };

        let mut partial = serde_json::to_value(&patch)?;
        if let Some(map) = partial.as_object_mut() {
            map.insert("updated_at".to_string(), json!(Utc::now()));

            // Transición a completed: sellar fecha/hora una sola vez
            if patch.status == Some(TransportStatus::Completed)
                && previous.status != TransportStatus::Completed
            {
                let local = Local::now();
                let time = local.time();
                let seconds_only = time
                    .with_nanosecond(0)
                    .unwrap_or(time);
                map.insert("completed_date".to_string(), json!(local.date_naive()));
                map.insert("completed_time".to_string(), json!(seconds_only));
            }
        }

        if !self.backend.update(Collection::Transports, id, partial).await? {
            return Ok(None);
        }
        let merged = match self.get_by_id(id).await? {
            Some(t) => t,
            None => return Ok(None),
        };

        // Aristas con efecto lateral sobre el vehículo
        if merged.status == TransportStatus::InTransit
            && previous.status != TransportStatus::InTransit
        {
            if let Some(vehicle_id) = merged.vehicle_id.as_deref() {
                self.claim_vehicle(vehicle_id, id).await?;
            }
        }
        if merged.status == TransportStatus::Completed
            && previous.status != TransportStatus::Completed
        {
            if let Some(vehicle_id) = previous.vehicle_id.as_deref() {
                self.release_vehicle(vehicle_id, id).await?;
            }
        }

        Ok(Some(merged))
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let previous = match self.get_by_id(id).await? {
            Some(t) => t,
            None => return Ok(false),
        };
        if !self.backend.delete(Collection::Transports, id).await? {
            return Ok(false);
        }
        info!("🚚 Transporte eliminado: {}", id);

        // Borrar un transporte en ruta devuelve el vehículo a disponible
        if previous.status == TransportStatus::InTransit {
            if let Some(vehicle_id) = previous.vehicle_id.as_deref() {
                self.release_vehicle(vehicle_id, id).await?;
            }
        }
        Ok(true)
    }

    async fn claim_vehicle(&self, vehicle_id: &str, transport_id: &str) -> AppResult<()> {
        let partial = json!({ "status": VehicleStatus::InUse, "updated_at": Utc::now() });
        if self.backend.update(Collection::Vehicles, vehicle_id, partial).await? {
            info!("🚗 Vehículo {} ocupado por transporte {}", vehicle_id, transport_id);
        } else {
            warn!(
                "⚠️ Transporte {} referencia vehículo inexistente {}",
                transport_id, vehicle_id
            );
        }
        Ok(())
    }

    async fn release_vehicle(&self, vehicle_id: &str, transport_id: &str) -> AppResult<()> {
        let partial = json!({ "status": VehicleStatus::Available, "updated_at": Utc::now() });
        if self.backend.update(Collection::Vehicles, vehicle_id, partial).await? {
            info!("🚗 Vehículo {} liberado por transporte {}", vehicle_id, transport_id);
        } else {
            warn!(
                "⚠️ Transporte {} referencia vehículo inexistente {}",
                transport_id, vehicle_id
            );
        }
        Ok(())
    }
}
