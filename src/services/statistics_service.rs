//! Servicio de estadísticas
//!
//! El rollup es derivado: `refresh` recomputa desde las colecciones y cachea
//! el snapshot; `current` sirve el último snapshot o recomputa si no hay.
//! `AppState` llama a `refresh` tras cada mutación que toca una colección
//! contada (vehículos, transportes, almacenes).

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::backend::{Collection, StorageBackend};
use crate::models::statistics::Statistics;
use crate::models::transport::Transport;
use crate::models::vehicle::Vehicle;
use crate::models::warehouse::Warehouse;
use crate::repositories::decode_docs;
use crate::utils::errors::AppResult;

pub struct StatisticsService {
    backend: Arc<dyn StorageBackend>,
    cached: RwLock<Option<Statistics>>,
}

impl StatisticsService {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            cached: RwLock::new(None),
        }
    }

    /// Recomputar el rollup desde el estado actual y cachearlo
    pub async fn refresh(&self) -> AppResult<Statistics> {
        let vehicles: Vec<Vehicle> = decode_docs(self.backend.list(Collection::Vehicles).await?)?;
        let transports: Vec<Transport> =
            decode_docs(self.backend.list(Collection::Transports).await?)?;
        let warehouses: Vec<Warehouse> =
            decode_docs(self.backend.list(Collection::Warehouses).await?)?;

        let stats = Statistics::compute(&vehicles, &transports, &warehouses);
        debug!(
            "📊 Estadísticas recomputadas: {} transportes, {} vehículos, {} almacenes",
            stats.total_transports, stats.total_vehicles, stats.total_warehouses
        );
        let mut cached = self.cached.write().await;
        *cached = Some(stats.clone());
        Ok(stats)
    }

    /// Último snapshot cacheado; recomputa si todavía no hay ninguno
    pub async fn current(&self) -> AppResult<Statistics> {
        {
            let cached = self.cached.read().await;
            if let Some(stats) = cached.as_ref() {
                return Ok(stats.clone());
            }
        }
        self.refresh().await
    }
}
