//! Repositorio de almacenes
//!
//! CRUD independiente. Borrar un almacén no cascada sobre los transportes
//! que lo referencian: la referencia queda colgante y la búsqueda la tolera.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::backend::{Collection, StorageBackend};
use crate::models::warehouse::{CreateWarehouseRequest, Warehouse, WarehousePatch};
use crate::repositories::{decode_doc, decode_docs, id_or_generate};
use crate::utils::errors::AppResult;
use crate::utils::ids::WAREHOUSE_PREFIX;

#[derive(Clone)]
pub struct WarehouseRepository {
    backend: Arc<dyn StorageBackend>,
}

impl WarehouseRepository {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> AppResult<Vec<Warehouse>> {
        decode_docs(self.backend.list(Collection::Warehouses).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<Warehouse>> {
        match self.backend.get(Collection::Warehouses, id).await? {
            Some(doc) => Ok(Some(decode_doc(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn add(&self, request: CreateWarehouseRequest) -> AppResult<Warehouse> {
        request.validate()?;
        let now = Utc::now();
        let warehouse = Warehouse {
            id: id_or_generate(request.id, WAREHOUSE_PREFIX),
            name: request.name,
            address: request.address,
            created_at: now,
            updated_at: now,
        };
        self.backend
            .add(Collection::Warehouses, serde_json::to_value(&warehouse)?)
            .await?;
        info!("🏭 Almacén creado: {} ({})", warehouse.id, warehouse.name);
        Ok(warehouse)
    }

    pub async fn update(&self, id: &str, patch: WarehousePatch) -> AppResult<Option<Warehouse>> {
        patch.validate()?;
        let mut partial = serde_json::to_value(&patch)?;
        if let Some(map) = partial.as_object_mut() {
            map.insert("updated_at".to_string(), json!(Utc::now()));
        }
        if !self.backend.update(Collection::Warehouses, id, partial).await? {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let removed = self.backend.delete(Collection::Warehouses, id).await?;
        if removed {
            info!("🏭 Almacén eliminado: {}", id);
        }
        Ok(removed)
    }
}
