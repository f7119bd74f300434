//! Backend de persistencia
//!
//! Este módulo define el contrato `StorageBackend` que los repositorios
//! consumen. El backend trata los registros como documentos JSON opacos;
//! el schema tipado vive en `models` y se aplica en los repositorios.
//! Dos estrategias intercambiables: `LocalBackend` (snapshot en memoria,
//! opcionalmente volcado completo a un archivo JSON en cada mutación) y
//! `RemoteBackend` (document store remoto vía HTTP).

pub mod local;
pub mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::AppResult;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// Colecciones conocidas por el sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Vehicles,
    Warehouses,
    Transports,
    Users,
    Notifications,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Vehicles,
        Collection::Warehouses,
        Collection::Transports,
        Collection::Users,
        Collection::Notifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Vehicles => "vehicles",
            Collection::Warehouses => "warehouses",
            Collection::Transports => "transports",
            Collection::Users => "users",
            Collection::Notifications => "notifications",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot completo de la base de datos, tal como lo maneja el backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    #[serde(default)]
    pub vehicles: Vec<Value>,
    #[serde(default)]
    pub warehouses: Vec<Value>,
    #[serde(default)]
    pub transports: Vec<Value>,
    #[serde(default)]
    pub users: Vec<Value>,
    #[serde(default)]
    pub notifications: Vec<Value>,
}

impl DatabaseSnapshot {
    pub fn collection(&self, collection: Collection) -> &Vec<Value> {
        match collection {
            Collection::Vehicles => &self.vehicles,
            Collection::Warehouses => &self.warehouses,
            Collection::Transports => &self.transports,
            Collection::Users => &self.users,
            Collection::Notifications => &self.notifications,
        }
    }

    pub fn collection_mut(&mut self, collection: Collection) -> &mut Vec<Value> {
        match collection {
            Collection::Vehicles => &mut self.vehicles,
            Collection::Warehouses => &mut self.warehouses,
            Collection::Transports => &mut self.transports,
            Collection::Users => &mut self.users,
            Collection::Notifications => &mut self.notifications,
        }
    }
}

/// Contrato del backend de persistencia.
///
/// Los registros son objetos JSON con un campo `id` string. `update` hace
/// merge superficial del parcial sobre el documento guardado. Las
/// operaciones sobre ids inexistentes devuelven `false`/`None`, nunca error;
/// los fallos del medio de almacenamiento llegan como
/// `AppError::Persistence`.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Listar todos los documentos, en orden de inserción
    async fn list(&self, collection: Collection) -> AppResult<Vec<Value>>;

    /// Buscar un documento por id exacto
    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Value>>;

    /// Insertar un documento; el documento ya trae su id
    async fn add(&self, collection: Collection, doc: Value) -> AppResult<()>;

    /// Merge superficial de `partial` sobre el documento con ese id.
    /// Devuelve false si el id no existe.
    async fn update(&self, collection: Collection, id: &str, partial: Value) -> AppResult<bool>;

    /// Borrar un documento. Devuelve false si el id no existe.
    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool>;

    /// Igualdad exacta sobre un campo de primer nivel
    async fn query(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Value>>;

    /// Snapshot completo, para export
    async fn export_snapshot(&self) -> AppResult<DatabaseSnapshot>;

    /// Reemplazo total del contenido, para import
    async fn import_snapshot(&self, snapshot: DatabaseSnapshot) -> AppResult<()>;
}

/// Id de un documento JSON
pub(crate) fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// Merge superficial: las claves presentes en `partial` sobreescriben,
/// el resto queda intacto
pub(crate) fn merge_document(target: &mut Value, partial: &Value) {
    if let (Value::Object(target_map), Value::Object(partial_map)) = (target, partial) {
        for (key, value) in partial_map {
            target_map.insert(key.clone(), value.clone());
        }
    }
}
