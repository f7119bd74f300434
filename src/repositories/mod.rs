//! Repositorios de entidades
//!
//! Un repositorio tipado por colección sobre el `StorageBackend` compartido.
//! Contrato común: `list` en orden de inserción, `get_by_id` con `Ok(None)`
//! para ids inexistentes, `add` con validación + defaults + sellado de
//! timestamps, `update` con patch tipado y merge superficial, `delete` con
//! `Ok(false)` para ids inexistentes. Los efectos cruzados
//! transporte→vehículo viven en `TransportRepository`.

pub mod notification_repository;
pub mod transport_repository;
pub mod user_repository;
pub mod vehicle_repository;
pub mod warehouse_repository;

pub use notification_repository::NotificationRepository;
pub use transport_repository::TransportRepository;
pub use user_repository::UserRepository;
pub use vehicle_repository::VehicleRepository;
pub use warehouse_repository::WarehouseRepository;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::utils::errors::AppResult;

/// Decodificar un documento del backend al tipo de la colección
pub(crate) fn decode_doc<T: DeserializeOwned>(doc: Value) -> AppResult<T> {
    Ok(serde_json::from_value(doc)?)
}

/// Decodificar un listado completo
pub(crate) fn decode_docs<T: DeserializeOwned>(docs: Vec<Value>) -> AppResult<Vec<T>> {
    docs.into_iter().map(decode_doc).collect()
}

/// Id entrante: `Some` no vacío lo respeta, cualquier otra cosa genera uno
pub(crate) fn id_or_generate(id: Option<String>, prefix: &str) -> String {
    match id {
        Some(id) if !id.trim().is_empty() => id,
        _ => crate::utils::ids::generate_id(prefix),
    }
}
