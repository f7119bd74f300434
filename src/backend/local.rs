//! Backend local
//!
//! Snapshot en memoria detrás de un `RwLock`. Con un path configurado, el
//! blob JSON completo se reescribe tras cada mutación: atómico a granularidad
//! de snapshot completo, sin ventana de corrupción parcial visible para los
//! callers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::backend::{doc_id, merge_document, Collection, DatabaseSnapshot, StorageBackend};
use crate::utils::errors::{persistence_error, AppResult};

/// Backend de persistencia local (memoria + archivo JSON opcional)
pub struct LocalBackend {
    state: RwLock<DatabaseSnapshot>,
    file_path: Option<PathBuf>,
}

impl LocalBackend {
    /// Backend puramente en memoria
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DatabaseSnapshot::default()),
            file_path: None,
        }
    }

    /// Backend respaldado por archivo. Carga el contenido si el archivo
    /// existe; arranca vacío si no.
    pub fn with_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| persistence_error("reading database file", e))?;
            let snapshot: DatabaseSnapshot = serde_json::from_str(&raw)
                .map_err(|e| persistence_error("parsing database file", e))?;
            info!("💾 Base de datos cargada desde {}", path.display());
            snapshot
        } else {
            info!("💾 Base de datos nueva, se creará en {}", path.display());
            DatabaseSnapshot::default()
        };
        Ok(Self {
            state: RwLock::new(snapshot),
            file_path: Some(path),
        })
    }

    /// Reescribir el blob completo. Se llama con el lock de escritura tomado,
    /// así que los lectores nunca ven un estado a medio persistir.
    fn persist(&self, snapshot: &DatabaseSnapshot) -> AppResult<()> {
        if let Some(path) = &self.file_path {
            let raw = serde_json::to_string_pretty(snapshot)
                .map_err(|e| persistence_error("serializing database", e))?;
            std::fs::write(path, raw)
                .map_err(|e| persistence_error("writing database file", e))?;
            debug!("💾 Snapshot persistido en {}", path.display());
        }
        Ok(())
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    async fn list(&self, collection: Collection) -> AppResult<Vec<Value>> {
        let state = self.state.read().await;
        Ok(state.collection(collection).clone())
    }

    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Value>> {
        let state = self.state.read().await;
        Ok(state
            .collection(collection)
            .iter()
            .find(|doc| doc_id(doc) == Some(id))
            .cloned())
    }

    async fn add(&self, collection: Collection, doc: Value) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.collection_mut(collection).push(doc);
        self.persist(&state)
    }

    async fn update(&self, collection: Collection, id: &str, partial: Value) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let found = state
            .collection_mut(collection)
            .iter_mut()
            .find(|doc| doc_id(doc) == Some(id));
        match found {
            Some(doc) => {
                merge_document(doc, &partial);
                self.persist(&state)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let docs = state.collection_mut(collection);
        let before = docs.len();
        docs.retain(|doc| doc_id(doc) != Some(id));
        let removed = docs.len() < before;
        if removed {
            self.persist(&state)?;
        }
        Ok(removed)
    }

    async fn query(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Value>> {
        let state = self.state.read().await;
        Ok(state
            .collection(collection)
            .iter()
            .filter(|doc| doc.get(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn export_snapshot(&self) -> AppResult<DatabaseSnapshot> {
        let state = self.state.read().await;
        Ok(state.clone())
    }

    async fn import_snapshot(&self, snapshot: DatabaseSnapshot) -> AppResult<()> {
        let mut state = self.state.write().await;
        *state = snapshot;
        self.persist(&state)
    }
}
