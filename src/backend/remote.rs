//! Backend remoto
//!
//! Cliente HTTP contra un document store REST: un recurso por colección,
//! CRUD por documento y query por igualdad vía query string. Sin retry ni
//! timeout propio; un caller que los necesite envuelve el backend.
//!
//! Rutas esperadas:
//!   GET    {base}/{collection}
//!   GET    {base}/{collection}/{id}
//!   PUT    {base}/{collection}/{id}
//!   PATCH  {base}/{collection}/{id}   (merge parcial del lado del servidor)
//!   DELETE {base}/{collection}/{id}
//!   GET    {base}/{collection}?{field}={value}

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{doc_id, Collection, DatabaseSnapshot, StorageBackend};
use crate::utils::errors::{bad_request_error, persistence_error, AppError, AppResult};

/// Backend de persistencia remota (document store HTTP)
pub struct RemoteBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteBackend {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, collection.as_str())
    }

    fn document_url(&self, collection: Collection, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection.as_str(), id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn expect_ok(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> AppResult<reqwest::Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| persistence_error(operation, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Persistence(format!(
                "Error {}: remote store returned {}",
                operation, status
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl StorageBackend for RemoteBackend {
    async fn list(&self, collection: Collection) -> AppResult<Vec<Value>> {
        let response = self
            .expect_ok(
                self.client.get(self.collection_url(collection)),
                "listing collection",
            )
            .await?;
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| persistence_error("decoding collection listing", e))
    }

    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Value>> {
        let response = self
            .authorize(self.client.get(self.document_url(collection, id)))
            .send()
            .await
            .map_err(|e| persistence_error("fetching document", e))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let doc = response
                    .json::<Value>()
                    .await
                    .map_err(|e| persistence_error("decoding document", e))?;
                Ok(Some(doc))
            }
            status => Err(AppError::Persistence(format!(
                "Error fetching document: remote store returned {}",
                status
            ))),
        }
    }

    async fn add(&self, collection: Collection, doc: Value) -> AppResult<()> {
        let id = doc_id(&doc)
            .ok_or_else(|| bad_request_error("document is missing its 'id' field"))?
            .to_string();
        debug!("📤 PUT {}/{}", collection, id);
        self.expect_ok(
            self.client
                .put(self.document_url(collection, &id))
                .json(&doc),
            "storing document",
        )
        .await?;
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, partial: Value) -> AppResult<bool> {
        let response = self
            .authorize(
                self.client
                    .patch(self.document_url(collection, id))
                    .json(&partial),
            )
            .send()
            .await
            .map_err(|e| persistence_error("patching document", e))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(AppError::Persistence(format!(
                "Error patching document: remote store returned {}",
                status
            ))),
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool> {
        let response = self
            .authorize(self.client.delete(self.document_url(collection, id)))
            .send()
            .await
            .map_err(|e| persistence_error("deleting document", e))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(AppError::Persistence(format!(
                "Error deleting document: remote store returned {}",
                status
            ))),
        }
    }

    async fn query(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Value>> {
        // El query string solo admite escalares; cualquier otra cosa se
        // resuelve filtrando el listado completo
        let scalar = match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        };
        match scalar {
            Some(param) => {
                let response = self
                    .expect_ok(
                        self.client
                            .get(self.collection_url(collection))
                            .query(&[(field, param.as_str())]),
                        "querying collection",
                    )
                    .await?;
                response
                    .json::<Vec<Value>>()
                    .await
                    .map_err(|e| persistence_error("decoding query result", e))
            }
            None => {
                warn!("🔍 Query sobre campo no escalar '{}', filtrando en memoria", field);
                let docs = self.list(collection).await?;
                Ok(docs
                    .into_iter()
                    .filter(|doc| doc.get(field) == Some(value))
                    .collect())
            }
        }
    }

    async fn export_snapshot(&self) -> AppResult<DatabaseSnapshot> {
        let mut snapshot = DatabaseSnapshot::default();
        for collection in Collection::ALL {
            *snapshot.collection_mut(collection) = self.list(collection).await?;
        }
        Ok(snapshot)
    }

    async fn import_snapshot(&self, snapshot: DatabaseSnapshot) -> AppResult<()> {
        // Reemplazo total: vaciar cada colección y volver a subir documento
        // a documento. Sin transacción del lado del servidor.
        for collection in Collection::ALL {
            let existing = self.list(collection).await?;
            for doc in &existing {
                if let Some(id) = doc_id(doc) {
                    self.delete(collection, id).await?;
                }
            }
            for doc in snapshot.collection(collection) {
                self.add(collection, doc.clone()).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_built_without_double_slashes() {
        let backend = RemoteBackend::new("https://store.example.com/api/", None);
        assert_eq!(
            backend.collection_url(Collection::Transports),
            "https://store.example.com/api/transports"
        );
        assert_eq!(
            backend.document_url(Collection::Vehicles, "V-1"),
            "https://store.example.com/api/vehicles/V-1"
        );
    }
}
