//! Repositorio de notificaciones

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::backend::{Collection, StorageBackend};
use crate::models::notification::{CreateNotificationRequest, Notification};
use crate::repositories::{decode_docs, id_or_generate};
use crate::utils::errors::AppResult;
use crate::utils::ids::NOTIFICATION_PREFIX;

#[derive(Clone)]
pub struct NotificationRepository {
    backend: Arc<dyn StorageBackend>,
}

impl NotificationRepository {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> AppResult<Vec<Notification>> {
        decode_docs(self.backend.list(Collection::Notifications).await?)
    }

    /// Notificaciones de un usuario concreto
    pub async fn for_user(&self, user_id: &str) -> AppResult<Vec<Notification>> {
        decode_docs(
            self.backend
                .query(Collection::Notifications, "user_id", &json!(user_id))
                .await?,
        )
    }

    /// Notificaciones sin leer de un usuario
    pub async fn unread(&self, user_id: &str) -> AppResult<Vec<Notification>> {
        let notifications = self.for_user(user_id).await?;
        Ok(notifications.into_iter().filter(|n| !n.is_read).collect())
    }

    pub async fn add(&self, request: CreateNotificationRequest) -> AppResult<Notification> {
        request.validate()?;
        let notification = Notification {
            id: id_or_generate(request.id, NOTIFICATION_PREFIX),
            user_id: request.user_id,
            message: request.message,
            // siempre nace sin leer
            is_read: false,
            created_at: Utc::now(),
        };
        self.backend
            .add(Collection::Notifications, serde_json::to_value(&notification)?)
            .await?;
        info!("🔔 Notificación creada: {} → {}", notification.id, notification.user_id);
        Ok(notification)
    }

    /// Única mutación permitida: marcar como leída
    pub async fn mark_as_read(&self, id: &str) -> AppResult<bool> {
        self.backend
            .update(Collection::Notifications, id, json!({ "is_read": true }))
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        self.backend.delete(Collection::Notifications, id).await
    }
}
