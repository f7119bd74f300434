//! Repositorio de usuarios
//!
//! Las contraseñas entran en claro por los DTOs y se persisten como hash
//! bcrypt; ninguna operación de lectura o escritura devuelve el hash hacia
//! fuera del repositorio.

use std::sync::Arc;

use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::backend::{Collection, StorageBackend};
use crate::models::user::{CreateUserRequest, User, UserPatch, UserResponse};
use crate::repositories::{decode_doc, decode_docs, id_or_generate};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::ids::USER_PREFIX;

#[derive(Clone)]
pub struct UserRepository {
    backend: Arc<dyn StorageBackend>,
}

impl UserRepository {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> AppResult<Vec<UserResponse>> {
        let users: Vec<User> = decode_docs(self.backend.list(Collection::Users).await?)?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<UserResponse>> {
        match self.backend.get(Collection::Users, id).await? {
            Some(doc) => Ok(Some(UserResponse::from(decode_doc::<User>(doc)?))),
            None => Ok(None),
        }
    }

    /// Registro completo por username o email. Solo para autenticación;
    /// no sale del crate.
    pub(crate) async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let users: Vec<User> = decode_docs(self.backend.list(Collection::Users).await?)?;
        Ok(users
            .into_iter()
            .find(|u| u.username == identifier || u.email == identifier))
    }

    /// Sellar last_login tras una autenticación exitosa
    pub(crate) async fn touch_last_login(&self, id: &str) -> AppResult<bool> {
        let now = Utc::now();
        let partial = json!({ "last_login": now, "updated_at": now });
        self.backend.update(Collection::Users, id, partial).await
    }

    pub async fn add(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        request.validate()?;
        let password_hash =
            hash(&request.password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;
        let now = Utc::now();
        let user = User {
            id: id_or_generate(request.id, USER_PREFIX),
            username: request.username,
            email: request.email,
            password_hash,
            role: request.role,
            full_name: request.full_name,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        self.backend
            .add(Collection::Users, serde_json::to_value(&user)?)
            .await?;
        info!("👤 Usuario creado: {} ({})", user.id, user.username);
        Ok(UserResponse::from(user))
    }

    pub async fn update(&self, id: &str, patch: UserPatch) -> AppResult<Option<UserResponse>> {
        patch.validate()?;
        let mut map = serde_json::Map::new();
        if let Some(username) = &patch.username {
            map.insert("username".to_string(), json!(username));
        }
        if let Some(email) = &patch.email {
            map.insert("email".to_string(), json!(email));
        }
        if let Some(role) = &patch.role {
            map.insert("role".to_string(), json!(role));
        }
        if let Some(full_name) = &patch.full_name {
            map.insert("full_name".to_string(), json!(full_name));
        }
        // La contraseña nunca se persiste en claro
        if let Some(password) = &patch.password {
            let password_hash =
                hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;
            map.insert("password_hash".to_string(), json!(password_hash));
        }
        map.insert("updated_at".to_string(), json!(Utc::now()));

        if !self
            .backend
            .update(Collection::Users, id, serde_json::Value::Object(map))
            .await?
        {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let removed = self.backend.delete(Collection::Users, id).await?;
        if removed {
            info!("👤 Usuario eliminado: {}", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use crate::models::user::UserRole;

    fn repo() -> UserRepository {
        UserRepository::new(Arc::new(LocalBackend::new()))
    }

    fn create_request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            id: None,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "secret123".to_string(),
            role: UserRole::Operator,
            full_name: "Test Operator".to_string(),
        }
    }

    #[tokio::test]
    async fn test_stored_password_is_hashed() {
        let repo = repo();
        let created = repo.add(create_request("somchai")).await.unwrap();

        let stored = repo.find_by_identifier("somchai").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret123");
        assert!(bcrypt::verify("secret123", &stored.password_hash).unwrap());

        // la respuesta pública no lleva hash
        let value = serde_json::to_value(&created).unwrap();
        assert!(value.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_update_password_rehashes() {
        let repo = repo();
        let created = repo.add(create_request("somchai")).await.unwrap();

        repo.update(
            &created.id,
            UserPatch {
                password: Some("newsecret".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        let stored = repo.find_by_identifier("somchai").await.unwrap().unwrap();
        assert!(bcrypt::verify("newsecret", &stored.password_hash).unwrap());
        assert!(!bcrypt::verify("secret123", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_find_by_identifier_matches_email_too() {
        let repo = repo();
        repo.add(create_request("somchai")).await.unwrap();
        assert!(repo
            .find_by_identifier("somchai@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(repo.find_by_identifier("nobody").await.unwrap().is_none());
    }
}
