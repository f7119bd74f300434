//! Servicio de autenticación y autorización
//!
//! La comparación de credenciales usa bcrypt contra el hash guardado; el
//! fallo de autenticación es `Ok(None)`, no un error. El resultado de una
//! autenticación nunca lleva contraseña ni hash. `check_page_access` es
//! solo la decisión de política: los redirects pertenecen al caller.

use std::sync::{Arc, Mutex};

use bcrypt::verify;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::user::{SessionUser, UserResponse, UserRole};
use crate::repositories::UserRepository;
use crate::utils::errors::{AppError, AppResult};

/// Persistencia de la sesión actual (un solo registro)
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<SessionUser>;
    fn set(&self, session: SessionUser);
    fn clear(&self);
}

/// Store de sesión en memoria
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<SessionUser>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    // Un lock envenenado no invalida el registro de sesión: se sigue
    // operando sobre el valor interno.
    fn get(&self) -> Option<SessionUser> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, session: SessionUser) {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session);
    }

    fn clear(&self) {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

/// Resultado de la decisión de acceso a una página
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAccess {
    Granted,
    LoginRequired,
    Denied,
}

/// Tabla estática página → roles permitidos. Una página sin entrada es
/// pública.
const PAGE_PERMISSIONS: &[(&str, &[UserRole])] = &[
    ("admin-dashboard", &[UserRole::Admin]),
    ("manager-dashboard", &[UserRole::Admin, UserRole::Manager]),
    (
        "driver-dashboard",
        &[UserRole::Admin, UserRole::Manager, UserRole::Driver],
    ),
    ("vehicles", &[UserRole::Admin, UserRole::Manager]),
    ("transports", &[UserRole::Admin, UserRole::Manager]),
    ("reports", &[UserRole::Admin, UserRole::Manager]),
    ("users", &[UserRole::Admin]),
    ("settings", &[UserRole::Admin]),
];

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(users: UserRepository, sessions: Arc<dyn SessionStore>) -> Self {
        Self { users, sessions }
    }

    /// Autenticar por username o email. Éxito: sella last_login, graba la
    /// sesión y devuelve el usuario sin campos de contraseña. Fallo:
    /// `Ok(None)`.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> AppResult<Option<UserResponse>> {
        let user = match self.users.find_by_identifier(identifier).await? {
            Some(user) => user,
            None => {
                warn!("🔐 Login fallido: usuario desconocido '{}'", identifier);
                return Ok(None);
            }
        };

        let valid =
            verify(password, &user.password_hash).map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            warn!("🔐 Login fallido: contraseña incorrecta para '{}'", identifier);
            return Ok(None);
        }

        let now = Utc::now();
        self.users.touch_last_login(&user.id).await?;
        self.sessions.set(SessionUser {
            session_id: Uuid::new_v4(),
            user_id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            full_name: user.full_name.clone(),
            logged_in_at: now,
        });
        info!("✅ Login exitoso: {} ({})", user.username, user.role);

        let mut response = UserResponse::from(user);
        response.last_login = Some(now);
        Ok(Some(response))
    }

    /// Sesión actual, si la hay
    pub fn current_user(&self) -> Option<SessionUser> {
        self.sessions.get()
    }

    /// Cerrar la sesión actual
    pub fn logout(&self) {
        if let Some(session) = self.sessions.get() {
            info!("👋 Logout: {}", session.username);
        }
        self.sessions.clear();
    }

    /// true si el rol de la sesión actual alcanza el rol requerido.
    /// Sin sesión, siempre false.
    pub fn has_permission(&self, required: UserRole) -> bool {
        match self.sessions.get() {
            Some(session) => session.role.rank() >= required.rank(),
            None => false,
        }
    }

    /// Decisión de acceso a una página por identificador
    pub fn check_page_access(&self, page: &str) -> PageAccess {
        let allowed = PAGE_PERMISSIONS
            .iter()
            .find(|(name, _)| *name == page)
            .map(|(_, roles)| *roles);

        match allowed {
            // página sin mapping: pública
            None => PageAccess::Granted,
            Some(roles) => match self.sessions.get() {
                None => PageAccess::LoginRequired,
                Some(session) if roles.contains(&session.role) => PageAccess::Granted,
                Some(_) => PageAccess::Denied,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LocalBackend, StorageBackend};
    use crate::models::user::CreateUserRequest;

    async fn service_with_user(role: UserRole) -> AuthService {
        let backend: Arc<dyn StorageBackend> = Arc::new(LocalBackend::new());
        let users = UserRepository::new(backend);
        users
            .add(CreateUserRequest {
                id: None,
                username: "somchai".to_string(),
                email: "somchai@example.com".to_string(),
                password: "secret123".to_string(),
                role,
                full_name: "Somchai J.".to_string(),
            })
            .await
            .unwrap();
        AuthService::new(users, Arc::new(MemorySessionStore::new()))
    }

    #[tokio::test]
    async fn test_authenticate_by_username_and_email() {
        let auth = service_with_user(UserRole::Manager).await;

        let by_username = auth.authenticate("somchai", "secret123").await.unwrap();
        assert!(by_username.is_some());

        let by_email = auth
            .authenticate("somchai@example.com", "secret123")
            .await
            .unwrap();
        assert!(by_email.is_some());

        let wrong = auth.authenticate("somchai", "wrong").await.unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_response_never_carries_password() {
        let auth = service_with_user(UserRole::Driver).await;
        let response = auth.authenticate("somchai", "secret123").await.unwrap().unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("password_hash").is_none());
        assert!(response.last_login.is_some());
    }

    #[tokio::test]
    async fn test_permission_hierarchy() {
        let auth = service_with_user(UserRole::Manager).await;
        assert!(!auth.has_permission(UserRole::Driver)); // sin sesión

        auth.authenticate("somchai", "secret123").await.unwrap();
        assert!(auth.has_permission(UserRole::Driver));
        assert!(auth.has_permission(UserRole::Operator));
        assert!(auth.has_permission(UserRole::Manager));
        assert!(!auth.has_permission(UserRole::Admin));

        auth.logout();
        assert!(!auth.has_permission(UserRole::Driver));
    }

    fn session(role: UserRole) -> SessionUser {
        SessionUser {
            session_id: Uuid::new_v4(),
            user_id: "U-1".to_string(),
            username: "somchai".to_string(),
            role,
            full_name: "Somchai J.".to_string(),
            logged_in_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_store_keeps_working_after_a_panicked_holder() {
        let store = Arc::new(MemorySessionStore::new());

        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.inner.lock().unwrap();
            panic!("holder dies with the lock taken");
        })
        .join();

        store.set(session(UserRole::Admin));
        let current = store.get();
        assert_eq!(current.map(|s| s.username), Some("somchai".to_string()));
        store.clear();
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn test_page_access_policy() {
        let auth = service_with_user(UserRole::Manager).await;

        // página sin mapping: pública incluso sin sesión
        assert_eq!(auth.check_page_access("login"), PageAccess::Granted);
        // página mapeada sin sesión
        assert_eq!(auth.check_page_access("vehicles"), PageAccess::LoginRequired);

        auth.authenticate("somchai", "secret123").await.unwrap();
        assert_eq!(auth.check_page_access("vehicles"), PageAccess::Granted);
        assert_eq!(auth.check_page_access("users"), PageAccess::Denied);
        assert_eq!(auth.check_page_access("admin-dashboard"), PageAccess::Denied);
    }
}
