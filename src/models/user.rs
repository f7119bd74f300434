//! Modelo de User
//!
//! El hash de contraseña vive solo en el registro interno `User`; toda
//! respuesta hacia fuera del repositorio usa `UserResponse`, que no lo
//! contiene. Las contraseñas se guardan con bcrypt, nunca en claro.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Rol del usuario, ordenado para chequeos de permisos
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Operator,
    Driver,
}

impl UserRole {
    /// Rango numérico: admin(4) > manager(3) > operator(2) > driver(1)
    pub fn rank(&self) -> u8 {
        match self {
            UserRole::Admin => 4,
            UserRole::Manager => 3,
            UserRole::Operator => 2,
            UserRole::Driver => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Operator => "operator",
            UserRole::Driver => "driver",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registro interno de usuario, tal como se persiste
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub full_name: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response de usuario: nunca incluye la contraseña ni su hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub full_name: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            full_name: user.full_name,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request para crear un nuevo usuario
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Identificador explícito; si falta se genera uno con prefijo `U-`
    pub id: Option<String>,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    /// Contraseña en claro; el repositorio la hashea antes de persistir
    #[validate(length(min = 6, max = 100))]
    pub password: String,

    pub role: UserRole,

    #[validate(length(min = 2, max = 100))]
    pub full_name: String,
}

/// Patch tipado para actualizar un usuario existente.
/// `password` llega en claro y el repositorio la convierte en hash.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,

    pub role: Option<UserRole>,

    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,
}

/// Registro de sesión persistido por el SessionStore
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub session_id: uuid::Uuid,
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
    pub full_name: String,
    pub logged_in_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy_order() {
        assert!(UserRole::Admin.rank() > UserRole::Manager.rank());
        assert!(UserRole::Manager.rank() > UserRole::Operator.rank());
        assert!(UserRole::Operator.rank() > UserRole::Driver.rank());
    }

    #[test]
    fn test_user_response_has_no_password_field() {
        let user = User {
            id: "U-1".to_string(),
            username: "somchai".to_string(),
            email: "somchai@example.com".to_string(),
            password_hash: "$2b$12$fake".to_string(),
            role: UserRole::Driver,
            full_name: "Somchai J.".to_string(),
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("password_hash").is_none());
    }
}
