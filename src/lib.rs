//! Fleet Tracker
//!
//! Capa de datos para el seguimiento de una flota logística: vehículos,
//! almacenes, transportes, usuarios y notificaciones sobre un backend de
//! persistencia intercambiable (archivo JSON local o document store
//! remoto), con estadísticas derivadas, búsqueda y sesiones.

pub mod backend;
pub mod config;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
