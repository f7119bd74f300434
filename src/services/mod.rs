//! Services module
//!
//! Este módulo contiene la lógica de negocio que cruza colecciones:
//! estadísticas derivadas, búsqueda/filtrado, autenticación/autorización
//! y export/import.

pub mod auth_service;
pub mod export_service;
pub mod search_service;
pub mod statistics_service;

pub use auth_service::{AuthService, MemorySessionStore, PageAccess, SessionStore};
pub use export_service::{DatabaseExport, ExportService};
pub use search_service::SearchService;
pub use statistics_service::StatisticsService;
