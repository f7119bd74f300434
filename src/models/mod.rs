//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos con un schema canónico
//! por entidad, independiente del backend de persistencia.

pub mod notification;
pub mod statistics;
pub mod transport;
pub mod user;
pub mod vehicle;
pub mod warehouse;

pub use notification::{CreateNotificationRequest, Notification};
pub use statistics::Statistics;
pub use transport::{
    CargoDetail, CreateTransportRequest, Transport, TransportFilters, TransportPatch,
    TransportStatus,
};
pub use user::{CreateUserRequest, SessionUser, User, UserPatch, UserResponse, UserRole};
pub use vehicle::{CreateVehicleRequest, Vehicle, VehiclePatch, VehicleStatus};
pub use warehouse::{CreateWarehouseRequest, Warehouse, WarehousePatch};
