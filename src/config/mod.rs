//! Módulo de configuración

pub mod environment;

pub use environment::{BackendKind, EnvironmentConfig};
