//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y generación de identificadores.

pub mod errors;
pub mod ids;
pub mod validation;
