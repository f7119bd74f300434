//! Utilidades de validación
//!
//! Funciones helper usadas como validadores custom en los request DTOs.

use validator::ValidationError;

/// Validar que un string no esté vacío ni sea solo espacios
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula: alfanumérico con guiones, sin espacios
pub fn validate_plate_number(value: &str) -> Result<(), ValidationError> {
    let ok = !value.trim().is_empty()
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !ok {
        let mut error = ValidationError::new("plate_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
