//! Generación de identificadores
//!
//! Identificadores opacos con el formato `{prefijo}-{unix_millis}{sufijo}`.
//! El sufijo aleatorio evita colisiones cuando se crean varios registros
//! dentro del mismo milisegundo.

use chrono::Utc;
use rand::Rng;

/// Prefijos por colección
pub const VEHICLE_PREFIX: &str = "V";
pub const WAREHOUSE_PREFIX: &str = "WH";
pub const TRANSPORT_PREFIX: &str = "T";
pub const USER_PREFIX: &str = "U";
pub const NOTIFICATION_PREFIX: &str = "N";

/// Generar un identificador nuevo para el prefijo dado
pub fn generate_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("{}-{}{:04}", prefix, millis, suffix)
}
