//! Constantes del motor de orquestación.
//!
//! `ENGINE_VERSION` entra en el `definition_hash` de cada `StepGraph`, de modo
//! que un cambio incompatible del motor invalida los hashes previos aunque la
//! secuencia de pasos no cambie.

/// Versión lógica del motor.
pub const ENGINE_VERSION: &str = "W1.0";

/// Versión más alta del formato serializado de flujos que se acepta por
/// defecto (`schemaVersion` en el JSON).
pub const SCHEMA_VERSION: u32 = 1;

/// Runs cuyo historial conserva `InMemoryEventStore` por defecto; al
/// registrar uno nuevo se descarta el más antiguo.
pub const RETAINED_RUNS: usize = 8;
