//! Tipos de evento del workflow y estructura `WorkflowEvent`.
//!
//! Rol:
//! - Cada transición del `WorkflowEngine` emite un evento a un `EventStore`
//!   append-only, agrupado por `run_id` (un id nuevo por cada `launch`).
//! - Los eventos son observables y serializables; no se usan para
//!   reconstruir estado, el engine mantiene la cadena viva en memoria.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::FlowPersistence;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowEventKind {
    /// Primer evento de un run: fija el `definition_hash` y la cantidad de
    /// pasos del grafo.
    Launched { definition_hash: String, step_count: usize },
    /// Un paso devolvió `should_load == false`. `persisted` indica si la
    /// instancia quedó materializada en la cadena viva.
    Skipped { step_index: usize, step_name: String, persisted: bool },
    /// Un paso quedó activo (cargado) al avanzar o al lanzar.
    Loaded { step_index: usize, step_name: String, persistence: FlowPersistence },
    /// La posición se eliminó de la cadena viva al avanzar desde ella.
    Pruned { step_index: usize, step_name: String },
    Proceeded { from: usize, to: Option<usize> },
    BackedUp { from: usize, to: usize },
    /// Liberación explícita de una posición retenida.
    Released { step_index: usize, step_name: String },
    Completed,
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub seq: u64, // asignado por el store (orden append)
    pub run_id: Uuid,
    pub kind: WorkflowEventKind,
    pub ts: DateTime<Utc>,
}
