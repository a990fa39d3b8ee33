//! flow-adapters: construcción de workflows desde datos serializados.
//!
//! Este crate provee:
//! - `StepRegistry`: el "aggregator" explícito nombre → descriptor que el
//!   llamador arma con los pasos que quiere poder decodificar.
//! - `FlowSpec`: modelo serde del formato
//!   `{ schemaVersion, sequence: [{ flowRepresentableName, launchStyle?, flowPersistence? }] }`.
//! - `build_graph` / `decode_workflow`: resuelven cada nombre contra el
//!   registro; un nombre desconocido hace fallar toda la construcción.
//!
//! El resultado es un `StepGraph` idéntico al que produce el builder tipado
//! de `flow-core` para la misma secuencia.

pub mod decode;
pub mod error;
pub mod registry;
pub mod spec;

pub use decode::{build_graph, decode_workflow, decode_workflow_slice, parse_persistence};
pub use error::DecodeError;
pub use registry::StepRegistry;
pub use spec::{FlowSpec, SequenceEntry};
