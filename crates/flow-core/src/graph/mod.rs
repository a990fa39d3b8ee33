//! Grafo de pasos: secuencia ordenada e inmutable de descriptores.
//!
//! Dos caminos de construcción producen la misma estructura:
//! - `Workflow<S>`: encadenado tipado, verifica en compilación que la entrada
//!   de cada paso coincide con la salida del anterior.
//! - `GraphBuilder`: encadenado dinámico (lo usa el adaptador serializado).

pub mod builder;
pub mod typed;
pub mod types;

pub use builder::GraphBuilder;
pub use typed::{SameAs, Workflow};
pub use types::StepGraph;
