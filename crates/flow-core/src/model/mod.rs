//! Modelos neutrales: `Envelope` (argumentos entre pasos) y las políticas
//! de persistencia / presentación que lleva cada descriptor.

pub mod envelope;
pub mod policy;

pub use envelope::Envelope;
pub use policy::{FlowPersistence, LaunchStyle, PersistenceRule};
