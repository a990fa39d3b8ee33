//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad de la secuencia (una "pantalla"). Este módulo define:
//! - `FlowStep`: interfaz tipada (Input / Output) que implementan los pasos.
//! - `ErasedStep`: interfaz neutra usada por el engine (tipo borrado).
//! - `StepDescriptor` / `StepSpec`: fábrica + metadatos (persistencia, estilo).
//! - `StepHandle` / `StepInstance`: una instancia viva en la cadena.

pub mod definition;
pub mod descriptor;
pub mod erased;
pub mod instance;
pub mod macros;

pub use definition::{short_type_name, FlowStep};
pub use descriptor::{step, StepDescriptor, StepFactory, StepSpec};
pub use erased::ErasedStep;
pub use instance::{StepHandle, StepInstance};
