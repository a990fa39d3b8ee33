//! Errores del motor de orquestación.
//!
//! Dos familias separadas:
//! - `WorkflowError`: fallos de navegación o de uso que el llamador recibe
//!   como `Result` y puede manejar (p.ej. `CannotBackUp`).
//! - `ContractViolation`: un paso o un presentador intentó extraer a la fuerza
//!   un tipo que no corresponde. Indica un grafo mal construido, no una
//!   condición de runtime.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum WorkflowError {
    #[error("workflow has not been launched")] NotStarted,
    #[error("workflow already launched")] AlreadyLaunched,
    #[error("workflow already completed")] AlreadyCompleted,
    #[error("cannot back up: no previous step remains in the live chain")] CannotBackUp,
    #[error("stale step handle for position {index}")] StaleHandle { index: usize },
    #[error("position {index} is not the active step")] NotActive { index: usize },
    #[error("the active step cannot be released")] ReleaseActive,
    #[error("unknown position {0}")] UnknownPosition(usize),
    #[error("contract violation: {0}")] ContractViolation(#[from] ContractViolation),
    #[error("reentrant call into the workflow engine")] ReentrantCall,
}

/// Extracción forzada de un tipo incompatible.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("expected `{expected}`, found `{found}`")]
pub struct ContractViolation {
    pub expected: &'static str,
    pub found: String,
}

impl ContractViolation {
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self { expected,
               found: found.into() }
    }
}
