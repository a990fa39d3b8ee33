use flow_adapters::DecodeError;
use flow_core::WorkflowError;
use thiserror::Error;

/// Error de nivel aplicación: agrupa los errores de los crates.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de workflow: {0}")]
    Workflow(#[from] WorkflowError),
    #[error("Error al decodificar el flujo: {0}")]
    Decode(#[from] DecodeError),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de serialización: {0}")]
    Json(#[from] serde_json::Error),
}
