//! stepflow: workflows de pasos navegables.
//!
//! Este crate reúne los crates del workspace:
//! - `flow_core`: grafo de pasos, engine (launch / proceed / back_up /
//!   abandon) y contrato con la capa de presentación.
//! - `flow_adapters`: construcción de grafos desde JSON con un registro
//!   explícito de pasos.
//!
//! Además expone `config` (variables de entorno), `errors` (error de
//! aplicación) y `demo` (flujo de perfil usado por el binario `main-core`).

pub mod config;
pub mod demo;
pub mod errors;

pub use flow_adapters;
pub use flow_core;

pub use config::EngineConfig;
pub use errors::AppError;
