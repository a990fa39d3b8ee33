//! Errores de la aplicación `stepflow`.

pub mod app_error;

pub use app_error::AppError;
