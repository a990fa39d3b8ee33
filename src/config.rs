//! Configuración del motor cargada desde variables de entorno.
//!
//! Se honra un archivo `.env` (dotenvy), cargado una sola vez. No es un
//! registro global mutable: el valor se pasa explícitamente al registro de
//! pasos y al engine.
//!
//! Variables:
//! - `STEPFLOW_SCHEMA_VERSION`: versión más alta del formato serializado que
//!   se acepta (por defecto `flow_core::constants::SCHEMA_VERSION`).
//! - `STEPFLOW_RECORD_EVENTS`: si el engine registra eventos en memoria
//!   (por defecto `true`).
//! - `STEPFLOW_LOG_LEVEL`: nivel del logger del binario (por defecto `info`).
use std::env;

use dotenvy::dotenv;
use flow_adapters::StepRegistry;
use flow_core::constants::SCHEMA_VERSION;
use log::LevelFilter;
use once_cell::sync::Lazy;

use crate::errors::AppError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub schema_version: u32,
    pub record_events: bool,
    pub log_level: LevelFilter,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { schema_version: SCHEMA_VERSION,
               record_events: true,
               log_level: LevelFilter::Info }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, AppError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda. Las
    /// variables ausentes toman el valor por defecto; las presentes deben
    /// ser válidas.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        let schema_version = match lookup("STEPFLOW_SCHEMA_VERSION") {
            Some(raw) => parse_var("STEPFLOW_SCHEMA_VERSION", &raw, |v| v.parse::<u32>().ok().filter(|n| *n > 0))?,
            None => defaults.schema_version,
        };
        let record_events = match lookup("STEPFLOW_RECORD_EVENTS") {
            Some(raw) => parse_var("STEPFLOW_RECORD_EVENTS", &raw, parse_flag)?,
            None => defaults.record_events,
        };
        let log_level = match lookup("STEPFLOW_LOG_LEVEL") {
            Some(raw) => parse_var("STEPFLOW_LOG_LEVEL", &raw, |v| v.parse::<LevelFilter>().ok())?,
            None => defaults.log_level,
        };
        Ok(Self { schema_version,
                  record_events,
                  log_level })
    }

    /// Registro vacío que acepta la versión de esquema configurada.
    pub fn registry(&self) -> StepRegistry {
        StepRegistry::with_schema_version(self.schema_version)
    }
}

fn parse_var<T, P>(key: &str, raw: &str, parse: P) -> Result<T, AppError>
    where P: Fn(&str) -> Option<T>
{
    parse(raw.trim()).ok_or_else(|| AppError::Config(format!("{key}: valor inválido `{raw}`")))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
