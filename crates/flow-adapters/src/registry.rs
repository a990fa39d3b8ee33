//! Registro explícito nombre → descriptor ("aggregator").
//!
//! No hay registro global: el llamador arma uno y lo pasa a `build_graph`.
//! El orden de registro se conserva (`IndexMap`) para listar los nombres de
//! forma estable.
use flow_core::constants::SCHEMA_VERSION;
use flow_core::{FlowStep, StepDescriptor};
use indexmap::IndexMap;
use log::debug;

use crate::DecodeError;

#[derive(Debug, Clone)]
pub struct StepRegistry {
    entries: IndexMap<String, StepDescriptor>,
    supported_schema_version: u32,
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::with_schema_version(SCHEMA_VERSION)
    }

    /// Registro que acepta flujos con `schemaVersion` hasta `version`.
    pub fn with_schema_version(version: u32) -> Self {
        Self { entries: IndexMap::new(),
               supported_schema_version: version }
    }

    /// Registra `S` con su nombre (`S::name()`) y metadatos por defecto.
    pub fn register<S: FlowStep>(&mut self) -> Result<&mut Self, DecodeError> {
        self.register_descriptor(StepDescriptor::of::<S>())
    }

    /// Registra `S` bajo otro nombre.
    pub fn register_as<S: FlowStep>(&mut self, name: impl Into<String>) -> Result<&mut Self, DecodeError> {
        self.register_descriptor(StepDescriptor::of::<S>().with_name(name))
    }

    /// Registra un descriptor ya configurado (persistencia, estilo).
    pub fn register_descriptor(&mut self, descriptor: StepDescriptor) -> Result<&mut Self, DecodeError> {
        let name = descriptor.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(DecodeError::DuplicateName(name));
        }
        debug!("registry:register name={name} type={}", descriptor.type_name());
        self.entries.insert(name, descriptor);
        Ok(self)
    }

    pub fn resolve(&self, name: &str) -> Option<&StepDescriptor> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn supported_schema_version(&self) -> u32 {
        self.supported_schema_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    impl FlowStep for Alpha {
        type Input = ();
        type Output = ();
        fn create(_: ()) -> Self {
            Alpha
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = StepRegistry::new();
        registry.register::<Alpha>().expect("first");
        assert_eq!(registry.register::<Alpha>().err(), Some(DecodeError::DuplicateName("Alpha".into())));
        registry.register_as::<Alpha>("AlphaAgain").expect("alias");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Alpha", "AlphaAgain"]);
    }
}
