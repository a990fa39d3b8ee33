//! Builder dinámico del grafo.
//!
//! `append` agrega un descriptor al final y devuelve el builder para seguir
//! encadenando. `build` congela la secuencia y calcula el `definition_hash`
//! sobre la forma canónica de la secuencia, así el camino tipado y el
//! serializado dan el mismo hash para la misma lista de pasos.
use serde_json::{json, Value};

use super::StepGraph;
use crate::constants::ENGINE_VERSION;
use crate::hashing::hash_value;
use crate::step::StepDescriptor;

#[derive(Debug, Default)]
pub struct GraphBuilder {
    descriptors: Vec<StepDescriptor>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, descriptor: impl Into<StepDescriptor>) -> &mut Self {
        self.descriptors.push(descriptor.into());
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn build(self) -> StepGraph {
        let hash = definition_hash(&self.descriptors);
        StepGraph::new(self.descriptors, hash)
    }
}

fn definition_hash(descriptors: &[StepDescriptor]) -> String {
    let steps: Vec<Value> = descriptors.iter()
                                       .map(|d| {
                                           let persistence = match d.persistence_rule().static_value() {
                                               Some(p) => json!(p.as_str()),
                                               None => json!("dynamic"),
                                           };
                                           json!({
                                               "name": d.name(),
                                               "launch_style": d.launch_style().as_str(),
                                               "persistence": persistence,
                                           })
                                       })
                                       .collect();
    hash_value(&json!({ "engine_version": ENGINE_VERSION, "steps": steps }))
}
