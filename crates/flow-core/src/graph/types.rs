use std::fmt;

use crate::step::StepDescriptor;

/// Definición inmutable del workflow.
///
/// Los descriptores se recorren en ambos sentidos por índice
/// (`next_index` / `previous_index`). El orden queda fijo al construir.
#[derive(Clone)]
pub struct StepGraph {
    descriptors: Vec<StepDescriptor>,
    definition_hash: String,
}

impl StepGraph {
    pub(crate) fn new(descriptors: Vec<StepDescriptor>, definition_hash: String) -> Self {
        Self { descriptors,
               definition_hash }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StepDescriptor> {
        self.descriptors.get(index)
    }

    pub fn first(&self) -> Option<&StepDescriptor> {
        self.descriptors.first()
    }

    pub fn last(&self) -> Option<&StepDescriptor> {
        self.descriptors.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.descriptors.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name()).collect()
    }

    pub fn next_index(&self, index: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        (next < self.len()).then_some(next)
    }

    pub fn previous_index(&self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        index.checked_sub(1)
    }

    /// Hash de la secuencia (nombres, persistencias estáticas, estilos).
    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }
}

impl fmt::Debug for StepGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepGraph")
         .field("steps", &self.names())
         .field("definition_hash", &self.definition_hash)
         .finish()
    }
}
