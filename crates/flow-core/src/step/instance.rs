use std::fmt;

use super::ErasedStep;
use crate::model::FlowPersistence;

/// Referencia estable a una posición materializada de la cadena viva.
///
/// Es un índice + generación, no un puntero: si la posición se poda o se
/// vuelve a instanciar, el handle anterior queda obsoleto y el engine lo
/// rechaza con `WorkflowError::StaleHandle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepHandle {
    index: usize,
    generation: u64,
}

impl StepHandle {
    pub(crate) fn new(index: usize, generation: u64) -> Self {
        Self { index, generation }
    }

    /// Posición en el grafo.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Ocurrencia materializada de un descriptor dentro de la cadena viva.
pub struct StepInstance {
    handle: StepHandle,
    step: Box<dyn ErasedStep>,
    loaded: bool,
    persistence: FlowPersistence,
}

impl StepInstance {
    pub(crate) fn new(handle: StepHandle, step: Box<dyn ErasedStep>, loaded: bool, persistence: FlowPersistence) -> Self {
        Self { handle,
               step,
               loaded,
               persistence }
    }

    pub fn handle(&self) -> StepHandle {
        self.handle
    }

    /// `false` para pasos saltados que se mantienen materializados
    /// (`PersistWhenSkipped`): siguen alcanzables con `back_up`.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    /// Persistencia resuelta al materializar.
    pub fn persistence(&self) -> FlowPersistence {
        self.persistence
    }

    pub fn step(&self) -> &dyn ErasedStep {
        self.step.as_ref()
    }

    pub fn step_mut(&mut self) -> &mut dyn ErasedStep {
        self.step.as_mut()
    }
}

impl fmt::Debug for StepInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepInstance")
         .field("handle", &self.handle)
         .field("loaded", &self.loaded)
         .field("persistence", &self.persistence)
         .finish()
    }
}
