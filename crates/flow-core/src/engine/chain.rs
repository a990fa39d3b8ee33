//! Cadena viva: arena de posiciones indexada como el grafo.
//!
//! Cada slot guarda a lo sumo una instancia y una generación que sólo crece.
//! Un `StepHandle` es válido mientras la instancia del slot conserve la
//! generación con la que se emitió; podar o volver a materializar la posición
//! invalida los handles anteriores.
use crate::errors::WorkflowError;
use crate::model::FlowPersistence;
use crate::step::{ErasedStep, StepHandle, StepInstance};

#[derive(Debug, Default)]
struct Slot {
    instance: Option<StepInstance>,
    generation: u64,
}

#[derive(Debug)]
pub(crate) struct LiveChain {
    slots: Vec<Slot>,
}

impl LiveChain {
    pub(crate) fn new(len: usize) -> Self {
        Self { slots: (0..len).map(|_| Slot::default()).collect() }
    }

    /// Instala una instancia nueva en `index` (reemplaza la anterior).
    pub(crate) fn materialize(&mut self,
                              index: usize,
                              mut step: Box<dyn ErasedStep>,
                              loaded: bool,
                              persistence: FlowPersistence)
                              -> StepHandle {
        let slot = &mut self.slots[index];
        slot.generation += 1;
        let handle = StepHandle::new(index, slot.generation);
        step.attach(handle);
        slot.instance = Some(StepInstance::new(handle, step, loaded, persistence));
        handle
    }

    pub(crate) fn prune(&mut self, index: usize) -> Option<StepInstance> {
        self.slots.get_mut(index).and_then(|s| s.instance.take())
    }

    /// Descarta todas las instancias desde `index` en adelante.
    pub(crate) fn truncate_from(&mut self, index: usize) {
        for slot in self.slots.iter_mut().skip(index) {
            slot.instance = None;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.truncate_from(0);
    }

    pub(crate) fn get(&self, handle: StepHandle) -> Option<&StepInstance> {
        self.slots
            .get(handle.index())?
            .instance
            .as_ref()
            .filter(|inst| inst.handle() == handle)
    }

    pub(crate) fn get_mut(&mut self, handle: StepHandle) -> Option<&mut StepInstance> {
        self.slots
            .get_mut(handle.index())?
            .instance
            .as_mut()
            .filter(|inst| inst.handle() == handle)
    }

    pub(crate) fn validate(&self, handle: StepHandle) -> Result<&StepInstance, WorkflowError> {
        self.get(handle).ok_or(WorkflowError::StaleHandle { index: handle.index() })
    }

    /// Predecesor más cercano todavía presente en la cadena.
    pub(crate) fn previous_live(&self, index: usize) -> Option<StepHandle> {
        self.slots
            .iter()
            .take(index)
            .rev()
            .find_map(|s| s.instance.as_ref().map(StepInstance::handle))
    }

    pub(crate) fn live(&self) -> impl Iterator<Item = &StepInstance> {
        self.slots.iter().filter_map(|s| s.instance.as_ref())
    }
}
