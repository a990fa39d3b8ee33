//! Adaptador: cualquier `FlowStep` implementa la interfaz neutra `ErasedStep`.
use std::any::{type_name, Any};

use super::{FlowStep, StepHandle};
use crate::model::Envelope;

/// Vista de tipo borrado de una instancia de paso.
pub trait ErasedStep: Any {
    fn should_load(&self) -> bool;
    fn skipped_output(&self) -> Option<Envelope>;
    fn attach(&mut self, handle: StepHandle);
    /// `false` si el envelope no traía la entrada que el paso declara.
    fn is_bound(&self) -> bool {
        true
    }
    /// Tipo concreto de la instancia.
    fn step_type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: FlowStep> ErasedStep for S {
    fn should_load(&self) -> bool {
        FlowStep::should_load(self)
    }

    fn skipped_output(&self) -> Option<Envelope> {
        FlowStep::skipped_output(self).map(Envelope::new)
    }

    fn attach(&mut self, handle: StepHandle) {
        self.on_attach(handle)
    }

    fn step_type_name(&self) -> &'static str {
        type_name::<S>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Instancia producida cuando el envelope no trae el tipo que el paso
/// declara. Nunca carga.
#[derive(Debug)]
pub(crate) struct UnboundStep {
    pub(crate) expected: &'static str,
    pub(crate) found: &'static str,
}

impl ErasedStep for UnboundStep {
    fn should_load(&self) -> bool {
        false
    }

    fn skipped_output(&self) -> Option<Envelope> {
        None
    }

    fn attach(&mut self, _handle: StepHandle) {}

    fn is_bound(&self) -> bool {
        false
    }

    fn step_type_name(&self) -> &'static str {
        self.found
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
