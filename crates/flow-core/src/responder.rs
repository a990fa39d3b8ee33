//! Contrato con la capa de presentación.
//!
//! El engine no presenta nada: notifica cada transición a un
//! `OrchestrationResponder` y éste decide cómo mostrarla (pila de vistas,
//! árbol declarativo, harness de tests). Las cinco operaciones se llaman como
//! máximo una vez por transición, en el orden de la máquina de estados, y
//! nunca de forma concurrente para un mismo engine.
use std::fmt;

use uuid::Uuid;

use crate::model::{Envelope, FlowPersistence, LaunchStyle};
use crate::step::StepHandle;

/// Vista de una posición de la cadena viva tal como la recibe el responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPosition {
    pub handle: StepHandle,
    pub name: String,
    pub launch_style: LaunchStyle,
    pub persistence: FlowPersistence,
}

impl StepPosition {
    pub fn index(&self) -> usize {
        self.handle.index()
    }
}

/// Identidad del run que se completa o abandona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSummary {
    pub run_id: Uuid,
    pub definition_hash: String,
    pub step_count: usize,
}

/// Callback de finalización registrado en `launch_with`.
pub type FinishCallback = Box<dyn FnOnce(Envelope)>;

/// Callback de finalización de un solo uso.
///
/// El responder puede invocarlo dentro de `complete`/`abandon` (p.ej. tras
/// cerrar la última vista); si no lo hace, el engine lo invoca al volver.
/// En ambos casos se ejecuta a lo sumo una vez.
pub struct OnFinish {
    callback: Option<FinishCallback>,
}

impl OnFinish {
    pub(crate) fn new(callback: Option<FinishCallback>) -> Self {
        Self { callback }
    }

    /// Ejecuta el callback pendiente. Devuelve `false` si ya se había
    /// ejecutado o si el run no registró ninguno.
    pub fn finish(&mut self, args: Envelope) -> bool {
        match self.callback.take() {
            Some(cb) => {
                cb(args);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for OnFinish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnFinish").field("pending", &self.is_pending()).finish()
    }
}

pub trait OrchestrationResponder {
    /// Primer paso cargable del run.
    fn launch(&mut self, to: &StepPosition);
    fn proceed(&mut self, to: &StepPosition, from: &StepPosition);
    fn back_up(&mut self, from: &StepPosition, to: &StepPosition);
    fn abandon(&mut self, workflow: &WorkflowSummary, on_finish: &mut OnFinish);
    /// `args` es el último envelope producido en el run.
    fn complete(&mut self, workflow: &WorkflowSummary, args: &Envelope, on_finish: &mut OnFinish);
}

impl<R: OrchestrationResponder + ?Sized> OrchestrationResponder for Box<R> {
    fn launch(&mut self, to: &StepPosition) {
        (**self).launch(to)
    }

    fn proceed(&mut self, to: &StepPosition, from: &StepPosition) {
        (**self).proceed(to, from)
    }

    fn back_up(&mut self, from: &StepPosition, to: &StepPosition) {
        (**self).back_up(from, to)
    }

    fn abandon(&mut self, workflow: &WorkflowSummary, on_finish: &mut OnFinish) {
        (**self).abandon(workflow, on_finish)
    }

    fn complete(&mut self, workflow: &WorkflowSummary, args: &Envelope, on_finish: &mut OnFinish) {
        (**self).complete(workflow, args, on_finish)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn on_finish_runs_once() {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let mut on_finish = OnFinish::new(Some(Box::new(move |_| h.set(h.get() + 1))));
        assert!(on_finish.is_pending());
        assert!(on_finish.finish(Envelope::Empty));
        assert!(!on_finish.finish(Envelope::Empty));
        assert_eq!(hits.get(), 1);
        assert!(!on_finish.is_pending());
    }

    #[test]
    fn on_finish_without_callback_is_noop() {
        let mut on_finish = OnFinish::new(None);
        assert!(!on_finish.finish(Envelope::new(1u8)));
    }
}
