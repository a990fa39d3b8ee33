//! Core WorkflowEngine implementation

use std::any::type_name;

use log::{debug, warn};
use uuid::Uuid;

use super::chain::LiveChain;
use crate::errors::{ContractViolation, WorkflowError};
use crate::event::{EventStore, InMemoryEventStore, WorkflowEvent, WorkflowEventKind};
use crate::graph::StepGraph;
use crate::model::{Envelope, FlowPersistence};
use crate::responder::{FinishCallback, OnFinish, OrchestrationResponder, StepPosition, WorkflowSummary};
use crate::step::{FlowStep, StepHandle, StepInstance};

/// Cursor del engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    NotStarted,
    Active(StepHandle),
    Completed,
}

impl WorkflowState {
    pub fn active(&self) -> Option<StepHandle> {
        match self {
            WorkflowState::Active(h) => Some(*h),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, WorkflowState::Active(_))
    }
}

/// Motor de orquestación de un workflow.
///
/// Mantiene el grafo, la cadena viva de instancias, el cursor y el responder
/// al que notifica cada transición. Una instancia corresponde a un run; para
/// empezar otro hay que llamar `reset` (o `abandon`) o crear un engine nuevo.
///
/// Las transiciones son síncronas y no reentrantes: `&mut self` lo garantiza
/// en el uso directo, y `SharedWorkflow` lo verifica en runtime cuando el
/// engine se comparte con los pasos o el responder.
pub struct WorkflowEngine<R, E = InMemoryEventStore>
    where R: OrchestrationResponder,
          E: EventStore
{
    graph: StepGraph,
    chain: LiveChain,
    state: WorkflowState,
    responder: R,
    event_store: E,
    on_finish: Option<FinishCallback>,
    run_id: Uuid,
}

impl<R> WorkflowEngine<R, InMemoryEventStore> where R: OrchestrationResponder
{
    /// Engine con registro de eventos en memoria.
    pub fn new(graph: StepGraph, responder: R) -> Self {
        Self::with_event_store(graph, responder, InMemoryEventStore::default())
    }
}

impl<R, E> WorkflowEngine<R, E>
    where R: OrchestrationResponder,
          E: EventStore
{
    pub fn with_event_store(graph: StepGraph, responder: R, event_store: E) -> Self {
        let chain = LiveChain::new(graph.len());
        Self { graph,
               chain,
               state: WorkflowState::NotStarted,
               responder,
               event_store,
               on_finish: None,
               run_id: Uuid::new_v4() }
    }

    /// Lanza el workflow con `args` como envelope inicial.
    ///
    /// Devuelve el handle del primer paso cargable, o `None` si ninguno cargó
    /// y el run terminó en el acto (el responder recibe `complete`).
    pub fn launch(&mut self, args: Envelope) -> Result<Option<StepHandle>, WorkflowError> {
        self.launch_inner(args, None)
    }

    /// Igual que `launch`, registrando el callback de finalización del run.
    pub fn launch_with<F>(&mut self, args: Envelope, on_finish: F) -> Result<Option<StepHandle>, WorkflowError>
        where F: FnOnce(Envelope) + 'static
    {
        self.launch_inner(args, Some(Box::new(on_finish)))
    }

    fn launch_inner(&mut self, args: Envelope, on_finish: Option<FinishCallback>) -> Result<Option<StepHandle>, WorkflowError> {
        match self.state {
            WorkflowState::NotStarted => {}
            WorkflowState::Active(_) => {
                warn!("launch:refused run_id={} already active", self.run_id);
                return Err(WorkflowError::AlreadyLaunched);
            }
            WorkflowState::Completed => {
                warn!("launch:refused run_id={} already completed", self.run_id);
                return Err(WorkflowError::AlreadyCompleted);
            }
        }
        self.chain.clear();
        self.run_id = Uuid::new_v4();
        self.on_finish = on_finish;
        debug!("launch:start run_id={} steps={}", self.run_id, self.graph.len());
        self.record(WorkflowEventKind::Launched { definition_hash: self.graph.definition_hash().to_string(),
                                                  step_count: self.graph.len() });

        let mut args = args;
        match self.walk_forward(0, &mut args) {
            Some(to) => {
                self.state = WorkflowState::Active(to);
                let to_pos = self.position(to)?;
                self.responder.launch(&to_pos);
                debug!("launch:done run_id={} active={}", self.run_id, to_pos.name);
                Ok(Some(to))
            }
            None => {
                debug!("launch:done run_id={} nothing to load", self.run_id);
                self.finish_run(args);
                Ok(None)
            }
        }
    }

    /// Avanza desde `from`, que debe ser el paso activo.
    ///
    /// Devuelve el nuevo paso activo o `None` si el grafo se agotó y el run
    /// se completó. Un handle ya usado para avanzar deja de ser el activo, así
    /// que un segundo `proceed` con el mismo handle falla (`NotActive` o
    /// `StaleHandle`).
    pub fn proceed(&mut self, from: StepHandle, args: Envelope) -> Result<Option<StepHandle>, WorkflowError> {
        let active = self.active_handle()?;
        if self.chain.get(from).is_none() {
            warn!("proceed:stale run_id={} index={} generation={}", self.run_id, from.index(), from.generation());
            return Err(WorkflowError::StaleHandle { index: from.index() });
        }
        if from != active {
            warn!("proceed:refused run_id={} index={} active={}", self.run_id, from.index(), active.index());
            return Err(WorkflowError::NotActive { index: from.index() });
        }
        let from_pos = self.position(from)?;
        debug!("proceed:start run_id={} from={}", self.run_id, from_pos.name);

        let mut args = args;
        let next = self.walk_forward(from.index() + 1, &mut args);
        if from_pos.persistence == FlowPersistence::RemovedAfterProceeding {
            self.chain.prune(from.index());
            debug!("proceed:prune run_id={} step={}", self.run_id, from_pos.name);
            self.record(WorkflowEventKind::Pruned { step_index: from.index(),
                                                    step_name: from_pos.name.clone() });
        }
        self.record(WorkflowEventKind::Proceeded { from: from.index(),
                                                   to: next.map(|h| h.index()) });

        match next {
            Some(to) => {
                self.state = WorkflowState::Active(to);
                let to_pos = self.position(to)?;
                self.responder.proceed(&to_pos, &from_pos);
                debug!("proceed:done run_id={} active={}", self.run_id, to_pos.name);
                Ok(Some(to))
            }
            None => {
                self.finish_run(args);
                Ok(None)
            }
        }
    }

    /// `proceed` desde el paso activo, sea cual sea.
    pub fn proceed_active(&mut self, args: Envelope) -> Result<Option<StepHandle>, WorkflowError> {
        let active = self.active_handle()?;
        self.proceed(active, args)
    }

    /// `proceed` tipado: el paso en `from` debe ser `S` y entrega su salida.
    pub fn proceed_with<S: FlowStep>(&mut self, from: StepHandle, output: S::Output) -> Result<Option<StepHandle>, WorkflowError> {
        self.force_step::<S>(from)?;
        self.proceed(from, Envelope::new(output))
    }

    /// Retrocede al predecesor vivo más cercano del paso activo.
    ///
    /// Sin predecesor (todos podados o estamos en el primero) devuelve
    /// `CannotBackUp` y el estado no cambia.
    pub fn back_up(&mut self) -> Result<StepHandle, WorkflowError> {
        let from = self.active_handle()?;
        let Some(to) = self.chain.previous_live(from.index()) else {
            warn!("back_up:refused run_id={} index={} no live predecessor", self.run_id, from.index());
            return Err(WorkflowError::CannotBackUp);
        };
        let from_pos = self.position(from)?;
        if let Some(inst) = self.chain.get_mut(to) {
            inst.mark_loaded();
        }
        let to_pos = self.position(to)?;
        self.state = WorkflowState::Active(to);
        self.record(WorkflowEventKind::BackedUp { from: from.index(),
                                                  to: to.index() });
        self.responder.back_up(&from_pos, &to_pos);
        debug!("back_up:done run_id={} from={} to={}", self.run_id, from_pos.name, to_pos.name);
        Ok(to)
    }

    /// Descarta la cadena viva y vuelve a `NotStarted`.
    ///
    /// El callback de finalización recibe `Envelope::Empty`. Desde
    /// `NotStarted` no hace nada.
    pub fn abandon(&mut self) {
        if self.state == WorkflowState::NotStarted {
            debug!("abandon:noop run_id={} not started", self.run_id);
            return;
        }
        self.chain.clear();
        self.state = WorkflowState::NotStarted;
        self.record(WorkflowEventKind::Abandoned);
        let summary = self.summary();
        let mut on_finish = OnFinish::new(self.on_finish.take());
        self.responder.abandon(&summary, &mut on_finish);
        on_finish.finish(Envelope::Empty);
        debug!("abandon:done run_id={}", self.run_id);
    }

    /// Poda una posición retenida que no es la activa.
    pub fn release(&mut self, handle: StepHandle) -> Result<(), WorkflowError> {
        self.chain.validate(handle)?;
        if self.state.active() == Some(handle) {
            warn!("release:refused run_id={} index={} is active", self.run_id, handle.index());
            return Err(WorkflowError::ReleaseActive);
        }
        let name = self.step_name(handle.index())?.to_string();
        self.chain.prune(handle.index());
        debug!("release:done run_id={} step={name}", self.run_id);
        self.record(WorkflowEventKind::Released { step_index: handle.index(),
                                                  step_name: name });
        Ok(())
    }

    /// Vuelve a `NotStarted` sin notificar al responder. El callback
    /// pendiente se descarta sin invocarse.
    pub fn reset(&mut self) {
        self.chain.clear();
        self.state = WorkflowState::NotStarted;
        self.on_finish = None;
        self.run_id = Uuid::new_v4();
        debug!("reset:done run_id={}", self.run_id);
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn active(&self) -> Option<StepHandle> {
        self.state.active()
    }

    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }

    pub fn responder(&self) -> &R {
        &self.responder
    }

    pub fn responder_mut(&mut self) -> &mut R {
        &mut self.responder
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Eventos del run actual (o del último, tras completar/abandonar).
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.event_store.list(self.run_id)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn summary(&self) -> WorkflowSummary {
        WorkflowSummary { run_id: self.run_id,
                          definition_hash: self.graph.definition_hash().to_string(),
                          step_count: self.graph.len() }
    }

    pub fn position(&self, handle: StepHandle) -> Result<StepPosition, WorkflowError> {
        let inst = self.chain.validate(handle)?;
        let descriptor = self.graph
                             .get(handle.index())
                             .ok_or(WorkflowError::UnknownPosition(handle.index()))?;
        Ok(StepPosition { handle,
                          name: descriptor.name().to_string(),
                          launch_style: descriptor.launch_style().clone(),
                          persistence: inst.persistence() })
    }

    /// Posiciones presentes en la cadena viva, en orden del grafo.
    pub fn live_positions(&self) -> Vec<StepPosition> {
        self.chain
            .live()
            .filter_map(|inst| self.position(inst.handle()).ok())
            .collect()
    }

    pub fn instance(&self, handle: StepHandle) -> Option<&StepInstance> {
        self.chain.get(handle)
    }

    pub fn step<S: FlowStep>(&self, handle: StepHandle) -> Option<&S> {
        self.chain.get(handle)?.step().as_any().downcast_ref::<S>()
    }

    pub fn step_mut<S: FlowStep>(&mut self, handle: StepHandle) -> Option<&mut S> {
        self.chain.get_mut(handle)?.step_mut().as_any_mut().downcast_mut::<S>()
    }

    /// Acceso tipado que trata un desajuste como violación de contrato.
    pub fn force_step<S: FlowStep>(&self, handle: StepHandle) -> Result<&S, WorkflowError> {
        let inst = self.chain.validate(handle)?;
        match inst.step().as_any().downcast_ref::<S>() {
            Some(step) => Ok(step),
            None => {
                let found = inst.step().step_type_name();
                warn!("force_step:violation run_id={} index={} expected={} found={found}",
                      self.run_id,
                      handle.index(),
                      type_name::<S>());
                Err(ContractViolation::new(type_name::<S>(), found).into())
            }
        }
    }

    fn active_handle(&self) -> Result<StepHandle, WorkflowError> {
        match self.state {
            WorkflowState::Active(h) => Ok(h),
            WorkflowState::NotStarted => Err(WorkflowError::NotStarted),
            WorkflowState::Completed => Err(WorkflowError::AlreadyCompleted),
        }
    }

    fn step_name(&self, index: usize) -> Result<&str, WorkflowError> {
        self.graph
            .get(index)
            .map(|d| d.name())
            .ok_or(WorkflowError::UnknownPosition(index))
    }

    /// Recorre el grafo desde `start` hasta el primer paso cargable.
    ///
    /// Cada posición recorrida se instancia de nuevo. Los pasos saltados
    /// pueden reescribir `args` (`skipped_output`) y quedan materializados
    /// salvo que su persistencia sea `RemovedAfterProceeding` o que el
    /// envelope no encajara con su entrada. Lo que hubiera
    /// en la cadena desde `start` en adelante se descarta.
    fn walk_forward(&mut self, start: usize, args: &mut Envelope) -> Option<StepHandle> {
        self.chain.truncate_from(start);
        let mut index = start;
        while let Some(descriptor) = self.graph.get(index) {
            let name = descriptor.name().to_string();
            let persistence = descriptor.persistence(args);
            let step = descriptor.instantiate(args);

            if step.should_load() {
                let handle = self.chain.materialize(index, step, true, persistence);
                debug!("walk:load run_id={} index={index} step={name} persistence={persistence}", self.run_id);
                self.record(WorkflowEventKind::Loaded { step_index: index,
                                                        step_name: name,
                                                        persistence });
                return Some(handle);
            }

            if let Some(output) = step.skipped_output() {
                *args = output;
            }
            // un paso sin entrada válida nunca ocupa posición en la cadena
            let persisted = step.is_bound() && persistence != FlowPersistence::RemovedAfterProceeding;
            if persisted {
                self.chain.materialize(index, step, false, persistence);
            }
            debug!("walk:skip run_id={} index={index} step={name} persisted={persisted}", self.run_id);
            self.record(WorkflowEventKind::Skipped { step_index: index,
                                                     step_name: name,
                                                     persisted });
            index += 1;
        }
        None
    }

    fn finish_run(&mut self, args: Envelope) {
        self.chain.clear();
        self.state = WorkflowState::Completed;
        self.record(WorkflowEventKind::Completed);
        let summary = self.summary();
        let mut on_finish = OnFinish::new(self.on_finish.take());
        self.responder.complete(&summary, &args, &mut on_finish);
        on_finish.finish(args);
        debug!("complete:done run_id={}", self.run_id);
    }

    fn record(&mut self, kind: WorkflowEventKind) {
        self.event_store.append_kind(self.run_id, kind);
    }
}
