//! Engine compartido entre el embebedor, sus pasos y su responder.
//!
//! `WorkflowEngine` exige `&mut self` para cada transición. Cuando varias
//! partes necesitan disparar transiciones (p.ej. el responder guarda el engine
//! para avanzar al recibir un evento de UI), `SharedWorkflow` lo envuelve en
//! `Rc<RefCell<..>>`. Una llamada hecha mientras otra transición está en curso
//! (desde un callback del responder) falla con `WorkflowError::ReentrantCall`
//! en lugar de corromper el estado.
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{WorkflowEngine, WorkflowState};
use crate::errors::WorkflowError;
use crate::event::{EventStore, InMemoryEventStore};
use crate::model::Envelope;
use crate::responder::OrchestrationResponder;
use crate::step::{FlowStep, StepHandle};

pub struct SharedWorkflow<R, E = InMemoryEventStore>
    where R: OrchestrationResponder,
          E: EventStore
{
    inner: Rc<RefCell<WorkflowEngine<R, E>>>,
}

/// Referencia débil: un paso o responder puede guardarla sin mantener vivo
/// el engine.
pub struct WeakWorkflow<R, E = InMemoryEventStore>
    where R: OrchestrationResponder,
          E: EventStore
{
    inner: Weak<RefCell<WorkflowEngine<R, E>>>,
}

impl<R, E> Clone for SharedWorkflow<R, E>
    where R: OrchestrationResponder,
          E: EventStore
{
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<R, E> Clone for WeakWorkflow<R, E>
    where R: OrchestrationResponder,
          E: EventStore
{
    fn clone(&self) -> Self {
        Self { inner: Weak::clone(&self.inner) }
    }
}

impl<R, E> SharedWorkflow<R, E>
    where R: OrchestrationResponder,
          E: EventStore
{
    pub fn new(engine: WorkflowEngine<R, E>) -> Self {
        Self { inner: Rc::new(RefCell::new(engine)) }
    }

    pub fn downgrade(&self) -> WeakWorkflow<R, E> {
        WeakWorkflow { inner: Rc::downgrade(&self.inner) }
    }

    /// Acceso exclusivo al engine; falla si ya hay una transición en curso.
    pub fn with<T>(&self, f: impl FnOnce(&mut WorkflowEngine<R, E>) -> T) -> Result<T, WorkflowError> {
        let mut engine = self.inner.try_borrow_mut().map_err(|_| WorkflowError::ReentrantCall)?;
        Ok(f(&mut engine))
    }

    /// Acceso de lectura; falla si hay una transición en curso.
    pub fn inspect<T>(&self, f: impl FnOnce(&WorkflowEngine<R, E>) -> T) -> Result<T, WorkflowError> {
        let engine = self.inner.try_borrow().map_err(|_| WorkflowError::ReentrantCall)?;
        Ok(f(&engine))
    }

    pub fn launch(&self, args: Envelope) -> Result<Option<StepHandle>, WorkflowError> {
        self.with(|e| e.launch(args))?
    }

    pub fn launch_with<F>(&self, args: Envelope, on_finish: F) -> Result<Option<StepHandle>, WorkflowError>
        where F: FnOnce(Envelope) + 'static
    {
        self.with(|e| e.launch_with(args, on_finish))?
    }

    pub fn proceed(&self, from: StepHandle, args: Envelope) -> Result<Option<StepHandle>, WorkflowError> {
        self.with(|e| e.proceed(from, args))?
    }

    pub fn proceed_with<S: FlowStep>(&self, from: StepHandle, output: S::Output) -> Result<Option<StepHandle>, WorkflowError> {
        self.with(|e| e.proceed_with::<S>(from, output))?
    }

    pub fn back_up(&self) -> Result<StepHandle, WorkflowError> {
        self.with(|e| e.back_up())?
    }

    pub fn abandon(&self) -> Result<(), WorkflowError> {
        self.with(|e| e.abandon())
    }

    pub fn release(&self, handle: StepHandle) -> Result<(), WorkflowError> {
        self.with(|e| e.release(handle))?
    }

    pub fn reset(&self) -> Result<(), WorkflowError> {
        self.with(|e| e.reset())
    }

    pub fn state(&self) -> Result<WorkflowState, WorkflowError> {
        self.inspect(|e| e.state())
    }
}

impl<R, E> WeakWorkflow<R, E>
    where R: OrchestrationResponder,
          E: EventStore
{
    /// `None` si el engine ya se liberó.
    pub fn upgrade(&self) -> Option<SharedWorkflow<R, E>> {
        self.inner.upgrade().map(|inner| SharedWorkflow { inner })
    }
}
