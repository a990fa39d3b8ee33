//! Descriptor de paso: fábrica + metadatos.
//!
//! El descriptor se crea una sola vez al construir el grafo y no cambia. Lleva:
//! - la fábrica que produce una instancia a partir del `Envelope` entrante,
//! - la regla de persistencia (fija o dinámica),
//! - el `LaunchStyle` que el responder usará para presentar el paso.
//!
//! `StepSpec<S>` es la variante tipada que usa el builder con chequeo de
//! tipos en compilación; se convierte en `StepDescriptor` al encadenarse.
use std::any::{type_name, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;

use super::erased::UnboundStep;
use super::{ErasedStep, FlowStep};
use crate::model::{Envelope, FlowPersistence, LaunchStyle, PersistenceRule};

pub type StepFactory = Arc<dyn Fn(&Envelope) -> Box<dyn ErasedStep> + Send + Sync>;

#[derive(Clone)]
pub struct StepDescriptor {
    name: String,
    step_type: TypeId,
    type_name: &'static str,
    factory: StepFactory,
    persistence: PersistenceRule,
    launch_style: LaunchStyle,
}

impl StepDescriptor {
    /// Descriptor por defecto de `S`: nombre `S::name()`, persistencia
    /// `PersistUntilRemoved` y el estilo preferido del paso.
    pub fn of<S: FlowStep>() -> Self {
        Self { name: S::name().to_string(),
               step_type: TypeId::of::<S>(),
               type_name: type_name::<S>(),
               factory: typed_factory::<S>(),
               persistence: PersistenceRule::default(),
               launch_style: S::preferred_launch_style() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_persistence(mut self, persistence: FlowPersistence) -> Self {
        self.persistence = PersistenceRule::Static(persistence);
        self
    }

    pub fn with_persistence_rule(mut self, rule: PersistenceRule) -> Self {
        self.persistence = rule;
        self
    }

    pub fn with_launch_style(mut self, style: LaunchStyle) -> Self {
        self.launch_style = style;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn launch_style(&self) -> &LaunchStyle {
        &self.launch_style
    }

    pub fn persistence_rule(&self) -> &PersistenceRule {
        &self.persistence
    }

    /// Resuelve la persistencia para el envelope que viaja hacia adelante.
    pub fn persistence(&self, args: &Envelope) -> FlowPersistence {
        self.persistence.resolve(args)
    }

    pub fn step_type(&self) -> TypeId {
        self.step_type
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<S: FlowStep>(&self) -> bool {
        self.step_type == TypeId::of::<S>()
    }

    pub fn instantiate(&self, args: &Envelope) -> Box<dyn ErasedStep> {
        (self.factory)(args)
    }
}

impl fmt::Debug for StepDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDescriptor")
         .field("name", &self.name)
         .field("type_name", &self.type_name)
         .field("persistence", &self.persistence)
         .field("launch_style", &self.launch_style)
         .finish()
    }
}

fn typed_factory<S: FlowStep>() -> StepFactory {
    Arc::new(|args: &Envelope| -> Box<dyn ErasedStep> {
        match args.extract::<S::Input>() {
            Some(input) => Box::new(S::create(input)),
            None => {
                let unbound = UnboundStep { expected: type_name::<S::Input>(),
                                            found: args.describe() };
                debug!("factory:unbound step={} expected={} found={}", S::name(), unbound.expected, unbound.found);
                Box::new(unbound)
            }
        }
    })
}

/// Descriptor tipado; conserva `S` para que el builder pueda exigir que
/// entradas y salidas encadenen.
pub struct StepSpec<S: FlowStep> {
    descriptor: StepDescriptor,
    _step: PhantomData<fn() -> S>,
}

/// Atajo para `StepSpec::<S>::new()`.
pub fn step<S: FlowStep>() -> StepSpec<S> {
    StepSpec::new()
}

impl<S: FlowStep> StepSpec<S> {
    pub fn new() -> Self {
        Self { descriptor: StepDescriptor::of::<S>(),
               _step: PhantomData }
    }

    pub fn persistence(mut self, persistence: FlowPersistence) -> Self {
        self.descriptor = self.descriptor.with_persistence(persistence);
        self
    }

    pub fn dynamic_persistence<F>(mut self, f: F) -> Self
        where F: Fn(&Envelope) -> FlowPersistence + Send + Sync + 'static
    {
        self.descriptor = self.descriptor.with_persistence_rule(PersistenceRule::dynamic(f));
        self
    }

    pub fn launch_style(mut self, style: LaunchStyle) -> Self {
        self.descriptor = self.descriptor.with_launch_style(style);
        self
    }

    pub fn into_descriptor(self) -> StepDescriptor {
        self.descriptor
    }
}

impl<S: FlowStep> Default for StepSpec<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FlowStep> From<StepSpec<S>> for StepDescriptor {
    fn from(spec: StepSpec<S>) -> Self {
        spec.into_descriptor()
    }
}
