use std::marker::PhantomData;

use super::{GraphBuilder, StepGraph};
use crate::model::Envelope;
use crate::step::{FlowStep, StepSpec};

/// Marker trait to assert two types are the same at compile time.
/// Implemented only for identical types (T: SameAs<T> for all T).
pub trait SameAs<T> {}
impl<T> SameAs<T> for T {}

/// Typed workflow builder that enforces at compile time that the next step's
/// input matches the previous step's output.
///
/// Usage:
///   let graph = Workflow::new(step::<Welcome>())
///       .then(step::<EnterName>())
///       .then_ignoring_input(step::<Done>())
///       .build();
///
/// Steps declaring `Input = ()` accept any predecessor through
/// `then_ignoring_input`; steps declaring `Input = Envelope` accept any
/// predecessor through `then_passthrough`.
pub struct Workflow<S: FlowStep> {
    builder: GraphBuilder,
    _out: PhantomData<fn() -> S>,
}

impl<S: FlowStep> Workflow<S> {
    pub fn new(first: StepSpec<S>) -> Self {
        let mut builder = GraphBuilder::new();
        builder.append(first);
        Self { builder,
               _out: PhantomData }
    }

    /// Append a step whose input is exactly the previous step's output.
    pub fn then<N>(self, next: StepSpec<N>) -> Workflow<N>
        where N: FlowStep,
              N::Input: SameAs<S::Output>
    {
        self.push(next)
    }

    /// Append a step that ignores its input.
    pub fn then_ignoring_input<N>(self, next: StepSpec<N>) -> Workflow<N>
        where N: FlowStep<Input = ()>
    {
        self.push(next)
    }

    /// Append a passthrough step that receives the raw envelope.
    pub fn then_passthrough<N>(self, next: StepSpec<N>) -> Workflow<N>
        where N: FlowStep<Input = Envelope>
    {
        self.push(next)
    }

    pub fn len(&self) -> usize {
        self.builder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }

    /// Build the graph. The checks done by `then*` happen before boxing, the
    /// resulting `StepGraph` is the same one the dynamic builder produces.
    pub fn build(self) -> StepGraph {
        self.builder.build()
    }

    fn push<N: FlowStep>(mut self, next: StepSpec<N>) -> Workflow<N> {
        self.builder.append(next);
        Workflow { builder: self.builder,
                   _out: PhantomData }
    }
}
