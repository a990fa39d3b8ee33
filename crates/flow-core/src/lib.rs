//! flow-core: motor de orquestación de workflows de pasos (pantallas).
//!
//! Un `StepGraph` fija la secuencia de pasos; el `WorkflowEngine` la recorre
//! (launch / proceed / back_up / abandon) pasando `Envelope`s entre pasos y
//! notificando cada transición a un `OrchestrationResponder`.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod graph;
pub mod hashing;
pub mod model;
pub mod responder;
pub mod step;

pub use engine::{SharedWorkflow, WeakWorkflow, WorkflowEngine, WorkflowState};
pub use errors::{ContractViolation, WorkflowError};
pub use event::{EventStore, InMemoryEventStore, NullEventStore, WorkflowEvent, WorkflowEventKind};
pub use graph::{GraphBuilder, SameAs, StepGraph, Workflow};
pub use model::{Envelope, FlowPersistence, LaunchStyle, PersistenceRule};
pub use responder::{FinishCallback, OnFinish, OrchestrationResponder, StepPosition, WorkflowSummary};
pub use step::{step, FlowStep, StepDescriptor, StepHandle, StepInstance, StepSpec};
