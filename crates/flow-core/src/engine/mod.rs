//! Engine module: the orchestration state machine and its live chain.
//!
//! - `WorkflowEngine`: launch / proceed / back_up / abandon over a `StepGraph`.
//! - `SharedWorkflow`: reference-counted handle that detects reentrant calls.

mod chain;
pub mod core;
pub mod shared;

pub use self::core::{WorkflowEngine, WorkflowState};
pub use self::shared::{SharedWorkflow, WeakWorkflow};

pub use crate::event::{EventStore, InMemoryEventStore, NullEventStore, WorkflowEvent, WorkflowEventKind};
pub use crate::responder::{OnFinish, OrchestrationResponder, StepPosition, WorkflowSummary};
