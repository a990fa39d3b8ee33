//! Eventos de navegación y trait EventStore.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore, NullEventStore};
pub use types::{WorkflowEvent, WorkflowEventKind};
