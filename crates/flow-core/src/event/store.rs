use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use uuid::Uuid;

use super::{WorkflowEvent, WorkflowEventKind};
use crate::constants::RETAINED_RUNS;

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, run_id: Uuid, kind: WorkflowEventKind) -> WorkflowEvent;
    /// Lista eventos de un run (orden ascendente por seq).
    fn list(&self, run_id: Uuid) -> Vec<WorkflowEvent>;
}

/// Store en memoria con historial acotado a los últimos `max_runs` runs.
#[derive(Debug)]
pub struct InMemoryEventStore {
    inner: HashMap<Uuid, Vec<WorkflowEvent>>,
    order: VecDeque<Uuid>,
    max_runs: usize,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::with_max_runs(RETAINED_RUNS)
    }
}

impl InMemoryEventStore {
    /// `max_runs` se eleva a 1 como mínimo.
    pub fn with_max_runs(max_runs: usize) -> Self {
        Self { inner: HashMap::new(),
               order: VecDeque::new(),
               max_runs: max_runs.max(1) }
    }

    /// Ids de los runs retenidos, del más antiguo al más reciente.
    pub fn runs(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.order.iter().copied()
    }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, run_id: Uuid, kind: WorkflowEventKind) -> WorkflowEvent {
        if !self.inner.contains_key(&run_id) {
            while self.order.len() >= self.max_runs {
                if let Some(oldest) = self.order.pop_front() {
                    self.inner.remove(&oldest);
                }
            }
            self.order.push_back(run_id);
        }
        let vec = self.inner.entry(run_id).or_default();
        let seq = vec.len() as u64;
        let ev = WorkflowEvent { seq,
                                 run_id,
                                 kind,
                                 ts: Utc::now() };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<WorkflowEvent> {
        self.inner.get(&run_id).cloned().unwrap_or_default()
    }
}

/// Store que descarta todo (cuando no se quiere registrar navegación).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventStore;

impl EventStore for NullEventStore {
    fn append_kind(&mut self, run_id: Uuid, kind: WorkflowEventKind) -> WorkflowEvent {
        WorkflowEvent { seq: 0,
                        run_id,
                        kind,
                        ts: Utc::now() }
    }

    fn list(&self, _run_id: Uuid) -> Vec<WorkflowEvent> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_assigns_sequential_seq_per_run() {
        let mut store = InMemoryEventStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.append_kind(a, WorkflowEventKind::Abandoned);
        store.append_kind(b, WorkflowEventKind::Completed);
        let ev = store.append_kind(a, WorkflowEventKind::Completed);
        assert_eq!(ev.seq, 1);
        let list = store.list(a);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].kind, WorkflowEventKind::Abandoned);
        assert_eq!(store.list(b).len(), 1);
    }

    #[test]
    fn in_memory_drops_oldest_run_past_limit() {
        let mut store = InMemoryEventStore::with_max_runs(2);
        let runs: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &runs {
            store.append_kind(*id, WorkflowEventKind::Completed);
        }
        store.append_kind(runs[2], WorkflowEventKind::Abandoned);
        assert!(store.list(runs[0]).is_empty());
        assert_eq!(store.list(runs[2]).len(), 2);
        assert_eq!(store.runs().collect::<Vec<_>>(), vec![runs[1], runs[2]]);
    }

    #[test]
    fn null_store_keeps_nothing() {
        let mut store = NullEventStore;
        let id = Uuid::new_v4();
        store.append_kind(id, WorkflowEventKind::Completed);
        assert!(store.list(id).is_empty());
    }
}
